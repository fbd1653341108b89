use serde::{Deserialize, Serialize};

/// Congestion severity derived from the ratio of current to free-flow speed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
    Severe,
    Unknown,
}

impl CongestionLevel {
    /// Classify a speed pair. Bands are inclusive at their lower bound:
    /// `>= 0.8` Low, `>= 0.5` Moderate, `>= 0.3` High, otherwise Severe.
    ///
    /// A free-flow speed of exactly zero has no baseline and yields `Unknown`,
    /// as do non-finite inputs.
    pub fn classify(current_speed: f64, free_flow_speed: f64) -> Self {
        if free_flow_speed == 0.0 {
            return CongestionLevel::Unknown;
        }

        let ratio = current_speed / free_flow_speed;
        if !ratio.is_finite() {
            return CongestionLevel::Unknown;
        }

        if ratio >= 0.8 {
            CongestionLevel::Low
        } else if ratio >= 0.5 {
            CongestionLevel::Moderate
        } else if ratio >= 0.3 {
            CongestionLevel::High
        } else {
            CongestionLevel::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Moderate => "Moderate",
            CongestionLevel::High => "High",
            CongestionLevel::Severe => "Severe",
            CongestionLevel::Unknown => "Unknown",
        }
    }

    /// Stats-panel colour for this level.
    pub fn color(&self) -> &'static str {
        match self {
            CongestionLevel::Low => "#4CAF50",
            CongestionLevel::Moderate => "#FFC107",
            CongestionLevel::High => "#FF5722",
            CongestionLevel::Severe => "#D32F2F",
            CongestionLevel::Unknown => "#9E9E9E",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_free_flow_is_unknown() {
        for current in [0.0, 10.0, -5.0, 1e9] {
            assert_eq!(CongestionLevel::classify(current, 0.0), CongestionLevel::Unknown);
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CongestionLevel::classify(80.0, 100.0), CongestionLevel::Low);
        assert_eq!(CongestionLevel::classify(79.999, 100.0), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::classify(50.0, 100.0), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::classify(49.999, 100.0), CongestionLevel::High);
        assert_eq!(CongestionLevel::classify(30.0, 100.0), CongestionLevel::High);
        assert_eq!(CongestionLevel::classify(29.999, 100.0), CongestionLevel::Severe);
    }

    #[test]
    fn test_ratio_scale_invariance() {
        let pairs = [(12.0, 40.0), (35.0, 50.0), (90.0, 60.0), (3.0, 100.0)];
        for (current, free_flow) in pairs {
            let base = CongestionLevel::classify(current, free_flow);
            for k in [0.5, 2.0, 7.0] {
                assert_eq!(CongestionLevel::classify(current * k, free_flow * k), base);
            }
        }
    }

    #[test]
    fn test_faster_than_free_flow_is_low() {
        assert_eq!(CongestionLevel::classify(120.0, 60.0), CongestionLevel::Low);
    }

    #[test]
    fn test_non_finite_is_unknown() {
        assert_eq!(CongestionLevel::classify(f64::NAN, 50.0), CongestionLevel::Unknown);
        assert_eq!(CongestionLevel::classify(f64::INFINITY, 50.0), CongestionLevel::Unknown);
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(CongestionLevel::Severe.label(), "Severe");
        assert_eq!(CongestionLevel::Unknown.color(), "#9E9E9E");
        assert_eq!(CongestionLevel::Low.color(), "#4CAF50");
    }
}

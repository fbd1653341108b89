//! Geographic primitives: coordinates and provider-shaped bounding boxes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Half-width (degrees) of the box the summary aggregator queries for incidents.
pub const SUMMARY_BBOX_OFFSET: f64 = 0.045;

/// Half-width (degrees) of the box the dashboard incident panel queries.
pub const INCIDENT_PANEL_BBOX_OFFSET: f64 = 0.05;

/// A WGS84 point. Ranges are not validated; values pass through verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Provider `point` parameter: `lat,lng`.
    pub fn to_point_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Rectangular area in provider order `(min_lng, min_lat, max_lng, max_lat)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

/// Build a box centered on `(lat, lng)` extending `offset` degrees in every direction.
///
/// Zero or negative offsets are accepted and produce a degenerate or inverted box.
pub fn compute_bounding_box(lat: f64, lng: f64, offset: f64) -> BoundingBox {
    BoundingBox {
        min_lng: lng - offset,
        min_lat: lat - offset,
        max_lng: lng + offset,
        max_lat: lat + offset,
    }
}

impl BoundingBox {
    pub fn around(center: Coordinate, offset: f64) -> Self {
        compute_bounding_box(center.latitude, center.longitude, offset)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

/// Error returned when a `bbox` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundingBoxParseError {
    #[error("bbox must have 4 comma-separated values, got {0}")]
    WrongArity(usize),
    #[error("bbox component '{0}' is not a number")]
    InvalidNumber(String),
}

impl FromStr for BoundingBox {
    type Err = BoundingBoxParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BoundingBoxParseError::WrongArity(parts.len()));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BoundingBoxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(BoundingBox {
            min_lng: values[0],
            min_lat: values[1],
            max_lng: values[2],
            max_lat: values[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_bounding_box_new_delhi() {
        let bbox = compute_bounding_box(28.6139, 77.2090, 0.05);
        assert!((bbox.min_lng - 77.159).abs() < EPS);
        assert!((bbox.min_lat - 28.5639).abs() < EPS);
        assert!((bbox.max_lng - 77.259).abs() < EPS);
        assert!((bbox.max_lat - 28.6639).abs() < EPS);
    }

    #[test]
    fn test_bounding_box_zero_offset_is_degenerate() {
        let bbox = compute_bounding_box(10.0, 20.0, 0.0);
        assert_eq!(bbox.min_lng, bbox.max_lng);
        assert_eq!(bbox.min_lat, bbox.max_lat);
        assert_eq!(bbox.to_string(), "20,10,20,10");
    }

    #[test]
    fn test_bounding_box_negative_offset_is_inverted() {
        let bbox = compute_bounding_box(10.0, 20.0, -1.0);
        assert!(bbox.min_lng > bbox.max_lng);
        assert!(bbox.min_lat > bbox.max_lat);
    }

    #[test]
    fn test_bounding_box_display_order() {
        let bbox = BoundingBox {
            min_lng: 1.5,
            min_lat: -2.0,
            max_lng: 3.25,
            max_lat: 4.0,
        };
        assert_eq!(bbox.to_string(), "1.5,-2,3.25,4");
    }

    #[test]
    fn test_bounding_box_parse() {
        let bbox: BoundingBox = "77.159, 28.5639,77.259,28.6639".parse().unwrap();
        assert_eq!(bbox.min_lng, 77.159);
        assert_eq!(bbox.max_lat, 28.6639);
    }

    #[test]
    fn test_bounding_box_parse_errors() {
        assert_eq!(
            "1,2,3".parse::<BoundingBox>(),
            Err(BoundingBoxParseError::WrongArity(3))
        );
        assert_eq!(
            "1,2,x,4".parse::<BoundingBox>(),
            Err(BoundingBoxParseError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn test_point_param() {
        let c = Coordinate::new(28.6139, 77.209);
        assert_eq!(c.to_point_param(), "28.6139,77.209");
    }

    #[test]
    fn test_around_matches_compute() {
        let c = Coordinate::new(1.0, 2.0);
        assert_eq!(BoundingBox::around(c, 0.5), compute_bounding_box(1.0, 2.0, 0.5));
    }
}

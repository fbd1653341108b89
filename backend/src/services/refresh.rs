//! Polling loop that keeps a dashboard fed with fresh summaries.

use std::time::Duration;

use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::dashboard::DashboardSettings;
use super::summary::TrafficSummaryAggregator;
use crate::models::{Coordinate, TrafficSummary};

/// Periodic refresher for one dashboard.
///
/// Fetches a summary for the watched location on every tick, and immediately
/// whenever the location changes. Stops once the summary receiver or the
/// location sender is dropped.
pub struct AutoRefresh {
    aggregator: TrafficSummaryAggregator,
    interval: Duration,
}

impl AutoRefresh {
    pub fn new(aggregator: TrafficSummaryAggregator, interval: Duration) -> Self {
        Self {
            aggregator,
            interval,
        }
    }

    /// Refresher at the dashboard's interval, or `None` when auto refresh is off.
    pub fn from_settings(
        aggregator: TrafficSummaryAggregator,
        settings: &DashboardSettings,
    ) -> Option<Self> {
        settings
            .auto_refresh
            .then(|| Self::new(aggregator, settings.refresh_interval))
    }

    pub fn spawn(
        self,
        location: watch::Receiver<Coordinate>,
    ) -> (JoinHandle<()>, mpsc::Receiver<TrafficSummary>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(self.run(location, tx));
        (handle, rx)
    }

    async fn run(self, mut location: watch::Receiver<Coordinate>, tx: mpsc::Sender<TrafficSummary>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Auto refresh started (every {:?})", self.interval);

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                _ = ticker.tick() => {}
                changed = location.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    ticker.reset();
                }
            }

            let target = *location.borrow_and_update();
            debug!("Refreshing traffic at {}", target.to_point_param());

            let summary = self.aggregator.summarize(target).await;
            if tx.send(summary).await.is_err() {
                break;
            }
        }

        info!("Auto refresh stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, Envelope, FlowReport, IncidentList, IncidentsReport, TrafficFlow};
    use crate::provider::TrafficProvider;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl TrafficProvider for Echo {
        async fn fetch_flow(&self, coordinate: Coordinate, _zoom: u8) -> FlowReport {
            Envelope::Success(TrafficFlow {
                current_speed_kmh: coordinate.latitude,
                ..Default::default()
            })
        }

        async fn fetch_incidents(&self, _bbox: &BoundingBox, _zoom: u8) -> IncidentsReport {
            Envelope::Success(IncidentList::default())
        }
    }

    fn refresher(interval: Duration) -> AutoRefresh {
        AutoRefresh::new(TrafficSummaryAggregator::new(Arc::new(Echo)), interval)
    }

    #[tokio::test]
    async fn test_emits_on_each_tick() {
        let (_loc_tx, loc_rx) = watch::channel(Coordinate::new(1.0, 2.0));
        let (handle, mut rx) = refresher(Duration::from_millis(20)).spawn(loc_rx);

        for _ in 0..2 {
            let summary = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("refresh tick")
                .expect("channel open");
            assert_eq!(summary.location, Coordinate::new(1.0, 2.0));
        }

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop stops after receiver drop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_location_change_triggers_refresh() {
        let (loc_tx, loc_rx) = watch::channel(Coordinate::new(1.0, 2.0));
        let (_handle, mut rx) = refresher(Duration::from_secs(3600)).spawn(loc_rx);

        // First tick fires immediately.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.location, Coordinate::new(1.0, 2.0));

        loc_tx.send(Coordinate::new(5.0, 6.0)).unwrap();
        let moved = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("refresh after move")
            .unwrap();
        assert_eq!(moved.location, Coordinate::new(5.0, 6.0));
        assert_eq!(moved.flow.data().unwrap().current_speed_kmh, 5.0);
    }

    #[tokio::test]
    async fn test_stops_promptly_when_receiver_dropped_between_ticks() {
        let (_loc_tx, loc_rx) = watch::channel(Coordinate::new(1.0, 2.0));
        let (handle, mut rx) = refresher(Duration::from_secs(3600)).spawn(loc_rx);

        rx.recv().await.unwrap();
        drop(rx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop stops without waiting for the next tick")
            .unwrap();
    }

    #[test]
    fn test_from_settings() {
        let aggregator = TrafficSummaryAggregator::new(Arc::new(Echo));

        let settings = DashboardSettings::validated(45, 12, false, true).unwrap();
        let refresh = AutoRefresh::from_settings(aggregator.clone(), &settings).unwrap();
        assert_eq!(refresh.interval, Duration::from_secs(45));

        let manual = DashboardSettings {
            auto_refresh: false,
            ..DashboardSettings::default()
        };
        assert!(AutoRefresh::from_settings(aggregator, &manual).is_none());
    }

    #[tokio::test]
    async fn test_stops_when_location_sender_dropped() {
        let (loc_tx, loc_rx) = watch::channel(Coordinate::new(1.0, 2.0));
        let (handle, mut rx) = refresher(Duration::from_secs(3600)).spawn(loc_rx);

        rx.recv().await.unwrap();
        drop(loc_tx);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop stops after sender drop")
            .unwrap();
    }
}

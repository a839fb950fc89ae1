//! Proximity alerts around fixed points of interest.
//!
//! Each point of interest is either `Outside` or `Alerted`. Entering the
//! radius of an `Outside` point raises one alert; leaving the radius re-arms
//! it so the next visit alerts again.

use derive_more::Constructor;

use crate::config::ProximityConfig;
use crate::error::Result;
use crate::geo::{PointOfInterest, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    Outside,
    Alerted,
}

impl Default for ZoneState {
    fn default() -> Self {
        ZoneState::Outside
    }
}

#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct AlertEvent {
    pub title: String,
    pub body: String,
    pub point: PointOfInterest,
}

/// Producer of position fixes. Returns `None` once the source is exhausted.
pub trait PositionSource {
    fn next_fix(&mut self) -> Option<Position>;
}

impl PositionSource for std::vec::IntoIter<Position> {
    fn next_fix(&mut self) -> Option<Position> {
        self.next()
    }
}

/// Sink for alerts.
pub trait Notifier {
    fn send(&self, alert: &AlertEvent) -> Result<()>;
}

pub struct ProximityMonitor {
    points: Vec<PointOfInterest>,
    zones: Vec<ZoneState>,
    radius_meters: f64,
    title: String,
    body: String,
    last_position: Option<Position>,
}

impl ProximityMonitor {
    pub fn new(points: Vec<PointOfInterest>, radius_meters: f64, title: &str, body: &str) -> Self {
        ProximityMonitor {
            zones: vec![ZoneState::default(); points.len()],
            points,
            radius_meters,
            title: title.to_owned(),
            body: body.to_owned(),
            last_position: None,
        }
    }

    pub fn from_config(config: &ProximityConfig) -> Self {
        ProximityMonitor::new(
            config.points.clone(),
            config.radius_meters,
            &config.title,
            &config.body,
        )
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn zone_states(&self) -> &[ZoneState] {
        &self.zones
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    fn in_range(&self, point: &PointOfInterest, position: &Position) -> bool {
        point.position().distance_to(position) < self.radius_meters
    }

    /// Points of interest within range of the last known position.
    pub fn nearby(&self) -> Vec<&PointOfInterest> {
        match &self.last_position {
            Some(position) => self
                .points
                .iter()
                .filter(|point| self.in_range(point, position))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn on_position_update(&mut self, fix: Position) -> Vec<AlertEvent> {
        self.last_position = Some(fix);

        let mut alerts = Vec::new();
        for (idx, point) in self.points.iter().enumerate() {
            let inside = self.in_range(point, &fix);

            match (self.zones[idx], inside) {
                (ZoneState::Outside, true) => {
                    log::info!("Entered range of {}", point.label());
                    self.zones[idx] = ZoneState::Alerted;
                    alerts.push(AlertEvent::new(
                        self.title.clone(),
                        self.body.clone(),
                        point.clone(),
                    ));
                }
                (ZoneState::Alerted, false) => {
                    log::debug!("Left range of {}, re-arming", point.label());
                    self.zones[idx] = ZoneState::Outside;
                }
                _ => {}
            }
        }

        alerts
    }
}

/// Drives a monitoring session until the source runs dry. Returns the
/// number of alerts raised.
pub fn watch<S, N>(source: &mut S, notifier: &N, monitor: &mut ProximityMonitor) -> usize
where
    S: PositionSource + ?Sized,
    N: Notifier + ?Sized,
{
    let mut raised = 0;

    while let Some(fix) = source.next_fix() {
        log::trace!("Position fix {}", fix);

        for alert in monitor.on_position_update(fix) {
            raised += 1;
            if let Err(e) = notifier.send(&alert) {
                log::warn!(
                    "Could not deliver alert for {}: {}",
                    alert.point.label(),
                    e
                );
            }
        }
    }

    log::info!("Position source closed after {} alert(s)", raised);
    raised
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use std::cell::RefCell;

    const BAR: (f64, f64) = (37.867993, -122.259592);

    fn pos(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude).unwrap()
    }

    fn monitor(points: Vec<PointOfInterest>) -> ProximityMonitor {
        ProximityMonitor::new(points, 20.0, "Heads up", "You are near a bar.")
    }

    fn bar() -> PointOfInterest {
        PointOfInterest::new(Some("bar".to_owned()), BAR.0, BAR.1)
    }

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<AlertEvent>>,
    }

    impl Notifier for Recorder {
        fn send(&self, alert: &AlertEvent) -> Result<()> {
            self.sent.borrow_mut().push(alert.clone());
            Ok(())
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn send(&self, _alert: &AlertEvent) -> Result<()> {
            Err(Error::new(ErrorKind::Notification, "daemon unavailable"))
        }
    }

    #[test]
    fn alert_once_per_visit() {
        let mut monitor = monitor(vec![bar()]);
        let at_bar = pos(BAR.0, BAR.1);
        // Roughly 1.1 km north.
        let away = pos(BAR.0 + 0.01, BAR.1);

        let alerts = monitor.on_position_update(at_bar);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Heads up");
        assert_eq!(alerts[0].body, "You are near a bar.");
        assert_eq!(alerts[0].point, bar());
        assert_eq!(monitor.zone_states(), &[ZoneState::Alerted]);

        assert!(monitor.on_position_update(at_bar).is_empty());
        assert!(monitor.on_position_update(at_bar).is_empty());

        assert!(monitor.on_position_update(away).is_empty());
        assert_eq!(monitor.zone_states(), &[ZoneState::Outside]);

        assert_eq!(monitor.on_position_update(at_bar).len(), 1);
    }

    #[test]
    fn monitor_from_default_config() {
        let config = ProximityConfig::default();
        let mut monitor = ProximityMonitor::from_config(&config);

        assert_eq!(monitor.radius_meters(), 20.0);
        assert_eq!(monitor.points().len(), 1);

        let alerts = monitor.on_position_update(pos(BAR.0, BAR.1));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, config.title);
    }

    #[test]
    fn distance_equal_to_radius_counts_as_outside() {
        let edge = pos(BAR.0 + 0.0001, BAR.1);
        let radius = bar().position().distance_to(&edge);
        let mut monitor = ProximityMonitor::new(vec![bar()], radius, "Heads up", "Edge");

        assert!(monitor.on_position_update(edge).is_empty());
        assert_eq!(monitor.zone_states(), &[ZoneState::Outside]);
        assert!(monitor.nearby().is_empty());

        assert_eq!(monitor.on_position_update(pos(BAR.0, BAR.1)).len(), 1);
        assert_eq!(monitor.zone_states(), &[ZoneState::Alerted]);

        assert!(monitor.on_position_update(edge).is_empty());
        assert_eq!(monitor.zone_states(), &[ZoneState::Outside]);
    }

    #[test]
    fn nothing_without_a_fix() {
        let monitor = monitor(vec![bar()]);

        assert_eq!(monitor.last_position(), None);
        assert!(monitor.nearby().is_empty());
        assert_eq!(monitor.zone_states(), &[ZoneState::Outside]);
    }

    #[test]
    fn nothing_when_out_of_range() {
        let mut monitor = monitor(vec![bar()]);
        // About 33 meters north.
        let fix = pos(BAR.0 + 0.0003, BAR.1);

        assert!(bar().position().distance_to(&fix) > 20.0);
        assert!(monitor.on_position_update(fix).is_empty());
        assert!(monitor.nearby().is_empty());
        assert_eq!(monitor.last_position(), Some(fix));
    }

    #[test]
    fn lingering_inside_the_radius_stays_quiet() {
        let mut monitor = monitor(vec![bar()]);

        assert_eq!(monitor.on_position_update(pos(BAR.0, BAR.1)).len(), 1);
        // About 11 meters away, still inside.
        assert!(monitor
            .on_position_update(pos(BAR.0 + 0.0001, BAR.1))
            .is_empty());
        assert_eq!(monitor.nearby(), vec![&bar()]);
    }

    #[test]
    fn each_point_in_range_alerts_independently() {
        let neighbour = PointOfInterest::new(Some("next door".to_owned()), BAR.0 + 0.0001, BAR.1);
        let far = PointOfInterest::new(None, 40.0, -74.0);
        let mut monitor = monitor(vec![bar(), neighbour.clone(), far]);

        let alerts = monitor.on_position_update(pos(BAR.0 + 0.00005, BAR.1));
        let names: Vec<String> = alerts.iter().map(|a| a.point.label()).collect();
        assert_eq!(names, vec!["bar".to_owned(), "next door".to_owned()]);
        assert_eq!(
            monitor.zone_states(),
            &[ZoneState::Alerted, ZoneState::Alerted, ZoneState::Outside]
        );
    }

    #[test]
    fn watch_forwards_alerts_to_notifier() {
        let fixes = vec![
            pos(BAR.0, BAR.1),
            pos(BAR.0, BAR.1),
            pos(BAR.0 + 0.01, BAR.1),
            pos(BAR.0, BAR.1),
        ];
        let mut monitor = monitor(vec![bar()]);
        let recorder = Recorder::default();

        let raised = watch(&mut fixes.into_iter(), &recorder, &mut monitor);

        assert_eq!(raised, 2);
        assert_eq!(recorder.sent.borrow().len(), 2);
        assert_eq!(monitor.last_position(), Some(pos(BAR.0, BAR.1)));
    }

    #[test]
    fn watch_survives_notifier_failures() {
        let mut monitor = monitor(vec![bar()]);
        let fixes = vec![pos(BAR.0, BAR.1)];

        assert_eq!(watch(&mut fixes.into_iter(), &Failing, &mut monitor), 1);
        assert_eq!(monitor.zone_states(), &[ZoneState::Alerted]);
    }

    #[test]
    fn empty_source_raises_nothing() {
        let mut monitor = monitor(vec![bar()]);
        let recorder = Recorder::default();

        assert_eq!(watch(&mut Vec::<Position>::new().into_iter(), &recorder, &mut monitor), 0);
        assert!(recorder.sent.borrow().is_empty());
    }
}

//! Fireplaces built from wood logs.
//!
//! A fireplace has a fixed number of log slots and an unlit heat zone. Logs
//! released inside its detection sphere fill the next free slot and are
//! destroyed; filling the last slot lights the fire.

use crate::constants::*;
use crate::heat_zone::HeatZone;
use glam::Vec3;

/// Marker for a grabbable that can be placed into a fireplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WoodLog;

/// Result of offering a log to a fireplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPlacement {
    /// The log filled `slot`; more are needed
    Placed { slot: usize },
    /// The log filled the last slot and the fire is now lit
    Completed { slot: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fireplace {
    pub center: Vec3,
    /// Logs released within this distance of `center` are placed
    pub detection_radius: f32,
    slots: Vec<bool>,
    heat_zone: HeatZone,
}

impl Fireplace {
    /// Unlit fireplace with the stock radii and log count
    pub fn new(center: Vec3) -> Self {
        Self::with_logs(center, FIREPLACE_REQUIRED_LOGS)
    }

    /// Unlit fireplace needing `required_logs` logs (at least one)
    pub fn with_logs(center: Vec3, required_logs: usize) -> Self {
        Self {
            center,
            detection_radius: FIREPLACE_DETECTION_RADIUS,
            slots: vec![false; required_logs.max(1)],
            heat_zone: HeatZone::unlit(
                center,
                FIREPLACE_HEAT_RADIUS,
                Vec3::splat(FIREPLACE_SHELTER_HALF_EXTENT),
            ),
        }
    }

    pub fn required_logs(&self) -> usize {
        self.slots.len()
    }

    pub fn placed_logs(&self) -> usize {
        self.slots.iter().filter(|s| **s).count()
    }

    pub fn is_slot_filled(&self, slot: usize) -> bool {
        self.slots.get(slot).copied().unwrap_or(false)
    }

    pub fn next_available_slot(&self) -> Option<usize> {
        self.slots.iter().position(|filled| !filled)
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|filled| *filled)
    }

    pub fn is_burning(&self) -> bool {
        self.heat_zone.burning
    }

    pub fn heat_zone(&self) -> &HeatZone {
        &self.heat_zone
    }

    /// Whether a log at `location` is close enough to be placed
    pub fn in_range(&self, location: Vec3) -> bool {
        self.center.distance(location) <= self.detection_radius
    }

    /// Fill the next free slot. Returns `None` once the fire is complete.
    pub fn place_log(&mut self) -> Option<LogPlacement> {
        let slot = self.next_available_slot()?;
        self.slots[slot] = true;
        if self.is_complete() {
            self.heat_zone.ignite();
            Some(LogPlacement::Completed { slot })
        } else {
            Some(LogPlacement::Placed { slot })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_fill_in_order_and_light_on_last() {
        let mut fireplace = Fireplace::new(Vec3::ZERO);
        assert_eq!(fireplace.required_logs(), 3);
        assert!(!fireplace.is_burning());

        assert_eq!(fireplace.place_log(), Some(LogPlacement::Placed { slot: 0 }));
        assert_eq!(fireplace.place_log(), Some(LogPlacement::Placed { slot: 1 }));
        assert!(!fireplace.is_burning());
        assert_eq!(fireplace.next_available_slot(), Some(2));

        assert_eq!(fireplace.place_log(), Some(LogPlacement::Completed { slot: 2 }));
        assert!(fireplace.is_complete());
        assert!(fireplace.is_burning());
        assert_eq!(fireplace.place_log(), None);
        assert_eq!(fireplace.placed_logs(), 3);
    }

    #[test]
    fn test_detection_range() {
        let fireplace = Fireplace::new(Vec3::new(0.0, 0.0, 10.0));
        assert!(fireplace.in_range(Vec3::new(FIREPLACE_DETECTION_RADIUS - 1.0, 0.0, 10.0)));
        assert!(!fireplace.in_range(Vec3::new(FIREPLACE_DETECTION_RADIUS + 1.0, 0.0, 10.0)));
    }

    #[test]
    fn test_needs_at_least_one_log() {
        let mut fireplace = Fireplace::with_logs(Vec3::ZERO, 0);
        assert!(!fireplace.is_complete());
        assert_eq!(fireplace.place_log(), Some(LogPlacement::Completed { slot: 0 }));
    }
}

//! Day/night cycle.

use crate::config::DayNightConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Night,
}

/// Time-of-day collaborator consumed by the session
pub trait DayNightProvider {
    /// Hour of day in [0, 24)
    fn current_hour(&self) -> f32;
    fn is_night(&self) -> bool;
    fn is_day(&self) -> bool {
        !self.is_night()
    }
    fn temperature_modifier(&self) -> f32;
    fn advance(&mut self, dt: f32);
    fn set_current_hour(&mut self, hour: f32);
    /// Jump to the start of the day. Only allowed at night.
    fn sleep_until_morning(&mut self) -> bool;
    /// The phase just entered, once per transition
    fn poll_transition(&mut self) -> Option<DayPhase>;
}

#[derive(Debug, Clone)]
pub struct DayNightCycle {
    config: DayNightConfig,
    hour: f32,
    was_night: bool,
}

/// Map any hour onto [0, 24). 24:00 is midnight of the next day.
fn wrap_hour(hour: f32) -> f32 {
    if !hour.is_finite() {
        return 0.0;
    }
    let wrapped = hour.rem_euclid(24.0);
    // A tiny negative hour can round up to exactly 24
    if wrapped >= 24.0 {
        0.0
    } else {
        wrapped
    }
}

impl DayNightCycle {
    pub fn new(config: DayNightConfig) -> Self {
        let mut cycle = Self {
            config,
            hour: wrap_hour(config.starting_hour),
            was_night: false,
        };
        cycle.was_night = cycle.is_night();
        cycle
    }

    fn day_length_seconds(&self) -> f32 {
        self.config.day_length_minutes * 60.0
    }

    /// "HH:MM"
    pub fn formatted_time(&self) -> String {
        let hours = self.hour.floor() as u32;
        let minutes = ((self.hour - hours as f32) * 60.0).floor() as u32;
        format!("{hours:02}:{minutes:02}")
    }

    /// Sun pitch in degrees, a full turn per day
    pub fn sun_angle(&self) -> f32 {
        self.hour / 24.0 * 360.0
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DayNightConfig::default())
    }
}

impl DayNightProvider for DayNightCycle {
    fn current_hour(&self) -> f32 {
        self.hour
    }

    fn is_night(&self) -> bool {
        self.hour >= self.config.night_start_hour || self.hour < self.config.day_start_hour
    }

    fn temperature_modifier(&self) -> f32 {
        if self.is_night() {
            self.config.night_temperature_modifier
        } else {
            self.config.day_temperature_modifier
        }
    }

    fn advance(&mut self, dt: f32) {
        let length = self.day_length_seconds();
        if length <= 0.0 {
            return;
        }
        let multiplier = if self.is_night() {
            self.config.night_speed_multiplier
        } else {
            1.0
        };
        self.hour += 24.0 / length * dt * multiplier;
        if self.hour >= 24.0 {
            self.hour %= 24.0;
        }
    }

    fn set_current_hour(&mut self, hour: f32) {
        self.hour = wrap_hour(hour);
    }

    fn sleep_until_morning(&mut self) -> bool {
        if !self.is_night() {
            return false;
        }
        self.set_current_hour(self.config.day_start_hour);
        tracing::info!(time = %self.formatted_time(), "slept until morning");
        true
    }

    fn poll_transition(&mut self) -> Option<DayPhase> {
        let night = self.is_night();
        if night == self.was_night {
            return None;
        }
        self.was_night = night;
        Some(if night { DayPhase::Night } else { DayPhase::Day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        let mut cycle = DayNightCycle::default();
        assert!(cycle.is_day());
        cycle.set_current_hour(18.0);
        assert!(cycle.is_night());
        cycle.set_current_hour(5.99);
        assert!(cycle.is_night());
        cycle.set_current_hour(6.0);
        assert!(cycle.is_day());
    }

    #[test]
    fn test_night_runs_faster_and_wraps() {
        let mut cycle = DayNightCycle::default();
        // 20 minute day: one hour is 50 seconds of daylight
        cycle.advance(50.0);
        assert!((cycle.current_hour() - 13.0).abs() < 1e-3);

        cycle.set_current_hour(23.5);
        cycle.advance(50.0);
        assert!((cycle.current_hour() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_transition_fires_once() {
        let mut cycle = DayNightCycle::default();
        assert_eq!(cycle.poll_transition(), None);
        cycle.set_current_hour(19.0);
        assert_eq!(cycle.poll_transition(), Some(DayPhase::Night));
        assert_eq!(cycle.poll_transition(), None);
        assert!(cycle.sleep_until_morning());
        assert_eq!(cycle.poll_transition(), Some(DayPhase::Day));
    }

    #[test]
    fn test_sleep_refused_during_day() {
        let mut cycle = DayNightCycle::default();
        assert!(!cycle.sleep_until_morning());
        assert_eq!(cycle.current_hour(), 12.0);
    }

    #[test]
    fn test_formatted_time() {
        let mut cycle = DayNightCycle::default();
        cycle.set_current_hour(7.5);
        assert_eq!(cycle.formatted_time(), "07:30");
        assert_eq!(cycle.temperature_modifier(), 1.0);
    }

    #[test]
    fn test_hour_24_wraps_to_midnight() {
        let mut cycle = DayNightCycle::default();
        cycle.set_current_hour(24.0);
        assert_eq!(cycle.current_hour(), 0.0);
        assert_eq!(cycle.formatted_time(), "00:00");
        assert!(cycle.is_night());

        cycle.set_current_hour(-1.0);
        assert_eq!(cycle.current_hour(), 23.0);
        cycle.set_current_hour(30.0);
        assert_eq!(cycle.current_hour(), 6.0);

        let cycle = DayNightCycle::new(DayNightConfig {
            starting_hour: 24.0,
            ..DayNightConfig::default()
        });
        assert_eq!(cycle.formatted_time(), "00:00");
    }
}

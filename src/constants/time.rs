//! Timer and day/night constants.

/// Seconds between survival stat updates
pub const SURVIVAL_UPDATE_INTERVAL: f32 = 1.0;
/// Shortest period a repeating timer may have
pub const MIN_TIMER_INTERVAL: f32 = 0.001;
/// Seconds between sips while a bottle stays at the mouth
pub const DRINK_REPEAT_INTERVAL: f32 = 1.0;

/// Real-time minutes for a full in-game day at normal speed
pub const DAY_LENGTH_MINUTES: f32 = 20.0;
/// Night hours pass this much faster than day hours
pub const NIGHT_SPEED_MULTIPLIER: f32 = 2.0;
/// Hour the session starts at
pub const STARTING_HOUR: f32 = 12.0;
/// Hour the day begins
pub const DAY_START_HOUR: f32 = 6.0;
/// Hour the night begins
pub const NIGHT_START_HOUR: f32 = 18.0;
/// Temperature modifier reported during the day
pub const DAY_TEMPERATURE_MODIFIER: f32 = 1.0;
/// Temperature modifier reported at night
pub const NIGHT_TEMPERATURE_MODIFIER: f32 = -2.0;

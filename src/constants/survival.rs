//! Survival stat tuning.

/// Upper bound for hunger and thirst
pub const MAX_HUNGER: f32 = 100.0;
pub const MAX_THIRST: f32 = 100.0;

/// Hunger lost per survival update
pub const HUNGER_DEPLETION_RATE: f32 = 0.05;
/// Thirst lost per survival update
pub const THIRST_DEPLETION_RATE: f32 = 0.08;
/// Temperature lost per survival update when nothing warms the player
pub const TEMPERATURE_DEPLETION_RATE: f32 = 0.03;

/// Starting temperature
pub const NEUTRAL_TEMPERATURE: f32 = 25.0;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 35.0;
/// Scale applied to the day/night temperature modifier
pub const TIME_TEMPERATURE_SCALE: f32 = 0.01;

/// Temperature gained per update inside a sheltered zone
pub const SHELTERED_HEAT_RECOVERY_RATE: f32 = 0.05;
/// Temperature gained per update inside an intense heat zone
pub const INTENSE_HEAT_RECOVERY_RATE: f32 = 0.2;

pub const MIN_STAMINA: f32 = 0.0;
pub const MAX_STAMINA: f32 = 100.0;
/// Stamina lost per update while idle or walking
pub const BASE_STAMINA_DEPLETION_RATE: f32 = 0.4;
/// Stamina lost per update while climbing
pub const CLIMBING_STAMINA_DEPLETION_RATE: f32 = 1.0;
/// Stamina lost per update while sprinting
pub const SPRINTING_STAMINA_DEPLETION_RATE: f32 = 0.8;

/// Stamina needed to start climbing
pub const MIN_STAMINA_FOR_CLIMBING: f32 = 10.0;
/// Stamina needed to start sprinting
pub const MIN_STAMINA_FOR_SPRINTING: f32 = 5.0;
/// At or below this stamina the player falls off
pub const CRITICAL_STAMINA_FOR_CLIMBING: f32 = 5.0;

/// Stamina restored by sleeping
pub const SLEEP_STAMINA_RESTORATION: f32 = 100.0;

// =============================================================================
// CONSUMABLES
// =============================================================================

/// Hunger restored by a default food item
pub const FOOD_NUTRITION_VALUE: f32 = 25.0;
/// Stamina restored by a default food item
pub const FOOD_STAMINA_RESTORATION: f32 = 15.0;

/// Thirst restored per sip
pub const DRINK_HYDRATION_VALUE: f32 = 5.0;
/// Stamina restored per sip
pub const DRINK_STAMINA_RESTORATION: f32 = 8.0;
/// Water in a full bottle (percent)
pub const DRINK_FULL_WATER: f32 = 100.0;
/// Water used per sip (percent)
pub const DRINK_WATER_DECREASE_RATE: f32 = 10.0;
/// Minimum tilt from upright before a bottle pours (degrees)
pub const DRINK_MIN_TILT_DEGREES: f32 = 45.0;

// =============================================================================
// BED
// =============================================================================

/// Temperature added by a night's sleep
pub const BED_WARMTH_AMOUNT: f32 = 3.0;
/// Length of the sleep fade sequence (seconds)
pub const BED_FADE_DURATION: f32 = 5.0;

// =============================================================================
// FIREPLACE
// =============================================================================

/// Logs needed to light a fireplace
pub const FIREPLACE_REQUIRED_LOGS: usize = 3;
/// Logs released this close to a fireplace are placed into it
pub const FIREPLACE_DETECTION_RADIUS: f32 = 100.0;
/// Radius of a lit fireplace's intense heat
pub const FIREPLACE_HEAT_RADIUS: f32 = 150.0;
/// Half extent of the shelter box around a fireplace
pub const FIREPLACE_SHELTER_HALF_EXTENT: f32 = 200.0;

//! Grabbable object and constraint tuning.

/// Rate used to slerp an object toward its two-handed target rotation (per second)
pub const TWO_HAND_ROTATION_RATE: f32 = 10.0;

/// Position drive strength of a second-hand constraint
pub const SECOND_HAND_DRIVE_STIFFNESS: f32 = 1200.0;
/// Velocity drive damping of a second-hand constraint
pub const SECOND_HAND_DRIVE_DAMPING: f32 = 120.0;

/// Position drive strength of a hand's free-grab constraint
pub const FREE_GRAB_DRIVE_STIFFNESS: f32 = 800.0;
/// Velocity drive damping of a hand's free-grab constraint
pub const FREE_GRAB_DRIVE_DAMPING: f32 = 80.0;

/// Delay between teardown and despawn of a destroyed object (seconds)
pub const DEFERRED_DESTROY_DELAY: f32 = 0.05;

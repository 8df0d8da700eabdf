//! Hand controller tuning. Distances are in centimetres.

/// Radius around the hand origin inside which a grab point snaps
pub const SNAP_RANGE: f32 = 15.0;
/// Hand mesh to motion controller distance that forces a release
pub const GRAB_RELEASE_THRESHOLD: f32 = 30.0;
/// Seconds between hand/controller distance checks while holding
pub const DISTANCE_CHECK_INTERVAL: f32 = 0.1;
/// Physics blend weight applied to the hand mesh after letting go of a climbable
pub const PHYSICS_BLEND_WEIGHT: f32 = 0.15;
/// Blend weight recovered per second after a climbing release
pub const BLEND_WEIGHT_RECOVERY_RATE: f32 = 2.0;

/// Number of trace segments per finger
pub const FINGER_STEPS: usize = 4;

/// Radius of the overlap sphere used for hover detection
pub const GRAB_SPHERE_RADIUS: f32 = 8.0;

/// Speed at which an attached hand mesh catches up with its controller
pub const HAND_FOLLOW_SPEED: f32 = 30.0;
/// How strongly held weight slows the hand mesh follow (per kg)
pub const HELD_WEIGHT_FOLLOW_FACTOR: f32 = 0.1;

/// Radius of the mouth sphere used for drinking and eating
pub const MOUTH_RADIUS: f32 = 10.0;
/// Mouth offset below the head (centimetres)
pub const MOUTH_OFFSET_BELOW_HEAD: f32 = 10.0;

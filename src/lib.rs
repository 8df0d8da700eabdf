//! VR survival interaction layer.
//!
//! Hands hover, grab, snap and climb; grabbables arbitrate between competing
//! hands; survival stats, the day/night cycle, heat zones, fireplaces,
//! consumables and beds hang off the same [`Session`].

pub mod character;
pub mod components;
pub mod config;
pub mod constants;
pub mod day_night;
pub mod engine;
pub mod events;
pub mod fireplace;
pub mod hand;
pub mod heat_zone;
pub mod interaction;
pub mod physics;
pub mod survival;
pub mod time_system;

pub use engine::Session;

/// Commonly used types, for hosts and tests
pub mod prelude {
    pub use crate::character::{ClimbingCharacter, Locomotion, MovementState};
    pub use crate::components::{Body, CollisionChannel, CollisionMode, CollisionResponse, Transform};
    pub use crate::config::{DayNightConfig, HandConfig, SessionConfig, SurvivalConfig};
    pub use crate::day_night::{DayNightCycle, DayNightProvider, DayPhase};
    pub use crate::engine::Session;
    pub use crate::events::{SessionEvent, SleepFailure};
    pub use crate::fireplace::{Fireplace, LogPlacement, WoodLog};
    pub use crate::hand::{FingerCurls, GrabPointInfo, HandController, HandSide, HandState};
    pub use crate::heat_zone::HeatZone;
    pub use crate::interaction::{
        Bed, ClimbType, ClimbableObject, ConsumableData, ConsumableItem, ConsumableKind, GrabPointBehavior,
        GrabPointType, GrabState, GrabbableObject, Interactable, InteractionKind,
    };
    pub use crate::physics::{CollisionShape, ConstraintKind};
    pub use crate::survival::{SurvivalComponent, SurvivalEnvironment, SurvivalStats};
}

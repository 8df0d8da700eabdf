//! Interactable capabilities.
//!
//! Every object a hand can touch carries an [`Interactable`] component. The
//! variants share the [`Interaction`] interface, which is all the hand code
//! dispatches through.

mod bed;
mod climbable;
mod consumable;
mod grabbable;

pub use bed::Bed;
pub use climbable::{ClimbType, ClimbableObject};
pub use consumable::{ConsumableData, ConsumableItem, ConsumableKind};
pub use grabbable::{GrabPoint, GrabPointBehavior, GrabPointType, GrabState, GrabbableObject};

use crate::components::{Body, CollisionChannel};
use crate::physics::ConstraintId;
use hecs::Entity;

/// Which variant an interactable is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Grabbable,
    Climbable,
    Consumable,
    Bed,
}

/// What the hand should do after an object accepted `on_grab`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// The object is now held (snap or free is decided by the unified grab)
    Hold,
    /// The hand is now anchored to a climbable
    Climb { first_hand: bool },
    /// The object asked to put the player to sleep instead of being held
    AttemptSleep,
}

/// Side effects of a release that reach outside the object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseEffects {
    /// Constraints the object gave up; destroy each once
    pub constraints: Vec<ConstraintId>,
    /// Re-attach the body rigidly to this remaining snap hand
    pub promote: Option<Entity>,
    /// No hand holds the object any more
    pub fully_released: bool,
    /// The releasing hand was climbing
    pub stop_climbing: bool,
}

/// Capability interface shared by every interactable variant
pub trait Interaction {
    fn kind(&self) -> InteractionKind;

    /// Weight felt by a hand holding this object
    fn weight(&self, body: &Body) -> f32 {
        body.mass
    }

    /// Whether hovering should show the outline. `snap_point_in_range` is set
    /// when the hovering hand is close to an available grab point.
    fn outline_on_hover(&self, snap_point_in_range: bool) -> bool;

    fn on_grab(&mut self, hand: Entity, channel: CollisionChannel, body: &mut Body) -> GrabOutcome;

    fn on_release(
        &mut self,
        hand: Entity,
        channel: CollisionChannel,
        body: &mut Body,
    ) -> ReleaseEffects;

    /// Every hand currently holding or climbing the object
    fn hands(&self) -> Vec<Entity>;

    /// Grab-point state machine, for variants that have one
    fn grabbable(&self) -> Option<&GrabbableObject> {
        None
    }

    fn grabbable_mut(&mut self) -> Option<&mut GrabbableObject> {
        None
    }
}

/// Interactable component
#[derive(Debug, Clone)]
pub enum Interactable {
    Grabbable(GrabbableObject),
    Climbable(ClimbableObject),
    Consumable(ConsumableItem),
    Bed(Bed),
}

impl Interactable {
    pub fn as_interaction(&self) -> &dyn Interaction {
        match self {
            Interactable::Grabbable(g) => g,
            Interactable::Climbable(c) => c,
            Interactable::Consumable(c) => c,
            Interactable::Bed(b) => b,
        }
    }

    pub fn as_interaction_mut(&mut self) -> &mut dyn Interaction {
        match self {
            Interactable::Grabbable(g) => g,
            Interactable::Climbable(c) => c,
            Interactable::Consumable(c) => c,
            Interactable::Bed(b) => b,
        }
    }

    pub fn kind(&self) -> InteractionKind {
        self.as_interaction().kind()
    }

    pub fn grabbable(&self) -> Option<&GrabbableObject> {
        self.as_interaction().grabbable()
    }

    pub fn grabbable_mut(&mut self) -> Option<&mut GrabbableObject> {
        self.as_interaction_mut().grabbable_mut()
    }

    pub fn climbable(&self) -> Option<&ClimbableObject> {
        match self {
            Interactable::Climbable(c) => Some(c),
            _ => None,
        }
    }

    pub fn consumable(&self) -> Option<&ConsumableItem> {
        match self {
            Interactable::Consumable(c) => Some(c),
            _ => None,
        }
    }

    pub fn consumable_mut(&mut self) -> Option<&mut ConsumableItem> {
        match self {
            Interactable::Consumable(c) => Some(c),
            _ => None,
        }
    }

    pub fn bed_mut(&mut self) -> Option<&mut Bed> {
        match self {
            Interactable::Bed(b) => Some(b),
            _ => None,
        }
    }
}

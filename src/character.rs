//! Player character: the tracking rig, the head and climbing locomotion.
//!
//! While climbing, the primary climbing hand's controller is pinned to where
//! it grabbed; pulling on the controller moves the whole rig the other way.

use crate::components::Transform;
use crate::constants::*;
use crate::hand::HandSide;
use glam::Vec3;
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Walking,
    Climbing,
    Falling,
}

/// Locomotion collaborator consumed by the session
pub trait Locomotion {
    /// Start or join a climb. `anchor` is the hand's controller location.
    /// Returns true when this call entered the climbing state.
    fn start_climbing(&mut self, hand: Entity, side: HandSide, anchor: Vec3) -> bool;
    /// Returns true when no climbing hand remains. `controllers` lists the
    /// current controller locations, used to re-anchor a promoted hand.
    fn stop_climbing(&mut self, hand: Entity, controllers: &[(Entity, Vec3)]) -> bool;
    fn climbing_hands(&self) -> Vec<Entity>;
    fn is_climbing(&self) -> bool;
    fn movement_state(&self) -> MovementState;
    fn update(&mut self, dt: f32, controllers: &[(Entity, Vec3)]);
    /// Tracking-space origin in the world
    fn rig_transform(&self) -> Transform;
    fn head_transform(&self) -> Transform;
    fn set_head_pose(&mut self, tracked: Transform);
}

#[derive(Debug, Clone, Copy)]
struct ClimbAnchor {
    hand: Entity,
    location: Vec3,
}

#[derive(Debug, Clone)]
pub struct ClimbingCharacter {
    rig: Transform,
    /// Head pose in tracking space
    head: Transform,
    state: MovementState,
    left: Option<ClimbAnchor>,
    right: Option<ClimbAnchor>,
    primary: Option<ClimbAnchor>,
}

impl ClimbingCharacter {
    pub fn new(rig: Transform) -> Self {
        Self {
            rig,
            head: Transform::from_translation(Vec3::new(0.0, 0.0, 170.0)),
            state: MovementState::Walking,
            left: None,
            right: None,
            primary: None,
        }
    }

    pub fn primary_hand(&self) -> Option<Entity> {
        self.primary.map(|a| a.hand)
    }

    /// Mouth location, just below the head
    pub fn mouth_location(&self) -> Vec3 {
        self.head_transform().translation - Vec3::Z * MOUTH_OFFSET_BELOW_HEAD
    }

    pub fn set_rig_transform(&mut self, rig: Transform) {
        self.rig = rig;
    }

    fn anchor_of(controllers: &[(Entity, Vec3)], hand: Entity) -> Option<Vec3> {
        controllers.iter().find(|(h, _)| *h == hand).map(|(_, l)| *l)
    }
}

impl Default for ClimbingCharacter {
    fn default() -> Self {
        Self::new(Transform::IDENTITY)
    }
}

impl Locomotion for ClimbingCharacter {
    fn start_climbing(&mut self, hand: Entity, side: HandSide, anchor: Vec3) -> bool {
        let entered = self.state != MovementState::Climbing;
        if entered {
            tracing::info!(?hand, "started climbing");
            self.state = MovementState::Climbing;
        }
        let record = ClimbAnchor {
            hand,
            location: anchor,
        };
        // The newest grabbing hand drives the climb
        self.primary = Some(record);
        match side {
            HandSide::Left => self.left = Some(record),
            HandSide::Right => self.right = Some(record),
        }
        entered
    }

    fn stop_climbing(&mut self, hand: Entity, controllers: &[(Entity, Vec3)]) -> bool {
        if self.left.is_some_and(|a| a.hand == hand) {
            self.left = None;
        } else if self.right.is_some_and(|a| a.hand == hand) {
            self.right = None;
        }

        if self.primary.is_some_and(|a| a.hand == hand) {
            self.primary = self.left.or(self.right).map(|a| ClimbAnchor {
                hand: a.hand,
                location: Self::anchor_of(controllers, a.hand).unwrap_or(a.location),
            });
        }

        if self.left.is_none() && self.right.is_none() {
            if self.state == MovementState::Climbing {
                tracing::info!(?hand, "stopped climbing");
                self.state = MovementState::Falling;
            }
            self.primary = None;
            return true;
        }
        false
    }

    fn climbing_hands(&self) -> Vec<Entity> {
        self.left.iter().chain(self.right.iter()).map(|a| a.hand).collect()
    }

    fn is_climbing(&self) -> bool {
        self.state == MovementState::Climbing
    }

    fn movement_state(&self) -> MovementState {
        self.state
    }

    fn update(&mut self, _dt: f32, controllers: &[(Entity, Vec3)]) {
        match self.state {
            MovementState::Climbing => {
                let Some(primary) = self.primary else {
                    return;
                };
                let Some(current) = Self::anchor_of(controllers, primary.hand) else {
                    return;
                };
                let delta = current - primary.location;
                self.rig.translation -= delta;
                // Moving the rig carries every controller along with it
                for anchor in [&mut self.left, &mut self.right].into_iter().flatten() {
                    if let Some(location) = Self::anchor_of(controllers, anchor.hand) {
                        anchor.location = location - delta;
                    }
                }
            }
            // Ground contact is the host's concern; land on the next tick
            MovementState::Falling => self.state = MovementState::Walking,
            MovementState::Walking => {}
        }
    }

    fn rig_transform(&self) -> Transform {
        self.rig
    }

    fn head_transform(&self) -> Transform {
        self.rig.mul(&self.head)
    }

    fn set_head_pose(&mut self, tracked: Transform) {
        self.head = tracked;
    }
}

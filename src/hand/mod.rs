//! Hand controller component.
//!
//! A hand has a tracked motion controller and a visible mesh that normally
//! eases after it. Grabbing, releasing and distance monitoring are session
//! operations (see `engine::grab`); this module holds the per-hand state
//! they work on.

pub mod fingers;
pub mod proximity;

pub use fingers::{Finger, FingerCurls, FingerCurve, FingerRig};
pub use proximity::GrabPointInfo;

use crate::components::{CollisionChannel, Transform};
use crate::config::HandConfig;
use crate::interaction::{GrabPointType, InteractionKind};
use crate::physics::ConstraintId;
use crate::time_system::TimerHandle;
use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub fn channel(self) -> CollisionChannel {
        match self {
            HandSide::Left => CollisionChannel::LeftHand,
            HandSide::Right => CollisionChannel::RightHand,
        }
    }

    pub fn is_left(self) -> bool {
        self == HandSide::Left
    }
}

/// What the hand is doing, from the hand's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandState {
    NotHolding,
    HoldingClimbable,
    HoldingGrabbable,
}

/// Visible hand mesh
#[derive(Debug, Clone, Copy)]
pub struct HandMesh {
    pub transform: Transform,
    /// Following the motion controller (false while frozen on a climbable)
    pub attached: bool,
    pub simulate_physics: bool,
    /// 1.0 follows at full speed; lowered after a climbing release
    pub blend_weight: f32,
}

/// Bookkeeping for whatever the hand currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabRecord {
    pub object: Entity,
    pub kind: InteractionKind,
    pub snapped: bool,
    pub point: GrabPointType,
}

/// Grab-point indicator shown while hovering a grabbable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabIndicator {
    pub location: Vec3,
    pub point: GrabPointType,
}

#[derive(Debug, Clone)]
pub struct HandController {
    pub side: HandSide,
    /// Controller pose in tracking space, as reported by the device
    pub tracked: Transform,
    /// Controller pose in world space
    pub controller: Transform,
    pub mesh: HandMesh,
    /// Grab-point search origin, relative to the controller
    pub origin_offset: Vec3,
    /// Grip socket relative to the hand mesh
    pub grip_socket: Transform,
    pub config: HandConfig,
    pub fingers: FingerRig,
    pub(crate) overlapping: Vec<Entity>,
    pub(crate) hovered: Option<Entity>,
    pub(crate) grabbed: Option<GrabRecord>,
    pub(crate) grab_constraint: Option<ConstraintId>,
    pub(crate) distance_timer: Option<TimerHandle>,
    pub(crate) indicator: Option<GrabIndicator>,
}

impl HandController {
    pub fn new(side: HandSide, config: HandConfig) -> Self {
        let mirror = if side.is_left() { -1.0 } else { 1.0 };
        Self {
            side,
            tracked: Transform::IDENTITY,
            controller: Transform::IDENTITY,
            mesh: HandMesh {
                transform: Transform::IDENTITY,
                attached: true,
                simulate_physics: true,
                blend_weight: 1.0,
            },
            origin_offset: Vec3::new(4.0, 0.0, -2.0),
            grip_socket: Transform::from_translation(Vec3::new(6.0, 1.5 * mirror, -3.0)),
            config,
            fingers: FingerRig::default_hand(config.finger_steps, side.is_left()),
            overlapping: Vec::new(),
            hovered: None,
            grabbed: None,
            grab_constraint: None,
            distance_timer: None,
            indicator: None,
        }
    }

    pub fn channel(&self) -> CollisionChannel {
        self.side.channel()
    }

    pub fn state(&self) -> HandState {
        match self.grabbed.map(|g| g.kind) {
            None => HandState::NotHolding,
            Some(InteractionKind::Climbable) => HandState::HoldingClimbable,
            Some(_) => HandState::HoldingGrabbable,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.grabbed.is_some()
    }

    pub fn grabbed(&self) -> Option<GrabRecord> {
        self.grabbed
    }

    pub fn grabbed_object(&self) -> Option<Entity> {
        self.grabbed.map(|g| g.object)
    }

    pub fn hovered(&self) -> Option<Entity> {
        self.hovered
    }

    pub fn overlapping(&self) -> &[Entity] {
        &self.overlapping
    }

    pub fn indicator(&self) -> Option<GrabIndicator> {
        self.indicator
    }

    pub fn grab_constraint(&self) -> Option<ConstraintId> {
        self.grab_constraint
    }

    pub fn is_monitoring_distance(&self) -> bool {
        self.distance_timer.is_some()
    }

    pub fn finger_curls(&self) -> FingerCurls {
        self.fingers.curls()
    }

    /// World location grab points are measured from
    pub fn origin_point(&self) -> Vec3 {
        self.controller.transform_point(self.origin_offset)
    }

    /// Grip socket in world space on the visible mesh
    pub fn grip_socket_world(&self) -> Transform {
        self.mesh.transform.mul(&self.grip_socket)
    }

    /// Grip socket where the controller says the hand is
    pub fn controller_grip_world(&self) -> Transform {
        self.controller.mul(&self.grip_socket)
    }

    /// Center of the hover overlap sphere
    pub fn grab_sphere_center(&self) -> Vec3 {
        self.grip_socket_world().translation
    }

    pub fn mesh_controller_distance(&self) -> f32 {
        self.mesh
            .transform
            .translation
            .distance(self.controller.translation)
    }

    /// Move the controller; an attached mesh starts where the controller is
    /// the first time it is placed
    pub(crate) fn set_controller(&mut self, rig: &Transform, tracked: Transform) {
        self.tracked = tracked;
        self.controller = rig.mul(&tracked);
    }

    /// Ease an attached mesh toward the controller
    pub(crate) fn follow_controller(&mut self, dt: f32, held_weight: f32, follow_speed: f32, weight_factor: f32, recovery_rate: f32) {
        if !self.mesh.attached {
            return;
        }
        let speed = follow_speed / (1.0 + held_weight.max(0.0) * weight_factor) * self.mesh.blend_weight;
        let t = (dt * speed).min(1.0);
        let target = self.controller;
        self.mesh.transform.lerp_toward(&target, t);
        self.mesh.blend_weight = (self.mesh.blend_weight + dt * recovery_rate).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hand_is_empty_and_rests_fingers() {
        let hand = HandController::new(HandSide::Left, HandConfig::default());
        assert_eq!(hand.state(), HandState::NotHolding);
        assert_eq!(hand.channel(), CollisionChannel::LeftHand);
        assert_eq!(hand.finger_curls(), FingerCurls::REST);
    }

    #[test]
    fn test_follow_is_slowed_by_weight() {
        let mut light = HandController::new(HandSide::Right, HandConfig::default());
        light.set_controller(&Transform::IDENTITY, Transform::from_translation(Vec3::X * 10.0));
        let mut heavy = light.clone();

        light.follow_controller(0.01, 0.0, 30.0, 0.1, 2.0);
        heavy.follow_controller(0.01, 20.0, 30.0, 0.1, 2.0);
        assert!(light.mesh_controller_distance() < heavy.mesh_controller_distance());
    }

    #[test]
    fn test_detached_mesh_stays_put() {
        let mut hand = HandController::new(HandSide::Right, HandConfig::default());
        hand.mesh.attached = false;
        hand.set_controller(&Transform::IDENTITY, Transform::from_translation(Vec3::X * 10.0));
        hand.follow_controller(1.0, 0.0, 30.0, 0.1, 2.0);
        assert_eq!(hand.mesh.transform.translation, Vec3::ZERO);
        assert_eq!(hand.mesh_controller_distance(), 10.0);
    }
}

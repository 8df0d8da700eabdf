//! Grab-point occupancy and the grab state machine.
//!
//! A grabbable is either not grabbed, free-grabbed by one or more hands
//! (physics drive, no grab point), or snap-grabbed at its Main and/or
//! Secondary grab point. Free and snap holders never coexist: a snap onto a
//! free-grabbed object evicts the free hands, and a snap-grabbed object
//! refuses free grabs. Cross-entity work (evicting hands, creating
//! constraints) lives in the session; this type owns the decisions and the
//! body-level effects.

use super::{GrabOutcome, Interaction, InteractionKind, ReleaseEffects};
use crate::components::{Attachment, Body, CollisionChannel, CollisionMode, CollisionResponse, Transform};
use crate::physics::ConstraintId;
use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GrabPointType {
    #[default]
    None,
    Main,
    Secondary,
}

/// Which grab points an object offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrabPointBehavior {
    None,
    MainOnly,
    DualHanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    NotGrabbed,
    FreeGrab,
    SnapGrab,
}

/// A predefined attachment location on the object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabPoint {
    /// Pose relative to the object's body
    pub offset: Transform,
    hand: Option<Entity>,
}

impl GrabPoint {
    pub fn new(offset: Transform) -> Self {
        Self { offset, hand: None }
    }

    pub fn hand(&self) -> Option<Entity> {
        self.hand
    }

    pub fn is_available(&self) -> bool {
        self.hand.is_none()
    }

    pub fn world_transform(&self, body: &Transform) -> Transform {
        body.mul(&self.offset)
    }
}

#[derive(Debug, Clone)]
pub struct GrabbableObject {
    pub behavior: GrabPointBehavior,
    pub main_point: GrabPoint,
    pub secondary_point: GrabPoint,
    /// Spawn simulating with gravity
    pub start_simulate_physics: bool,
    /// Turn simulation on when first grabbed
    pub simulate_physics_on_grab: bool,
    /// Overrides the body mass as felt by the hand
    pub custom_weight: Option<f32>,
    state: GrabState,
    held: bool,
    free_hands: Vec<Entity>,
    /// Drive constraints of snap hands that are not the attach parent
    second_hand_constraints: Vec<(Entity, ConstraintId)>,
    /// Hand whose grip socket the body is rigidly attached to
    attach_hand: Option<Entity>,
    /// Normalized main-to-secondary hand direction at the last sample
    two_hand_sample: Option<Vec3>,
    /// Set while evicting holders for an incoming snap
    switching: bool,
}

impl GrabbableObject {
    pub fn new(behavior: GrabPointBehavior) -> Self {
        Self {
            behavior,
            main_point: GrabPoint::new(Transform::IDENTITY),
            secondary_point: GrabPoint::new(Transform::IDENTITY),
            start_simulate_physics: true,
            simulate_physics_on_grab: true,
            custom_weight: None,
            state: GrabState::NotGrabbed,
            held: false,
            free_hands: Vec::new(),
            second_hand_constraints: Vec::new(),
            attach_hand: None,
            two_hand_sample: None,
            switching: false,
        }
    }

    pub fn with_grab_points(mut self, main: Transform, secondary: Transform) -> Self {
        self.main_point = GrabPoint::new(main);
        self.secondary_point = GrabPoint::new(secondary);
        self
    }

    pub fn with_physics(mut self, start_simulate: bool, simulate_on_grab: bool) -> Self {
        self.start_simulate_physics = start_simulate;
        self.simulate_physics_on_grab = simulate_on_grab;
        self
    }

    pub fn with_custom_weight(mut self, weight: f32) -> Self {
        self.custom_weight = Some(weight);
        self
    }

    /// Apply the spawn-time physics setup to the object's body
    pub fn setup_physics(&mut self, body: &mut Body) {
        if self.start_simulate_physics {
            body.simulate_physics = true;
            body.gravity = true;
            body.collision = CollisionMode::QueryAndPhysics;
            self.simulate_physics_on_grab = true;
        } else {
            body.simulate_physics = false;
            body.gravity = false;
            body.collision = CollisionMode::QueryOnly;
        }
        body.set_response(CollisionChannel::PlayerBody, CollisionResponse::Ignore);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn should_use_grab_points(&self) -> bool {
        self.behavior != GrabPointBehavior::None
    }

    pub fn should_use_main_grab_point(&self) -> bool {
        matches!(
            self.behavior,
            GrabPointBehavior::MainOnly | GrabPointBehavior::DualHanded
        )
    }

    pub fn should_use_secondary_grab_point(&self) -> bool {
        self.behavior == GrabPointBehavior::DualHanded
    }

    pub fn is_main_grab_point_available(&self) -> bool {
        self.main_point.is_available()
    }

    pub fn is_secondary_grab_point_available(&self) -> bool {
        self.secondary_point.is_available()
    }

    pub fn main_grab_point_hand(&self) -> Option<Entity> {
        self.main_point.hand
    }

    pub fn secondary_grab_point_hand(&self) -> Option<Entity> {
        self.secondary_point.hand
    }

    /// The grab point of `ty`, if this object uses it
    pub fn grab_point(&self, ty: GrabPointType) -> Option<&GrabPoint> {
        match ty {
            GrabPointType::Main if self.should_use_main_grab_point() => Some(&self.main_point),
            GrabPointType::Secondary if self.should_use_secondary_grab_point() => {
                Some(&self.secondary_point)
            }
            _ => None,
        }
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn free_hands(&self) -> &[Entity] {
        &self.free_hands
    }

    pub fn attach_hand(&self) -> Option<Entity> {
        self.attach_hand
    }

    pub fn is_attached(&self) -> bool {
        self.attach_hand.is_some()
    }

    pub fn has_snap_hands(&self) -> bool {
        self.main_point.hand.is_some() || self.secondary_point.hand.is_some()
    }

    pub fn is_held_by(&self, hand: Entity) -> bool {
        self.free_hands.contains(&hand) || self.grab_point_of(hand) != GrabPointType::None
    }

    /// Grab point occupied by `hand`
    pub fn grab_point_of(&self, hand: Entity) -> GrabPointType {
        if self.main_point.hand == Some(hand) {
            GrabPointType::Main
        } else if self.secondary_point.hand == Some(hand) {
            GrabPointType::Secondary
        } else {
            GrabPointType::None
        }
    }

    pub fn second_hand_constraint(&self, hand: Entity) -> Option<ConstraintId> {
        self.second_hand_constraints
            .iter()
            .find(|(h, _)| *h == hand)
            .map(|(_, id)| *id)
    }

    pub fn second_hand_constraints(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.second_hand_constraints.iter().map(|(_, id)| *id)
    }

    /// Both grab points are held, so the two-handed rotation applies
    pub fn is_two_handed(&self) -> bool {
        self.main_point.hand.is_some() && self.secondary_point.hand.is_some()
    }

    // =========================================================================
    // ACCEPTANCE AND CONFLICTS
    // =========================================================================

    /// Whether a grab by `hand` may proceed. Never mutates.
    pub fn can_accept_grab(&self, is_snap: bool, target: GrabPointType, hand: Entity) -> bool {
        if self.state == GrabState::NotGrabbed {
            return true;
        }
        if self.grab_point_of(hand) != GrabPointType::None {
            return false;
        }
        if !is_snap && self.free_hands.contains(&hand) {
            return false;
        }
        match self.state {
            GrabState::NotGrabbed | GrabState::FreeGrab => true,
            // Snap onto an occupied point is a force-switch
            GrabState::SnapGrab => is_snap && target != GrabPointType::None,
        }
    }

    /// Hands that must let go before an accepted grab by `hand` can proceed
    pub fn conflicting_hands(&self, hand: Entity, is_snap: bool, target: GrabPointType) -> Vec<Entity> {
        if !is_snap {
            return Vec::new();
        }
        match self.state {
            GrabState::FreeGrab => self
                .free_hands
                .iter()
                .copied()
                .filter(|h| *h != hand)
                .collect(),
            GrabState::SnapGrab => {
                let holder = match target {
                    GrabPointType::Main => self.main_point.hand,
                    GrabPointType::Secondary => self.secondary_point.hand,
                    GrabPointType::None => None,
                };
                holder.filter(|h| *h != hand).into_iter().collect()
            }
            GrabState::NotGrabbed => Vec::new(),
        }
    }

    /// Evictions in progress; emptying the object keeps its state
    pub fn set_switching(&mut self, switching: bool) {
        self.switching = switching;
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Free path of the unified grab
    pub fn register_free_hand(&mut self, hand: Entity) {
        if !self.free_hands.contains(&hand) {
            self.free_hands.push(hand);
        }
        if self.state == GrabState::NotGrabbed {
            self.state = GrabState::FreeGrab;
        }
        self.held = true;
    }

    /// Record `hand` on `point`. Fails if the point is unused or occupied.
    pub fn occupy(&mut self, point: GrabPointType, hand: Entity) -> bool {
        let slot = match point {
            GrabPointType::Main if self.should_use_main_grab_point() => &mut self.main_point,
            GrabPointType::Secondary if self.should_use_secondary_grab_point() => {
                &mut self.secondary_point
            }
            _ => return false,
        };
        if slot.hand.is_some() {
            return false;
        }
        slot.hand = Some(hand);
        self.two_hand_sample = None;
        true
    }

    /// Snap path for the first hand: weld the body to the grip socket so the
    /// grab point sits on the socket, keeping the body's scale.
    pub fn attach_first_hand(
        &mut self,
        hand: Entity,
        point: GrabPointType,
        body: &mut Body,
        socket: &Transform,
    ) -> bool {
        if !self.occupy(point, hand) {
            return false;
        }
        let offset = self
            .grab_point(point)
            .map(|p| p.offset)
            .unwrap_or(Transform::IDENTITY);
        let relative = socket_relative(&offset, body.transform.scale);

        body.simulate_physics = false;
        body.attachment = Some(Attachment { hand, relative });
        body.transform = socket.mul(&relative);

        self.attach_hand = Some(hand);
        self.state = GrabState::SnapGrab;
        self.held = true;
        true
    }

    /// Snap path for a hand joining an already attached object
    pub fn attach_second_hand(&mut self, hand: Entity, point: GrabPointType, constraint: ConstraintId) {
        self.occupy(point, hand);
        self.second_hand_constraints.push((hand, constraint));
        self.state = GrabState::SnapGrab;
        self.held = true;
    }

    /// Re-parent the body to `hand` after the attach parent let go
    pub fn promote_attach_hand(&mut self, hand: Entity, body: &mut Body, socket: &Transform) {
        let relative = body.transform.relative_to(socket);
        body.attachment = Some(Attachment { hand, relative });
        self.attach_hand = Some(hand);
        self.two_hand_sample = None;
    }

    /// Undo a grab the unified step did not complete
    pub fn rollback_grab(&mut self, hand: Entity, channel: CollisionChannel, body: &mut Body) {
        if self.is_held_by(hand) {
            return;
        }
        body.set_response(channel, CollisionResponse::Block);
        self.held = !self.free_hands.is_empty() || self.has_snap_hands();
        if !self.held {
            self.state = GrabState::NotGrabbed;
        }
    }

    /// Direction sample for the two-handed rotation. Returns the previous
    /// sample, or None on the first sample after a hand change.
    pub fn swap_two_hand_sample(&mut self, direction: Vec3) -> Option<Vec3> {
        self.two_hand_sample.replace(direction)
    }

    fn restore_physics(&self, body: &mut Body) {
        if !self.simulate_physics_on_grab && !self.start_simulate_physics {
            body.simulate_physics = false;
            body.gravity = false;
            body.collision = CollisionMode::QueryOnly;
        } else if !body.simulate_physics {
            body.simulate_physics = true;
        }
    }
}

/// Body pose relative to a grip socket that puts the grab point `offset` on
/// the socket
fn socket_relative(offset: &Transform, scale: Vec3) -> Transform {
    let rotation = offset.rotation.inverse();
    Transform {
        translation: -(rotation * (scale * offset.translation)),
        rotation,
        scale,
    }
}

impl Interaction for GrabbableObject {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Grabbable
    }

    fn weight(&self, body: &Body) -> f32 {
        self.custom_weight.unwrap_or(body.mass)
    }

    fn outline_on_hover(&self, snap_point_in_range: bool) -> bool {
        !snap_point_in_range && self.state != GrabState::SnapGrab
    }

    fn on_grab(&mut self, _hand: Entity, channel: CollisionChannel, body: &mut Body) -> GrabOutcome {
        self.held = true;
        if self.simulate_physics_on_grab && !body.simulate_physics {
            body.simulate_physics = true;
            body.collision = CollisionMode::QueryAndPhysics;
        }
        body.set_response(channel, CollisionResponse::Ignore);
        body.outlined = false;
        GrabOutcome::Hold
    }

    fn on_release(
        &mut self,
        hand: Entity,
        channel: CollisionChannel,
        body: &mut Body,
    ) -> ReleaseEffects {
        let mut effects = ReleaseEffects::default();
        body.set_response(channel, CollisionResponse::Block);

        if !self.is_held_by(hand) {
            return effects;
        }

        let before = self.free_hands.len();
        self.free_hands.retain(|h| *h != hand);
        let was_free = self.free_hands.len() != before;

        if !was_free {
            if self.main_point.hand == Some(hand) {
                tracing::debug!(?hand, "main grab point released");
                self.main_point.hand = None;
            } else if self.secondary_point.hand == Some(hand) {
                tracing::debug!(?hand, "secondary grab point released");
                self.secondary_point.hand = None;
            }
            if let Some(pos) = self
                .second_hand_constraints
                .iter()
                .position(|(h, _)| *h == hand)
            {
                effects.constraints.push(self.second_hand_constraints.remove(pos).1);
            }
            self.two_hand_sample = None;
        }

        if self.attach_hand == Some(hand) {
            let successor = self.main_point.hand.or(self.secondary_point.hand);
            match successor {
                Some(next) => {
                    // The successor's drive constraint is replaced by the weld
                    if let Some(pos) = self
                        .second_hand_constraints
                        .iter()
                        .position(|(h, _)| *h == next)
                    {
                        effects.constraints.push(self.second_hand_constraints.remove(pos).1);
                    }
                    self.attach_hand = Some(next);
                    effects.promote = Some(next);
                }
                None => {
                    self.attach_hand = None;
                    body.attachment = None;
                }
            }
        }

        let has_snap = self.has_snap_hands();
        let has_free = !self.free_hands.is_empty();
        if has_snap {
            self.state = GrabState::SnapGrab;
        } else if has_free {
            self.state = GrabState::FreeGrab;
        } else if !self.switching {
            self.state = GrabState::NotGrabbed;
            self.held = false;
            body.attachment = None;
            self.restore_physics(body);
            effects.fully_released = true;
        }
        effects
    }

    fn hands(&self) -> Vec<Entity> {
        let mut hands: Vec<Entity> = self
            .main_point
            .hand
            .into_iter()
            .chain(self.secondary_point.hand)
            .collect();
        hands.extend(self.free_hands.iter().copied());
        hands
    }

    fn grabbable(&self) -> Option<&GrabbableObject> {
        Some(self)
    }

    fn grabbable_mut(&mut self) -> Option<&mut GrabbableObject> {
        Some(self)
    }
}

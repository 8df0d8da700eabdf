//! Climbable surfaces and holds.

use super::{GrabOutcome, Interaction, InteractionKind, ReleaseEffects};
use crate::components::{Body, CollisionChannel, CollisionResponse, Transform};
use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimbType {
    /// Grab anywhere on the surface
    Surface,
    /// Hand snaps to the nearest hold socket
    Point,
}

/// Something the player can climb. Only tracks which hands are on it.
#[derive(Debug, Clone)]
pub struct ClimbableObject {
    pub climb_type: ClimbType,
    /// Hold poses relative to the body, used by `ClimbType::Point`
    pub sockets: Vec<Transform>,
    grabbing_hands: Vec<Entity>,
}

impl ClimbableObject {
    pub fn new(climb_type: ClimbType) -> Self {
        Self {
            climb_type,
            sockets: Vec::new(),
            grabbing_hands: Vec::new(),
        }
    }

    pub fn with_sockets(mut self, sockets: Vec<Transform>) -> Self {
        self.sockets = sockets;
        self
    }

    pub fn grabbing_hands(&self) -> &[Entity] {
        &self.grabbing_hands
    }

    pub fn is_grabbed(&self) -> bool {
        !self.grabbing_hands.is_empty()
    }

    /// World pose of the hold socket closest to `location`
    pub fn closest_socket_to(&self, body: &Transform, location: Vec3) -> Option<Transform> {
        self.sockets
            .iter()
            .map(|s| body.mul(s))
            .min_by(|a, b| {
                a.translation
                    .distance_squared(location)
                    .total_cmp(&b.translation.distance_squared(location))
            })
    }
}

impl Interaction for ClimbableObject {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Climbable
    }

    fn outline_on_hover(&self, _snap_point_in_range: bool) -> bool {
        true
    }

    fn on_grab(&mut self, hand: Entity, channel: CollisionChannel, body: &mut Body) -> GrabOutcome {
        let first_hand = self.grabbing_hands.is_empty();
        if first_hand {
            // The capsule must not collide with what it is climbing
            body.set_response(CollisionChannel::PlayerBody, CollisionResponse::Ignore);
            body.outlined = false;
        }
        body.set_response(channel, CollisionResponse::Ignore);
        if !self.grabbing_hands.contains(&hand) {
            self.grabbing_hands.push(hand);
        }
        GrabOutcome::Climb { first_hand }
    }

    fn on_release(
        &mut self,
        hand: Entity,
        channel: CollisionChannel,
        body: &mut Body,
    ) -> ReleaseEffects {
        let before = self.grabbing_hands.len();
        self.grabbing_hands.retain(|h| *h != hand);
        if self.grabbing_hands.len() == before {
            return ReleaseEffects::default();
        }
        body.set_response(channel, CollisionResponse::Block);
        let last = self.grabbing_hands.is_empty();
        if last {
            body.set_response(CollisionChannel::PlayerBody, CollisionResponse::Block);
        }
        ReleaseEffects {
            fully_released: last,
            stop_climbing: true,
            ..ReleaseEffects::default()
        }
    }

    fn hands(&self) -> Vec<Entity> {
        self.grabbing_hands.clone()
    }
}

//! Spatial and physical components shared by hands and interactables.

use crate::physics::CollisionShape;
use glam::{Quat, Vec3};
use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// TRANSFORM
// =============================================================================

/// Translation, rotation and scale. World units are centimetres, Z is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Compose `self` (parent) with `child` expressed in parent space
    pub fn mul(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Inverse transform. Exact for uniform scale.
    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        let scale = self.scale.recip();
        Transform {
            translation: rotation * (-self.translation) * scale,
            rotation,
            scale,
        }
    }

    /// This transform expressed in the space of `parent`
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        parent.inverse().mul(self)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.rotation.inverse() * (point - self.translation)) / self.scale
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Blend translation and rotation toward `target` by `t` in [0, 1]
    pub fn lerp_toward(&mut self, target: &Transform, t: f32) {
        let t = t.clamp(0.0, 1.0);
        self.translation = self.translation.lerp(target.translation, t);
        self.rotation = self.rotation.slerp(target.rotation, t);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// COLLISION
// =============================================================================

/// Object channels a body can respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionChannel {
    WorldStatic,
    WorldDynamic,
    /// The player's capsule
    PlayerBody,
    LeftHand,
    RightHand,
}

impl CollisionChannel {
    pub const ALL: [CollisionChannel; 5] = [
        CollisionChannel::WorldStatic,
        CollisionChannel::WorldDynamic,
        CollisionChannel::PlayerBody,
        CollisionChannel::LeftHand,
        CollisionChannel::RightHand,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResponse {
    Ignore,
    Overlap,
    Block,
}

/// Which collision features a body takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionMode {
    NoCollision,
    QueryOnly,
    QueryAndPhysics,
}

impl CollisionMode {
    pub fn has_query(self) -> bool {
        !matches!(self, CollisionMode::NoCollision)
    }
}

// =============================================================================
// BODY
// =============================================================================

/// Rigid attachment of a body to a hand's grip socket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub hand: Entity,
    /// Body transform relative to the grip socket
    pub relative: Transform,
}

/// Collision body of an interactable
#[derive(Debug, Clone)]
pub struct Body {
    pub transform: Transform,
    pub shape: CollisionShape,
    pub mass: f32,
    pub simulate_physics: bool,
    pub gravity: bool,
    pub collision: CollisionMode,
    /// Per-channel responses; channels not listed block
    responses: HashMap<CollisionChannel, CollisionResponse>,
    pub attachment: Option<Attachment>,
    /// Hover outline visible
    pub outlined: bool,
    pub hidden: bool,
}

impl Body {
    pub fn new(transform: Transform, shape: CollisionShape, mass: f32) -> Self {
        Self {
            transform,
            shape,
            mass,
            simulate_physics: false,
            gravity: false,
            collision: CollisionMode::QueryAndPhysics,
            responses: HashMap::new(),
            attachment: None,
            outlined: false,
            hidden: false,
        }
    }

    pub fn response(&self, channel: CollisionChannel) -> CollisionResponse {
        self.responses
            .get(&channel)
            .copied()
            .unwrap_or(CollisionResponse::Block)
    }

    pub fn set_response(&mut self, channel: CollisionChannel, response: CollisionResponse) {
        self.responses.insert(channel, response);
    }

    pub fn ignore_all_channels(&mut self) {
        for channel in CollisionChannel::ALL {
            self.responses.insert(channel, CollisionResponse::Ignore);
        }
    }

    /// Whether a query from `channel` can see this body at all
    pub fn is_queryable_by(&self, channel: CollisionChannel) -> bool {
        !self.hidden
            && self.collision.has_query()
            && self.response(channel) != CollisionResponse::Ignore
    }

    /// Distance from `point` to the body surface (zero inside)
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.closest_point(point).distance(point)
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.transform.inverse_transform_point(point);
        let closest = self.shape.closest_point(local);
        self.transform.transform_point(closest)
    }

    /// Trace the segment `start..end` against this body. Returns the hit
    /// fraction along the segment; a start inside the body hits at 0.
    pub fn line_trace(&self, start: Vec3, end: Vec3) -> Option<f32> {
        if !self.collision.has_query() {
            return None;
        }
        let local_start = self.transform.inverse_transform_point(start);
        let local_end = self.transform.inverse_transform_point(end);
        self.shape.segment_hit(local_start, local_end)
    }
}

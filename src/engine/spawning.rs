//! Spawning hands and interactables into the session.

use super::Session;
use crate::components::{Body, CollisionMode, Transform};
use crate::hand::{HandController, HandSide};
use crate::interaction::{
    Bed, ClimbableObject, ConsumableData, ConsumableItem, ConsumableKind, GrabPointBehavior,
    GrabbableObject, Interactable,
};
use crate::physics::CollisionShape;

use glam::Vec3;
use hecs::Entity;

impl Session {
    /// Spawn a hand with its controller and mesh at the rig origin
    pub fn spawn_hand(&mut self, side: HandSide) -> Entity {
        let mut hand = HandController::new(side, self.config.hand);
        let rig = self.rig_transform();
        hand.set_controller(&rig, Transform::IDENTITY);
        hand.mesh.transform = hand.controller;
        let entity = self.world.spawn((hand,));
        tracing::debug!(?entity, ?side, "spawned hand");
        entity
    }

    /// Spawn a grabbable, applying its spawn-time physics setup to `body`
    pub fn spawn_grabbable(&mut self, mut body: Body, mut grabbable: GrabbableObject) -> Entity {
        grabbable.setup_physics(&mut body);
        let entity = self.world.spawn((body, Interactable::Grabbable(grabbable)));
        tracing::debug!(?entity, "spawned grabbable");
        entity
    }

    /// Spawn a static climbable
    pub fn spawn_climbable(&mut self, mut body: Body, climbable: ClimbableObject) -> Entity {
        body.simulate_physics = false;
        body.gravity = false;
        body.collision = CollisionMode::QueryAndPhysics;
        let entity = self.world.spawn((body, Interactable::Climbable(climbable)));
        tracing::debug!(?entity, "spawned climbable");
        entity
    }

    /// Spawn a consumable and add it to the reuse pool
    pub fn spawn_consumable(&mut self, mut body: Body, mut item: ConsumableItem) -> Entity {
        item.grab.setup_physics(&mut body);
        let kind = item.kind();
        let entity = self.world.spawn((body, Interactable::Consumable(item)));
        self.pool.push(entity);
        tracing::debug!(?entity, ?kind, "spawned consumable");
        entity
    }

    pub fn spawn_bed(&mut self, mut body: Body, bed: Bed) -> Entity {
        body.simulate_physics = false;
        body.gravity = false;
        body.collision = CollisionMode::QueryAndPhysics;
        let entity = self.world.spawn((body, Interactable::Bed(bed)));
        tracing::debug!(?entity, "spawned bed");
        entity
    }

    /// Stock consumable used when the pool has nothing to reuse
    pub(super) fn spawn_default_consumable(&mut self, kind: ConsumableKind, location: Vec3) -> Entity {
        let (data, radius, mass) = match kind {
            ConsumableKind::Food => (ConsumableData::food(), 4.0, 0.2),
            ConsumableKind::Drink => (ConsumableData::drink(), 5.0, 0.6),
        };
        let body = Body::new(
            Transform::from_translation(location),
            CollisionShape::Sphere { radius },
            mass,
        );
        let item = ConsumableItem::new(GrabbableObject::new(GrabPointBehavior::None), data);
        self.spawn_consumable(body, item)
    }
}


//! Collision shapes and the constraint store.
//!
//! This is not a physics engine. Shapes answer the overlap and trace queries
//! the hands need, and drive constraints ease their driven side toward the
//! target frame each tick.

use crate::components::Transform;
use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// SHAPES
// =============================================================================

/// Collision shape in body-local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl CollisionShape {
    /// Closest point on or inside the shape to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        match *self {
            CollisionShape::Sphere { radius } => {
                let len = point.length();
                if len <= radius {
                    point
                } else {
                    point * (radius / len)
                }
            }
            CollisionShape::Box { half_extents } => point.clamp(-half_extents, half_extents),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            CollisionShape::Sphere { radius } => point.length_squared() <= radius * radius,
            CollisionShape::Box { half_extents } => {
                let p = point.abs();
                p.x <= half_extents.x && p.y <= half_extents.y && p.z <= half_extents.z
            }
        }
    }

    /// First hit fraction of the segment `start..end` against the shape
    pub fn segment_hit(&self, start: Vec3, end: Vec3) -> Option<f32> {
        if self.contains(start) {
            return Some(0.0);
        }
        let dir = end - start;
        match *self {
            CollisionShape::Sphere { radius } => {
                let a = dir.length_squared();
                if a <= f32::EPSILON {
                    return None;
                }
                let b = 2.0 * start.dot(dir);
                let c = start.length_squared() - radius * radius;
                let disc = b * b - 4.0 * a * c;
                if disc < 0.0 {
                    return None;
                }
                let t = (-b - disc.sqrt()) / (2.0 * a);
                (0.0..=1.0).contains(&t).then_some(t)
            }
            CollisionShape::Box { half_extents } => {
                // Slab test
                let mut t_min = 0.0_f32;
                let mut t_max = 1.0_f32;
                for axis in 0..3 {
                    let s = start[axis];
                    let d = dir[axis];
                    let h = half_extents[axis];
                    if d.abs() <= f32::EPSILON {
                        if s < -h || s > h {
                            return None;
                        }
                        continue;
                    }
                    let mut t0 = (-h - s) / d;
                    let mut t1 = (h - s) / d;
                    if t0 > t1 {
                        std::mem::swap(&mut t0, &mut t1);
                    }
                    t_min = t_min.max(t0);
                    t_max = t_max.min(t1);
                    if t_min > t_max {
                        return None;
                    }
                }
                Some(t_min)
            }
        }
    }
}

// =============================================================================
// CONSTRAINTS
// =============================================================================

/// Handle to a constraint owned by a hand or a grabbable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Free grab: the object is driven toward the hand bone
    HandGrab,
    /// Second snap hand: the hand mesh is driven onto its grab point
    SecondHand,
}

/// Position and velocity drive gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl DriveParams {
    /// Fraction of the remaining error closed over `dt`
    pub fn alpha(&self, dt: f32) -> f32 {
        let rate = self.stiffness / self.damping.max(1.0);
        1.0 - (-rate * dt).exp()
    }
}

/// A locked-limit drive constraint between a hand and a body.
///
/// `hand_frame` is the constrained pose relative to the hand mesh and
/// `body_frame` the same pose relative to the body.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub hand: Entity,
    pub body: Entity,
    pub hand_frame: Transform,
    pub body_frame: Transform,
    pub drive: DriveParams,
}

/// Owns every live constraint. Destruction is check-then-destroy.
#[derive(Debug, Default)]
pub struct ConstraintStore {
    next_id: u64,
    constraints: HashMap<ConstraintId, Constraint>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            ?id,
            kind = ?constraint.kind,
            hand = ?constraint.hand,
            body = ?constraint.body,
            "constraint created"
        );
        self.constraints.insert(id, constraint);
        id
    }

    /// Destroy a constraint. Returns false if it was already gone.
    pub fn destroy(&mut self, id: ConstraintId) -> bool {
        match self.constraints.remove(&id) {
            Some(c) => {
                tracing::debug!(?id, kind = ?c.kind, "constraint destroyed");
                true
            }
            None => false,
        }
    }

    /// Destroy every constraint attached to `body`
    pub fn destroy_for_body(&mut self, body: Entity) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|_, c| c.body != body);
        before - self.constraints.len()
    }

    pub fn get(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    pub fn contains(&self, id: ConstraintId) -> bool {
        self.constraints.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> + '_ {
        self.constraints.iter().map(|(id, c)| (*id, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_segment_hit_fraction() {
        let shape = CollisionShape::Sphere { radius: 1.0 };
        let hit = shape
            .segment_hit(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        assert!((hit - 0.5).abs() < 1e-4);
        assert!(shape
            .segment_hit(Vec3::new(-3.0, 2.0, 0.0), Vec3::new(3.0, 2.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_box_segment_hit_and_start_inside() {
        let shape = CollisionShape::Box {
            half_extents: Vec3::splat(1.0),
        };
        let hit = shape
            .segment_hit(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0))
            .unwrap();
        assert!((hit - 0.4).abs() < 1e-4);
        assert_eq!(shape.segment_hit(Vec3::ZERO, Vec3::X * 4.0), Some(0.0));
    }

    #[test]
    fn test_destroy_is_check_then_destroy() {
        let mut world = hecs::World::new();
        let hand = world.spawn(());
        let body = world.spawn(());
        let mut store = ConstraintStore::new();
        let id = store.create(Constraint {
            kind: ConstraintKind::HandGrab,
            hand,
            body,
            hand_frame: Transform::IDENTITY,
            body_frame: Transform::IDENTITY,
            drive: DriveParams {
                stiffness: 800.0,
                damping: 80.0,
            },
        });
        assert!(store.destroy(id));
        assert!(!store.destroy(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_drive_alpha_bounded() {
        let drive = DriveParams {
            stiffness: 1200.0,
            damping: 120.0,
        };
        let a = drive.alpha(1.0 / 90.0);
        assert!(a > 0.0 && a < 1.0);
        assert!(drive.alpha(100.0) <= 1.0);
    }
}

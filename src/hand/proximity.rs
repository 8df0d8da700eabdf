//! Proximity queries: grab-point selection and hover choice.

use crate::components::Transform;
use crate::interaction::{GrabPointType, GrabState, GrabbableObject};
use glam::Vec3;
use hecs::Entity;

/// Nearest grab point a hand could snap to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabPointInfo {
    pub available: bool,
    pub location: Vec3,
    pub point: GrabPointType,
    pub distance: f32,
}

impl GrabPointInfo {
    pub const UNAVAILABLE: GrabPointInfo = GrabPointInfo {
        available: false,
        location: Vec3::ZERO,
        point: GrabPointType::None,
        distance: f32::MAX,
    };
}

/// Nearest grab point of `object` strictly inside `snap_range` of `origin`.
///
/// Before a snap, only free points are candidates. Once snap-grabbed every
/// point is, since snapping onto a held point force-switches it.
pub fn closest_available_grab_point(
    object: &GrabbableObject,
    body: &Transform,
    origin: Vec3,
    snap_range: f32,
) -> GrabPointInfo {
    if !object.should_use_grab_points() {
        return GrabPointInfo::UNAVAILABLE;
    }
    let snap_grabbed = object.state() == GrabState::SnapGrab;
    let candidates = [
        (
            GrabPointType::Main,
            object.should_use_main_grab_point(),
            object.is_main_grab_point_available(),
        ),
        (
            GrabPointType::Secondary,
            object.should_use_secondary_grab_point(),
            object.is_secondary_grab_point_available(),
        ),
    ];

    let mut best = GrabPointInfo::UNAVAILABLE;
    for (ty, used, available) in candidates {
        if !used || !(available || snap_grabbed) {
            continue;
        }
        let Some(point) = object.grab_point(ty) else {
            continue;
        };
        let location = point.world_transform(body).translation;
        let distance = origin.distance(location);
        if distance < snap_range && distance < best.distance {
            best = GrabPointInfo {
                available: true,
                location,
                point: ty,
                distance,
            };
        }
    }
    best
}

/// Logical grab point recorded for a free grab: whichever point is nearer,
/// Secondary on ties.
pub fn nearest_logical_grab_point(object: &GrabbableObject, body: &Transform, origin: Vec3) -> GrabPointType {
    let distance = |ty: GrabPointType| {
        object
            .grab_point(ty)
            .map(|p| origin.distance(p.world_transform(body).translation))
            .unwrap_or(f32::MAX)
    };
    if distance(GrabPointType::Main) < distance(GrabPointType::Secondary) {
        GrabPointType::Main
    } else {
        GrabPointType::Secondary
    }
}

/// Closest candidate by distance. Strict less-than: the first of equals wins.
pub fn select_hover(candidates: impl IntoIterator<Item = (Entity, f32)>) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, distance) in candidates {
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((entity, distance)),
        }
    }
    best.map(|(e, _)| e)
}

/// Bring an ordered overlap list up to date. Entities that stopped
/// overlapping are dropped, new ones are appended in discovery order.
pub fn update_overlaps(overlapping: &mut Vec<Entity>, now: &[Entity]) {
    overlapping.retain(|e| now.contains(e));
    for e in now {
        if !overlapping.contains(e) {
            overlapping.push(*e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Body;
    use crate::interaction::GrabPointBehavior;
    use crate::physics::CollisionShape;

    fn rifle() -> GrabbableObject {
        GrabbableObject::new(GrabPointBehavior::DualHanded).with_grab_points(
            Transform::from_translation(Vec3::new(-10.0, 0.0, 0.0)),
            Transform::from_translation(Vec3::new(20.0, 0.0, 0.0)),
        )
    }

    #[test]
    fn test_picks_nearest_point_in_range() {
        let object = rifle();
        let info = closest_available_grab_point(
            &object,
            &Transform::IDENTITY,
            Vec3::new(15.0, 0.0, 0.0),
            15.0,
        );
        assert!(info.available);
        assert_eq!(info.point, GrabPointType::Secondary);
        assert!((info.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_range_is_strict() {
        let object = rifle();
        let info = closest_available_grab_point(
            &object,
            &Transform::IDENTITY,
            Vec3::new(-10.0, 15.0, 0.0),
            15.0,
        );
        assert!(!info.available);
    }

    #[test]
    fn test_occupied_point_is_candidate_only_when_snap_grabbed() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let mut object = rifle();

        // Free grab does not occupy points, so both stay candidates
        object.register_free_hand(a);
        let info = closest_available_grab_point(&object, &Transform::IDENTITY, Vec3::new(-8.0, 0.0, 0.0), 15.0);
        assert_eq!(info.point, GrabPointType::Main);

        let mut object = rifle();
        let mut body = Body::new(Transform::IDENTITY, CollisionShape::Sphere { radius: 1.0 }, 1.0);
        let socket = Transform::from_translation(Vec3::new(-10.0, 0.0, 0.0));
        object.attach_first_hand(a, GrabPointType::Main, &mut body, &socket);
        let info = closest_available_grab_point(&object, &body.transform, Vec3::new(-8.0, 0.0, 0.0), 15.0);
        assert!(info.available);
        assert_eq!(info.point, GrabPointType::Main);
    }

    #[test]
    fn test_no_grab_points_is_unavailable() {
        let object = GrabbableObject::new(GrabPointBehavior::None);
        let info = closest_available_grab_point(&object, &Transform::IDENTITY, Vec3::ZERO, 100.0);
        assert_eq!(info, GrabPointInfo::UNAVAILABLE);
    }

    #[test]
    fn test_hover_first_found_wins_ties() {
        let mut world = hecs::World::new();
        let (a, b, c) = (world.spawn(()), world.spawn(()), world.spawn(()));
        assert_eq!(select_hover([(a, 3.0), (b, 3.0), (c, 4.0)]), Some(a));
        assert_eq!(select_hover([(c, 4.0), (b, 1.0), (a, 1.0)]), Some(b));
        assert_eq!(select_hover(Vec::new()), None);
    }

    #[test]
    fn test_overlaps_keep_discovery_order() {
        let mut world = hecs::World::new();
        let (a, b, c) = (world.spawn(()), world.spawn(()), world.spawn(()));
        let mut list = vec![b];
        update_overlaps(&mut list, &[a, b]);
        assert_eq!(list, vec![b, a]);
        update_overlaps(&mut list, &[c, a]);
        assert_eq!(list, vec![a, c]);
    }
}

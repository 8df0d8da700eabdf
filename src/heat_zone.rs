//! Heat zones: a fire's intense heat sphere and a sheltered box around it.

use crate::components::Transform;
use crate::constants::*;
use crate::physics::CollisionShape;
use crate::survival::SurvivalEnvironment;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatVolume {
    pub transform: Transform,
    pub shape: CollisionShape,
    /// Temperature recovered per survival update while inside
    pub recovery_rate: f32,
}

impl HeatVolume {
    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.transform.inverse_transform_point(point);
        self.shape.contains(local)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatZone {
    pub intense: Option<HeatVolume>,
    pub sheltered: Option<HeatVolume>,
    /// The intense volume only warms while burning. Shelter always applies.
    pub burning: bool,
}

impl HeatZone {
    /// Fire zone with the stock intense and sheltered rates
    pub fn fire(center: Vec3, heat_radius: f32, shelter_half_extents: Vec3) -> Self {
        Self {
            intense: Some(HeatVolume {
                transform: Transform::from_translation(center),
                shape: CollisionShape::Sphere {
                    radius: heat_radius,
                },
                recovery_rate: INTENSE_HEAT_RECOVERY_RATE,
            }),
            sheltered: Some(HeatVolume {
                transform: Transform::from_translation(center),
                shape: CollisionShape::Box {
                    half_extents: shelter_half_extents,
                },
                recovery_rate: SHELTERED_HEAT_RECOVERY_RATE,
            }),
            burning: true,
        }
    }

    /// Fire zone that gives shelter but no heat until lit
    pub fn unlit(center: Vec3, heat_radius: f32, shelter_half_extents: Vec3) -> Self {
        Self {
            burning: false,
            ..Self::fire(center, heat_radius, shelter_half_extents)
        }
    }

    pub fn ignite(&mut self) {
        self.burning = true;
    }
}

/// Fold every zone containing `head` into the environment. Overlapping zones
/// of the same type keep the strongest rate.
pub fn apply_heat_zones<'a>(
    zones: impl IntoIterator<Item = &'a HeatZone>,
    head: Vec3,
    environment: &mut SurvivalEnvironment,
) {
    for zone in zones {
        if let Some(volume) = zone.intense.filter(|v| zone.burning && v.contains(head)) {
            environment.intense_heat = Some(
                environment
                    .intense_heat
                    .map_or(volume.recovery_rate, |r| r.max(volume.recovery_rate)),
            );
        }
        if let Some(volume) = zone.sheltered.filter(|v| v.contains(head)) {
            environment.sheltered = Some(
                environment
                    .sheltered
                    .map_or(volume.recovery_rate, |r| r.max(volume.recovery_rate)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_inside_shelter_but_outside_fire() {
        let zones = vec![HeatZone::fire(Vec3::ZERO, 100.0, Vec3::splat(300.0))];
        let mut env = SurvivalEnvironment::default();
        apply_heat_zones(&zones, Vec3::new(200.0, 0.0, 0.0), &mut env);
        assert_eq!(env.sheltered, Some(SHELTERED_HEAT_RECOVERY_RATE));
        assert_eq!(env.intense_heat, None);

        let mut env = SurvivalEnvironment::default();
        apply_heat_zones(&zones, Vec3::new(50.0, 0.0, 0.0), &mut env);
        assert_eq!(env.intense_heat, Some(INTENSE_HEAT_RECOVERY_RATE));
    }

    #[test]
    fn test_unlit_fire_only_shelters() {
        let mut zone = HeatZone::unlit(Vec3::ZERO, 100.0, Vec3::splat(300.0));
        let mut env = SurvivalEnvironment::default();
        apply_heat_zones([&zone], Vec3::new(50.0, 0.0, 0.0), &mut env);
        assert_eq!(env.intense_heat, None);
        assert_eq!(env.sheltered, Some(SHELTERED_HEAT_RECOVERY_RATE));

        zone.ignite();
        let mut env = SurvivalEnvironment::default();
        apply_heat_zones([&zone], Vec3::new(50.0, 0.0, 0.0), &mut env);
        assert_eq!(env.intense_heat, Some(INTENSE_HEAT_RECOVERY_RATE));
    }

    #[test]
    fn test_outside_everything() {
        let zones = vec![HeatZone::fire(Vec3::ZERO, 100.0, Vec3::splat(300.0))];
        let mut env = SurvivalEnvironment::default();
        apply_heat_zones(&zones, Vec3::new(1000.0, 0.0, 0.0), &mut env);
        assert_eq!(env, SurvivalEnvironment::default());
    }
}

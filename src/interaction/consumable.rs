//! Food and drink. Both are ordinary grabbables with a consume step that
//! fires when the item touches the mouth.

use super::{GrabOutcome, GrabbableObject, Interaction, InteractionKind, ReleaseEffects};
use crate::components::{Body, CollisionChannel};
use crate::constants::*;
use crate::time_system::TimerHandle;
use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    Food,
    Drink,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsumableData {
    Food {
        nutrition: f32,
        stamina: f32,
    },
    Drink {
        hydration: f32,
        stamina: f32,
        /// Remaining water in percent
        water: f32,
        water_decrease: f32,
        min_tilt_degrees: f32,
    },
}

impl ConsumableData {
    pub fn food() -> Self {
        ConsumableData::Food {
            nutrition: FOOD_NUTRITION_VALUE,
            stamina: FOOD_STAMINA_RESTORATION,
        }
    }

    pub fn drink() -> Self {
        ConsumableData::Drink {
            hydration: DRINK_HYDRATION_VALUE,
            stamina: DRINK_STAMINA_RESTORATION,
            water: DRINK_FULL_WATER,
            water_decrease: DRINK_WATER_DECREASE_RATE,
            min_tilt_degrees: DRINK_MIN_TILT_DEGREES,
        }
    }

    pub fn kind(&self) -> ConsumableKind {
        match self {
            ConsumableData::Food { .. } => ConsumableKind::Food,
            ConsumableData::Drink { .. } => ConsumableKind::Drink,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsumableItem {
    pub grab: GrabbableObject,
    pub data: ConsumableData,
    active: bool,
    /// Was touching the mouth last tick
    pub(crate) at_mouth: bool,
    pub(crate) drink_timer: Option<TimerHandle>,
}

impl ConsumableItem {
    pub fn new(grab: GrabbableObject, data: ConsumableData) -> Self {
        Self {
            grab,
            data,
            active: true,
            at_mouth: false,
            drink_timer: None,
        }
    }

    pub fn kind(&self) -> ConsumableKind {
        self.data.kind()
    }

    /// Inactive items are hidden and wait in the pool
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.at_mouth = false;
    }

    /// Bring a pooled item back with fresh contents
    pub(crate) fn reactivate(&mut self) {
        self.active = true;
        self.at_mouth = false;
        if let ConsumableData::Drink { water, .. } = &mut self.data {
            *water = DRINK_FULL_WATER;
        }
    }

    /// Remaining water, for drinks
    pub fn water(&self) -> Option<f32> {
        match self.data {
            ConsumableData::Drink { water, .. } => Some(water),
            ConsumableData::Food { .. } => None,
        }
    }

    /// Angle between the item's up axis and world up has reached the pour angle
    pub fn is_tilted_for_drinking(&self, body: &Body) -> bool {
        let ConsumableData::Drink { min_tilt_degrees, .. } = self.data else {
            return false;
        };
        let dot = body.transform.up().dot(Vec3::Z).clamp(-1.0, 1.0);
        dot.acos().to_degrees() >= min_tilt_degrees
    }
}

impl Interaction for ConsumableItem {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Consumable
    }

    fn weight(&self, body: &Body) -> f32 {
        self.grab.weight(body)
    }

    fn outline_on_hover(&self, snap_point_in_range: bool) -> bool {
        self.grab.outline_on_hover(snap_point_in_range)
    }

    fn on_grab(&mut self, hand: Entity, channel: CollisionChannel, body: &mut Body) -> GrabOutcome {
        self.grab.on_grab(hand, channel, body)
    }

    fn on_release(
        &mut self,
        hand: Entity,
        channel: CollisionChannel,
        body: &mut Body,
    ) -> ReleaseEffects {
        self.grab.on_release(hand, channel, body)
    }

    fn hands(&self) -> Vec<Entity> {
        self.grab.hands()
    }

    fn grabbable(&self) -> Option<&GrabbableObject> {
        Some(&self.grab)
    }

    fn grabbable_mut(&mut self) -> Option<&mut GrabbableObject> {
        Some(&mut self.grab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Transform;
    use crate::interaction::GrabPointBehavior;
    use crate::physics::CollisionShape;
    use glam::Quat;

    #[test]
    fn test_tilt_threshold() {
        let item = ConsumableItem::new(
            GrabbableObject::new(GrabPointBehavior::None),
            ConsumableData::drink(),
        );
        let mut body = Body::new(Transform::IDENTITY, CollisionShape::Sphere { radius: 3.0 }, 0.5);
        assert!(!item.is_tilted_for_drinking(&body));
        body.transform.rotation = Quat::from_rotation_x(50f32.to_radians());
        assert!(item.is_tilted_for_drinking(&body));
        body.transform.rotation = Quat::from_rotation_x(30f32.to_radians());
        assert!(!item.is_tilted_for_drinking(&body));
    }

    #[test]
    fn test_food_never_tilts_and_has_no_water() {
        let item = ConsumableItem::new(
            GrabbableObject::new(GrabPointBehavior::None),
            ConsumableData::food(),
        );
        assert_eq!(item.kind(), ConsumableKind::Food);
        assert_eq!(item.water(), None);
    }

    #[test]
    fn test_reactivate_refills() {
        let mut item = ConsumableItem::new(
            GrabbableObject::new(GrabPointBehavior::None),
            ConsumableData::drink(),
        );
        if let ConsumableData::Drink { water, .. } = &mut item.data {
            *water = 0.0;
        }
        item.deactivate();
        assert!(!item.is_active());
        item.reactivate();
        assert_eq!(item.water(), Some(DRINK_FULL_WATER));
    }
}

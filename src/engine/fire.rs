//! Fireplaces and the wood logs that light them.

use super::Session;
use crate::components::Body;
use crate::events::SessionEvent;
use crate::fireplace::{Fireplace, LogPlacement, WoodLog};
use crate::interaction::{GrabPointBehavior, GrabbableObject, Interactable};

use hecs::{Entity, Ref};

impl Session {
    pub fn spawn_fireplace(&mut self, fireplace: Fireplace) -> Entity {
        let required = fireplace.required_logs();
        let entity = self.world.spawn((fireplace,));
        tracing::debug!(?entity, required, "spawned fireplace");
        entity
    }

    /// Spawn a free-grab log that a fireplace will take when dropped near it
    pub fn spawn_wood_log(&mut self, mut body: Body) -> Entity {
        let mut grabbable = GrabbableObject::new(GrabPointBehavior::None);
        grabbable.setup_physics(&mut body);
        let entity = self
            .world
            .spawn((body, Interactable::Grabbable(grabbable), WoodLog));
        tracing::debug!(?entity, "spawned wood log");
        entity
    }

    pub fn fireplace(&self, fireplace: Entity) -> Option<Ref<'_, Fireplace>> {
        self.world.get::<&Fireplace>(fireplace).ok()
    }

    pub fn is_wood_log(&self, object: Entity) -> bool {
        self.world.get::<&WoodLog>(object).is_ok()
    }

    /// Put a just-released log into the nearest unfinished fireplace in
    /// range. The log is destroyed once placed. Returns the fireplace.
    pub(super) fn place_released_log(&mut self, log: Entity) -> Option<Entity> {
        puffin::profile_function!();
        if !self.is_alive(log) || !self.is_wood_log(log) {
            return None;
        }
        let location = self.body(log)?.transform.translation;

        let fireplace = self
            .world
            .query::<&Fireplace>()
            .iter()
            .filter(|(_, f)| !f.is_complete() && f.in_range(location))
            .min_by(|(_, a), (_, b)| {
                a.center
                    .distance_squared(location)
                    .total_cmp(&b.center.distance_squared(location))
            })
            .map(|(e, _)| e)?;

        let placement = self.world.get::<&mut Fireplace>(fireplace).ok()?.place_log()?;
        self.safe_destroy(log);

        match placement {
            LogPlacement::Placed { slot } => {
                tracing::debug!(?fireplace, ?log, slot, "log placed");
                self.events.push(SessionEvent::LogPlaced { fireplace, log, slot });
            }
            LogPlacement::Completed { slot } => {
                self.events.push(SessionEvent::LogPlaced { fireplace, log, slot });
                tracing::info!(?fireplace, "fireplace complete, heat zone lit");
                self.events.push(SessionEvent::FireComplete { fireplace });
            }
        }
        Some(fireplace)
    }
}

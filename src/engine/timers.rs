//! Timer dispatch and the periodic survival update.

use super::Session;
use crate::events::SessionEvent;
use crate::fireplace::Fireplace;
use crate::hand::HandController;
use crate::heat_zone::{apply_heat_zones, HeatZone};
use crate::interaction::InteractionKind;
use crate::survival::SurvivalEnvironment;
use crate::time_system::TimerTask;

use hecs::Entity;

impl Session {
    /// Fire every timer the clock has passed, oldest first
    pub(super) fn run_due_timers(&mut self) {
        puffin::profile_function!();
        while let Some((handle, task)) = self.scheduler.pop_due(self.clock.time) {
            tracing::trace!(?handle, ?task, "timer fired");
            match task {
                TimerTask::HandDistanceCheck(hand) => {
                    self.check_hand_controller_distance(hand);
                }
                TimerTask::SurvivalUpdate => self.update_survival(),
                TimerTask::DrinkConsumption(object) => {
                    self.consume(object);
                }
                TimerTask::BedSkipToMorning(bed) => self.skip_to_morning(bed),
                TimerTask::BedCompleteSleep(bed) => self.complete_sleep(bed),
                TimerTask::DeferredDestroy(object) => self.finish_destroy(object),
            }
        }
    }

    /// Periodic survival step: build the environment, update the stats and
    /// drop every climbing hand when stamina runs out
    fn update_survival(&mut self) {
        puffin::profile_function!();
        let mut environment = SurvivalEnvironment {
            day_night_modifier: self.day_night.as_ref().map(|d| d.temperature_modifier()),
            ..Default::default()
        };
        if let Some(head) = self.locomotion.as_ref().map(|l| l.head_transform().translation) {
            let fires: Vec<HeatZone> = self
                .world
                .query::<&Fireplace>()
                .iter()
                .map(|(_, f)| *f.heat_zone())
                .collect();
            apply_heat_zones(self.heat_zones.iter().chain(&fires), head, &mut environment);
        }

        let Some(survival) = self.survival.as_mut() else {
            return;
        };
        if !survival.update(&environment) {
            return;
        }

        tracing::warn!(stamina = survival.stamina(), "stamina depleted, letting go");
        self.events.push(SessionEvent::StaminaDepleted);
        let climbing: Vec<Entity> = self
            .world
            .query::<&HandController>()
            .iter()
            .filter(|(_, h)| h.grabbed().map(|g| g.kind) == Some(InteractionKind::Climbable))
            .map(|(e, _)| e)
            .collect();
        for hand in climbing {
            self.release_object(hand);
        }
    }

    /// Second teardown phase
    fn finish_destroy(&mut self, object: Entity) {
        if self.world.despawn(object).is_err() {
            tracing::warn!(?object, "deferred destroy of missing entity");
            return;
        }
        for (_, hand) in self.world.query_mut::<&mut HandController>() {
            hand.overlapping.retain(|e| *e != object);
            if hand.hovered == Some(object) {
                hand.hovered = None;
            }
        }
        tracing::debug!(?object, "despawned");
        self.events.push(SessionEvent::ObjectDestroyed { object });
    }
}

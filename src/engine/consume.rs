//! Consumables, the consumable pool, the mouth check and sleeping in beds.

use super::Session;
use crate::components::{Body, CollisionMode};
use crate::constants::*;
use crate::events::{SessionEvent, SleepFailure};
use crate::interaction::{ConsumableData, ConsumableKind, Interactable};
use crate::time_system::TimerTask;

use glam::Vec3;
use hecs::Entity;

/// What a consume attempt resolved to before touching survival stats
enum Sip {
    Eat { nutrition: f32, stamina: f32 },
    Drink { hydration: f32, stamina: f32 },
}

impl Session {
    // =========================================================================
    // CONSUMING
    // =========================================================================

    /// Eat or drink `object`. Returns true if anything was consumed.
    pub fn consume(&mut self, object: Entity) -> bool {
        puffin::profile_function!();
        if self.survival.is_none() {
            tracing::warn!(?object, "nothing to feed: no survival provider");
            return false;
        }
        let mouth = self.mouth_location();

        let sip = {
            let (Some(body), Some(interactable)) = (self.body(object), self.interactable(object)) else {
                return false;
            };
            let Some(item) = interactable.consumable().filter(|c| c.is_active()) else {
                return false;
            };
            let survival = self.survival.as_deref();
            match item.data {
                ConsumableData::Food { nutrition, stamina } => {
                    let hungry = survival.is_some_and(|s| s.hunger() < s.max_hunger());
                    hungry.then_some(Sip::Eat { nutrition, stamina })
                }
                ConsumableData::Drink {
                    hydration,
                    stamina,
                    water,
                    ..
                } => {
                    let thirsty = survival.is_some_and(|s| s.thirst() < s.max_thirst());
                    let at_mouth = mouth.is_some_and(|m| body.distance_to(m) <= MOUTH_RADIUS);
                    let ready = item.grab.is_held()
                        && thirsty
                        && water > 0.0
                        && at_mouth
                        && item.is_tilted_for_drinking(&body);
                    ready.then_some(Sip::Drink { hydration, stamina })
                }
            }
        };

        match sip {
            Some(Sip::Eat { nutrition, stamina }) => {
                if let Some(survival) = self.survival.as_mut() {
                    survival.consume_food(nutrition, stamina);
                }
                tracing::info!(?object, nutrition, "ate");
                self.events.push(SessionEvent::Consumed {
                    object,
                    kind: ConsumableKind::Food,
                });
                self.deactivate_consumable(object);
                true
            }
            Some(Sip::Drink { hydration, stamina }) => {
                if let Some(survival) = self.survival.as_mut() {
                    survival.consume_drink(hydration, stamina);
                }
                self.events.push(SessionEvent::Consumed {
                    object,
                    kind: ConsumableKind::Drink,
                });
                let remaining = self.lower_water(object);
                tracing::info!(?object, hydration, remaining, "drank");
                if remaining <= 0.0 {
                    self.stop_drinking(object);
                    self.events.push(SessionEvent::DrinkEmpty { object });
                } else {
                    self.keep_drinking(object);
                }
                true
            }
            None => {
                self.stop_drinking(object);
                false
            }
        }
    }

    /// Take one sip's worth of water out of a drink; returns what is left
    fn lower_water(&mut self, object: Entity) -> f32 {
        let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) else {
            return 0.0;
        };
        match interactable.consumable_mut().map(|c| &mut c.data) {
            Some(ConsumableData::Drink {
                water, water_decrease, ..
            }) => {
                *water = (*water - *water_decrease).max(0.0);
                *water
            }
            _ => 0.0,
        }
    }

    /// Repeat sips while the bottle stays at the mouth
    fn keep_drinking(&mut self, object: Entity) {
        let now = self.clock.time;
        let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) else {
            return;
        };
        let Some(item) = interactable.consumable_mut() else {
            return;
        };
        let running = item.drink_timer.is_some_and(|t| self.scheduler.is_active(t));
        if !running {
            item.drink_timer = Some(self.scheduler.schedule_repeating(
                now,
                DRINK_REPEAT_INTERVAL,
                TimerTask::DrinkConsumption(object),
            ));
        }
    }

    fn stop_drinking(&mut self, object: Entity) {
        let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) else {
            return;
        };
        if let Some(timer) = interactable.consumable_mut().and_then(|c| c.drink_timer.take()) {
            self.scheduler.cancel(timer);
        }
    }

    /// Hide an eaten item and park it in the pool
    fn deactivate_consumable(&mut self, object: Entity) {
        self.force_release(object);
        self.stop_drinking(object);
        if let Ok((body, interactable)) = self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(object)
        {
            body.hidden = true;
            body.collision = CollisionMode::NoCollision;
            body.simulate_physics = false;
            if let Some(item) = interactable.consumable_mut() {
                item.deactivate();
            }
        }
        tracing::debug!(?object, "consumable returned to pool");
    }

    /// An inactive pooled consumable of `kind` moved to `location`, or a fresh
    /// one when the pool has none
    pub fn consumable_from_pool(&mut self, kind: ConsumableKind, location: Vec3) -> Entity {
        let reusable = self.pool.iter().copied().find(|e| {
            self.world
                .get::<&Interactable>(*e)
                .ok()
                .and_then(|i| i.consumable().map(|c| !c.is_active() && c.kind() == kind))
                .unwrap_or(false)
        });

        let Some(object) = reusable else {
            return self.spawn_default_consumable(kind, location);
        };
        if let Ok((body, interactable)) = self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(object)
        {
            body.transform.translation = location;
            body.hidden = false;
            if let Some(item) = interactable.consumable_mut() {
                item.reactivate();
                item.grab.setup_physics(body);
            }
        }
        tracing::debug!(?object, ?kind, "reused pooled consumable");
        object
    }

    /// Rising-edge mouth contact triggers a consume
    pub(super) fn update_mouth(&mut self) {
        puffin::profile_function!();
        let Some(mouth) = self.mouth_location() else {
            return;
        };
        let touching: Vec<(Entity, bool, bool)> = self
            .world
            .query::<(&Body, &Interactable)>()
            .iter()
            .filter_map(|(e, (body, interactable))| {
                let item = interactable.consumable()?;
                if !item.is_active() || !item.grab.is_held() {
                    return None;
                }
                Some((e, body.distance_to(mouth) <= MOUTH_RADIUS, item.at_mouth))
            })
            .collect();

        for (object, now, before) in touching {
            if now && !before {
                self.consume(object);
            }
            if let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) {
                if let Some(item) = interactable.consumable_mut() {
                    item.at_mouth = now;
                }
            }
        }
    }

    // =========================================================================
    // SLEEP
    // =========================================================================

    /// Try to sleep in `bed`. Failures are reported through `SleepFailed`.
    pub fn attempt_sleep(&mut self, bed: Entity) -> bool {
        let available = self
            .interactable(bed)
            .and_then(|i| match &*i {
                Interactable::Bed(b) => Some(b.is_available()),
                _ => None,
            });
        let Some(available) = available else {
            return false;
        };

        let failure = if !available {
            Some(SleepFailure::NotAvailable)
        } else if self.day_night.is_none() {
            Some(SleepFailure::NoTimeSystem)
        } else if !self.day_night.as_ref().is_some_and(|d| d.is_night()) {
            Some(SleepFailure::NotNight)
        } else if !self.locomotion.as_ref().is_some_and(|l| !l.is_climbing()) {
            Some(SleepFailure::CannotSleep)
        } else {
            None
        };
        if let Some(reason) = failure {
            tracing::warn!(?bed, reason = reason.message(), "cannot sleep");
            self.events.push(SessionEvent::SleepFailed { bed, reason });
            return false;
        }

        let fade = match self.world.get::<&mut Interactable>(bed) {
            Ok(mut interactable) => match interactable.bed_mut() {
                Some(b) => {
                    b.begin_sleep();
                    b.fade_duration
                }
                None => return false,
            },
            Err(_) => return false,
        };
        tracing::info!(?bed, fade, "going to sleep");
        self.events.push(SessionEvent::SleepStarted { bed });
        let now = self.clock.time;
        self.scheduler
            .schedule_once(now, fade * 0.5, TimerTask::BedSkipToMorning(bed));
        self.scheduler
            .schedule_once(now, fade, TimerTask::BedCompleteSleep(bed));
        true
    }

    /// Halfway through the fade: jump to morning and apply the bed's benefits
    pub(super) fn skip_to_morning(&mut self, bed: Entity) {
        let benefits = match self.world.get::<&mut Interactable>(bed) {
            Ok(mut interactable) => interactable
                .bed_mut()
                .map(|b| (b.restores_stamina, b.warms_player, b.warmth_amount)),
            Err(_) => None,
        };
        let Some((restores_stamina, warms_player, warmth)) = benefits else {
            return;
        };
        let slept = self
            .day_night
            .as_mut()
            .is_some_and(|d| d.sleep_until_morning());
        if !slept {
            tracing::warn!(?bed, "could not skip to morning");
            return;
        }
        if let Some(survival) = self.survival.as_mut() {
            if restores_stamina {
                survival.restore_from_sleep();
            }
            if warms_player {
                survival.warm(warmth);
            }
        }
    }

    pub(super) fn complete_sleep(&mut self, bed: Entity) {
        if let Ok(mut interactable) = self.world.get::<&mut Interactable>(bed) {
            if let Some(b) = interactable.bed_mut() {
                b.finish_sleep();
            }
        }
        tracing::info!(?bed, "woke up");
        self.events.push(SessionEvent::SleepCompleted { bed });
    }
}

//! Object-side grab transitions, conflict resolution and teardown.

use super::{PendingDestroy, Session};
use crate::components::{Body, CollisionMode, Transform};
use crate::constants::*;
use crate::events::SessionEvent;
use crate::hand::HandController;
use crate::interaction::{GrabPointType, GrabState, Interactable, InteractionKind, ReleaseEffects};
use crate::physics::{Constraint, ConstraintKind, DriveParams};
use crate::time_system::TimerTask;

use hecs::Entity;

impl Session {
    // =========================================================================
    // UNIFIED GRAB
    // =========================================================================

    /// Transition `object` for a grab by `hand`.
    ///
    /// Acceptance is checked first and a refused grab leaves every current
    /// holder in place. Conflicts are resolved only after that, then the free
    /// or snap path runs. Returns false when the object could not take the
    /// hand.
    pub fn on_unified_grab(
        &mut self,
        object: Entity,
        hand: Entity,
        is_left: bool,
        is_snapping: bool,
        point: GrabPointType,
    ) -> bool {
        puffin::profile_function!();
        let Some(grip) = self.hand(hand).map(|h| (h.grip_socket_world(), h.grip_socket)) else {
            tracing::warn!(?hand, ?object, "grab by unknown hand");
            return false;
        };
        if !self.is_alive(object) {
            tracing::warn!(?hand, ?object, "grab of a dead object");
            return false;
        }
        if !self.can_accept_grab(object, is_snapping, point, hand) {
            tracing::warn!(?hand, ?object, ?point, is_snapping, "grab refused");
            self.events.push(SessionEvent::GrabRejected { hand, object });
            return false;
        }

        self.handle_grab_conflicts(object, hand, is_snapping, point);
        let ok = self.attach_grabbing_hand(object, hand, is_left, is_snapping, point, grip);
        if !ok {
            self.events.push(SessionEvent::GrabRejected { hand, object });
        }
        ok
    }

    /// Free or snap attach of `hand` once conflicts are out of the way.
    /// `grip` is the hand's grip socket in world and hand space.
    fn attach_grabbing_hand(
        &mut self,
        object: Entity,
        hand: Entity,
        is_left: bool,
        is_snapping: bool,
        point: GrabPointType,
        grip: (Transform, Transform),
    ) -> bool {
        let (socket, socket_local) = grip;
        if !is_snapping {
            let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) else {
                return false;
            };
            let Some(grabbable) = interactable.grabbable_mut() else {
                return false;
            };
            if grabbable.state() == GrabState::SnapGrab {
                tracing::warn!(?hand, ?object, "free grab refused while snap-grabbed");
                return false;
            }
            grabbable.register_free_hand(hand);
            tracing::debug!(?hand, ?object, is_left, "free grab");
            return true;
        }

        let (attached, offset) = {
            let Some(interactable) = self.interactable(object) else {
                return false;
            };
            let Some(grabbable) = interactable.grabbable() else {
                return false;
            };
            let offset = grabbable.grab_point(point).map(|p| (p.offset, p.is_available()));
            (grabbable.is_attached(), offset)
        };

        if !attached {
            let Ok((body, interactable)) = self
                .world
                .query_one_mut::<(&mut Body, &mut Interactable)>(object)
            else {
                return false;
            };
            let Some(grabbable) = interactable.grabbable_mut() else {
                return false;
            };
            let ok = grabbable.attach_first_hand(hand, point, body, &socket);
            tracing::debug!(?hand, ?object, ?point, is_left, ok, "snap grab, first hand");
            return ok;
        }

        // Only one rigid parent is possible; the second hand is driven
        let Some((offset, true)) = offset else {
            tracing::warn!(?hand, ?object, ?point, "second snap point is not free");
            return false;
        };
        let id = self.constraints.create(Constraint {
            kind: ConstraintKind::SecondHand,
            hand,
            body: object,
            hand_frame: socket_local,
            body_frame: offset,
            drive: DriveParams {
                stiffness: SECOND_HAND_DRIVE_STIFFNESS,
                damping: SECOND_HAND_DRIVE_DAMPING,
            },
        });
        if let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) {
            if let Some(grabbable) = interactable.grabbable_mut() {
                grabbable.attach_second_hand(hand, point, id);
            }
        }
        tracing::debug!(?hand, ?object, ?point, is_left, "snap grab, second hand");
        true
    }

    /// Evict whoever stands in the way of an accepted grab. Never
    /// re-validates acceptance.
    fn handle_grab_conflicts(&mut self, object: Entity, hand: Entity, is_snap: bool, point: GrabPointType) {
        let victims = match self.world.get::<&mut Interactable>(object) {
            Ok(mut interactable) => match interactable.grabbable_mut() {
                Some(grabbable) => {
                    let victims = grabbable.conflicting_hands(hand, is_snap, point);
                    if !victims.is_empty() {
                        grabbable.set_switching(true);
                    }
                    victims
                }
                None => return,
            },
            Err(_) => return,
        };
        if victims.is_empty() {
            return;
        }

        for victim in victims {
            tracing::warn!(?object, evicted = ?victim, by = ?hand, ?point, "evicting holder");
            self.events.push(SessionEvent::HandEvicted {
                object,
                evicted: victim,
                by: hand,
                point,
            });
            self.force_release_hand(object, victim);
        }

        if let Ok(mut interactable) = self.world.get::<&mut Interactable>(object) {
            if let Some(grabbable) = interactable.grabbable_mut() {
                grabbable.set_switching(false);
            }
        }
    }

    // =========================================================================
    // RELEASE
    // =========================================================================

    /// Release `hand` from `object`. Goes through the hand when the hand's
    /// record points at the object so both sides stay in step.
    fn force_release_hand(&mut self, object: Entity, hand: Entity) {
        let holds = self.hand(hand).and_then(|h| h.grabbed_object()) == Some(object);
        if holds {
            self.release_object(hand);
        } else {
            self.on_release(object, hand);
        }
    }

    /// Object-side release of `hand`. Releasing a hand the object does not
    /// know is a no-op.
    pub fn on_release(&mut self, object: Entity, hand: Entity) -> bool {
        let Some(channel) = self.hand(hand).map(|h| h.channel()) else {
            return false;
        };
        let effects = match self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(object)
        {
            Ok((body, interactable)) => {
                if !interactable.as_interaction().hands().contains(&hand) {
                    return false;
                }
                interactable.as_interaction_mut().on_release(hand, channel, body)
            }
            Err(_) => return false,
        };
        self.apply_release_effects(object, hand, effects);
        true
    }

    /// Carry out what a release asked for outside the object
    pub(super) fn apply_release_effects(&mut self, object: Entity, hand: Entity, effects: ReleaseEffects) {
        for id in effects.constraints {
            if self.constraints.contains(id) {
                self.constraints.destroy(id);
            } else {
                tracing::debug!(?id, "constraint already gone");
            }
        }

        if let Some(next) = effects.promote {
            if let Some(socket) = self.grip_socket(next) {
                if let Ok((body, interactable)) = self
                    .world
                    .query_one_mut::<(&mut Body, &mut Interactable)>(object)
                {
                    if let Some(grabbable) = interactable.grabbable_mut() {
                        grabbable.promote_attach_hand(next, body, &socket);
                        tracing::debug!(?object, hand = ?next, "attach parent handed off");
                    }
                }
            }
        }

        if effects.fully_released {
            tracing::debug!(?object, "fully released");
        }

        if effects.stop_climbing {
            self.events.push(SessionEvent::ClimbStopped { hand });
            let controllers = self.controller_locations();
            let done = match self.locomotion.as_mut() {
                Some(locomotion) => locomotion.stop_climbing(hand, &controllers),
                None => !self.world.query::<&HandController>().iter().any(|(e, h)| {
                    e != hand && h.grabbed().map(|g| g.kind) == Some(InteractionKind::Climbable)
                }),
            };
            if done {
                if let Some(survival) = self.survival.as_mut() {
                    survival.set_climbing(false);
                }
            }
        }
    }

    /// Release every hand holding `object`
    pub fn force_release(&mut self, object: Entity) {
        let hands = match self.interactable(object) {
            Some(interactable) => interactable.as_interaction().hands(),
            None => return,
        };
        if !hands.is_empty() {
            tracing::debug!(?object, count = hands.len(), "force release");
        }
        for hand in hands {
            self.force_release_hand(object, hand);
        }
    }

    /// Whether `object` would accept a grab by `hand` right now
    pub fn can_accept_grab(&self, object: Entity, is_snap: bool, target: GrabPointType, hand: Entity) -> bool {
        self.interactable(object)
            .and_then(|i| i.grabbable().map(|g| g.can_accept_grab(is_snap, target, hand)))
            .unwrap_or(false)
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Two-phase destroy: release every hand, shut the body down, then
    /// despawn after a short delay. Returns false if already scheduled.
    pub fn safe_destroy(&mut self, object: Entity) -> bool {
        if !self.world.contains(object) || self.world.get::<&PendingDestroy>(object).is_ok() {
            return false;
        }
        tracing::info!(?object, "destroying");

        self.force_release(object);
        self.scheduler.cancel_for_entity(object);

        if let Ok(mut body) = self.world.get::<&mut Body>(object) {
            body.simulate_physics = false;
            body.gravity = false;
            body.attachment = None;
            body.collision = CollisionMode::NoCollision;
            body.ignore_all_channels();
        }
        let removed = self.constraints.destroy_for_body(object);
        if removed > 0 {
            tracing::debug!(?object, removed, "dropped leftover constraints");
        }
        self.pool.retain(|e| *e != object);

        if self.world.insert_one(object, PendingDestroy).is_err() {
            return false;
        }
        self.scheduler.schedule_once(
            self.clock.time,
            DEFERRED_DESTROY_DELAY,
            TimerTask::DeferredDestroy(object),
        );
        true
    }
}

//! Hand operations: hover, grab, release and auto-release.

use super::Session;
use crate::components::{Body, Transform};
use crate::constants::*;
use crate::events::SessionEvent;
use crate::hand::proximity::{self, GrabPointInfo};
use crate::hand::{GrabIndicator, GrabRecord, HandController};
use crate::interaction::{ClimbType, GrabOutcome, GrabPointType, Interactable, InteractionKind};
use crate::physics::{Constraint, ConstraintKind, DriveParams};
use crate::time_system::TimerTask;

use hecs::Entity;

impl Session {
    // =========================================================================
    // CONTROLLER INPUT
    // =========================================================================

    /// Feed a tracked controller pose (tracking space)
    pub fn set_controller_transform(&mut self, hand: Entity, tracked: Transform) {
        let rig = self.rig_transform();
        match self.world.get::<&mut HandController>(hand) {
            Ok(mut controller) => controller.set_controller(&rig, tracked),
            Err(_) => tracing::warn!(?hand, "controller update for unknown hand"),
        }
    }

    /// Override the hand mesh pose, as external physics would
    pub fn set_hand_mesh_transform(&mut self, hand: Entity, transform: Transform) {
        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            controller.mesh.transform = transform;
        }
    }

    /// Nearest grab point of `object` in snap range of `hand`
    pub fn closest_available_grab_point(&self, hand: Entity, object: Entity) -> GrabPointInfo {
        let Some(controller) = self.hand(hand) else {
            return GrabPointInfo::UNAVAILABLE;
        };
        let (Some(body), Some(interactable)) = (self.body(object), self.interactable(object)) else {
            return GrabPointInfo::UNAVAILABLE;
        };
        match interactable.grabbable() {
            Some(grabbable) => proximity::closest_available_grab_point(
                grabbable,
                &body.transform,
                controller.origin_point(),
                controller.config.snap_range,
            ),
            None => GrabPointInfo::UNAVAILABLE,
        }
    }

    // =========================================================================
    // HOVER
    // =========================================================================

    /// Refresh a hand's overlap set, hovered object, outline and indicator
    pub(super) fn update_hover(&mut self, hand: Entity) {
        let Some((center, radius, channel, holding, previous)) = self.hand(hand).map(|h| {
            (
                h.grab_sphere_center(),
                h.config.grab_sphere_radius,
                h.channel(),
                h.is_holding(),
                h.hovered,
            )
        }) else {
            return;
        };
        if holding {
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                controller.indicator = None;
            }
            return;
        }

        let now: Vec<(Entity, f32)> = self
            .world
            .query::<(&Body, &Interactable)>()
            .iter()
            .filter(|(_, (body, _))| body.is_queryable_by(channel))
            .map(|(e, (body, _))| (e, body.distance_to(center)))
            .filter(|(_, d)| *d <= radius)
            .collect();
        let now_entities: Vec<Entity> = now.iter().map(|(e, _)| *e).collect();

        let hovered = {
            let Ok(mut controller) = self.world.get::<&mut HandController>(hand) else {
                return;
            };
            proximity::update_overlaps(&mut controller.overlapping, &now_entities);
            let candidates: Vec<(Entity, f32)> = controller
                .overlapping
                .iter()
                .filter_map(|e| now.iter().find(|(n, _)| n == e).copied())
                .collect();
            let hovered = proximity::select_hover(candidates);
            controller.hovered = hovered;
            hovered
        };

        if hovered != previous {
            tracing::debug!(?hand, ?hovered, "hover changed");
            if let Some(old) = previous {
                if let Ok(mut body) = self.world.get::<&mut Body>(old) {
                    body.outlined = false;
                }
            }
            self.events.push(SessionEvent::HoverChanged {
                hand,
                object: hovered,
            });
        }

        let mut indicator = None;
        if let Some(object) = hovered {
            let info = self.closest_available_grab_point(hand, object);
            let outline = self
                .interactable(object)
                .map(|i| i.as_interaction().outline_on_hover(info.available))
                .unwrap_or(false);
            if let Ok(mut body) = self.world.get::<&mut Body>(object) {
                body.outlined = outline;
            }
            if info.available {
                indicator = Some(GrabIndicator {
                    location: info.location,
                    point: info.point,
                });
            }
        }
        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            controller.indicator = indicator;
        }
    }

    // =========================================================================
    // GRAB
    // =========================================================================

    /// Grab whatever the hand hovers. Returns true when the hand ends up
    /// holding something.
    pub fn grab_object(&mut self, hand: Entity) -> bool {
        puffin::profile_function!();
        let Some((holding, hovered)) = self.hand(hand).map(|h| (h.is_holding(), h.hovered)) else {
            tracing::warn!(?hand, "grab by unknown hand");
            return false;
        };
        if holding {
            return false;
        }
        let Some(object) = hovered else {
            return false;
        };
        if !self.is_alive(object) {
            tracing::warn!(?hand, ?object, "hovered object is gone");
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                controller.hovered = None;
            }
            return false;
        }
        let Some(kind) = self.interactable(object).map(|i| i.kind()) else {
            tracing::error!(?object, "hovered entity is not interactable");
            return false;
        };

        match kind {
            InteractionKind::Climbable => self.grab_climbable(hand, object),
            InteractionKind::Bed => {
                self.grab_bed(hand, object);
                false
            }
            InteractionKind::Grabbable | InteractionKind::Consumable => {
                self.grab_grabbable(hand, object, kind)
            }
        }
    }

    fn grab_climbable(&mut self, hand: Entity, object: Entity) -> bool {
        let Some((channel, side, mesh, controller_location)) = self
            .hand(hand)
            .map(|h| (h.channel(), h.side, h.mesh.transform, h.controller.translation))
        else {
            return false;
        };

        let (outcome, socket) = {
            let Ok((body, interactable)) = self
                .world
                .query_one_mut::<(&mut Body, &mut Interactable)>(object)
            else {
                return false;
            };
            let socket = interactable
                .climbable()
                .filter(|c| c.climb_type == ClimbType::Point)
                .and_then(|c| c.closest_socket_to(&body.transform, mesh.translation));
            let outcome = interactable.as_interaction_mut().on_grab(hand, channel, body);
            (outcome, socket)
        };
        let GrabOutcome::Climb { first_hand } = outcome else {
            return false;
        };

        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            controller.grabbed = Some(GrabRecord {
                object,
                kind: InteractionKind::Climbable,
                snapped: false,
                point: GrabPointType::None,
            });
            controller.indicator = None;
            // Freeze the mesh where it touched the wall
            controller.mesh.attached = false;
            controller.mesh.simulate_physics = false;
            if let Some(socket) = socket {
                controller.mesh.transform.translation = socket.translation;
            }
        }
        tracing::info!(?hand, ?object, first_hand, "climbing grab");
        self.events.push(SessionEvent::GrabStarted {
            hand,
            object,
            kind: InteractionKind::Climbable,
            snapped: false,
            point: GrabPointType::None,
        });
        self.events.push(SessionEvent::ClimbStarted { hand });
        self.start_distance_check(hand);
        self.trace_finger_data(hand);

        let can_climb = self
            .survival
            .as_ref()
            .map(|s| s.can_start_climbing())
            .unwrap_or(true);
        if !can_climb {
            tracing::warn!(?hand, "not enough stamina to climb");
            self.release_object(hand);
            return false;
        }
        if let Some(locomotion) = self.locomotion.as_mut() {
            if locomotion.start_climbing(hand, side, controller_location) {
                if let Some(survival) = self.survival.as_mut() {
                    survival.set_climbing(true);
                }
            }
        }
        true
    }

    fn grab_bed(&mut self, hand: Entity, bed: Entity) {
        let Some(channel) = self.hand(hand).map(|h| h.channel()) else {
            return;
        };
        let outcome = match self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(bed)
        {
            Ok((body, interactable)) => interactable.as_interaction_mut().on_grab(hand, channel, body),
            Err(_) => return,
        };
        if outcome == GrabOutcome::AttemptSleep {
            self.attempt_sleep(bed);
        }
    }

    fn grab_grabbable(&mut self, hand: Entity, object: Entity, kind: InteractionKind) -> bool {
        let Some((channel, side, origin, snap_range, mesh)) = self.hand(hand).map(|h| {
            (
                h.channel(),
                h.side,
                h.origin_point(),
                h.config.snap_range,
                h.mesh.transform,
            )
        }) else {
            return false;
        };

        // Acceptance strictly before any mutation
        let (accepted, is_snap, point) = {
            let (Some(body), Some(interactable)) = (self.body(object), self.interactable(object)) else {
                return false;
            };
            let Some(grabbable) = interactable.grabbable() else {
                return false;
            };
            let info = proximity::closest_available_grab_point(grabbable, &body.transform, origin, snap_range);
            let point = if info.available {
                info.point
            } else if grabbable.should_use_grab_points() {
                proximity::nearest_logical_grab_point(grabbable, &body.transform, origin)
            } else {
                GrabPointType::None
            };
            let accepted = grabbable.can_accept_grab(info.available, info.point, hand);
            if !accepted {
                tracing::warn!(
                    ?hand,
                    ?object,
                    state = ?grabbable.state(),
                    snap = info.available,
                    point = ?info.point,
                    "grab rejected"
                );
            }
            (accepted, info.available, point)
        };
        if !accepted {
            self.events.push(SessionEvent::GrabRejected { hand, object });
            return false;
        }

        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            controller.grabbed = Some(GrabRecord {
                object,
                kind,
                snapped: is_snap,
                point,
            });
            controller.indicator = None;
        }

        if let Ok((body, interactable)) = self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(object)
        {
            interactable.as_interaction_mut().on_grab(hand, channel, body);
        }

        let target = if is_snap { point } else { GrabPointType::None };
        let unified = self.on_unified_grab(object, hand, side.is_left(), is_snap, target);

        // The object has the final word on whether the hand holds it
        let held = self
            .interactable(object)
            .and_then(|i| i.grabbable().map(|g| g.is_held_by(hand)))
            .unwrap_or(false);
        if !unified || !held {
            tracing::warn!(?hand, ?object, "object did not take the grab, rolling back");
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                controller.grabbed = None;
            }
            if let Ok((body, interactable)) = self
                .world
                .query_one_mut::<(&mut Body, &mut Interactable)>(object)
            {
                if let Some(grabbable) = interactable.grabbable_mut() {
                    grabbable.rollback_grab(hand, channel, body);
                }
            }
            // A refused unified grab has already reported itself
            if unified {
                self.events.push(SessionEvent::GrabRejected { hand, object });
            }
            return false;
        }

        if !is_snap {
            let body_transform = self.body(object).map(|b| b.transform).unwrap_or_default();
            let id = self.constraints.create(Constraint {
                kind: ConstraintKind::HandGrab,
                hand,
                body: object,
                hand_frame: body_transform.relative_to(&mesh),
                body_frame: Transform::IDENTITY,
                drive: DriveParams {
                    stiffness: FREE_GRAB_DRIVE_STIFFNESS,
                    damping: FREE_GRAB_DRIVE_DAMPING,
                },
            });
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                controller.grab_constraint = Some(id);
            }
        }

        tracing::info!(?hand, ?object, snapped = is_snap, ?point, "grabbed");
        self.events.push(SessionEvent::GrabStarted {
            hand,
            object,
            kind,
            snapped: is_snap,
            point,
        });
        self.start_distance_check(hand);
        self.trace_finger_data(hand);
        true
    }

    fn start_distance_check(&mut self, hand: Entity) {
        let now = self.clock.time;
        let Ok(mut controller) = self.world.get::<&mut HandController>(hand) else {
            return;
        };
        if let Some(old) = controller.distance_timer.take() {
            self.scheduler.cancel(old);
        }
        controller.distance_timer = Some(self.scheduler.schedule_repeating(
            now,
            controller.config.distance_check_interval,
            TimerTask::HandDistanceCheck(hand),
        ));
    }

    // =========================================================================
    // RELEASE
    // =========================================================================

    /// Let go of whatever the hand holds. Releasing an empty hand is a no-op.
    pub fn release_object(&mut self, hand: Entity) -> bool {
        puffin::profile_function!();
        let Some((record, channel)) = self
            .hand(hand)
            .and_then(|h| h.grabbed.map(|g| (g, h.channel())))
        else {
            return false;
        };

        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            if let Some(timer) = controller.distance_timer.take() {
                self.scheduler.cancel(timer);
            }
        }

        let effects = match self
            .world
            .query_one_mut::<(&mut Body, &mut Interactable)>(record.object)
        {
            Ok((body, interactable)) => Some(interactable.as_interaction_mut().on_release(hand, channel, body)),
            Err(_) => {
                tracing::warn!(?hand, object = ?record.object, "released object is gone");
                None
            }
        };

        // Hand-local cleanup
        let constraint = match self.world.get::<&mut HandController>(hand) {
            Ok(mut controller) => {
                let constraint = controller.grab_constraint.take();
                if record.kind == InteractionKind::Climbable {
                    controller.mesh.attached = true;
                    controller.mesh.simulate_physics = true;
                    controller.mesh.blend_weight = controller.config.physics_blend_weight;
                }
                controller.grabbed = None;
                controller.fingers.reset();
                constraint
            }
            Err(_) => None,
        };
        if let Some(id) = constraint {
            self.constraints.destroy(id);
        }

        tracing::info!(?hand, object = ?record.object, "released");
        self.events.push(SessionEvent::Released {
            hand,
            object: record.object,
        });
        let fully_released = effects.as_ref().is_some_and(|e| e.fully_released);
        if let Some(effects) = effects {
            self.apply_release_effects(record.object, hand, effects);
        }
        if fully_released && self.is_wood_log(record.object) {
            self.place_released_log(record.object);
        }
        true
    }

    /// Periodic check: a hand dragged too far from its controller lets go.
    /// Returns true if it released.
    pub fn check_hand_controller_distance(&mut self, hand: Entity) -> bool {
        let Some((object, distance, threshold)) = self.hand(hand).map(|h| {
            (
                h.grabbed_object(),
                h.mesh_controller_distance(),
                h.config.grab_release_threshold,
            )
        }) else {
            return false;
        };
        let Some(object) = object else {
            // Nothing held: the check has nothing to watch
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                if let Some(timer) = controller.distance_timer.take() {
                    self.scheduler.cancel(timer);
                }
            }
            return false;
        };

        let shared = self
            .world
            .query::<&HandController>()
            .iter()
            .any(|(e, h)| e != hand && h.grabbed_object() == Some(object));
        let threshold = if shared { threshold * 2.0 } else { threshold };

        if distance > threshold {
            tracing::warn!(?hand, ?object, distance, threshold, "hand too far from controller");
            self.events.push(SessionEvent::AutoReleased {
                hand,
                object,
                distance,
            });
            self.release_object(hand);
            return true;
        }
        false
    }

    /// Trace finger curls against the held object, or reset them when the
    /// hand holds nothing
    pub fn trace_finger_data(&mut self, hand: Entity) {
        puffin::profile_function!();
        let Some(object) = self.hand(hand).map(|h| h.grabbed_object()) else {
            return;
        };
        let body = object.and_then(|o| self.body(o).map(|b| Body::clone(&b)));
        if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
            let mesh = controller.mesh.transform;
            controller.fingers.trace(&mesh, body.as_ref());
        }
    }

    /// Hand grip socket in world space, for attaching held bodies
    pub(super) fn grip_socket(&self, hand: Entity) -> Option<Transform> {
        self.hand(hand).map(|h| h.grip_socket_world())
    }
}

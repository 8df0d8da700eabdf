//! Interaction session - owns all state and exposes the operations hosts call.
//!
//! The session handles:
//! - Hands and interactables (hecs world)
//! - Constraint store, clock and timer scheduler
//! - Survival, day/night and locomotion collaborators
//! - Heat zones and fireplaces
//! - The event queue hosts drain after each tick
//!
//! Everything runs on the caller's thread. Timers fire from `tick` once the
//! clock passes them, so a timer callback never interleaves with another
//! operation.

mod consume;
mod fire;
mod grab;
mod objects;
mod spawning;
mod timers;

use crate::character::{ClimbingCharacter, Locomotion};
use crate::components::{Attachment, Body, Transform};
use crate::config::SessionConfig;
use crate::constants::*;
use crate::day_night::{DayNightCycle, DayNightProvider, DayPhase};
use crate::events::{EventQueue, SessionEvent};
use crate::hand::HandController;
use crate::heat_zone::HeatZone;
use crate::interaction::{GrabState, Interactable};
use crate::physics::{ConstraintKind, ConstraintStore};
use crate::survival::{SurvivalComponent, SurvivalStats};
use crate::time_system::{GameClock, TimerHandle, TimerScheduler, TimerTask};

use glam::{Quat, Vec3};
use hecs::{Entity, Ref, World};
use std::collections::HashMap;

/// Marker for an object whose despawn is already scheduled
#[derive(Debug, Clone, Copy)]
struct PendingDestroy;

/// The interaction session - owns every hand, object and collaborator.
pub struct Session {
    /// The ECS world: hands carry `HandController`, objects `Body` + `Interactable`
    pub world: World,

    pub constraints: ConstraintStore,

    /// Session clock (simulation time)
    pub clock: GameClock,

    pub scheduler: TimerScheduler,

    /// Events for the host, drained with `drain_events`
    pub events: EventQueue,

    pub config: SessionConfig,

    heat_zones: Vec<HeatZone>,

    /// Every consumable ever spawned, active or waiting for reuse
    pool: Vec<Entity>,

    survival: Option<Box<dyn SurvivalStats>>,
    day_night: Option<Box<dyn DayNightProvider>>,
    locomotion: Option<Box<dyn Locomotion>>,

    survival_timer: Option<TimerHandle>,
}

impl Session {
    /// Create a session with the stock survival, day/night and character
    /// collaborators.
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self::bare(config);
        session.set_survival(Some(Box::new(SurvivalComponent::new(config.survival))));
        session.day_night = Some(Box::new(DayNightCycle::new(config.day_night)));
        session.locomotion = Some(Box::new(ClimbingCharacter::default()));
        session
    }

    /// Create a session with no collaborators attached
    pub fn bare(config: SessionConfig) -> Self {
        Self {
            world: World::new(),
            constraints: ConstraintStore::new(),
            clock: GameClock::new(),
            scheduler: TimerScheduler::new(),
            events: EventQueue::new(),
            config,
            heat_zones: Vec::new(),
            pool: Vec::new(),
            survival: None,
            day_night: None,
            locomotion: None,
            survival_timer: None,
        }
    }

    // =========================================================================
    // COLLABORATORS
    // =========================================================================

    /// Replace the survival provider. The periodic update runs only while one
    /// is attached.
    pub fn set_survival(&mut self, survival: Option<Box<dyn SurvivalStats>>) {
        if let Some(handle) = self.survival_timer.take() {
            self.scheduler.cancel(handle);
        }
        if survival.is_some() {
            self.survival_timer = Some(self.scheduler.schedule_repeating(
                self.clock.time,
                self.config.survival.update_interval,
                TimerTask::SurvivalUpdate,
            ));
        }
        self.survival = survival;
    }

    pub fn set_day_night(&mut self, day_night: Option<Box<dyn DayNightProvider>>) {
        self.day_night = day_night;
    }

    pub fn set_locomotion(&mut self, locomotion: Option<Box<dyn Locomotion>>) {
        self.locomotion = locomotion;
    }

    pub fn survival(&self) -> Option<&dyn SurvivalStats> {
        self.survival.as_deref()
    }

    pub fn survival_mut(&mut self) -> Option<&mut (dyn SurvivalStats + 'static)> {
        self.survival.as_deref_mut()
    }

    pub fn day_night(&self) -> Option<&dyn DayNightProvider> {
        self.day_night.as_deref()
    }

    pub fn day_night_mut(&mut self) -> Option<&mut (dyn DayNightProvider + 'static)> {
        self.day_night.as_deref_mut()
    }

    pub fn locomotion(&self) -> Option<&dyn Locomotion> {
        self.locomotion.as_deref()
    }

    pub fn add_heat_zone(&mut self, zone: HeatZone) {
        self.heat_zones.push(zone);
    }

    pub fn heat_zones(&self) -> &[HeatZone] {
        &self.heat_zones
    }

    /// Tracking-space origin in the world
    pub fn rig_transform(&self) -> Transform {
        self.locomotion
            .as_ref()
            .map(|l| l.rig_transform())
            .unwrap_or(Transform::IDENTITY)
    }

    pub fn set_head_pose(&mut self, tracked: Transform) {
        if let Some(locomotion) = self.locomotion.as_mut() {
            locomotion.set_head_pose(tracked);
        }
    }

    /// Mouth location below the head, if there is a character
    pub fn mouth_location(&self) -> Option<Vec3> {
        self.locomotion
            .as_ref()
            .map(|l| l.head_transform().translation - Vec3::Z * MOUTH_OFFSET_BELOW_HEAD)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn hand(&self, hand: Entity) -> Option<Ref<'_, HandController>> {
        self.world.get::<&HandController>(hand).ok()
    }

    pub fn body(&self, object: Entity) -> Option<Ref<'_, Body>> {
        self.world.get::<&Body>(object).ok()
    }

    pub fn interactable(&self, object: Entity) -> Option<Ref<'_, Interactable>> {
        self.world.get::<&Interactable>(object).ok()
    }

    /// Grab state of a grabbable or consumable
    pub fn grab_state(&self, object: Entity) -> Option<GrabState> {
        self.interactable(object)
            .and_then(|i| i.grabbable().map(|g| g.state()))
    }

    /// All hand entities, in spawn order
    pub fn hands(&self) -> Vec<Entity> {
        let mut hands: Vec<Entity> = self
            .world
            .query::<&HandController>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        hands.sort_by_key(|e| e.id());
        hands
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.contains(entity) && self.world.get::<&PendingDestroy>(entity).is_err()
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain().collect()
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Advance the session by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        puffin::profile_function!();
        let dt = dt.max(0.0);

        self.clock.advance(dt);
        self.run_due_timers();
        self.update_locomotion(dt);
        self.update_hands(dt);
        self.update_held_objects(dt);
        self.solve_constraints(dt);
        self.update_mouth();
        self.update_day_night(dt);
    }

    /// Current controller locations for every hand
    fn controller_locations(&self) -> Vec<(Entity, Vec3)> {
        self.world
            .query::<&HandController>()
            .iter()
            .map(|(e, h)| (e, h.controller.translation))
            .collect()
    }

    fn update_locomotion(&mut self, dt: f32) {
        puffin::profile_function!();
        let controllers = self.controller_locations();
        let Some(locomotion) = self.locomotion.as_mut() else {
            return;
        };
        locomotion.update(dt, &controllers);
        let rig = locomotion.rig_transform();
        for (_, hand) in self.world.query_mut::<&mut HandController>() {
            let tracked = hand.tracked;
            hand.set_controller(&rig, tracked);
        }
    }

    fn update_hands(&mut self, dt: f32) {
        puffin::profile_function!();

        // Second snap hands are placed by their constraint instead
        let driven: Vec<Entity> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.kind == ConstraintKind::SecondHand)
            .map(|(_, c)| c.hand)
            .collect();

        for hand in self.hands() {
            let held_weight = self.held_weight(hand);
            if let Ok(mut controller) = self.world.get::<&mut HandController>(hand) {
                if !driven.contains(&hand) {
                    controller.follow_controller(
                        dt,
                        held_weight,
                        HAND_FOLLOW_SPEED,
                        HELD_WEIGHT_FOLLOW_FACTOR,
                        BLEND_WEIGHT_RECOVERY_RATE,
                    );
                }
            }
            self.update_hover(hand);
        }
    }

    fn held_weight(&self, hand: Entity) -> f32 {
        let Some(object) = self.hand(hand).and_then(|h| h.grabbed_object()) else {
            return 0.0;
        };
        let (Some(body), Some(interactable)) = (self.body(object), self.interactable(object)) else {
            return 0.0;
        };
        interactable.as_interaction().weight(&body)
    }

    /// Two-handed rotation, then rigid attachments follow their grip sockets
    fn update_held_objects(&mut self, dt: f32) {
        puffin::profile_function!();

        let sockets: HashMap<Entity, (Transform, Transform)> = self
            .world
            .query::<&HandController>()
            .iter()
            .map(|(e, h)| (e, (h.grip_socket_world(), h.controller_grip_world())))
            .collect();

        let rate = (TWO_HAND_ROTATION_RATE * dt).min(1.0);
        for (_, (body, interactable)) in self.world.query_mut::<(&mut Body, &mut Interactable)>() {
            let Some(attachment) = body.attachment else {
                continue;
            };
            let Some((socket, _)) = sockets.get(&attachment.hand).copied() else {
                continue;
            };
            let mut relative = attachment.relative;

            if let Some(grabbable) = interactable.grabbable_mut() {
                let hands = grabbable
                    .main_grab_point_hand()
                    .zip(grabbable.secondary_grab_point_hand());
                if let Some((main, secondary)) = hands {
                    let grips = sockets.get(&main).zip(sockets.get(&secondary));
                    if let Some(((_, main_grip), (_, secondary_grip))) = grips {
                        let direction = (secondary_grip.translation - main_grip.translation).normalize_or_zero();
                        if direction != Vec3::ZERO {
                            if let Some(previous) = grabbable.swap_two_hand_sample(direction) {
                                let step = Quat::IDENTITY.slerp(Quat::from_rotation_arc(previous, direction), rate);
                                let mut world = socket.mul(&relative);
                                world.rotation = (step * world.rotation).normalize();
                                world.translation = socket.translation + step * (world.translation - socket.translation);
                                relative = world.relative_to(&socket);
                            }
                        }
                    }
                }
            }

            body.attachment = Some(Attachment {
                hand: attachment.hand,
                relative,
            });
            body.transform = socket.mul(&relative);
        }
    }

    /// Ease every drive constraint's driven side toward its target
    fn solve_constraints(&mut self, dt: f32) {
        puffin::profile_function!();
        let constraints: Vec<_> = self.constraints.iter().map(|(_, c)| c.clone()).collect();
        for constraint in constraints {
            let alpha = constraint.drive.alpha(dt);
            match constraint.kind {
                ConstraintKind::HandGrab => {
                    let Some(mesh) = self.hand(constraint.hand).map(|h| h.mesh.transform) else {
                        continue;
                    };
                    let target = mesh
                        .mul(&constraint.hand_frame)
                        .mul(&constraint.body_frame.inverse());
                    if let Ok(mut body) = self.world.get::<&mut Body>(constraint.body) {
                        if body.attachment.is_none() {
                            body.transform.lerp_toward(&target, alpha);
                        }
                    }
                }
                ConstraintKind::SecondHand => {
                    let Some(body) = self.body(constraint.body).map(|b| b.transform) else {
                        continue;
                    };
                    let target = body
                        .mul(&constraint.body_frame)
                        .mul(&constraint.hand_frame.inverse());
                    if let Ok(mut hand) = self.world.get::<&mut HandController>(constraint.hand) {
                        hand.mesh.transform.lerp_toward(&target, alpha);
                    }
                }
            }
        }
    }

    fn update_day_night(&mut self, dt: f32) {
        let Some(day_night) = self.day_night.as_mut() else {
            return;
        };
        day_night.advance(dt);
        if let Some(phase) = day_night.poll_transition() {
            let hour = day_night.current_hour();
            tracing::info!(?phase, hour, "day/night transition");
            self.events.push(match phase {
                DayPhase::Day => SessionEvent::DayStarted { hour },
                DayPhase::Night => SessionEvent::NightStarted { hour },
            });
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

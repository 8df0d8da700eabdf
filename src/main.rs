use grip_survival::constants::FIREPLACE_REQUIRED_LOGS;
use grip_survival::prelude::*;

use glam::{Quat, Vec3};
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Simulation step of the headless demo (90 Hz headset)
const FRAME_DT: f32 = 1.0 / 90.0;
/// Frames spent easing a hand onto a new target
const SETTLE_FRAMES: usize = 30;
/// Largest controller jitter per frame (cm)
const CONTROLLER_JITTER: f32 = 0.4;
const PROFILER_ENV_VAR: &str = "GRIP_PUFFIN";
const FIREPLACE_AT: Vec3 = Vec3::new(60.0, -150.0, 20.0);
const LOG_PILE: Vec3 = Vec3::new(60.0, -90.0, 40.0);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let _profiler = if std::env::var(PROFILER_ENV_VAR).is_ok_and(|v| v == "1") {
        puffin::set_scopes_on(true);
        let addr = format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT);
        info!(%addr, "puffin server listening");
        Some(puffin_http::Server::new(&addr)?)
    } else {
        None
    };

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading session config");
            SessionConfig::load(&path)?
        }
        None => SessionConfig::default(),
    };

    let mut demo = Demo::new(config);
    demo.run();
    demo.summary();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Scripted two-hand session driven without a headset
struct Demo {
    session: Session,
    rng: StdRng,
    left: Entity,
    right: Entity,
    rifle: Entity,
    wall: Entity,
    bed: Entity,
    fireplace: Entity,
    event_counts: BTreeMap<&'static str, usize>,
}

impl Demo {
    fn new(config: SessionConfig) -> Self {
        let mut session = Session::new(config);
        let left = session.spawn_hand(HandSide::Left);
        let right = session.spawn_hand(HandSide::Right);

        let rifle = session.spawn_grabbable(
            Body::new(
                Transform::from_translation(Vec3::new(100.0, 0.0, 100.0)),
                CollisionShape::Box {
                    half_extents: Vec3::new(30.0, 3.0, 5.0),
                },
                3.5,
            ),
            GrabbableObject::new(GrabPointBehavior::DualHanded).with_grab_points(
                Transform::from_translation(Vec3::new(-10.0, 0.0, 0.0)),
                Transform::from_translation(Vec3::new(20.0, 0.0, 0.0)),
            ),
        );

        let wall = session.spawn_climbable(
            Body::new(
                Transform::from_translation(Vec3::new(0.0, 200.0, 150.0)),
                CollisionShape::Box {
                    half_extents: Vec3::new(100.0, 10.0, 150.0),
                },
                0.0,
            ),
            ClimbableObject::new(ClimbType::Surface),
        );

        let bed = session.spawn_bed(
            Body::new(
                Transform::from_translation(Vec3::new(-150.0, 0.0, 40.0)),
                CollisionShape::Box {
                    half_extents: Vec3::new(100.0, 50.0, 20.0),
                },
                40.0,
            ),
            Bed::new(),
        );

        session.add_heat_zone(HeatZone::fire(
            Vec3::new(-150.0, -200.0, 0.0),
            150.0,
            Vec3::splat(400.0),
        ));
        let fireplace = session.spawn_fireplace(Fireplace::new(FIREPLACE_AT));

        Self {
            session,
            rng: StdRng::seed_from_u64(7),
            left,
            right,
            rifle,
            wall,
            bed,
            fireplace,
            event_counts: BTreeMap::new(),
        }
    }

    fn run(&mut self) {
        info!("picking up the rifle with both hands");
        self.reach(self.right, Vec3::new(90.0, 0.0, 100.0));
        self.grab(self.right);
        self.reach(self.left, Vec3::new(120.0, 0.0, 100.0));
        self.grab(self.left);
        info!(state = ?self.session.grab_state(self.rifle), "rifle held");

        // Swing the support hand up; the rifle follows the two-hand axis
        for frame in 0..SETTLE_FRAMES * 2 {
            let lift = frame as f32 * 0.3;
            self.jitter_toward(self.left, Vec3::new(120.0, 0.0, 100.0 + lift));
            self.jitter_toward(self.right, Vec3::new(90.0, 0.0, 100.0));
            self.step();
        }

        self.release(self.right);
        info!(state = ?self.session.grab_state(self.rifle), "main hand let go");
        self.release(self.left);

        info!("climbing the wall");
        self.reach(self.right, Vec3::new(0.0, 185.0, 160.0));
        self.grab(self.right);
        for _ in 0..SETTLE_FRAMES {
            self.jitter_toward(self.right, Vec3::new(0.0, 185.0, 140.0));
            self.step();
        }
        info!(rig = ?self.session.rig_transform().translation, "pulled up");
        self.release(self.right);

        info!("waiting for night");
        if let Some(day_night) = self.session.day_night_mut() {
            day_night.set_current_hour(21.0);
        }
        self.step();
        self.reach(self.left, Vec3::new(-150.0, 0.0, 65.0));
        self.grab(self.left);
        let fade = Bed::new().fade_duration;
        for _ in 0..((fade / FRAME_DT) as usize + 2) {
            self.step();
        }

        info!("drinking from a pooled bottle");
        let bottle = self.session.consumable_from_pool(ConsumableKind::Drink, Vec3::new(40.0, 0.0, 100.0));
        // Tip it over before the grab so the hold keeps the pour angle
        if let Ok(mut body) = self.session.world.get::<&mut Body>(bottle) {
            body.transform.rotation = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        }
        self.reach(self.right, Vec3::new(40.0, 0.0, 100.0));
        self.grab(self.right);
        if let Some(mouth) = self.session.mouth_location() {
            for _ in 0..SETTLE_FRAMES {
                self.jitter_toward(self.right, mouth - Vec3::X * 8.0);
                self.step();
            }
        }
        self.release(self.right);
        self.session.safe_destroy(bottle);
        self.step();
        self.step();

        info!("building the fire");
        for _ in 0..FIREPLACE_REQUIRED_LOGS {
            let log = self.session.spawn_wood_log(Body::new(
                Transform::from_translation(LOG_PILE),
                CollisionShape::Box {
                    half_extents: Vec3::new(20.0, 5.0, 5.0),
                },
                2.0,
            ));
            self.reach(self.left, LOG_PILE);
            self.grab(self.left);
            self.reach(self.left, FIREPLACE_AT + Vec3::Z * 20.0);
            self.release(self.left);
            debug!(?log, alive = self.session.is_alive(log), "log dropped");
        }
        info!(
            burning = self.session.fireplace(self.fireplace).map(|f| f.is_burning()),
            "fireplace"
        );
        self.step();
    }

    /// Move a controller so the hand's grab origin lands on `target`, then let
    /// the mesh catch up
    fn reach(&mut self, hand: Entity, target: Vec3) {
        let Some(offset) = self.session.hand(hand).map(|h| h.origin_offset) else {
            return;
        };
        let rig = self.session.rig_transform();
        let tracked = Transform::from_translation(rig.inverse_transform_point(target) - offset);
        self.session.set_controller_transform(hand, tracked);
        for _ in 0..SETTLE_FRAMES {
            self.step();
        }
    }

    fn jitter_toward(&mut self, hand: Entity, target: Vec3) {
        let Some(offset) = self.session.hand(hand).map(|h| h.origin_offset) else {
            return;
        };
        let jitter = Vec3::new(
            self.rng.gen_range(-CONTROLLER_JITTER..CONTROLLER_JITTER),
            self.rng.gen_range(-CONTROLLER_JITTER..CONTROLLER_JITTER),
            self.rng.gen_range(-CONTROLLER_JITTER..CONTROLLER_JITTER),
        );
        let rig = self.session.rig_transform();
        let tracked = Transform::from_translation(rig.inverse_transform_point(target) - offset + jitter);
        self.session.set_controller_transform(hand, tracked);
    }

    fn grab(&mut self, hand: Entity) {
        if !self.session.grab_object(hand) {
            let hovered = self.session.hand(hand).and_then(|h| h.hovered());
            warn!(?hand, ?hovered, "grab did not take");
        }
        self.collect_events();
    }

    fn release(&mut self, hand: Entity) {
        self.session.release_object(hand);
        self.collect_events();
    }

    fn step(&mut self) {
        puffin::GlobalProfiler::lock().new_frame();
        self.session.tick(FRAME_DT);
        self.collect_events();
    }

    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            let name = match event {
                SessionEvent::HoverChanged { .. } => "hover_changed",
                SessionEvent::GrabStarted { .. } => "grab_started",
                SessionEvent::GrabRejected { .. } => "grab_rejected",
                SessionEvent::Released { .. } => "released",
                SessionEvent::HandEvicted { .. } => "hand_evicted",
                SessionEvent::AutoReleased { .. } => "auto_released",
                SessionEvent::ClimbStarted { .. } => "climb_started",
                SessionEvent::ClimbStopped { .. } => "climb_stopped",
                SessionEvent::StaminaDepleted => "stamina_depleted",
                SessionEvent::DayStarted { .. } => "day_started",
                SessionEvent::NightStarted { .. } => "night_started",
                SessionEvent::SleepStarted { .. } => "sleep_started",
                SessionEvent::SleepCompleted { .. } => "sleep_completed",
                SessionEvent::SleepFailed { reason, .. } => {
                    warn!(reason = reason.message(), "sleep failed");
                    "sleep_failed"
                }
                SessionEvent::Consumed { .. } => "consumed",
                SessionEvent::DrinkEmpty { .. } => "drink_empty",
                SessionEvent::LogPlaced { .. } => "log_placed",
                SessionEvent::FireComplete { .. } => "fire_complete",
                SessionEvent::ObjectDestroyed { .. } => "object_destroyed",
            };
            *self.event_counts.entry(name).or_default() += 1;
        }
    }

    fn summary(&self) {
        info!(
            time = self.session.clock.time,
            wall_grabbed = self
                .session
                .interactable(self.wall)
                .and_then(|i| i.climbable().map(|c| c.is_grabbed())),
            bed = ?self.bed,
            "session finished"
        );
        if let Some(survival) = self.session.survival() {
            info!(
                hunger = survival.hunger(),
                thirst = survival.thirst(),
                temperature = survival.temperature(),
                stamina = survival.stamina(),
                "survival"
            );
        }
        if let Some(day_night) = self.session.day_night() {
            info!(hour = day_night.current_hour(), night = day_night.is_night(), "time of day");
        }
        for (name, count) in &self.event_counts {
            info!(event = name, count, "events");
        }
    }
}

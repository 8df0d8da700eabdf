use grip_survival::constants::{
    INTENSE_HEAT_RECOVERY_RATE, MAX_STAMINA, PHYSICS_BLEND_WEIGHT, SHELTERED_HEAT_RECOVERY_RATE,
};
use grip_survival::prelude::*;

use glam::{Quat, Vec3};
use hecs::Entity;

const RIFLE_AT: Vec3 = Vec3::new(100.0, 0.0, 100.0);
const MAIN_OFFSET: Vec3 = Vec3::new(-10.0, 0.0, 0.0);
const SECONDARY_OFFSET: Vec3 = Vec3::new(20.0, 0.0, 0.0);
/// Above the rifle, out of snap range of both points
const FREE_OFFSET: Vec3 = Vec3::new(5.0, 0.0, 12.0);
const MOUTH: Vec3 = Vec3::new(0.0, 0.0, 160.0);

fn spawn_rifle(session: &mut Session, behavior: GrabPointBehavior) -> Entity {
    session.spawn_grabbable(
        Body::new(
            Transform::from_translation(RIFLE_AT),
            CollisionShape::Box {
                half_extents: Vec3::new(30.0, 3.0, 5.0),
            },
            3.5,
        ),
        GrabbableObject::new(behavior).with_grab_points(
            Transform::from_translation(MAIN_OFFSET),
            Transform::from_translation(SECONDARY_OFFSET),
        ),
    )
}

/// Put the hand's grab origin on `origin` with the mesh already there, then
/// refresh hover
fn place(session: &mut Session, hand: Entity, origin: Vec3) {
    let offset = session.hand(hand).unwrap().origin_offset;
    let rig = session.rig_transform();
    let tracked = Transform::from_translation(rig.inverse_transform_point(origin) - offset);
    session.set_controller_transform(hand, tracked);
    let controller = session.hand(hand).unwrap().controller;
    session.set_hand_mesh_transform(hand, controller);
    session.tick(0.0);
}

/// Move only the controller, leaving the mesh where it is
fn move_controller(session: &mut Session, hand: Entity, delta: Vec3) {
    let mut tracked = session.hand(hand).unwrap().tracked;
    tracked.translation += delta;
    session.set_controller_transform(hand, tracked);
}

fn point_world(session: &Session, object: Entity, local: Vec3) -> Vec3 {
    session.body(object).unwrap().transform.transform_point(local)
}

fn holder(session: &Session, object: Entity) -> Option<Entity> {
    session.body(object).unwrap().attachment.map(|a| a.hand)
}

fn count(events: &[SessionEvent], pred: impl Fn(&SessionEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

fn two_hand_session() -> (Session, Entity, Entity) {
    let mut session = Session::new(SessionConfig::default());
    let left = session.spawn_hand(HandSide::Left);
    let right = session.spawn_hand(HandSide::Right);
    (session, left, right)
}

#[test]
fn test_main_only_snap_puts_grab_point_on_socket() {
    let (mut session, _, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::MainOnly);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert_eq!(session.hand(right).unwrap().hovered(), Some(rifle));
    let indicator = session.hand(right).unwrap().indicator().unwrap();
    assert_eq!(indicator.point, GrabPointType::Main);

    session.drain_events();
    assert!(session.grab_object(right));
    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));

    let hand = session.hand(right).unwrap();
    let record = hand.grabbed().unwrap();
    assert!(record.snapped);
    assert_eq!(record.point, GrabPointType::Main);
    assert_eq!(hand.grab_constraint(), None);
    assert!(hand.is_monitoring_distance());
    let grip = hand.grip_socket_world().translation;
    drop(hand);

    assert_eq!(holder(&session, rifle), Some(right));
    assert!(point_world(&session, rifle, MAIN_OFFSET).abs_diff_eq(grip, 1e-3));
    assert!(session.constraints.is_empty());

    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SessionEvent::GrabStarted {
                snapped: true,
                point: GrabPointType::Main,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_force_switch_never_passes_through_not_grabbed() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::MainOnly);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    session.drain_events();

    let main = point_world(&session, rifle, MAIN_OFFSET);
    place(&mut session, left, main);
    assert!(session.grab_object(left));

    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));
    assert_eq!(holder(&session, rifle), Some(left));
    assert!(!session.hand(right).unwrap().is_holding());
    // A full release would have turned physics back on
    assert!(!session.body(rifle).unwrap().simulate_physics);

    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SessionEvent::HandEvicted { evicted, by, point: GrabPointType::Main, .. }
                if *evicted == right && *by == left
        )),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(e, SessionEvent::Released { hand, .. } if *hand == right)),
        1
    );
}

#[test]
fn test_snap_evicts_free_grabbers() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + FREE_OFFSET);
    assert!(session.hand(right).unwrap().indicator().is_none());
    assert!(session.body(rifle).unwrap().outlined);
    assert!(session.grab_object(right));
    assert_eq!(session.grab_state(rifle), Some(GrabState::FreeGrab));
    assert!(session.hand(right).unwrap().grab_constraint().is_some());
    assert_eq!(session.constraints.len(), 1);

    place(&mut session, left, RIFLE_AT + SECONDARY_OFFSET);
    assert!(session.grab_object(left));

    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));
    assert!(!session.hand(right).unwrap().is_holding());
    assert!(session.constraints.is_empty());
    assert_eq!(holder(&session, rifle), Some(left));
    let interactable = session.interactable(rifle).unwrap();
    let grabbable = interactable.grabbable().unwrap();
    assert!(grabbable.free_hands().is_empty());
    assert_eq!(grabbable.secondary_grab_point_hand(), Some(left));
}

#[test]
fn test_free_grab_rejected_while_snap_grabbed() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    session.drain_events();

    let above = point_world(&session, rifle, FREE_OFFSET);
    place(&mut session, left, above);
    assert_eq!(session.hand(left).unwrap().hovered(), Some(rifle));
    assert!(!session.grab_object(left));

    assert!(!session.hand(left).unwrap().is_holding());
    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));
    assert_eq!(holder(&session, rifle), Some(right));
    assert!(session.constraints.is_empty());
    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, SessionEvent::GrabRejected { hand, .. } if *hand == left)),
        1
    );
}

#[test]
fn test_direct_unified_grab_checks_acceptance_before_evicting() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    let secondary = point_world(&session, rifle, SECONDARY_OFFSET);
    place(&mut session, left, secondary);
    assert!(session.grab_object(left));
    session.drain_events();

    // The main hand asking for the secondary point it does not own
    assert!(!session.on_unified_grab(rifle, right, false, true, GrabPointType::Secondary));

    assert!(session.hand(left).unwrap().is_holding());
    assert_eq!(session.constraints.len(), 1);
    {
        let interactable = session.interactable(rifle).unwrap();
        let grabbable = interactable.grabbable().unwrap();
        assert_eq!(grabbable.main_grab_point_hand(), Some(right));
        assert_eq!(grabbable.secondary_grab_point_hand(), Some(left));
    }
    let events = session.drain_events();
    assert_eq!(count(&events, |e| matches!(e, SessionEvent::HandEvicted { .. })), 0);
    assert_eq!(
        count(&events, |e| *e == SessionEvent::GrabRejected { hand: right, object: rifle }),
        1
    );
}

#[test]
fn test_unified_grab_by_despawned_hand_evicts_nobody() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::MainOnly);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    session.world.despawn(left).unwrap();
    session.drain_events();

    assert!(!session.on_unified_grab(rifle, left, true, true, GrabPointType::Main));
    assert_eq!(holder(&session, rifle), Some(right));
    assert!(session.hand(right).unwrap().is_holding());
    let events = session.drain_events();
    assert_eq!(count(&events, |e| matches!(e, SessionEvent::HandEvicted { .. })), 0);
}

#[test]
fn test_releasing_attach_parent_hands_off_and_stays_snapped() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    let secondary = point_world(&session, rifle, SECONDARY_OFFSET);
    place(&mut session, left, secondary);
    assert!(session.grab_object(left));

    assert_eq!(session.constraints.len(), 1);
    let (_, constraint) = session.constraints.iter().next().unwrap();
    assert_eq!(constraint.kind, ConstraintKind::SecondHand);
    assert_eq!(constraint.hand, left);
    assert!(session
        .interactable(rifle)
        .unwrap()
        .grabbable()
        .unwrap()
        .is_two_handed());

    let before = session.body(rifle).unwrap().transform;
    assert!(session.release_object(right));

    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));
    assert_eq!(holder(&session, rifle), Some(left));
    assert!(session.constraints.is_empty());
    let after = session.body(rifle).unwrap().transform;
    assert!(after.translation.abs_diff_eq(before.translation, 1e-3));
    {
        let interactable = session.interactable(rifle).unwrap();
        let grabbable = interactable.grabbable().unwrap();
        assert_eq!(grabbable.main_grab_point_hand(), None);
        assert_eq!(grabbable.secondary_grab_point_hand(), Some(left));
        assert!(grabbable.is_main_grab_point_available());
    }

    assert!(session.release_object(left));
    assert_eq!(session.grab_state(rifle), Some(GrabState::NotGrabbed));
    let body = session.body(rifle).unwrap();
    assert!(body.attachment.is_none());
    assert!(body.simulate_physics);
}

#[test]
fn test_distance_auto_release_fires_once_and_drops_constraint() {
    let (mut session, _, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + FREE_OFFSET);
    assert!(session.grab_object(right));
    assert_eq!(session.constraints.len(), 1);
    session.drain_events();

    move_controller(&mut session, right, Vec3::X * 200.0);
    session.tick(0.15);
    session.tick(1.0);

    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, SessionEvent::AutoReleased { hand, .. } if *hand == right)),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(e, SessionEvent::Released { .. })),
        1
    );
    let hand = session.hand(right).unwrap();
    assert!(!hand.is_holding());
    assert!(!hand.is_monitoring_distance());
    assert!(hand.grab_constraint().is_none());
    drop(hand);
    assert!(session.constraints.is_empty());
    assert_eq!(session.grab_state(rifle), Some(GrabState::NotGrabbed));
}

#[test]
fn test_shared_object_doubles_release_threshold() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    let secondary = point_world(&session, rifle, SECONDARY_OFFSET);
    place(&mut session, left, secondary);
    assert!(session.grab_object(left));

    // Past the single-hand threshold but inside the doubled one
    move_controller(&mut session, left, Vec3::X * 45.0);
    session.tick(0.15);
    assert!(session.hand(left).unwrap().is_holding());

    move_controller(&mut session, left, Vec3::X * 30.0);
    session.tick(0.15);
    assert!(!session.hand(left).unwrap().is_holding());
    assert!(session.hand(right).unwrap().is_holding());
    assert_eq!(session.grab_state(rifle), Some(GrabState::SnapGrab));
}

#[test]
fn test_release_is_idempotent() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);
    session.drain_events();

    assert!(!session.release_object(right));
    assert!(!session.on_release(rifle, left));
    assert!(session.drain_events().is_empty());

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    assert!(session.release_object(right));
    assert!(!session.release_object(right));
    assert_eq!(session.grab_state(rifle), Some(GrabState::NotGrabbed));
}

#[test]
fn test_fingers_trace_on_grab_and_reset_on_release() {
    let (mut session, _, right) = two_hand_session();
    spawn_rifle(&mut session, GrabPointBehavior::MainOnly);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    let curls = session.hand(right).unwrap().finger_curls();
    assert!(curls.values().iter().all(|c| (0.0..=1.0).contains(c)));

    session.release_object(right);
    assert_eq!(session.hand(right).unwrap().finger_curls(), FingerCurls::REST);
}

fn spawn_wall(session: &mut Session) -> Entity {
    session.spawn_climbable(
        Body::new(
            Transform::from_translation(Vec3::new(0.0, 200.0, 150.0)),
            CollisionShape::Box {
                half_extents: Vec3::new(100.0, 10.0, 150.0),
            },
            0.0,
        ),
        ClimbableObject::new(ClimbType::Surface),
    )
}

const HOLD: Vec3 = Vec3::new(0.0, 185.0, 160.0);

#[test]
fn test_climbing_moves_the_rig_and_release_reattaches_mesh() {
    let (mut session, _, right) = two_hand_session();
    let wall = spawn_wall(&mut session);

    place(&mut session, right, HOLD);
    assert!(session.body(wall).unwrap().outlined);
    assert!(session.grab_object(right));

    assert_eq!(session.hand(right).unwrap().state(), HandState::HoldingClimbable);
    assert!(!session.hand(right).unwrap().mesh.attached);
    assert!(session.locomotion().unwrap().is_climbing());
    assert!(session.survival().unwrap().is_climbing());

    move_controller(&mut session, right, Vec3::Z * -20.0);
    session.tick(0.0);
    assert!((session.rig_transform().translation.z - 20.0).abs() < 1e-3);

    session.drain_events();
    assert!(session.release_object(right));
    let hand = session.hand(right).unwrap();
    assert!(hand.mesh.attached);
    assert_eq!(hand.mesh.blend_weight, PHYSICS_BLEND_WEIGHT);
    drop(hand);
    assert!(!session.locomotion().unwrap().is_climbing());
    assert!(!session.survival().unwrap().is_climbing());
    assert!(!session
        .interactable(wall)
        .unwrap()
        .climbable()
        .unwrap()
        .is_grabbed());

    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, SessionEvent::ClimbStopped { hand } if *hand == right)),
        1
    );
}

#[test]
fn test_climbing_refused_when_exhausted() {
    let (mut session, _, right) = two_hand_session();
    let wall = spawn_wall(&mut session);
    session.survival_mut().unwrap().set_stamina(5.0);

    place(&mut session, right, HOLD);
    assert!(!session.grab_object(right));

    assert!(!session.hand(right).unwrap().is_holding());
    assert!(session.hand(right).unwrap().mesh.attached);
    assert!(!session.locomotion().unwrap().is_climbing());
    assert!(!session
        .interactable(wall)
        .unwrap()
        .climbable()
        .unwrap()
        .is_grabbed());
}

#[test]
fn test_stamina_depletion_drops_climbing_hands() {
    let (mut session, _, right) = two_hand_session();
    spawn_wall(&mut session);

    place(&mut session, right, HOLD);
    assert!(session.grab_object(right));
    session.survival_mut().unwrap().set_stamina(5.5);
    session.drain_events();

    session.tick(1.0);

    let events = session.drain_events();
    assert_eq!(count(&events, |e| *e == SessionEvent::StaminaDepleted), 1);
    assert!(!session.hand(right).unwrap().is_holding());
    assert!(!session.locomotion().unwrap().is_climbing());
}

fn spawn_bed(session: &mut Session) -> Entity {
    session.spawn_bed(
        Body::new(
            Transform::from_translation(Vec3::new(-150.0, 0.0, 40.0)),
            CollisionShape::Box {
                half_extents: Vec3::new(100.0, 50.0, 20.0),
            },
            40.0,
        ),
        Bed::new(),
    )
}

fn bed_in_use(session: &Session, bed: Entity) -> bool {
    match &*session.interactable(bed).unwrap() {
        Interactable::Bed(b) => b.is_in_use(),
        _ => false,
    }
}

const PILLOW: Vec3 = Vec3::new(-150.0, 0.0, 65.0);

#[test]
fn test_bed_refuses_during_the_day() {
    let (mut session, left, _) = two_hand_session();
    let bed = spawn_bed(&mut session);
    place(&mut session, left, PILLOW);
    session.drain_events();

    assert!(!session.grab_object(left));
    assert!(!session.hand(left).unwrap().is_holding());
    assert!(!bed_in_use(&session, bed));
    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SessionEvent::SleepFailed {
                reason: SleepFailure::NotNight,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_bed_without_time_system() {
    let (mut session, left, _) = two_hand_session();
    let bed = spawn_bed(&mut session);
    session.set_day_night(None);
    place(&mut session, left, PILLOW);
    session.drain_events();

    assert!(!session.grab_object(left));
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::SleepFailed {
        bed,
        reason: SleepFailure::NoTimeSystem,
    }));
}

#[test]
fn test_sleeping_skips_to_morning_and_restores() {
    let (mut session, left, _) = two_hand_session();
    let bed = spawn_bed(&mut session);
    session.day_night_mut().unwrap().set_current_hour(21.0);
    session.survival_mut().unwrap().set_stamina(20.0);
    let cold = session.survival().unwrap().temperature();
    place(&mut session, left, PILLOW);
    session.drain_events();

    assert!(!session.grab_object(left));
    assert!(!session.hand(left).unwrap().is_holding());
    assert!(bed_in_use(&session, bed));

    // Half the fade: morning
    session.tick(2.6);
    assert!(session.day_night().unwrap().is_day());
    assert_eq!(session.survival().unwrap().stamina(), MAX_STAMINA);
    assert!(session.survival().unwrap().temperature() > cold);
    assert!(bed_in_use(&session, bed));

    session.tick(2.6);
    assert!(!bed_in_use(&session, bed));
    let events = session.drain_events();
    assert_eq!(count(&events, |e| *e == SessionEvent::SleepStarted { bed }), 1);
    assert_eq!(count(&events, |e| *e == SessionEvent::SleepCompleted { bed }), 1);
}

#[test]
fn test_food_is_eaten_and_pooled() {
    let mut session = Session::new(SessionConfig::default());
    let food = session.consumable_from_pool(ConsumableKind::Food, Vec3::new(0.0, -100.0, 100.0));
    session.survival_mut().unwrap().set_hunger(50.0);

    assert!(session.consume(food));
    assert_eq!(session.survival().unwrap().hunger(), 75.0);
    assert!(session.body(food).unwrap().hidden);
    assert!(!session.consume(food));

    let again = session.consumable_from_pool(ConsumableKind::Food, Vec3::new(10.0, -100.0, 100.0));
    assert_eq!(again, food);
    let body = session.body(food).unwrap();
    assert!(!body.hidden);
    assert_eq!(body.transform.translation, Vec3::new(10.0, -100.0, 100.0));
    drop(body);
    assert!(session
        .interactable(food)
        .unwrap()
        .consumable()
        .unwrap()
        .is_active());

    let drink = session.consumable_from_pool(ConsumableKind::Drink, Vec3::ZERO);
    assert_ne!(drink, food);
}

fn water(session: &Session, drink: Entity) -> f32 {
    session
        .interactable(drink)
        .unwrap()
        .consumable()
        .unwrap()
        .water()
        .unwrap()
}

#[test]
fn test_drinking_at_the_mouth_repeats_until_empty() {
    let (mut session, _, right) = two_hand_session();
    assert_eq!(session.mouth_location(), Some(MOUTH));
    let drink = session.consumable_from_pool(ConsumableKind::Drink, MOUTH);
    session.world.get::<&mut Body>(drink).unwrap().transform.rotation =
        Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    session.survival_mut().unwrap().set_thirst(10.0);

    // The tick inside `place` already sees nothing held
    place(&mut session, right, MOUTH);
    assert!(session.grab_object(right));
    session.tick(0.0);
    assert_eq!(water(&session, drink), 90.0);
    assert!(session.survival().unwrap().thirst() > 10.0);

    session.tick(1.0);
    assert_eq!(water(&session, drink), 80.0);

    for _ in 0..10 {
        session.tick(1.0);
    }
    assert_eq!(water(&session, drink), 0.0);
    let events = session.drain_events();
    assert_eq!(count(&events, |e| *e == SessionEvent::DrinkEmpty { object: drink }), 1);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            SessionEvent::Consumed {
                kind: ConsumableKind::Drink,
                ..
            }
        )),
        10
    );
}

#[test]
fn test_upright_bottle_does_not_pour() {
    let (mut session, _, right) = two_hand_session();
    let drink = session.consumable_from_pool(ConsumableKind::Drink, MOUTH);
    session.survival_mut().unwrap().set_thirst(10.0);

    place(&mut session, right, MOUTH);
    assert!(session.grab_object(right));
    session.tick(0.0);
    assert_eq!(water(&session, drink), 100.0);
    assert!(!session.consume(drink));
}

#[test]
fn test_safe_destroy_releases_everything_then_despawns() {
    let (mut session, left, right) = two_hand_session();
    let rifle = spawn_rifle(&mut session, GrabPointBehavior::DualHanded);

    place(&mut session, right, RIFLE_AT + MAIN_OFFSET);
    assert!(session.grab_object(right));
    let secondary = point_world(&session, rifle, SECONDARY_OFFSET);
    place(&mut session, left, secondary);
    assert!(session.grab_object(left));
    session.drain_events();

    assert!(session.safe_destroy(rifle));
    assert!(!session.safe_destroy(rifle));
    assert!(!session.is_alive(rifle));
    assert!(!session.hand(left).unwrap().is_holding());
    assert!(!session.hand(right).unwrap().is_holding());
    assert!(session.constraints.is_empty());
    assert_eq!(session.body(rifle).unwrap().collision, CollisionMode::NoCollision);

    session.tick(0.1);
    assert!(!session.world.contains(rifle));
    assert!(session.hand(right).unwrap().hovered().is_none());
    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| *e == SessionEvent::ObjectDestroyed { object: rifle }),
        1
    );
    assert_eq!(count(&events, |e| matches!(e, SessionEvent::Released { .. })), 2);
}

/// Close enough to the head that a lit fire warms it
const FIRE_AT: Vec3 = Vec3::new(0.0, -100.0, 120.0);
const ABOVE_FIRE: Vec3 = Vec3::new(0.0, -100.0, 160.0);

fn spawn_log(session: &mut Session, at: Vec3) -> Entity {
    session.spawn_wood_log(Body::new(
        Transform::from_translation(at),
        CollisionShape::Box {
            half_extents: Vec3::new(20.0, 5.0, 5.0),
        },
        2.0,
    ))
}

/// Pick a log up where it lies and let go of it there
fn drop_log(session: &mut Session, hand: Entity, log: Entity) {
    let at = session.body(log).unwrap().transform.translation;
    place(session, hand, at);
    assert_eq!(session.hand(hand).unwrap().hovered(), Some(log));
    assert!(session.grab_object(hand));
    assert_eq!(session.grab_state(log), Some(GrabState::FreeGrab));
    assert!(session.release_object(hand));
}

#[test]
fn test_log_dropped_at_fireplace_fills_a_slot() {
    let (mut session, _, right) = two_hand_session();
    let fireplace = session.spawn_fireplace(Fireplace::new(FIRE_AT));

    let far = spawn_log(&mut session, FIRE_AT + Vec3::X * 300.0);
    drop_log(&mut session, right, far);
    assert!(session.is_alive(far));
    assert_eq!(session.fireplace(fireplace).unwrap().placed_logs(), 0);

    let log = spawn_log(&mut session, ABOVE_FIRE);
    session.drain_events();
    drop_log(&mut session, right, log);

    assert!(!session.is_alive(log));
    let fire = session.fireplace(fireplace).unwrap();
    assert_eq!(fire.placed_logs(), 1);
    assert!(fire.is_slot_filled(0));
    assert!(!fire.is_burning());
    drop(fire);
    let events = session.drain_events();
    assert_eq!(
        count(&events, |e| *e == SessionEvent::LogPlaced { fireplace, log, slot: 0 }),
        1
    );
    assert_eq!(count(&events, |e| matches!(e, SessionEvent::FireComplete { .. })), 0);

    session.tick(0.1);
    assert!(!session.world.contains(log));
}

#[test]
fn test_last_log_lights_the_fire() {
    let (mut session, left, right) = two_hand_session();
    let fireplace = session.spawn_fireplace(Fireplace::new(FIRE_AT));
    session.drain_events();

    for hand in [right, left] {
        let log = spawn_log(&mut session, ABOVE_FIRE);
        drop_log(&mut session, hand, log);
    }
    assert!(!session.fireplace(fireplace).unwrap().is_burning());

    // Unlit: the fireplace only shelters
    let before = session.survival().unwrap().temperature();
    session.tick(1.0);
    let sheltered = session.survival().unwrap().temperature();
    assert!((sheltered - before - SHELTERED_HEAT_RECOVERY_RATE).abs() < 1e-4);

    let last = spawn_log(&mut session, ABOVE_FIRE);
    drop_log(&mut session, right, last);
    assert!(session.fireplace(fireplace).unwrap().is_complete());
    assert!(session.fireplace(fireplace).unwrap().is_burning());

    session.tick(1.0);
    let lit = session.survival().unwrap().temperature();
    assert!((lit - sheltered - INTENSE_HEAT_RECOVERY_RATE).abs() < 1e-4);

    // A complete fireplace takes no more logs
    let spare = spawn_log(&mut session, ABOVE_FIRE);
    drop_log(&mut session, right, spare);
    assert!(session.is_alive(spare));

    let events = session.drain_events();
    assert_eq!(count(&events, |e| matches!(e, SessionEvent::LogPlaced { .. })), 3);
    assert_eq!(count(&events, |e| *e == SessionEvent::FireComplete { fireplace }), 1);
}

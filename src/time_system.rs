//! Session clock and timer scheduler.
//!
//! Periodic and one-shot callbacks (distance checks, survival updates,
//! drink repeats, sleep fades, deferred destruction) are queued here and
//! fired on the tick thread once the clock passes their fire time.

use crate::constants::MIN_TIMER_INTERVAL;
use hecs::Entity;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// =============================================================================
// GAME CLOCK
// =============================================================================

/// Session clock (in seconds)
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Current time in seconds (simulation time, not real time)
    pub time: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Advance time to the given timestamp
    pub fn advance_to(&mut self, time: f32) {
        debug_assert!(
            time >= self.time,
            "Cannot go backwards in time: {} -> {}",
            self.time,
            time
        );
        self.time = time;
    }

    pub fn advance(&mut self, dt: f32) {
        self.advance_to(self.time + dt.max(0.0));
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TIMER SCHEDULER
// =============================================================================

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Compare a hand's mesh with its motion controller
    HandDistanceCheck(Entity),
    SurvivalUpdate,
    /// Take another sip from a drink
    DrinkConsumption(Entity),
    /// Midpoint of a bed's fade: jump to morning
    BedSkipToMorning(Entity),
    /// End of a bed's fade
    BedCompleteSleep(Entity),
    /// Second phase of object teardown
    DeferredDestroy(Entity),
}

impl TimerTask {
    /// Entity the task refers to, if any
    pub fn entity(&self) -> Option<Entity> {
        match *self {
            TimerTask::HandDistanceCheck(e)
            | TimerTask::DrinkConsumption(e)
            | TimerTask::BedSkipToMorning(e)
            | TimerTask::BedCompleteSleep(e)
            | TimerTask::DeferredDestroy(e) => Some(e),
            TimerTask::SurvivalUpdate => None,
        }
    }
}

/// Cancellable handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    handle: TimerHandle,
    fire_time: f32,
    /// Insertion order, breaks fire-time ties
    seq: u64,
    interval: Option<f32>,
    task: TimerTask,
}

impl PartialEq for ScheduledTimer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledTimer {}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest time first)
        other
            .fire_time
            .partial_cmp(&self.fire_time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Next firing of a repeating timer that was due at `fire_time` and popped
/// at `now`. Always later than `now`, even where `interval` is below the
/// float resolution of the clock.
fn next_fire_time(fire_time: f32, now: f32, interval: f32) -> f32 {
    let step = interval.max(now.abs() * f32::EPSILON);
    (fire_time + interval).max(now + step)
}

/// Single-threaded timer queue keyed by cancellable handles
#[derive(Debug, Clone, Default)]
pub struct TimerScheduler {
    pending: BinaryHeap<ScheduledTimer>,
    next_handle: u64,
    next_seq: u64,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `task` once, `delay` seconds after `now`
    pub fn schedule_once(&mut self, now: f32, delay: f32, task: TimerTask) -> TimerHandle {
        self.push_new(now + delay.max(0.0), None, task)
    }

    /// Fire `task` every `interval` seconds, first at `now + interval`.
    /// Intervals shorter than `MIN_TIMER_INTERVAL` are raised to it.
    pub fn schedule_repeating(&mut self, now: f32, interval: f32, task: TimerTask) -> TimerHandle {
        let interval = if interval.is_finite() {
            interval.max(MIN_TIMER_INTERVAL)
        } else {
            MIN_TIMER_INTERVAL
        };
        self.push_new(now + interval, Some(interval), task)
    }

    fn push_new(&mut self, fire_time: f32, interval: Option<f32>, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.pending.push(ScheduledTimer {
            handle,
            fire_time,
            seq,
            interval,
            task,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Pop the earliest timer due at or before `now`. Repeating timers are
    /// re-queued before being returned, so cancelling from the callback
    /// stops the next firing. A repeating timer fires at most once per call
    /// time; missed periods are dropped rather than replayed.
    pub fn pop_due(&mut self, now: f32) -> Option<(TimerHandle, TimerTask)> {
        if self.pending.peek()?.fire_time > now {
            return None;
        }
        let timer = self.pending.pop()?;
        if let Some(interval) = timer.interval {
            let seq = self.bump_seq();
            self.pending.push(ScheduledTimer {
                fire_time: next_fire_time(timer.fire_time, now, interval),
                seq,
                ..timer
            });
        }
        Some((timer.handle, timer.task))
    }

    /// Remove a timer. Cancelling an unknown or finished handle is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Remove every timer whose task refers to `entity`
    pub fn cancel_for_entity(&mut self, entity: Entity) {
        self.retain(|t| t.task.entity() != Some(entity));
    }

    fn retain(&mut self, keep: impl Fn(&ScheduledTimer) -> bool) {
        // Rebuild the heap without the cancelled timers
        let remaining: Vec<_> = self.pending.drain().filter(|t| keep(t)).collect();
        self.pending = remaining.into_iter().collect();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Fire time of the earliest pending timer
    pub fn peek_next(&self) -> Option<f32> {
        self.pending.peek().map(|t| t.fire_time)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

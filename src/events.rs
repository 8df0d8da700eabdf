//! Session event system for decoupled communication between systems.
//!
//! Grab logic, timers and collaborators emit events; the host drains them
//! at the end of each tick to drive feedback (haptics, HUD, audio).

use crate::interaction::{ConsumableKind, GrabPointType, InteractionKind};
use hecs::Entity;

/// Why a sleep attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepFailure {
    /// Bed disabled or already in use
    NotAvailable,
    /// No day/night provider in the session
    NoTimeSystem,
    /// It is still day
    NotNight,
    /// Nobody who can sleep (no character)
    CannotSleep,
}

impl SleepFailure {
    pub fn message(&self) -> &'static str {
        match self {
            SleepFailure::NotAvailable => "Bed is not available",
            SleepFailure::NoTimeSystem => "Time system not available",
            SleepFailure::NotNight => "You can only sleep at night",
            SleepFailure::CannotSleep => "You cannot sleep right now",
        }
    }
}

/// Events emitted by the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A hand's hovered interactable changed
    HoverChanged {
        hand: Entity,
        object: Option<Entity>,
    },
    /// A hand took hold of an interactable
    GrabStarted {
        hand: Entity,
        object: Entity,
        kind: InteractionKind,
        snapped: bool,
        point: GrabPointType,
    },
    /// A grab attempt was refused by the object's state machine
    GrabRejected { hand: Entity, object: Entity },
    /// A hand let go of an interactable
    Released { hand: Entity, object: Entity },
    /// A holder was evicted so another hand could snap on
    HandEvicted {
        object: Entity,
        evicted: Entity,
        by: Entity,
        point: GrabPointType,
    },
    /// A hand drifted too far from its controller and let go
    AutoReleased {
        hand: Entity,
        object: Entity,
        distance: f32,
    },
    ClimbStarted { hand: Entity },
    ClimbStopped { hand: Entity },
    /// Stamina hit the critical level while climbing
    StaminaDepleted,
    DayStarted { hour: f32 },
    NightStarted { hour: f32 },
    SleepStarted { bed: Entity },
    SleepCompleted { bed: Entity },
    SleepFailed { bed: Entity, reason: SleepFailure },
    Consumed {
        object: Entity,
        kind: ConsumableKind,
    },
    DrinkEmpty { object: Entity },
    /// A wood log was put into a fireplace slot
    LogPlaced {
        fireplace: Entity,
        log: Entity,
        slot: usize,
    },
    /// The last log went in and the fire is lit
    FireComplete { fireplace: Entity },
    ObjectDestroyed { object: Entity },
}

/// Simple event queue - events are pushed during update, drained by the host
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

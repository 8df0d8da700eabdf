//! Beds. Grabbing one is a request to sleep, the bed is never held.

use super::{GrabOutcome, Interaction, InteractionKind, ReleaseEffects};
use crate::components::{Body, CollisionChannel};
use crate::constants::*;
use hecs::Entity;

#[derive(Debug, Clone)]
pub struct Bed {
    /// Disabled beds always refuse
    pub can_sleep: bool,
    pub warms_player: bool,
    pub warmth_amount: f32,
    pub restores_stamina: bool,
    /// Seconds of fade; the clock jumps at the halfway point
    pub fade_duration: f32,
    in_use: bool,
}

impl Bed {
    pub fn new() -> Self {
        Self {
            can_sleep: true,
            warms_player: true,
            warmth_amount: BED_WARMTH_AMOUNT,
            restores_stamina: true,
            fade_duration: BED_FADE_DURATION,
            in_use: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.can_sleep && !self.in_use
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use
    }

    pub(crate) fn begin_sleep(&mut self) {
        self.in_use = true;
    }

    pub(crate) fn finish_sleep(&mut self) {
        self.in_use = false;
    }
}

impl Default for Bed {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction for Bed {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Bed
    }

    fn outline_on_hover(&self, _snap_point_in_range: bool) -> bool {
        self.is_available()
    }

    fn on_grab(&mut self, _hand: Entity, _channel: CollisionChannel, _body: &mut Body) -> GrabOutcome {
        GrabOutcome::AttemptSleep
    }

    fn on_release(
        &mut self,
        _hand: Entity,
        _channel: CollisionChannel,
        _body: &mut Body,
    ) -> ReleaseEffects {
        ReleaseEffects::default()
    }

    fn hands(&self) -> Vec<Entity> {
        Vec::new()
    }
}

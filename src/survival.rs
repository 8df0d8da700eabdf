//! Survival stats: hunger, thirst, body temperature and stamina.
//!
//! The session talks to survival through [`SurvivalStats`] so hosts can plug
//! in their own model; [`SurvivalComponent`] is the stock one.

use crate::config::SurvivalConfig;
use crate::constants::*;

/// Conditions around the player for one survival update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurvivalEnvironment {
    /// Day/night temperature modifier, if a time provider exists
    pub day_night_modifier: Option<f32>,
    /// Recovery rate of the sheltered zone the head is in
    pub sheltered: Option<f32>,
    /// Recovery rate of the intense heat zone the head is in
    pub intense_heat: Option<f32>,
}

/// Survival collaborator consumed by the session
pub trait SurvivalStats {
    fn hunger(&self) -> f32;
    fn thirst(&self) -> f32;
    fn temperature(&self) -> f32;
    fn stamina(&self) -> f32;
    fn max_hunger(&self) -> f32;
    fn max_thirst(&self) -> f32;
    fn max_stamina(&self) -> f32;

    fn set_hunger(&mut self, value: f32);
    fn set_thirst(&mut self, value: f32);
    fn set_temperature(&mut self, value: f32);
    fn set_stamina(&mut self, value: f32);

    fn can_start_climbing(&self) -> bool;
    fn can_sprint(&self) -> bool;
    fn is_climbing(&self) -> bool;
    fn is_sprinting(&self) -> bool;
    fn set_climbing(&mut self, climbing: bool);
    fn set_sprinting(&mut self, sprinting: bool);

    fn consume_food(&mut self, nutrition: f32, stamina: f32);
    fn consume_drink(&mut self, hydration: f32, stamina: f32);
    fn restore_stamina(&mut self, amount: f32);
    fn restore_from_sleep(&mut self);
    fn warm(&mut self, amount: f32);

    /// One periodic update. Returns true when stamina ran out while climbing;
    /// the implementation has already left the climbing state.
    fn update(&mut self, environment: &SurvivalEnvironment) -> bool;
}

#[derive(Debug, Clone)]
pub struct SurvivalComponent {
    config: SurvivalConfig,
    hunger: f32,
    thirst: f32,
    temperature: f32,
    stamina: f32,
    climbing: bool,
    sprinting: bool,
}

impl SurvivalComponent {
    pub fn new(config: SurvivalConfig) -> Self {
        Self {
            config,
            hunger: MAX_HUNGER,
            thirst: MAX_THIRST,
            temperature: config.neutral_temperature,
            stamina: MAX_STAMINA,
            climbing: false,
            sprinting: false,
        }
    }

    fn stamina_depletion_rate(&self) -> f32 {
        if self.climbing {
            self.config.climbing_stamina_depletion_rate
        } else if self.sprinting {
            self.config.sprinting_stamina_depletion_rate
        } else {
            self.config.base_stamina_depletion_rate
        }
    }

    fn temperature_change(&self, environment: &SurvivalEnvironment) -> f32 {
        let mut change = -self.config.temperature_depletion_rate;
        if let Some(modifier) = environment.day_night_modifier {
            change += modifier * TIME_TEMPERATURE_SCALE;
        }
        // Intense heat overrides the time of day, shelter only lifts the floor
        if let Some(rate) = environment.intense_heat {
            change = rate;
        } else if let Some(rate) = environment.sheltered {
            change = change.max(rate);
        }
        change
    }

    pub fn stamina_fraction(&self) -> f32 {
        if MAX_STAMINA > 0.0 {
            (self.stamina / MAX_STAMINA).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn should_force_stop_climbing(&self) -> bool {
        self.stamina <= self.config.critical_stamina_for_climbing
    }
}

impl Default for SurvivalComponent {
    fn default() -> Self {
        Self::new(SurvivalConfig::default())
    }
}

impl SurvivalStats for SurvivalComponent {
    fn hunger(&self) -> f32 {
        self.hunger
    }

    fn thirst(&self) -> f32 {
        self.thirst
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn stamina(&self) -> f32 {
        self.stamina
    }

    fn max_hunger(&self) -> f32 {
        MAX_HUNGER
    }

    fn max_thirst(&self) -> f32 {
        MAX_THIRST
    }

    fn max_stamina(&self) -> f32 {
        MAX_STAMINA
    }

    fn set_hunger(&mut self, value: f32) {
        self.hunger = value.clamp(0.0, MAX_HUNGER);
    }

    fn set_thirst(&mut self, value: f32) {
        self.thirst = value.clamp(0.0, MAX_THIRST);
    }

    fn set_temperature(&mut self, value: f32) {
        self.temperature = value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
    }

    fn set_stamina(&mut self, value: f32) {
        self.stamina = value.clamp(MIN_STAMINA, MAX_STAMINA);
    }

    fn can_start_climbing(&self) -> bool {
        self.stamina >= self.config.min_stamina_for_climbing
    }

    fn can_sprint(&self) -> bool {
        self.stamina >= self.config.min_stamina_for_sprinting
    }

    fn is_climbing(&self) -> bool {
        self.climbing
    }

    fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    fn set_climbing(&mut self, climbing: bool) {
        if self.climbing != climbing {
            tracing::debug!(climbing, stamina = self.stamina, "climbing state changed");
        }
        self.climbing = climbing;
    }

    fn set_sprinting(&mut self, sprinting: bool) {
        self.sprinting = sprinting;
    }

    fn consume_food(&mut self, nutrition: f32, stamina: f32) {
        self.hunger = (self.hunger + nutrition).min(MAX_HUNGER);
        self.restore_stamina(stamina);
    }

    fn consume_drink(&mut self, hydration: f32, stamina: f32) {
        self.thirst = (self.thirst + hydration).min(MAX_THIRST);
        self.restore_stamina(stamina);
    }

    fn restore_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).min(MAX_STAMINA);
    }

    fn restore_from_sleep(&mut self) {
        self.restore_stamina(self.config.sleep_stamina_restoration);
    }

    fn warm(&mut self, amount: f32) {
        self.set_temperature(self.temperature + amount);
    }

    fn update(&mut self, environment: &SurvivalEnvironment) -> bool {
        puffin::profile_function!();

        self.hunger = (self.hunger - self.config.hunger_depletion_rate).max(0.0);
        self.thirst = (self.thirst - self.config.thirst_depletion_rate).max(0.0);

        let change = self.temperature_change(environment);
        self.temperature = (self.temperature + change).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);

        self.stamina = (self.stamina - self.stamina_depletion_rate()).max(MIN_STAMINA);

        tracing::trace!(
            hunger = self.hunger,
            thirst = self.thirst,
            temperature = self.temperature,
            stamina = self.stamina,
            "survival update"
        );

        if self.climbing && self.should_force_stop_climbing() {
            tracing::warn!(stamina = self.stamina, "stamina depleted, forcing climbing stop");
            self.set_climbing(false);
            return true;
        }
        false
    }
}

use core::time::Duration;

use crate::{
    agent::MAX_BEHAVIORS,
    behavior::{Behavior, BehaviorKind, Bounds},
    FlockError,
};

/// A behavior slot: what to evaluate, whether to evaluate it and how strongly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorConfig {
    pub behavior: Behavior,
    pub enabled: bool,
    pub weight: f32,
}

impl BehaviorConfig {
    pub fn new(behavior: Behavior, enabled: bool, weight: f32) -> Self {
        Self {
            behavior,
            enabled,
            weight,
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        self.behavior.kind()
    }
}

/// Everything a simulation step needs besides the flock itself.
///
/// Passed by reference into every step; the engine never keeps or changes it,
/// so collaborators are free to edit it between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    pub tick: Duration,
    /// Fraction of velocity lost every tick before forces are added.
    pub drag_coefficient: f32,
    /// Speeds below this snap to zero.
    pub zero_threshold: f32,
    /// A target is reached within `radius * arrival_factor`.
    pub arrival_factor: f32,
    pub behaviors: heapless::Vec<BehaviorConfig, MAX_BEHAVIORS>,
}

impl Default for StepConfig {
    fn default() -> Self {
        let mut behaviors = heapless::Vec::new();
        for behavior in [
            BehaviorConfig::new(Behavior::Alignment { radius: 2.0 }, false, 0.05),
            BehaviorConfig::new(Behavior::Avoidance { min_speed: 1.0 }, true, 1.0),
            BehaviorConfig::new(Behavior::Boundary { bounds: Bounds::default() }, true, 1.0),
            BehaviorConfig::new(Behavior::Cohesion { radius: 2.0 }, false, 0.1),
            BehaviorConfig::new(Behavior::Seek, true, 1.0),
            BehaviorConfig::new(Behavior::Separation, true, 1.0),
        ] {
            let _ = behaviors.push(behavior);
        }

        Self {
            tick: Duration::from_millis(32),
            drag_coefficient: 0.25,
            zero_threshold: 0.001,
            arrival_factor: 0.5,
            behaviors,
        }
    }
}

impl StepConfig {
    /// A config with no behaviors, no drag and the default tick.
    pub fn bare() -> Self {
        Self {
            drag_coefficient: 0.0,
            behaviors: heapless::Vec::new(),
            ..Self::default()
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick.as_secs_f32()
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Result<Self, FlockError> {
        self.behaviors
            .push(behavior)
            .map_err(|_| FlockError::TooManyBehaviors)?;
        Ok(self)
    }

    pub fn behavior(&self, kind: BehaviorKind) -> Option<&BehaviorConfig> {
        self.behaviors.iter().find(|config| config.kind() == kind)
    }

    pub fn behavior_mut(&mut self, kind: BehaviorKind) -> Option<&mut BehaviorConfig> {
        self.behaviors.iter_mut().find(|config| config.kind() == kind)
    }

    /// Enables or disables every slot of the given kind. Returns false if none exists.
    pub fn set_enabled(&mut self, kind: BehaviorKind, enabled: bool) -> bool {
        let mut found = false;
        for config in self.behaviors.iter_mut().filter(|config| config.kind() == kind) {
            config.enabled = enabled;
            found = true;
        }
        found
    }

    pub fn enabled(&self) -> impl Iterator<Item = &BehaviorConfig> {
        self.behaviors.iter().filter(|config| config.enabled)
    }
}

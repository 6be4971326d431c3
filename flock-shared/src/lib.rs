//! Settings and snapshot types exchanged between the flock engine and the
//! programs that drive and display it.

use std::time::Duration;

use flock_core::{
    agent::MAX_BEHAVIORS, Agent, Behavior, BehaviorConfig, BehaviorKind, Bounds, StepConfig, Vector2D,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tick interval must be at least 1 ms")]
    ZeroTick,
    #[error("unit length must be positive, got {0}")]
    UnitLength(f32),
    #[error("drag coefficient must be within 0..=1, got {0}")]
    Drag(f32),
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("boundary is inverted: {0:?}")]
    InvertedBoundary(Boundary),
    #[error("at most {max} behaviors can be configured, got {got}")]
    TooManyBehaviors { max: usize, got: usize },
}

/// Represents a 2D position in world units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

/// World rectangle the boundary behavior keeps agents inside.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Boundary {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl From<Boundary> for Bounds {
    fn from(b: Boundary) -> Self {
        Bounds {
            min_x: b.min_x,
            max_x: b.max_x,
            min_y: b.min_y,
            max_y: b.max_y,
        }
    }
}

impl From<Bounds> for Boundary {
    fn from(b: Bounds) -> Self {
        Boundary {
            min_x: b.min_x,
            max_x: b.max_x,
            min_y: b.min_y,
            max_y: b.max_y,
        }
    }
}

/// Behavior-specific parameters, tagged by behavior name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BehaviorParams {
    Alignment {
        radius: f32,
    },
    Avoidance {
        #[serde(rename = "minSpeed", default = "default_min_speed")]
        min_speed: f32,
    },
    Boundary {
        boundary: Boundary,
    },
    Cohesion {
        radius: f32,
    },
    Seek,
    Separation,
}

fn default_min_speed() -> f32 {
    1.0
}

impl From<BehaviorParams> for Behavior {
    fn from(params: BehaviorParams) -> Self {
        match params {
            BehaviorParams::Alignment { radius } => Behavior::Alignment { radius },
            BehaviorParams::Avoidance { min_speed } => Behavior::Avoidance { min_speed },
            BehaviorParams::Boundary { boundary } => Behavior::Boundary {
                bounds: boundary.into(),
            },
            BehaviorParams::Cohesion { radius } => Behavior::Cohesion { radius },
            BehaviorParams::Seek => Behavior::Seek,
            BehaviorParams::Separation => Behavior::Separation,
        }
    }
}

/// One adjustable behavior entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehaviorSettings {
    #[serde(flatten)]
    pub params: BehaviorParams,
    pub on: bool,
    pub weight: f32,
    /// Color used when drawing this behavior's force arrow.
    pub color: String,
}

impl BehaviorSettings {
    fn new(params: BehaviorParams, on: bool, weight: f32, color: &str) -> Self {
        Self {
            params,
            on,
            weight,
            color: color.to_string(),
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        Behavior::from(self.params).kind()
    }
}

/// Flock simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSettings {
    pub tick_interval_ms: u64,
    /// Screen pixels per world unit.
    pub unit_length: f32,
    pub drag_coef: f32,
    pub arrival_coef: f32,
    pub zero_threshold: f32,
    /// Whether per-behavior force arrows are reported with each agent.
    pub draw_arrows: bool,
    pub behaviors: Vec<BehaviorSettings>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 32,
            unit_length: 64.0,
            drag_coef: 0.25,
            arrival_coef: 0.5,
            zero_threshold: 0.001,
            draw_arrows: true,
            behaviors: vec![
                BehaviorSettings::new(BehaviorParams::Alignment { radius: 2.0 }, false, 0.05, "#bb9af7"),
                BehaviorSettings::new(BehaviorParams::Avoidance { min_speed: 1.0 }, true, 1.0, "#ff0000"),
                BehaviorSettings::new(
                    BehaviorParams::Boundary {
                        boundary: Bounds::default().into(),
                    },
                    true,
                    1.0,
                    "#0db9d7",
                ),
                BehaviorSettings::new(BehaviorParams::Cohesion { radius: 2.0 }, false, 0.1, "#7da6ff"),
                BehaviorSettings::new(BehaviorParams::Seek, true, 1.0, "#b9f27c"),
                BehaviorSettings::new(BehaviorParams::Separation, true, 1.0, "#ff7a93"),
            ],
        }
    }
}

impl SimulationSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::ZeroTick);
        }
        if !(self.unit_length > 0.0) {
            return Err(SettingsError::UnitLength(self.unit_length));
        }
        if !(0.0..=1.0).contains(&self.drag_coef) {
            return Err(SettingsError::Drag(self.drag_coef));
        }
        non_negative("arrivalCoef", self.arrival_coef)?;
        non_negative("zeroThreshold", self.zero_threshold)?;
        if self.behaviors.len() > MAX_BEHAVIORS {
            return Err(SettingsError::TooManyBehaviors {
                max: MAX_BEHAVIORS,
                got: self.behaviors.len(),
            });
        }

        for behavior in &self.behaviors {
            match behavior.params {
                BehaviorParams::Alignment { radius } | BehaviorParams::Cohesion { radius } => {
                    non_negative("radius", radius)?
                }
                BehaviorParams::Avoidance { min_speed } => non_negative("minSpeed", min_speed)?,
                BehaviorParams::Boundary { boundary } => {
                    if boundary.min_x > boundary.max_x || boundary.min_y > boundary.max_y {
                        return Err(SettingsError::InvertedBoundary(boundary));
                    }
                }
                BehaviorParams::Seek | BehaviorParams::Separation => {}
            }
        }

        Ok(())
    }

    /// Builds the per-tick engine configuration.
    pub fn step_config(&self) -> Result<StepConfig, SettingsError> {
        self.validate()?;
        let mut config = StepConfig {
            tick: self.tick(),
            drag_coefficient: self.drag_coef,
            zero_threshold: self.zero_threshold,
            arrival_factor: self.arrival_coef,
            ..StepConfig::bare()
        };
        for behavior in &self.behaviors {
            config = config
                .with_behavior(BehaviorConfig::new(behavior.params.into(), behavior.on, behavior.weight))
                .map_err(|_| SettingsError::TooManyBehaviors {
                    max: MAX_BEHAVIORS,
                    got: self.behaviors.len(),
                })?;
        }
        Ok(config)
    }

    pub fn behavior_mut(&mut self, kind: BehaviorKind) -> Option<&mut BehaviorSettings> {
        self.behaviors.iter_mut().find(|b| b.kind() == kind)
    }

    /// Arrow color of the first behavior of the given kind.
    pub fn color_for(&self, kind: BehaviorKind) -> Option<&str> {
        self.behaviors
            .iter()
            .find(|b| b.kind() == kind)
            .map(|b| b.color.as_str())
    }

    pub fn viewport(&self, width: f32, height: f32) -> Viewport {
        Viewport {
            width,
            height,
            unit_length: self.unit_length,
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { name, value })
    }
}

/// Maps between canvas pixels and world units. The world origin sits at the
/// center of the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub unit_length: f32,
}

impl Viewport {
    pub fn client_to_world(&self, pixel: Position) -> Vector2D {
        (Vector2D::from(pixel) - self.center()) / self.unit_length
    }

    pub fn world_to_client(&self, world: Vector2D) -> Position {
        (world * self.unit_length + self.center()).into()
    }

    fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }
}

/// One behavior's force on an agent during the last tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceSnapshot {
    pub behavior: String,
    pub force: Position,
    pub color: Option<String>,
}

/// Render-facing state of one agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    pub position: Position,
    pub display_position: Position,
    pub velocity: Position,
    pub heading: f32,
    pub radius: f32,
    pub selected: bool,
    pub targets: Vec<Position>,
    /// Empty unless the settings ask for force arrows.
    pub forces: Vec<ForceSnapshot>,
}

impl AgentSnapshot {
    pub fn capture(agent: &Agent, settings: &SimulationSettings) -> Self {
        Self {
            position: agent.position.into(),
            display_position: agent.display_position.into(),
            velocity: agent.velocity.into(),
            heading: agent.heading,
            radius: agent.radius,
            selected: agent.selected,
            targets: agent.targets.iter().map(|t| (*t).into()).collect(),
            forces: agent
                .active_forces
                .iter()
                .filter(|_| settings.draw_arrows)
                .map(|applied| ForceSnapshot {
                    behavior: applied.source.name().to_string(),
                    force: applied.force.into(),
                    color: settings.color_for(applied.source).map(str::to_string),
                })
                .collect(),
        }
    }
}

/// Status of a finished or running simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlockReport {
    pub ticks: u64,
    pub frames: u32,
    pub paused: bool,
    pub draw_arrows: bool,
    pub agents: Vec<AgentSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_round_trip_json() {
        let settings = SimulationSettings::default();
        let json = settings.to_json_pretty().unwrap();
        assert!(json.contains("\"tickIntervalMs\": 32"));
        assert!(json.contains("\"kind\": \"boundary\""));
        assert_eq!(SimulationSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_default_settings_match_engine_defaults() {
        let config = SimulationSettings::default().step_config().unwrap();
        assert_eq!(config, StepConfig::default());
    }

    #[test]
    fn test_partial_behavior_json() {
        let json = r##"{
            "tickIntervalMs": 16,
            "unitLength": 32,
            "dragCoef": 0.1,
            "arrivalCoef": 0.5,
            "zeroThreshold": 0.001,
            "drawArrows": false,
            "behaviors": [
                { "kind": "avoidance", "on": true, "weight": 2.0, "color": "#ff0000" },
                { "kind": "seek", "on": true, "weight": 1.0, "color": "#b9f27c" }
            ]
        }"##;
        let settings = SimulationSettings::from_json(json).unwrap();
        assert_eq!(settings.behaviors[0].params, BehaviorParams::Avoidance { min_speed: 1.0 });

        let config = settings.step_config().unwrap();
        assert_eq!(config.tick, Duration::from_millis(16));
        assert_eq!(config.behaviors.len(), 2);
        assert_eq!(config.behavior(BehaviorKind::Avoidance).unwrap().weight, 2.0);
    }

    #[test]
    fn test_validation_errors() {
        let mut settings = SimulationSettings::default();
        settings.drag_coef = 1.5;
        assert!(matches!(settings.validate(), Err(SettingsError::Drag(_))));

        let mut settings = SimulationSettings::default();
        settings.tick_interval_ms = 0;
        assert!(matches!(settings.step_config(), Err(SettingsError::ZeroTick)));

        let mut settings = SimulationSettings::default();
        if let Some(b) = settings.behavior_mut(BehaviorKind::Boundary) {
            b.params = BehaviorParams::Boundary {
                boundary: Boundary {
                    min_x: 5.0,
                    max_x: -5.0,
                    min_y: -4.0,
                    max_y: 4.0,
                },
            };
        }
        assert!(matches!(settings.validate(), Err(SettingsError::InvertedBoundary(_))));

        assert!(matches!(
            SimulationSettings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_viewport_mapping() {
        let viewport = SimulationSettings::default().viewport(640.0, 480.0);
        let world = viewport.client_to_world(Position::new(384.0, 176.0));
        assert_eq!(world, Vector2D::new(1.0, -1.0));
        assert_eq!(viewport.world_to_client(world), Position::new(384.0, 176.0));
        assert_eq!(viewport.client_to_world(Position::new(320.0, 240.0)), Vector2D::zero());
    }

    #[test]
    fn test_agent_snapshot_colors() {
        let settings = SimulationSettings::default();
        let mut agent = Agent::new(Vector2D::new(1.0, 2.0), 0.4, 4.0);
        agent.push_target(Vector2D::new(3.0, 3.0)).unwrap();
        let _ = agent.active_forces.push(flock_core::AppliedForce {
            force: Vector2D::new(4.0, 0.0),
            source: BehaviorKind::Seek,
        });

        let snapshot = AgentSnapshot::capture(&agent, &settings);
        assert_eq!(snapshot.targets, vec![Position::new(3.0, 3.0)]);
        assert_eq!(snapshot.forces[0].behavior, "seek");
        assert_eq!(snapshot.forces[0].color.as_deref(), Some("#b9f27c"));
    }

    #[test]
    fn test_agent_snapshot_without_arrows() {
        let settings = SimulationSettings {
            draw_arrows: false,
            ..SimulationSettings::default()
        };
        let mut agent = Agent::new(Vector2D::zero(), 0.4, 4.0);
        let _ = agent.active_forces.push(flock_core::AppliedForce {
            force: Vector2D::new(4.0, 0.0),
            source: BehaviorKind::Seek,
        });

        let snapshot = AgentSnapshot::capture(&agent, &settings);
        assert!(snapshot.forces.is_empty());
        assert_eq!(snapshot.position, Position::new(0.0, 0.0));
    }
}

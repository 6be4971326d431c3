use crate::{behavior::BehaviorKind, FlockError, Vector2D};

#[cfg(feature = "std")]
use rand::Rng;

/// Maximum number of queued waypoints per agent.
pub const MAX_TARGETS: usize = 16;

/// Maximum number of behaviors that can be configured, and so the number of
/// forces recorded on an agent per tick.
pub const MAX_BEHAVIORS: usize = 8;

pub const DEFAULT_RADIUS: f32 = 0.4;
pub const DEFAULT_MAX_SPEED: f32 = 4.0;

/// One behavior's contribution to an agent's velocity during the last tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedForce {
    pub force: Vector2D,
    pub source: BehaviorKind,
}

pub type ActiveForces = heapless::Vec<AppliedForce, MAX_BEHAVIORS>;

/// A single unit of the flock
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f32,
    pub max_speed: f32,
    /// Waypoints, front is the current goal.
    pub targets: heapless::Deque<Vector2D, MAX_TARGETS>,
    /// Direction of the last non-zero velocity, in radians.
    pub heading: f32,
    pub selected: bool,
    /// Render-only position, recomputed every frame. Never read by the simulation.
    pub display_position: Vector2D,
    /// Forces applied during the last tick, kept for visualization.
    pub active_forces: ActiveForces,
}

impl Agent {
    pub fn new(position: Vector2D, radius: f32, max_speed: f32) -> Self {
        Self {
            position,
            velocity: Vector2D::zero(),
            radius,
            max_speed,
            targets: heapless::Deque::new(),
            heading: 0.0,
            selected: false,
            display_position: position,
            active_forces: heapless::Vec::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        if !velocity.is_zero() {
            self.heading = velocity.heading();
        }
        self
    }

    /// An idle agent at a random x in `[-3, 3)` on the horizontal axis.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = Vector2D::new(rng.gen_range(-3.0..3.0), 0.0);
        Self::new(position, DEFAULT_RADIUS, DEFAULT_MAX_SPEED)
    }

    pub fn current_target(&self) -> Option<&Vector2D> {
        self.targets.front()
    }

    pub fn is_idle(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn push_target(&mut self, target: Vector2D) -> Result<(), FlockError> {
        self.targets
            .push_back(target)
            .map_err(|_| FlockError::TargetQueueFull)
    }

    pub fn replace_targets(&mut self, target: Vector2D) {
        self.targets.clear();
        // Cannot fail on an empty queue.
        let _ = self.targets.push_back(target);
    }

    /// Sum of the forces applied during the last tick.
    pub fn resultant_force(&self) -> Vector2D {
        self.active_forces.iter().map(|applied| applied.force).sum()
    }
}

/// Interpolated render position `leftover_seconds` after the last tick.
pub fn display_position(agent: &Agent, leftover_seconds: f32) -> Vector2D {
    agent.position + agent.velocity * leftover_seconds
}

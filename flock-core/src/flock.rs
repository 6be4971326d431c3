use crate::{
    agent::{display_position, ActiveForces, AppliedForce},
    geometry::{circle_intersects_rect, Circle, Rect},
    Agent, FlockError, StepConfig, Vector2D,
};

/// A fixed-capacity collection of agents.
///
/// Agents keep their slot for the lifetime of the flock; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct Flock<const N: usize> {
    agents: heapless::Vec<Agent, N>,
}

impl<const N: usize> Flock<N> {
    pub fn new() -> Self {
        Self {
            agents: heapless::Vec::new(),
        }
    }

    /// Fills the flock with `count` randomly placed idle agents.
    #[cfg(feature = "std")]
    pub fn scatter<R: rand::Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Self, FlockError> {
        let mut flock = Self::new();
        for _ in 0..count {
            flock.add_agent(Agent::random(rng))?;
        }
        Ok(flock)
    }

    /// Adds an agent and returns its index.
    pub fn add_agent(&mut self, agent: Agent) -> Result<usize, FlockError> {
        self.agents.push(agent).map_err(|_| FlockError::FlockFull)?;
        Ok(self.agents.len() - 1)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access for collaborators that edit agents between ticks.
    pub fn agent_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Advances every agent by one tick.
    ///
    /// All forces are computed from the flock as it was at the start of the
    /// tick; only then are velocities and positions updated.
    pub fn step(&mut self, config: &StepConfig) -> Result<(), FlockError> {
        let mut forces = heapless::Vec::<ActiveForces, N>::new();
        for index in 0..self.agents.len() {
            let _ = forces.push(steering(index, &self.agents, config)?);
        }

        for (agent, applied) in self.agents.iter_mut().zip(forces) {
            integrate(agent, applied, config);
        }

        Ok(())
    }

    /// Recomputes every agent's display position `leftover_seconds` past the last tick.
    pub fn interpolate(&mut self, leftover_seconds: f32) {
        for agent in self.agents.iter_mut() {
            agent.display_position = display_position(agent, leftover_seconds);
        }
    }

    /// Sends every selected agent to `target`. With `append` the target is
    /// queued after the existing ones, otherwise it replaces them.
    ///
    /// Returns the number of agents that received the command. Appending
    /// fails without touching any agent if a selected agent's queue is full.
    pub fn issue_move_command(&mut self, target: Vector2D, append: bool) -> Result<usize, FlockError> {
        if append && self.selected().any(|agent| agent.targets.is_full()) {
            return Err(FlockError::TargetQueueFull);
        }

        let mut commanded = 0;
        for agent in self.agents.iter_mut().filter(|agent| agent.selected) {
            if append {
                agent.push_target(target)?;
            } else {
                agent.replace_targets(target);
            }
            commanded += 1;
        }

        log::debug!(
            "move to ({:.2}, {:.2}) issued to {} agents (append: {})",
            target.x,
            target.y,
            commanded,
            append
        );
        Ok(commanded)
    }

    /// Selects exactly the agents whose circle touches the rectangle spanned by
    /// `a` and `b`. Returns how many are selected.
    pub fn select_from_corners(&mut self, a: Vector2D, b: Vector2D) -> usize {
        let rect = Rect::from_corners(a, b);
        let mut selected = 0;
        for agent in self.agents.iter_mut() {
            agent.selected = circle_intersects_rect(&Circle::new(agent.position, agent.radius), &rect);
            selected += usize::from(agent.selected);
        }
        selected
    }

    pub fn clear_selection(&mut self) {
        for agent in self.agents.iter_mut() {
            agent.selected = false;
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|agent| agent.selected)
    }
}

/// Forces from every enabled behavior for the agent in slot `index`, tagged
/// with their source.
pub fn steering(index: usize, flock: &[Agent], config: &StepConfig) -> Result<ActiveForces, FlockError> {
    let mut applied = ActiveForces::new();
    for behavior in config.enabled() {
        let force = behavior.behavior.force(index, flock, behavior.weight)?;
        // Both vectors share the MAX_BEHAVIORS capacity.
        let _ = applied.push(AppliedForce {
            force,
            source: behavior.kind(),
        });
    }
    Ok(applied)
}

/// Applies one tick of forces, drag, speed clamping and movement to an agent.
pub fn integrate(agent: &mut Agent, applied: ActiveForces, config: &StepConfig) {
    let mut velocity = agent.velocity * (1.0 - config.drag_coefficient);
    velocity += applied.iter().map(|a| a.force).sum::<Vector2D>();

    let speed = velocity.magnitude();
    if speed > agent.max_speed {
        velocity = velocity / speed * agent.max_speed;
    } else if speed < config.zero_threshold {
        velocity = Vector2D::zero();
    }

    agent.velocity = velocity;
    agent.active_forces = applied;
    if !velocity.is_zero() {
        agent.heading = velocity.heading();
    }

    agent.position += velocity * config.tick_seconds();

    let arrival_distance = agent.radius * config.arrival_factor;
    let arrived = agent
        .current_target()
        .is_some_and(|target| target.distance(&agent.position) < arrival_distance);
    if arrived {
        if let Some(target) = agent.targets.pop_front() {
            log::trace!("agent reached target ({:.2}, {:.2})", target.x, target.y);
        }
    }
}

//! Steering behaviors.
//!
//! Each behavior maps an agent and the flock it belongs to onto a single
//! weighted force. Behaviors only read their inputs, so every agent can be
//! evaluated against the same snapshot of the flock.

use crate::{
    geometry::{circle_intersects_convex_polygon, Circle},
    Agent, FlockError, Vector2D,
};

/// Identifies which behavior produced a force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Alignment,
    Avoidance,
    Boundary,
    Cohesion,
    Seek,
    Separation,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 6] = [
        BehaviorKind::Alignment,
        BehaviorKind::Avoidance,
        BehaviorKind::Boundary,
        BehaviorKind::Cohesion,
        BehaviorKind::Seek,
        BehaviorKind::Separation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorKind::Alignment => "alignment",
            BehaviorKind::Avoidance => "avoidance",
            BehaviorKind::Boundary => "boundary",
            BehaviorKind::Cohesion => "cohesion",
            BehaviorKind::Seek => "seek",
            BehaviorKind::Separation => "separation",
        }
    }
}

/// Axis-aligned world rectangle used for containment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -5.0,
            max_x: 5.0,
            min_y: -4.0,
            max_y: 4.0,
        }
    }
}

/// A steering behavior together with its own parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Alignment { radius: f32 },
    /// Only reacts while the agent moves at `min_speed` or faster.
    Avoidance { min_speed: f32 },
    Boundary { bounds: Bounds },
    Cohesion { radius: f32 },
    Seek,
    Separation,
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Alignment { .. } => BehaviorKind::Alignment,
            Behavior::Avoidance { .. } => BehaviorKind::Avoidance,
            Behavior::Boundary { .. } => BehaviorKind::Boundary,
            Behavior::Cohesion { .. } => BehaviorKind::Cohesion,
            Behavior::Seek => BehaviorKind::Seek,
            Behavior::Separation => BehaviorKind::Separation,
        }
    }

    /// Evaluates the behavior for the agent in slot `index` of `flock`.
    pub fn force(&self, index: usize, flock: &[Agent], weight: f32) -> Result<Vector2D, FlockError> {
        let agent = flock.get(index).ok_or(FlockError::NoSuchAgent { index })?;
        let force = match *self {
            Behavior::Alignment { radius } => alignment(index, flock, radius, weight),
            Behavior::Avoidance { min_speed } => avoidance(index, flock, min_speed, weight)?,
            Behavior::Boundary { bounds } => boundary(agent, &bounds, weight),
            Behavior::Cohesion { radius } => cohesion(index, flock, radius, weight),
            Behavior::Seek => seek(agent, weight),
            Behavior::Separation => separation(index, flock, weight),
        };
        Ok(force)
    }
}

/// Every member of `flock` except the one in slot `index`.
fn others(index: usize, flock: &[Agent]) -> impl Iterator<Item = &Agent> + '_ {
    flock
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, other)| other)
}

/// Desired velocity toward the current target, scaled by `weight`.
///
/// Full speed outside `radius` of the target, slowing linearly to zero inside
/// it. This is a velocity contribution, not a correction of the current one.
pub fn seek(agent: &Agent, weight: f32) -> Vector2D {
    let Some(target) = agent.current_target() else {
        return Vector2D::zero();
    };

    let offset = *target - agent.position;
    let distance = offset.magnitude();
    let slowing_distance = agent.radius;

    let speed = if distance < slowing_distance {
        agent.max_speed * (distance / slowing_distance)
    } else {
        agent.max_speed
    };

    offset.normalize() * speed * weight
}

/// Pushes away from every overlapping neighbor, harder the deeper the overlap.
///
/// Neighbors at exactly the same position are ignored since there is no
/// direction to push in.
///
/// # Panics
///
/// Panics if `index` is out of bounds, like slice indexing.
pub fn separation(index: usize, flock: &[Agent], weight: f32) -> Vector2D {
    let agent = &flock[index];
    let mut total = Vector2D::zero();
    let mut count = 0;

    for other in others(index, flock) {
        let distance = agent.position.distance(&other.position);
        let reach = agent.radius + other.radius;
        if distance > 0.0 && distance < reach {
            let push = (agent.position - other.position).normalize();
            total += push * (reach / distance);
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    total / count as f32 * weight
}

/// Rectangle swept by the agent over the next second of travel: as wide as the
/// agent and as long as its velocity.
pub fn sweep_footprint(agent: &Agent) -> [Vector2D; 4] {
    let offset = agent.velocity.perpendicular_clockwise().normalize() * agent.radius;
    let p0 = agent.position + offset;
    let p1 = p0 + agent.velocity;
    let p2 = p1 - offset * 2.0;
    let p3 = agent.position - offset;
    [p0, p1, p2, p3]
}

/// Sidesteps clockwise at a fixed strength when any neighbor lies in the
/// agent's sweep footprint.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn avoidance(index: usize, flock: &[Agent], min_speed: f32, weight: f32) -> Result<Vector2D, FlockError> {
    let agent = &flock[index];
    let speed = agent.velocity.magnitude();
    if speed == 0.0 || speed < min_speed {
        return Ok(Vector2D::zero());
    }

    let footprint = sweep_footprint(agent);
    for other in others(index, flock) {
        let circle = Circle::new(other.position, other.radius);
        if circle_intersects_convex_polygon(&circle, &footprint)? {
            return Ok(agent.velocity.perpendicular_clockwise().normalize() * weight);
        }
    }

    Ok(Vector2D::zero())
}

/// Unit push back inside `bounds` on each axis the agent has left.
pub fn boundary(agent: &Agent, bounds: &Bounds, weight: f32) -> Vector2D {
    let mut push = Vector2D::zero();

    if agent.position.x < bounds.min_x {
        push.x = 1.0;
    } else if agent.position.x > bounds.max_x {
        push.x = -1.0;
    }

    if agent.position.y < bounds.min_y {
        push.y = 1.0;
    } else if agent.position.y > bounds.max_y {
        push.y = -1.0;
    }

    push * weight
}

/// Average velocity of neighbors within `radius`.
///
/// Only applies while the agent is travelling to a target. Panics if `index`
/// is out of bounds.
pub fn alignment(index: usize, flock: &[Agent], radius: f32, weight: f32) -> Vector2D {
    let agent = &flock[index];
    if agent.is_idle() {
        return Vector2D::zero();
    }

    let mut sum = Vector2D::zero();
    let mut count = 0;
    for other in others(index, flock) {
        if agent.position.distance(&other.position) < radius {
            sum += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    sum / count as f32 * weight
}

/// Steers toward the centroid of neighbors within `radius`.
///
/// Only applies while the agent is travelling to a target. Panics if `index`
/// is out of bounds.
pub fn cohesion(index: usize, flock: &[Agent], radius: f32, weight: f32) -> Vector2D {
    let agent = &flock[index];
    if agent.is_idle() {
        return Vector2D::zero();
    }

    let mut center = Vector2D::zero();
    let mut count = 0;
    for other in others(index, flock) {
        if agent.position.distance(&other.position) < radius {
            center += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    (center / count as f32 - agent.position) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn agent_at(x: f32, y: f32) -> Agent {
        Agent::new(Vector2D::new(x, y), 0.4, 4.0)
    }

    fn close(a: Vector2D, b: Vector2D) -> bool {
        a.distance(&b) < EPS
    }

    #[test]
    fn test_seek_idle_is_zero() {
        assert_eq!(seek(&agent_at(0.0, 0.0), 1.0), Vector2D::zero());
    }

    #[test]
    fn test_seek_full_speed_far_from_target() {
        let mut agent = agent_at(0.0, 0.0);
        agent.push_target(Vector2D::new(5.0, 0.0)).unwrap();
        assert!(close(seek(&agent, 1.0), Vector2D::new(4.0, 0.0)));
        assert!(close(seek(&agent, 0.5), Vector2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_seek_slows_inside_radius() {
        let mut agent = agent_at(0.0, 0.0);
        agent.push_target(Vector2D::new(0.0, 0.2)).unwrap();
        // Half the slowing distance left, half the speed.
        assert!(close(seek(&agent, 1.0), Vector2D::new(0.0, 2.0)));

        agent.replace_targets(Vector2D::new(0.0, 0.0));
        assert_eq!(seek(&agent, 1.0), Vector2D::zero());
    }

    #[test]
    fn test_separation_zero_without_overlap() {
        let flock = [agent_at(0.0, 0.0), agent_at(1.0, 0.0)];
        assert_eq!(separation(0, &flock, 1.0), Vector2D::zero());
        assert_eq!(separation(1, &flock, 1.0), Vector2D::zero());
    }

    #[test]
    fn test_separation_pushes_overlapping_apart() {
        let flock = [agent_at(0.0, 0.0), agent_at(0.3, 0.0)];
        let left = separation(0, &flock, 1.0);
        let right = separation(1, &flock, 1.0);

        let expected = 0.8 / 0.3;
        assert!(close(left, Vector2D::new(-expected, 0.0)));
        assert!(close(right, Vector2D::new(expected, 0.0)));
    }

    #[test]
    fn test_separation_averages_over_overlaps() {
        let flock = [agent_at(0.0, 0.0), agent_at(0.4, 0.0), agent_at(-0.4, 0.0)];
        // Symmetric neighbors cancel out.
        assert!(close(separation(0, &flock, 1.0), Vector2D::zero()));
        // Only the middle agent overlaps the right one.
        assert!(close(separation(1, &flock, 1.0), Vector2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_separation_ignores_coincident_neighbor() {
        let flock = [agent_at(1.0, 1.0), agent_at(1.0, 1.0)];
        assert_eq!(separation(0, &flock, 1.0), Vector2D::zero());
    }

    #[test]
    fn test_avoidance_needs_speed() {
        let flock = [agent_at(0.0, 0.0), agent_at(0.5, 0.0)];
        assert_eq!(avoidance(0, &flock, 1.0, 1.0), Ok(Vector2D::zero()));
    }

    #[test]
    fn test_avoidance_sidesteps_clockwise() {
        let flock = [
            agent_at(0.0, 0.0).with_velocity(Vector2D::new(2.0, 0.0)),
            agent_at(1.5, 0.1),
        ];
        let force = avoidance(0, &flock, 1.0, 0.5).unwrap();
        assert!(close(force, Vector2D::new(0.0, 0.5)));
    }

    #[test]
    fn test_avoidance_clear_path() {
        let flock = [
            agent_at(0.0, 0.0).with_velocity(Vector2D::new(2.0, 0.0)),
            agent_at(1.0, 3.0),
            agent_at(-2.0, 0.0),
        ];
        assert_eq!(avoidance(0, &flock, 1.0, 1.0), Ok(Vector2D::zero()));
    }

    #[test]
    fn test_sweep_footprint() {
        let agent = agent_at(0.0, 0.0).with_velocity(Vector2D::new(2.0, 0.0));
        let [p0, p1, p2, p3] = sweep_footprint(&agent);
        assert!(close(p0, Vector2D::new(0.0, 0.4)));
        assert!(close(p1, Vector2D::new(2.0, 0.4)));
        assert!(close(p2, Vector2D::new(2.0, -0.4)));
        assert!(close(p3, Vector2D::new(0.0, -0.4)));
    }

    #[test]
    fn test_boundary() {
        let bounds = Bounds::default();
        assert_eq!(boundary(&agent_at(0.0, 0.0), &bounds, 1.0), Vector2D::zero());
        assert_eq!(boundary(&agent_at(5.0, -4.0), &bounds, 1.0), Vector2D::zero());
        assert_eq!(boundary(&agent_at(5.5, 0.0), &bounds, 1.0), Vector2D::new(-1.0, 0.0));
        assert_eq!(boundary(&agent_at(-6.0, 4.5), &bounds, 2.0), Vector2D::new(2.0, -2.0));
        assert_eq!(boundary(&agent_at(0.0, -4.1), &bounds, 1.0), Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn test_alignment_requires_target() {
        let mut flock = [
            agent_at(0.0, 0.0),
            agent_at(1.0, 0.0).with_velocity(Vector2D::new(0.0, 2.0)),
            agent_at(0.0, 1.0).with_velocity(Vector2D::new(2.0, 0.0)),
            agent_at(9.0, 9.0).with_velocity(Vector2D::new(-3.0, 0.0)),
        ];
        assert_eq!(alignment(0, &flock, 2.0, 1.0), Vector2D::zero());

        flock[0].push_target(Vector2D::new(3.0, 3.0)).unwrap();
        assert!(close(alignment(0, &flock, 2.0, 0.5), Vector2D::new(0.5, 0.5)));
    }

    #[test]
    fn test_cohesion_requires_target() {
        let mut flock = [agent_at(0.0, 0.0), agent_at(1.0, 0.0), agent_at(0.0, 1.0), agent_at(9.0, 9.0)];
        assert_eq!(cohesion(0, &flock, 2.0, 1.0), Vector2D::zero());

        flock[0].push_target(Vector2D::new(3.0, 3.0)).unwrap();
        assert!(close(cohesion(0, &flock, 2.0, 1.0), Vector2D::new(0.5, 0.5)));
    }

    #[test]
    fn test_lone_agent_has_no_neighbors() {
        let mut agent = agent_at(0.0, 0.0).with_velocity(Vector2D::new(2.0, 0.0));
        agent.push_target(Vector2D::new(3.0, 0.0)).unwrap();
        // A copy, not the caller's own value, sits in the slice.
        let flock = [agent.clone()];

        assert_eq!(alignment(0, &flock, 2.0, 1.0), Vector2D::zero());
        assert_eq!(cohesion(0, &flock, 2.0, 1.0), Vector2D::zero());
        assert_eq!(separation(0, &flock, 1.0), Vector2D::zero());
        assert_eq!(avoidance(0, &flock, 1.0, 1.0), Ok(Vector2D::zero()));
    }

    #[test]
    fn test_identical_copies_are_neighbors() {
        let mut agent = agent_at(0.0, 0.0).with_velocity(Vector2D::new(2.0, 0.0));
        agent.push_target(Vector2D::new(3.0, 0.0)).unwrap();
        let flock = [agent.clone(), agent];

        assert!(close(alignment(0, &flock, 2.0, 1.0), Vector2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_force_for_missing_slot() {
        let flock = [agent_at(0.0, 0.0)];
        assert_eq!(
            Behavior::Separation.force(3, &flock, 1.0),
            Err(FlockError::NoSuchAgent { index: 3 })
        );
    }

    #[test]
    fn test_behavior_dispatch() {
        let flock = [agent_at(6.0, 0.0)];
        let behavior = Behavior::Boundary { bounds: Bounds::default() };
        assert_eq!(behavior.kind(), BehaviorKind::Boundary);
        assert_eq!(behavior.force(0, &flock, 1.0), Ok(Vector2D::new(-1.0, 0.0)));
        assert_eq!(Behavior::Seek.force(0, &flock, 1.0), Ok(Vector2D::zero()));
    }
}

use thiserror::Error;

/// Errors raised by the engine. All of them are local, deterministic defects
/// in input or configuration; none is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlockError {
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    InvalidPolygon { vertices: usize },
    #[error("division of a vector by zero")]
    DivisionByZero,
    #[error("tick duration must be greater than zero")]
    ZeroTick,
    #[error("target queue is full")]
    TargetQueueFull,
    #[error("flock is full")]
    FlockFull,
    #[error("no agent in slot {index}")]
    NoSuchAgent { index: usize },
    #[error("too many behaviors configured")]
    TooManyBehaviors,
}

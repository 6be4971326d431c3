#![cfg_attr(not(feature = "std"), no_std)]

//! Steering and integration engine for a small flock of units.
//!
//! Agents move in a bounded plane under a weighted mix of steering behaviors.
//! [`Flock::step`] advances every agent by one fixed tick, and
//! [`TickScheduler`] decides how many ticks a rendered frame is worth and where
//! to draw each agent in between.

pub mod agent;
pub mod behavior;
pub mod config;
mod error;
pub mod flock;
pub mod geometry;
pub mod scheduler;
mod vector;

pub use agent::{display_position, Agent, AppliedForce};
pub use behavior::{Behavior, BehaviorKind, Bounds};
pub use config::{BehaviorConfig, StepConfig};
pub use error::FlockError;
pub use flock::Flock;
pub use scheduler::{FrameReport, TickScheduler};
pub use vector::Vector2D;

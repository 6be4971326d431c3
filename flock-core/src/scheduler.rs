use core::time::Duration;

use crate::{Flock, FlockError, StepConfig};

/// What a call to [`TickScheduler::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Simulation steps executed during this frame.
    pub steps: u32,
    /// Time accumulated since the last executed tick.
    pub leftover: Duration,
}

/// Runs fixed-length simulation ticks from variable frame timings.
///
/// Every frame the driver reports how much real time has passed; the scheduler
/// runs as many whole ticks as fit and keeps the remainder for the next frame.
/// The remainder is also used to extrapolate display positions so movement
/// looks smooth between ticks.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    accumulated: Duration,
    paused: bool,
    ticks: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total number of ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn leftover(&self) -> Duration {
        self.accumulated
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("scheduler paused after {} ticks", self.ticks);
        }
        self.paused = true;
    }

    /// Resumes scheduling. Time that passed while paused is not caught up.
    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("scheduler resumed");
        }
        self.paused = false;
        self.accumulated = Duration::ZERO;
    }

    pub fn toggle(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Accounts for `elapsed` real time, runs the ticks that are due and
    /// refreshes display positions. Does nothing while paused.
    pub fn advance<const N: usize>(
        &mut self,
        elapsed: Duration,
        flock: &mut Flock<N>,
        config: &StepConfig,
    ) -> Result<FrameReport, FlockError> {
        if self.paused {
            return Ok(FrameReport {
                steps: 0,
                leftover: self.accumulated,
            });
        }
        if config.tick.is_zero() {
            return Err(FlockError::ZeroTick);
        }

        self.accumulated += elapsed;
        let mut steps = 0;
        while self.accumulated >= config.tick {
            flock.step(config)?;
            self.accumulated -= config.tick;
            self.ticks += 1;
            steps += 1;
        }

        if steps > 1 {
            log::trace!("caught up {} ticks in one frame", steps);
        }

        flock.interpolate(self.accumulated.as_secs_f32());
        Ok(FrameReport {
            steps,
            leftover: self.accumulated,
        })
    }

    /// Runs exactly one tick while paused. Display positions then match the
    /// simulated positions. Returns false, without stepping, when running.
    pub fn step_once<const N: usize>(
        &mut self,
        flock: &mut Flock<N>,
        config: &StepConfig,
    ) -> Result<bool, FlockError> {
        if !self.paused {
            return Ok(false);
        }

        flock.step(config)?;
        self.ticks += 1;
        self.accumulated = Duration::ZERO;
        flock.interpolate(0.0);
        Ok(true)
    }
}

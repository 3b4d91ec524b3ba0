//! Fixed-timestep simulation loop.
//!
//! Ties plant feedback to the cascade controller and the convergence judge:
//! each tick computes the drive force from position/velocity feedback,
//! steps the plant, and judges the new position. The loop is exposed as an
//! iterator of per-tick reports so the host decides the pacing — a test
//! harness runs ticks back-to-back, the interactive runner throttles them
//! to wall-clock time.

use thiserror::Error;

use crate::config::SimConfig;
use crate::control::cascade::CascadePid;
use crate::judge::{ConvergenceJudge, Verdict};
use crate::plant::{Ball, PlantError};

// ─── Error Type ─────────────────────────────────────────────────────

/// Simulation runtime error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A controller or plant quantity degenerated to NaN/infinity.
    ///
    /// Unreachable under a validated config (clamped controller outputs
    /// keep the state finite) but protects direct API users.
    #[error("non-finite {quantity} at tick {tick}")]
    NonFinite {
        /// Which quantity degenerated ("force", "position", "velocity").
        quantity: &'static str,
        /// Tick index (1-based) at which it was detected.
        tick: u64,
    },
    /// [`Simulation::step`] was called after a terminal outcome.
    #[error("simulation already finished")]
    Finished,
}

// ─── Per-Tick Output ────────────────────────────────────────────────

/// Read-only view of the simulation state after one tick, consumed by the
/// console renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSnapshot {
    /// Simulated time [s].
    pub time: f64,
    /// Ball position.
    pub position: f64,
    /// Force applied this tick.
    pub force: f64,
    /// Ball velocity.
    pub velocity: f64,
}

/// Terminal run outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// The ball held in-band long enough.
    Converged {
        /// Elapsed time at which the final hold window began [s].
        settle_time: f64,
    },
    /// The ball stayed out of band past the time limit.
    TimedOut {
        /// Total simulated time [s].
        elapsed: f64,
    },
}

/// One tick's result: the state snapshot, plus the terminal outcome if
/// this tick ended the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Post-step state.
    pub snapshot: TickSnapshot,
    /// `Some` exactly once, on the terminal tick.
    pub outcome: Option<RunOutcome>,
}

// ─── Simulation ─────────────────────────────────────────────────────

/// A complete closed-loop run: cascade controller, plant, and judge.
///
/// Deterministic: identical config and initial position produce
/// bit-identical trajectories.
#[derive(Debug, Clone)]
pub struct Simulation {
    cascade: CascadePid,
    ball: Ball,
    judge: ConvergenceJudge,
    dt: f64,
    ticks: u64,
    finished: bool,
}

impl Simulation {
    /// Build a simulation from a validated config and a sampled initial
    /// position. Initial velocity and force are zero.
    pub fn new(config: &SimConfig, initial_position: f64) -> Result<Self, PlantError> {
        let cascade = CascadePid::new(
            config.controller.outer.gains(),
            config.controller.inner.gains(),
        );
        let mut ball = Ball::new(
            initial_position,
            0.0,
            config.plant.reference,
            0.0,
            config.plant.mass,
        )?;
        ball.set_bias_force(config.plant.bias_force);
        let judge = ConvergenceJudge::new(
            config.run.dt,
            config.run.hold_band,
            config.run.hold_duration,
            config.run.time_limit,
        );
        Ok(Self {
            cascade,
            ball,
            judge,
            dt: config.run.dt,
            ticks: 0,
            finished: false,
        })
    }

    /// Advance one tick: feedback → cascade → force → plant → judge.
    ///
    /// Returns [`SimError::Finished`] once a terminal outcome (or a
    /// non-finite failure) has been reported.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        if self.finished {
            return Err(SimError::Finished);
        }
        self.ticks += 1;

        // Outer loop tracks position against the reference; inner loop
        // tracks the resulting velocity command.
        let force = self.cascade.compute(
            self.ball.reference(),
            self.ball.position(),
            self.ball.velocity(),
        );
        self.ball.step(force, self.dt);
        let verdict = self.judge.tick(self.ball.position());

        for (quantity, value) in [
            ("force", force),
            ("position", self.ball.position()),
            ("velocity", self.ball.velocity()),
        ] {
            if !value.is_finite() {
                self.finished = true;
                return Err(SimError::NonFinite {
                    quantity,
                    tick: self.ticks,
                });
            }
        }

        let outcome = match verdict {
            Verdict::Running => None,
            Verdict::Converged { settle_time } => Some(RunOutcome::Converged { settle_time }),
            Verdict::TimedOut { elapsed } => Some(RunOutcome::TimedOut { elapsed }),
        };
        if outcome.is_some() {
            self.finished = true;
        }

        Ok(TickReport {
            snapshot: self.snapshot(),
            outcome,
        })
    }

    /// Snapshot of the current state: after a tick this is that tick's
    /// post-step view (the one embedded in its [`TickReport`]); before
    /// any tick it is the t = 0 frame.
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            time: self.judge.elapsed(),
            position: self.ball.position(),
            force: self.ball.applied_force(),
            velocity: self.ball.velocity(),
        }
    }

    /// Ticks executed so far.
    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether a terminal outcome has been reported.
    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The plant under control.
    #[inline]
    pub const fn ball(&self) -> &Ball {
        &self.ball
    }

    /// The convergence judge.
    #[inline]
    pub const fn judge(&self) -> &ConvergenceJudge {
        &self.judge
    }
}

/// Fixed-timestep scheduler: one tick per `next()` call, `None` after the
/// terminal report (or after a runtime error has been yielded).
impl Iterator for Simulation {
    type Item = Result<TickReport, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.step())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_sim(initial_position: f64) -> Simulation {
        Simulation::new(&SimConfig::default(), initial_position).unwrap()
    }

    #[test]
    fn initial_snapshot_is_time_zero() {
        let sim = reference_sim(15.0);
        let snap = sim.snapshot();
        assert_eq!(snap.time, 0.0);
        assert_eq!(snap.position, 15.0);
        assert_eq!(snap.force, 0.0);
        assert_eq!(snap.velocity, 0.0);
    }

    #[test]
    fn tick_advances_time_by_dt() {
        let mut sim = reference_sim(15.0);
        let report = sim.step().unwrap();
        assert_eq!(report.snapshot.time, 0.05);
        assert_eq!(sim.ticks(), 1);
        // First-tick force pulls the ball toward the reference.
        assert!(report.snapshot.force < 0.0);
    }

    #[test]
    fn snapshot_force_matches_cascade_output() {
        let mut sim = reference_sim(-12.0);
        for _ in 0..10 {
            let report = sim.step().unwrap();
            assert_eq!(report.snapshot.force, sim.ball().applied_force());
        }
    }

    #[test]
    fn iterator_yields_terminal_report_then_none() {
        let sim = reference_sim(15.0);
        let reports: Vec<TickReport> = sim.map(Result::unwrap).collect();
        let last = reports.last().unwrap();
        assert!(last.outcome.is_some());
        // Only the terminal tick carries an outcome.
        for report in &reports[..reports.len() - 1] {
            assert!(report.outcome.is_none());
        }
    }

    #[test]
    fn step_after_terminal_is_an_error() {
        let mut sim = reference_sim(15.0);
        loop {
            if sim.step().unwrap().outcome.is_some() {
                break;
            }
        }
        assert!(sim.is_finished());
        assert_eq!(sim.step(), Err(SimError::Finished));
    }

    #[test]
    fn trajectories_are_deterministic() {
        let run = |p0: f64| -> Vec<TickSnapshot> {
            reference_sim(p0)
                .map(|r| r.unwrap().snapshot)
                .collect()
        };
        let a = run(-14.37);
        let b = run(-14.37);
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_state_fails_fast() {
        // Bypass config validation: infinite gain drives force to NaN/inf.
        let mut config = SimConfig::default();
        config.controller.inner.kp = f64::INFINITY;
        config.controller.inner.output_limit = f64::INFINITY;
        let mut sim = Simulation::new(&config, 15.0).unwrap();
        let err = loop {
            match sim.step() {
                Ok(_) => continue,
                Err(e) => break e,
            }
        };
        assert!(matches!(err, SimError::NonFinite { .. }));
        // The iterator is exhausted afterwards.
        assert_eq!(sim.next(), None);
    }
}

//! Hold-time convergence state machine.
//!
//! Judges each tick's post-step position against the tolerance band: the
//! run succeeds once the ball has stayed strictly inside the band for the
//! required cumulative hold time, and fails once the elapsed time exceeds
//! the limit while out of band. Terminal verdicts are sticky.

/// Run phase. `Converged` and `TimedOut` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Still driving toward the reference.
    Running,
    /// Held in-band long enough — success.
    Converged,
    /// Out of band past the time limit — failure.
    TimedOut,
}

/// Per-tick verdict returned by [`ConvergenceJudge::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// No terminal outcome yet.
    Running,
    /// Success. `settle_time` is the elapsed time at which the hold
    /// window began (elapsed − hold duration).
    Converged {
        /// Time at which the final uninterrupted hold started [s].
        settle_time: f64,
    },
    /// Failure. `elapsed` is the simulated time at the failing tick.
    TimedOut {
        /// Total simulated time [s].
        elapsed: f64,
    },
}

/// Convergence/termination judge.
///
/// Evaluated once per tick, after the plant step. Once a terminal verdict
/// is reached, further ticks return it unchanged.
#[derive(Debug, Clone)]
pub struct ConvergenceJudge {
    dt: f64,
    /// Open-interval half-width: in-band is `-hold_band < p < hold_band`.
    hold_band: f64,
    hold_duration: f64,
    time_limit: f64,
    elapsed: f64,
    hold: f64,
    phase: RunPhase,
    verdict: Verdict,
}

impl ConvergenceJudge {
    /// Create a judge at `elapsed = 0` in the `Running` phase.
    pub fn new(dt: f64, hold_band: f64, hold_duration: f64, time_limit: f64) -> Self {
        Self {
            dt,
            hold_band,
            hold_duration,
            time_limit,
            elapsed: 0.0,
            hold: 0.0,
            phase: RunPhase::Running,
            verdict: Verdict::Running,
        }
    }

    /// Judge one tick given the post-step ball position.
    ///
    /// Band membership is strict on both sides: a position exactly at
    /// `±hold_band` counts as out of band. The timeout test is strictly
    /// greater than the limit and is checked only on out-of-band ticks,
    /// so a final in-band tick that pushes elapsed past the limit can
    /// still lead to convergence.
    pub fn tick(&mut self, position: f64) -> Verdict {
        if self.phase != RunPhase::Running {
            return self.verdict;
        }

        self.elapsed += self.dt;

        if -self.hold_band < position && position < self.hold_band {
            self.hold += self.dt;
            if self.hold >= self.hold_duration {
                self.phase = RunPhase::Converged;
                self.verdict = Verdict::Converged {
                    settle_time: self.elapsed - self.hold_duration,
                };
            }
        } else {
            self.hold = 0.0;
            if self.elapsed > self.time_limit {
                self.phase = RunPhase::TimedOut;
                self.verdict = Verdict::TimedOut {
                    elapsed: self.elapsed,
                };
            }
        }

        self.verdict
    }

    /// Current phase.
    #[inline]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Whether a terminal verdict has been reached.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase != RunPhase::Running
    }

    /// Total simulated time so far [s].
    #[inline]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current uninterrupted in-band time [s].
    #[inline]
    pub const fn hold(&self) -> f64 {
        self.hold
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

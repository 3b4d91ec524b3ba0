//! Cascade composition: position-outer, velocity-inner.
//!
//! The outer loop turns position error into a velocity-like command; the
//! inner loop tracks that command and produces the final drive force.

use super::pid::{Pid, PidGains};

/// Two nested PID loops. The cascade output equals the inner loop's output.
///
/// [`CascadePid::compute`] runs both sub-computations before returning, so
/// no partial-tick output is ever observable.
#[derive(Debug, Clone)]
pub struct CascadePid {
    outer: Pid,
    inner: Pid,
    output: f64,
}

impl CascadePid {
    /// Create a cascade from outer and inner loop gains, state zeroed.
    pub fn new(outer: PidGains, inner: PidGains) -> Self {
        Self {
            outer: Pid::new(outer),
            inner: Pid::new(inner),
            output: 0.0,
        }
    }

    /// Compute one cascade tick.
    ///
    /// The outer PID runs on `(outer_reference, outer_feedback)`; its output
    /// becomes the inner PID's reference, paired with `inner_feedback`.
    pub fn compute(
        &mut self,
        outer_reference: f64,
        outer_feedback: f64,
        inner_feedback: f64,
    ) -> f64 {
        let inner_reference = self.outer.compute(outer_reference, outer_feedback);
        self.output = self.inner.compute(inner_reference, inner_feedback);
        self.output
    }

    /// Reset both loops and the cascade output to zero.
    pub fn reset(&mut self) {
        self.outer.reset();
        self.inner.reset();
        self.output = 0.0;
    }

    /// Output of the last full tick (equals the inner loop's output).
    #[inline]
    pub const fn output(&self) -> f64 {
        self.output
    }

    /// Outer (position) loop.
    #[inline]
    pub const fn outer(&self) -> &Pid {
        &self.outer
    }

    /// Inner (velocity) loop.
    #[inline]
    pub const fn inner(&self) -> &Pid {
        &self.inner
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

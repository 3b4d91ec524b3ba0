//! Scalar PID unit with hard integral and output saturation.
//!
//! The derivative term operates on the per-tick error difference — gains
//! absorb the fixed timestep, so no dt division appears here. Anti-windup
//! is clamping only (no back-calculation).
//!
//! Zero Ki disables integral; zero Kd disables derivative.

// ─── Gains ──────────────────────────────────────────────────────────

/// PID tuning coefficients and saturation limits.
///
/// Fixed at construction, immutable thereafter. Validated at the config
/// layer: gains finite, limits finite and non-negative.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
    /// Integral accumulator saturation limit.
    pub integral_limit: f64,
    /// Output saturation limit.
    pub output_limit: f64,
}

// ─── PID Unit ───────────────────────────────────────────────────────

/// One PID loop: gains plus the mutable per-tick state.
///
/// Single-writer only; [`Pid::compute`] is not reentrant for the same
/// unit from concurrent threads.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    /// Current error (reference − feedback).
    error: f64,
    /// Error from the prior tick, used only for the derivative term.
    prev_error: f64,
    /// Integral accumulator, clamped to `±integral_limit`.
    integral: f64,
    /// Last computed output, clamped to `±output_limit`.
    output: f64,
}

impl Pid {
    /// Create a PID unit with zeroed state.
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            error: 0.0,
            prev_error: 0.0,
            integral: 0.0,
            output: 0.0,
        }
    }

    /// Compute one control tick.
    ///
    /// Shifts `error` into `prev_error`, recomputes the error from
    /// `reference − feedback`, accumulates and clamps the integral, and
    /// returns the clamped output.
    ///
    /// Invariants after return: `|integral| <= integral_limit` and
    /// `|output| <= output_limit`.
    pub fn compute(&mut self, reference: f64, feedback: f64) -> f64 {
        self.prev_error = self.error;
        self.error = reference - feedback;

        let d_term = (self.error - self.prev_error) * self.gains.kd;
        let p_term = self.error * self.gains.kp;

        self.integral = (self.integral + self.error * self.gains.ki)
            .clamp(-self.gains.integral_limit, self.gains.integral_limit);

        self.output = (p_term + d_term + self.integral)
            .clamp(-self.gains.output_limit, self.gains.output_limit);
        self.output
    }

    /// Reset all mutable state to zero. Gains are untouched.
    #[inline]
    pub fn reset(&mut self) {
        self.error = 0.0;
        self.prev_error = 0.0;
        self.integral = 0.0;
        self.output = 0.0;
    }

    /// Last computed (clamped) output.
    #[inline]
    pub const fn output(&self) -> f64 {
        self.output
    }

    /// Current integral accumulator value.
    #[inline]
    pub const fn integral(&self) -> f64 {
        self.integral
    }

    /// Current error (reference − feedback of the last tick).
    #[inline]
    pub const fn error(&self) -> f64 {
        self.error
    }

    /// Configured gains.
    #[inline]
    pub const fn gains(&self) -> &PidGains {
        &self.gains
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(kp: f64, ki: f64, kd: f64) -> PidGains {
        PidGains {
            kp,
            ki,
            kd,
            integral_limit: 500.0,
            output_limit: 65535.0,
        }
    }

    #[test]
    fn pure_proportional() {
        let mut pid = Pid::new(gains(10.0, 0.0, 0.0));
        // First tick: error = 4 − 1 = 3, derivative (3 − 0) irrelevant at kd=0.
        assert_eq!(pid.compute(4.0, 1.0), 30.0);
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut pid = Pid::new(gains(0.0, 0.0, 2.0));
        // Tick 1: error 0 → 1, d = (1 − 0) * 2 = 2.
        assert_eq!(pid.compute(1.0, 0.0), 2.0);
        // Tick 2: error stays 1, d = 0.
        assert_eq!(pid.compute(1.0, 0.0), 0.0);
        // Tick 3: error 1 → −1, d = −4.
        assert_eq!(pid.compute(0.0, 1.0), -4.0);
    }

    #[test]
    fn integral_accumulates_per_tick() {
        let mut pid = Pid::new(gains(0.0, 0.5, 0.0));
        // integral += error * ki each tick: 10 ticks at error 1 → 5.0.
        for _ in 0..10 {
            pid.compute(1.0, 0.0);
        }
        assert!((pid.integral() - 5.0).abs() < 1e-12);
        assert!((pid.output() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn integral_clamps_at_limit() {
        let mut pid = Pid::new(PidGains {
            kp: 0.0,
            ki: 100.0,
            kd: 0.0,
            integral_limit: 50.0,
            output_limit: 65535.0,
        });
        for _ in 0..1000 {
            pid.compute(10.0, 0.0);
            assert!(pid.integral().abs() <= 50.0);
        }
        assert_eq!(pid.integral(), 50.0);

        // Negative direction saturates symmetrically.
        for _ in 0..1000 {
            pid.compute(0.0, 10.0);
            assert!(pid.integral().abs() <= 50.0);
        }
        assert_eq!(pid.integral(), -50.0);
    }

    #[test]
    fn output_clamps_at_limit() {
        let mut pid = Pid::new(PidGains {
            kp: 1000.0,
            ki: 0.0,
            kd: 0.0,
            integral_limit: 0.0,
            output_limit: 10.0,
        });
        assert_eq!(pid.compute(100.0, 0.0), 10.0);
        assert_eq!(pid.compute(-100.0, 0.0), -10.0);
    }

    #[test]
    fn clamping_invariant_over_random_walk() {
        let mut pid = Pid::new(PidGains {
            kp: 3.0,
            ki: 7.0,
            kd: 11.0,
            integral_limit: 25.0,
            output_limit: 40.0,
        });
        // Deterministic pseudo-random error sequence, large swings.
        let mut x: u64 = 0x243f_6a88_85a3_08d3;
        for _ in 0..10_000 {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let fb = ((x >> 11) as f64 / (1u64 << 53) as f64 - 0.5) * 1e6;
            pid.compute(0.0, fb);
            assert!(pid.integral().abs() <= 25.0);
            assert!(pid.output().abs() <= 40.0);
        }
    }

    #[test]
    fn reset_clears_state() {
        let mut pid = Pid::new(gains(1.0, 1.0, 1.0));
        for _ in 0..20 {
            pid.compute(5.0, 0.0);
        }
        assert!(pid.integral() != 0.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.error(), 0.0);
        assert_eq!(pid.output(), 0.0);
        // First post-reset tick behaves like a fresh unit.
        let fresh = Pid::new(gains(1.0, 1.0, 1.0)).compute(5.0, 0.0);
        assert_eq!(pid.compute(5.0, 0.0), fresh);
    }
}

//! Reference-scenario constants for the ball simulator.
//!
//! Single source of truth for the default control tuning, plant parameters,
//! and run criteria. Config defaults and tests import from here — no
//! duplication permitted.

/// Fixed control/physics timestep [s].
pub const DT: f64 = 0.05;

/// Half-width of the convergence band around the reference.
/// In-band is the open interval `(-HOLD_BAND, +HOLD_BAND)`.
pub const HOLD_BAND: f64 = 2.5;

/// Cumulative in-band time required to declare convergence [s].
pub const HOLD_DURATION: f64 = 10.0;

/// Elapsed-time limit after which an out-of-band run fails [s].
pub const TIME_LIMIT: f64 = 30.0;

/// Outer (position) loop proportional gain.
pub const OUTER_KP: f64 = 1.0;

/// Outer (position) loop integral gain (0 = disabled).
pub const OUTER_KI: f64 = 0.0;

/// Outer (position) loop derivative gain.
pub const OUTER_KD: f64 = 3.0;

/// Inner (velocity) loop proportional gain.
pub const INNER_KP: f64 = 1.0;

/// Inner (velocity) loop integral gain (0 = disabled).
pub const INNER_KI: f64 = 0.0;

/// Inner (velocity) loop derivative gain.
pub const INNER_KD: f64 = 5.0;

/// Integral accumulator saturation limit (both loops).
pub const INTEGRAL_LIMIT: f64 = 500.0;

/// Controller output saturation limit (both loops).
pub const OUTPUT_LIMIT: f64 = 65535.0;

/// Ball mass.
pub const BALL_MASS: f64 = 1.0;

/// Constant disturbance force applied to the ball (0 in the reference
/// scenario; hook for future extensions).
pub const BIAS_FORCE: f64 = 0.0;

/// Reference position the ball must converge to.
pub const REFERENCE_POSITION: f64 = 0.0;

/// Initial-position sampling span: draws lie in `[-SPAN, +SPAN]`.
pub const SAMPLING_SPAN: f64 = 18.0;

/// Initial-position exclusion half-width: draws with `|p| <= EXCLUSION`
/// are rejected, guaranteeing a non-trivial starting error.
pub const SAMPLING_EXCLUSION: f64 = 8.0;

/// Rejection-sampling attempt bound before `SamplingError::Exhausted`.
pub const SAMPLING_MAX_ATTEMPTS: u32 = 100;

/// Resolution of the sampled initial position (draws are integer
/// hundredths, scaled by this factor).
pub const SAMPLING_RESOLUTION: f64 = 0.01;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(DT > 0.0);
        assert!(HOLD_BAND > 0.0);
        assert!(HOLD_DURATION > 0.0);
        assert!(TIME_LIMIT > HOLD_DURATION);
        assert!(INTEGRAL_LIMIT >= 0.0);
        assert!(OUTPUT_LIMIT >= 0.0);
        assert!(BALL_MASS > 0.0);
    }

    #[test]
    fn sampling_band_is_nontrivial() {
        // The exclusion band must leave room to sample from, and must be
        // wide enough that a sampled start is never already in-band.
        assert!(SAMPLING_EXCLUSION < SAMPLING_SPAN);
        assert!(SAMPLING_EXCLUSION > HOLD_BAND);
        assert!(SAMPLING_MAX_ATTEMPTS > 0);
    }
}

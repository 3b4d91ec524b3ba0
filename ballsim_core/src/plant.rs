//! Discrete-time point-mass plant under Newtonian dynamics plus a constant
//! bias force.
//!
//! The per-step kinematics use the uniformly-accelerated-motion formula,
//! which is exact (not an approximation) provided the applied force is held
//! constant over the step — the fixed force-per-tick control loop
//! guarantees exactly that.

use thiserror::Error;

/// Plant construction error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    /// Mass must be strictly positive and finite (acceleration divides by it).
    #[error("invalid ball mass {mass} (must be finite and > 0)")]
    InvalidMass {
        /// Rejected mass value.
        mass: f64,
    },
}

/// The simulated ball: a single-axis point mass.
///
/// `position` and `velocity` evolve only through [`Ball::step`].
#[derive(Debug, Clone)]
pub struct Ball {
    position: f64,
    velocity: f64,
    /// Setpoint the controller drives toward (stored for observability,
    /// not used by the physics).
    reference: f64,
    /// Most recent force input, recorded for observability/rendering.
    applied_force: f64,
    /// Constant disturbance force.
    bias_force: f64,
    mass: f64,
}

impl Ball {
    /// Construct a ball with all fields set directly.
    ///
    /// Rejects non-finite or non-positive `mass` rather than letting a
    /// later step divide by it.
    pub fn new(
        position: f64,
        velocity: f64,
        reference: f64,
        initial_force: f64,
        mass: f64,
    ) -> Result<Self, PlantError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PlantError::InvalidMass { mass });
        }
        Ok(Self {
            position,
            velocity,
            reference,
            applied_force: initial_force,
            bias_force: 0.0,
            mass,
        })
    }

    /// Set the constant disturbance force (0 in the reference scenario).
    pub fn set_bias_force(&mut self, bias_force: f64) {
        self.bias_force = bias_force;
    }

    /// Advance the plant one step of duration `dt` under `applied_force`.
    ///
    /// `F = ma` gives the acceleration; `s = ut + ½at²` gives the
    /// displacement over the step.
    pub fn step(&mut self, applied_force: f64, dt: f64) {
        self.applied_force = applied_force;

        let acceleration = (self.applied_force + self.bias_force) / self.mass;
        self.position += self.velocity * dt + 0.5 * acceleration * dt * dt;
        self.velocity += acceleration * dt;
    }

    /// Current position.
    #[inline]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Reference setpoint.
    #[inline]
    pub const fn reference(&self) -> f64 {
        self.reference
    }

    /// Most recent force input.
    #[inline]
    pub const fn applied_force(&self) -> f64 {
        self.applied_force
    }

    /// Constant disturbance force.
    #[inline]
    pub const fn bias_force(&self) -> f64 {
        self.bias_force
    }

    /// Ball mass.
    #[inline]
    pub const fn mass(&self) -> f64 {
        self.mass
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! TOML configuration loader with validation.
//!
//! Every field carries a `#[serde(default)]` that reproduces the reference
//! scenario, so the simulator runs with a partial config file or none at
//! all. Validation rejects non-finite tuning, non-positive timing, and
//! degenerate sampling bands with descriptive messages before any state is
//! constructed.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts;
use crate::control::pid::PidGains;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Config Sections ────────────────────────────────────────────────

/// Run criteria: timestep, tolerance band, hold and time limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Control/physics timestep [s].
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Convergence band half-width (strict open interval).
    #[serde(default = "default_hold_band")]
    pub hold_band: f64,
    /// Required cumulative in-band hold time [s].
    #[serde(default = "default_hold_duration")]
    pub hold_duration: f64,
    /// Out-of-band elapsed-time limit [s].
    #[serde(default = "default_time_limit")]
    pub time_limit: f64,
}

/// One PID loop's tuning.
///
/// Deserialized through [`PidOverride`] so that a partial TOML table keeps
/// the loop's own reference defaults — outer and inner differ, so the
/// per-field fallback depends on which section the table came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PidConfig {
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

impl PidConfig {
    /// Convert to runtime [`PidGains`].
    pub fn gains(&self) -> PidGains {
        PidGains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            integral_limit: self.integral_limit,
            output_limit: self.output_limit,
        }
    }
}

/// Partial PID table as written in TOML: every field optional, missing
/// ones filled from the owning loop's reference defaults.
#[derive(Debug, Deserialize)]
struct PidOverride {
    kp: Option<f64>,
    ki: Option<f64>,
    kd: Option<f64>,
    integral_limit: Option<f64>,
    output_limit: Option<f64>,
}

impl PidOverride {
    /// Merge the overrides onto a loop's default tuning.
    fn apply(self, mut base: PidConfig) -> PidConfig {
        if let Some(kp) = self.kp {
            base.kp = kp;
        }
        if let Some(ki) = self.ki {
            base.ki = ki;
        }
        if let Some(kd) = self.kd {
            base.kd = kd;
        }
        if let Some(limit) = self.integral_limit {
            base.integral_limit = limit;
        }
        if let Some(limit) = self.output_limit {
            base.output_limit = limit;
        }
        base
    }
}

fn de_outer_pid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PidConfig, D::Error> {
    Ok(PidOverride::deserialize(deserializer)?.apply(default_outer_pid()))
}

fn de_inner_pid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PidConfig, D::Error> {
    Ok(PidOverride::deserialize(deserializer)?.apply(default_inner_pid()))
}

/// Cascade tuning: outer (position) and inner (velocity) loops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Outer (position) loop.
    #[serde(default = "default_outer_pid", deserialize_with = "de_outer_pid")]
    pub outer: PidConfig,
    /// Inner (velocity) loop.
    #[serde(default = "default_inner_pid", deserialize_with = "de_inner_pid")]
    pub inner: PidConfig,
}

/// Plant parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Ball mass (strictly positive).
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Constant disturbance force.
    #[serde(default = "default_bias_force")]
    pub bias_force: f64,
    /// Reference position the ball converges to.
    #[serde(default = "default_reference")]
    pub reference: f64,
}

/// Initial-condition sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Draw span: initial positions lie in `[-span, +span]`.
    #[serde(default = "default_span")]
    pub span: f64,
    /// Exclusion half-width: draws with `|p| <= exclusion` are rejected.
    #[serde(default = "default_exclusion")]
    pub exclusion: f64,
    /// Rejection-sampling attempt bound.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    /// Run criteria.
    #[serde(default)]
    pub run: RunConfig,
    /// Cascade controller tuning.
    #[serde(default)]
    pub controller: CascadeConfig,
    /// Plant parameters.
    #[serde(default)]
    pub plant: PlantConfig,
    /// Initial-condition sampling.
    #[serde(default)]
    pub sampling: SamplingConfig,
}

// ─── Defaults (reference scenario) ──────────────────────────────────

fn default_dt() -> f64 {
    consts::DT
}
fn default_hold_band() -> f64 {
    consts::HOLD_BAND
}
fn default_hold_duration() -> f64 {
    consts::HOLD_DURATION
}
fn default_time_limit() -> f64 {
    consts::TIME_LIMIT
}
fn default_outer_pid() -> PidConfig {
    PidConfig {
        kp: consts::OUTER_KP,
        ki: consts::OUTER_KI,
        kd: consts::OUTER_KD,
        integral_limit: consts::INTEGRAL_LIMIT,
        output_limit: consts::OUTPUT_LIMIT,
    }
}
fn default_inner_pid() -> PidConfig {
    PidConfig {
        kp: consts::INNER_KP,
        ki: consts::INNER_KI,
        kd: consts::INNER_KD,
        integral_limit: consts::INTEGRAL_LIMIT,
        output_limit: consts::OUTPUT_LIMIT,
    }
}
fn default_mass() -> f64 {
    consts::BALL_MASS
}
fn default_bias_force() -> f64 {
    consts::BIAS_FORCE
}
fn default_reference() -> f64 {
    consts::REFERENCE_POSITION
}
fn default_span() -> f64 {
    consts::SAMPLING_SPAN
}
fn default_exclusion() -> f64 {
    consts::SAMPLING_EXCLUSION
}
fn default_max_attempts() -> u32 {
    consts::SAMPLING_MAX_ATTEMPTS
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            hold_band: default_hold_band(),
            hold_duration: default_hold_duration(),
            time_limit: default_time_limit(),
        }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            outer: default_outer_pid(),
            inner: default_inner_pid(),
        }
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            bias_force: default_bias_force(),
            reference: default_reference(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            span: default_span(),
            exclusion: default_exclusion(),
            max_attempts: default_max_attempts(),
        }
    }
}

// ─── Validation ─────────────────────────────────────────────────────

impl SimConfig {
    /// Validate all parameter bounds.
    ///
    /// Rejects anything that would make the control loop, plant step, or
    /// sampler degenerate: non-finite tuning, zero or negative timing,
    /// negative clamp limits, non-positive mass, or an exclusion band
    /// that covers the whole sampling span.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let run = &self.run;
        require_positive("run.dt", run.dt)?;
        require_positive("run.hold_band", run.hold_band)?;
        require_positive("run.hold_duration", run.hold_duration)?;
        require_positive("run.time_limit", run.time_limit)?;

        validate_pid("controller.outer", &self.controller.outer)?;
        validate_pid("controller.inner", &self.controller.inner)?;

        require_positive("plant.mass", self.plant.mass)?;
        require_finite("plant.bias_force", self.plant.bias_force)?;
        require_finite("plant.reference", self.plant.reference)?;

        let sampling = &self.sampling;
        require_positive("sampling.span", sampling.span)?;
        require_finite("sampling.exclusion", sampling.exclusion)?;
        if sampling.exclusion < 0.0 {
            return Err(ConfigError::Validation(format!(
                "sampling.exclusion must be non-negative (got {})",
                sampling.exclusion
            )));
        }
        if sampling.exclusion >= sampling.span {
            return Err(ConfigError::Validation(format!(
                "sampling.exclusion ({}) must be smaller than sampling.span ({})",
                sampling.exclusion, sampling.span
            )));
        }
        if sampling.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "sampling.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Validation(format!(
            "{name} must be finite (got {value})"
        )));
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{name} must be strictly positive (got {value})"
        )));
    }
    Ok(())
}

fn validate_pid(section: &str, pid: &PidConfig) -> Result<(), ConfigError> {
    require_finite(&format!("{section}.kp"), pid.kp)?;
    require_finite(&format!("{section}.ki"), pid.ki)?;
    require_finite(&format!("{section}.kd"), pid.kd)?;
    for (field, limit) in [
        ("integral_limit", pid.integral_limit),
        ("output_limit", pid.output_limit),
    ] {
        require_finite(&format!("{section}.{field}"), limit)?;
        if limit < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{section}.{field} must be non-negative (got {limit})"
            )));
        }
    }
    Ok(())
}

// ─── Loading ────────────────────────────────────────────────────────

/// Load and validate a simulator configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    SimConfig::from_toml(&toml_str)
}

// ─── Tests ──────────────────────────────────────────────────────────

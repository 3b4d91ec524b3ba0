//! # Ball Simulator Core
//!
//! Closed-loop control simulation of a 1‑D point mass ("the ball") that is
//! displaced to a random off-center position and must be driven back to the
//! reference and held there, using only force computed from position/velocity
//! feedback.
//!
//! ## Architecture
//!
//! - **`control`** — scalar PID unit and the position-outer/velocity-inner
//!   cascade that produces the drive force.
//! - **`plant`** — discrete-time point-mass model under Newtonian dynamics
//!   plus a constant bias force.
//! - **`judge`** — hold-time convergence state machine (pass/fail verdict).
//! - **`sampling`** — bounded rejection sampling of the initial displacement.
//! - **`sim`** — fixed-timestep loop tying plant feedback to controller
//!   output, exposed as an iterator of per-tick reports.
//! - **`config`** — TOML configuration with validation; defaults reproduce
//!   the reference scenario.
//!
//! All state is owned by the simulation for the duration of a run; there is
//! exactly one logical thread of control and every tick is deterministic
//! given prior state.

pub mod config;
pub mod consts;
pub mod control;
pub mod judge;
pub mod plant;
pub mod sampling;
pub mod sim;

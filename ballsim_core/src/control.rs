//! Control engine root.
//!
//! Scalar PID unit with integral/output saturation, and the cascade
//! composition (position-outer, velocity-inner) that produces the final
//! drive force.

pub mod cascade;
pub mod pid;

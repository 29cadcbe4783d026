//! Shared library modules providing error types, environment lookup, path derivation,
//! launcher command construction, and telemetry initialization.

pub mod accelerate;
pub mod env;
pub mod errors;
pub mod paths;
pub mod telemetry;

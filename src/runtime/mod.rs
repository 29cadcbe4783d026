//! Job preparation and launcher handoff.
mod executor;
mod startup;

pub use executor::{exit_code_for, run_invocation};
pub use startup::{prepare, run, PreparedLaunch, RuntimeExit};

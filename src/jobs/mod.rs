//! Launchable jobs.
pub mod evaluate;
pub mod train;

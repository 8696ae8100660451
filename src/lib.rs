pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hints;
pub mod launcher;
pub mod status;
pub mod sync;
pub mod telemetry;
pub mod ui;

pub use error::{GitShipError, Result};

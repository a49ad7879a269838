//! Game Launcher Core - controller for a single external game process.
//!
//! This crate starts and stops one configured executable and tracks at most
//! one handle for it. It has no HTTP layer; see `game-launcher-server`.

pub mod config;
pub mod error;
pub mod platform;
pub mod process;

pub use config::{LaunchStrategy, LauncherConfig};
pub use error::{LauncherError, Result};
pub use process::{LaunchOutcome, ProcessController, ProcessStatus, StopOutcome};

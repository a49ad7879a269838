//! Process management module.
//!
//! Launching and stopping the single managed game process.
//!
//! # Strategies
//!
//! How the game is started is a [`ProcessLauncher`] chosen once at startup:
//! 1. **direct** - spawn the executable and keep its handle (default)
//! 2. **shell** - run it through the platform shell on a background thread;
//!    stopping falls back to killing by executable name
//!
//! # Example
//!
//! ```rust,no_run
//! use game_launcher_core::{LauncherConfig, ProcessController};
//!
//! let controller = ProcessController::new(&LauncherConfig::new("/opt/games/cricket"));
//! if controller.launch() {
//!     println!("running: {}", controller.status().running);
//! }
//! assert!(controller.stop());
//! ```

mod controller;
mod launcher;

pub use controller::{LaunchOutcome, ProcessController, ProcessStatus, StopOutcome};
pub use launcher::{
    launcher_for, DirectLauncher, Launched, ManagedProcess, ProcessLauncher, ShellLauncher,
};

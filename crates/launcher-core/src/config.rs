//! Launcher configuration.

use crate::error::{LauncherError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Environment variable holding the absolute path of the game executable.
pub const EXECUTABLE_ENV: &str = "GAME_EXECUTABLE_PATH";
/// Environment variable holding the display name used in responses.
pub const GAME_NAME_ENV: &str = "GAME_NAME";
/// Environment variable selecting the launch strategy.
pub const STRATEGY_ENV: &str = "GAME_LAUNCH_STRATEGY";

/// Display name used when none is configured.
pub const DEFAULT_GAME_NAME: &str = "VR Cricket";
/// Port the control plane listens on by default.
pub const DEFAULT_PORT: u16 = 5001;

/// Platform default location of the game executable.
pub fn default_executable() -> PathBuf {
    #[cfg(windows)]
    {
        PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common\iB Cricket\iB Cricket.exe")
    }

    #[cfg(not(windows))]
    {
        PathBuf::from("/usr/local/games/cricket/cricket.exe")
    }
}

/// How the game process is started and stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStrategy {
    /// Spawn the executable directly and keep its handle.
    #[default]
    Direct,
    /// Run the executable through the platform shell on a background thread.
    /// No handle is kept; stopping kills by executable name.
    Shell,
}

impl LaunchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStrategy::Direct => "direct",
            LaunchStrategy::Shell => "shell",
        }
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchStrategy {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(LaunchStrategy::Direct),
            "shell" => Ok(LaunchStrategy::Shell),
            other => Err(LauncherError::Config {
                message: format!("unknown launch strategy '{other}' (expected 'direct' or 'shell')"),
            }),
        }
    }
}

/// Configuration for the process controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Path to the game executable.
    pub executable: PathBuf,
    /// Name used in human-readable messages.
    pub game_name: String,
    /// Launch strategy.
    pub strategy: LaunchStrategy,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self::new(default_executable())
    }
}

impl LauncherConfig {
    /// Create a config for the given executable with default name and strategy.
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            game_name: DEFAULT_GAME_NAME.to_string(),
            strategy: LaunchStrategy::default(),
        }
    }

    /// Set the display name.
    pub fn with_game_name(mut self, name: impl Into<String>) -> Self {
        self.game_name = name.into();
        self
    }

    /// Set the launch strategy.
    pub fn with_strategy(mut self, strategy: LaunchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the configuration before the server starts.
    ///
    /// Only an empty path is rejected. A relative or missing executable is
    /// logged and accepted, since the game may be installed later; launches
    /// then fail with a spawn error.
    pub fn validate(&self) -> Result<()> {
        if self.executable.as_os_str().is_empty() {
            return Err(LauncherError::Config {
                message: "game executable path is empty".into(),
            });
        }
        if self.game_name.trim().is_empty() {
            return Err(LauncherError::Config {
                message: "game name is empty".into(),
            });
        }

        if !self.executable.is_absolute() {
            warn!(
                "Game executable path is relative and resolves against the working directory: {}",
                self.executable.display()
            );
        }
        if !self.executable.exists() {
            warn!(
                "Game executable not found (launches will fail until it exists): {}",
                self.executable.display()
            );
        }

        Ok(())
    }
}

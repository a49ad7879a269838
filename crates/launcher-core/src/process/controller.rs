//! Single-instance process controller.

use super::launcher::{launcher_for, Launched, ManagedProcess, ProcessLauncher};
use crate::config::{LaunchStrategy, LauncherConfig};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};

/// Result of a successful launch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A new process was spawned.
    Started { pid: u32 },
    /// The tracked process is still alive; nothing was spawned.
    AlreadyRunning { pid: u32 },
    /// Start was handed to a background thread (shell strategy).
    Initiated,
}

/// Result of a successful stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The tracked process was killed.
    Stopped { pid: u32 },
    /// The tracked process had already exited on its own.
    AlreadyExited { pid: u32 },
    /// Nothing was tracked.
    NotRunning,
    /// No handle; a kill-by-name sweep ran (shell strategy).
    Swept { killed: u32 },
}

/// Snapshot of the managed process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStatus {
    pub running: bool,
    pub pid: Option<u32>,
    pub launched_at: Option<DateTime<Utc>>,
    pub strategy: LaunchStrategy,
    pub executable: PathBuf,
}

/// Owns the single managed process handle.
///
/// Every operation holds the slot lock for its whole read-modify-write, so
/// overlapping launch and stop calls are serialized.
pub struct ProcessController {
    executable: PathBuf,
    launcher: Arc<dyn ProcessLauncher>,
    slot: Mutex<Option<ManagedProcess>>,
}

impl ProcessController {
    /// Create a controller using the launcher selected by the config's strategy.
    pub fn new(config: &LauncherConfig) -> Self {
        Self::with_launcher(&config.executable, launcher_for(config.strategy))
    }

    /// Create a controller with an explicit launcher.
    pub fn with_launcher(executable: impl AsRef<Path>, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            launcher,
            slot: Mutex::new(None),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn strategy(&self) -> LaunchStrategy {
        self.launcher.strategy()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<ManagedProcess>> {
        // A panic while holding the lock leaves the slot itself consistent.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop the tracked handle if its process has exited.
    fn reap_exited(slot: &mut Option<ManagedProcess>) -> Option<u32> {
        let process = slot.as_mut()?;
        let status = process.exit_status()?;
        let pid = process.pid();
        info!("Process {} exited on its own with {}", pid, status);
        *slot = None;
        Some(pid)
    }

    /// Launch the game, returning the structured outcome.
    pub fn try_launch(&self) -> Result<LaunchOutcome> {
        let mut slot = self.lock_slot();
        Self::reap_exited(&mut slot);

        if let Some(process) = slot.as_ref() {
            let pid = process.pid();
            info!("Process {} is already running, not launching another", pid);
            return Ok(LaunchOutcome::AlreadyRunning { pid });
        }

        match self.launcher.launch(&self.executable)? {
            Launched::Tracked(process) => {
                let pid = process.pid();
                *slot = Some(process);
                Ok(LaunchOutcome::Started { pid })
            }
            Launched::Detached => Ok(LaunchOutcome::Initiated),
        }
    }

    /// Stop the game, returning the structured outcome.
    ///
    /// On failure the handle is kept so the stop can be retried.
    pub fn try_stop(&self) -> Result<StopOutcome> {
        let mut slot = self.lock_slot();

        if let Some(pid) = Self::reap_exited(&mut slot) {
            return Ok(StopOutcome::AlreadyExited { pid });
        }

        match slot.as_mut() {
            Some(process) => {
                let pid = process.pid();
                info!("Stopping process {}", pid);
                self.launcher.terminate(process)?;
                *slot = None;
                info!("Process {} stopped", pid);
                Ok(StopOutcome::Stopped { pid })
            }
            None => match self.launcher.terminate_untracked(&self.executable)? {
                0 if self.strategy() == LaunchStrategy::Direct => Ok(StopOutcome::NotRunning),
                killed => Ok(StopOutcome::Swept { killed }),
            },
        }
    }

    /// Launch the game. Failures are logged and reported as `false`.
    pub fn launch(&self) -> bool {
        match self.try_launch() {
            Ok(_) => true,
            Err(e) => {
                error!(kind = e.kind(), "Launch failed: {}", e);
                false
            }
        }
    }

    /// Stop the game. Stopping when nothing runs is a success.
    pub fn stop(&self) -> bool {
        match self.try_stop() {
            Ok(_) => true,
            Err(e) => {
                error!(kind = e.kind(), "Stop failed: {}", e);
                false
            }
        }
    }

    /// Current state of the managed process.
    pub fn status(&self) -> ProcessStatus {
        let mut slot = self.lock_slot();
        Self::reap_exited(&mut slot);

        // Without a handle, fall back to whatever the launcher can find.
        let pid = match slot.as_ref() {
            Some(process) => Some(process.pid()),
            None => self.launcher.find_untracked(&self.executable).first().copied(),
        };

        ProcessStatus {
            running: pid.is_some(),
            pid,
            launched_at: slot.as_ref().map(ManagedProcess::launched_at),
            strategy: self.strategy(),
            executable: self.executable.clone(),
        }
    }
}

impl Drop for ProcessController {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(|p| p.into_inner());
        if let Some(process) = slot.as_ref() {
            // The game outlives the controller; it is not supervised.
            warn!("Releasing handle for process {} without stopping it", process.pid());
        }
    }
}

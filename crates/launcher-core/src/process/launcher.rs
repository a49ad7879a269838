//! Process launching strategies.

use crate::config::LaunchStrategy;
use crate::error::{LauncherError, Result};
use crate::platform;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A spawned game process and its OS handle.
#[derive(Debug)]
pub struct ManagedProcess {
    child: Child,
    launched_at: DateTime<Utc>,
}

impl ManagedProcess {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            launched_at: Utc::now(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn launched_at(&self) -> DateTime<Utc> {
        self.launched_at
    }

    /// Exit status if the process has already exited (reaps it), `None` while
    /// it is still running.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        match self.child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to query process {}: {}", self.pid(), e);
                None
            }
        }
    }

    pub fn is_running(&mut self) -> bool {
        self.exit_status().is_none()
    }

    /// Forcefully terminate and reap the process.
    ///
    /// # Platform Behavior
    /// - **Unix**: `SIGKILL`
    /// - **Windows**: `TerminateProcess`
    pub fn kill(&mut self) -> Result<()> {
        let pid = self.pid();
        self.child
            .kill()
            .map_err(|e| LauncherError::terminate_failed(pid, e))?;
        let status = self
            .child
            .wait()
            .map_err(|e| LauncherError::terminate_failed(pid, e))?;
        debug!("Process {} reaped with {}", pid, status);
        Ok(())
    }
}

/// What a launcher produced.
#[derive(Debug)]
pub enum Launched {
    /// A child with a handle the controller can track.
    Tracked(ManagedProcess),
    /// Start was handed to a background thread; no handle is available.
    Detached,
}

/// Strategy for starting and stopping the game executable.
pub trait ProcessLauncher: Send + Sync {
    fn strategy(&self) -> LaunchStrategy;

    /// Start `executable` with no arguments.
    fn launch(&self, executable: &Path) -> Result<Launched>;

    /// Terminate a tracked process.
    fn terminate(&self, process: &mut ManagedProcess) -> Result<()> {
        process.kill()
    }

    /// Stop the game when no handle is tracked. Returns the number of
    /// processes killed.
    fn terminate_untracked(&self, _executable: &Path) -> Result<u32> {
        Ok(0)
    }

    /// Pids of game processes started without a handle.
    fn find_untracked(&self, _executable: &Path) -> Vec<u32> {
        vec![]
    }
}

/// Select the launcher for a strategy.
pub fn launcher_for(strategy: LaunchStrategy) -> Arc<dyn ProcessLauncher> {
    match strategy {
        LaunchStrategy::Direct => Arc::new(DirectLauncher),
        LaunchStrategy::Shell => Arc::new(ShellLauncher),
    }
}

/// Spawns the executable directly and returns its handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectLauncher;

impl ProcessLauncher for DirectLauncher {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Direct
    }

    fn launch(&self, executable: &Path) -> Result<Launched> {
        info!("Launching {}", executable.display());

        // Environment and console output are inherited, nothing is captured.
        let child = Command::new(executable)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| LauncherError::spawn_failed(executable, e))?;

        info!("Launched process with PID {}", child.id());
        Ok(Launched::Tracked(ManagedProcess::new(child)))
    }
}

/// Runs the executable through the platform shell on a background thread.
///
/// The thread blocks until the game exits and logs its exit code. The
/// launch itself reports success as soon as the thread is started, so a
/// missing executable only shows up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl ProcessLauncher for ShellLauncher {
    fn strategy(&self) -> LaunchStrategy {
        LaunchStrategy::Shell
    }

    fn launch(&self, executable: &Path) -> Result<Launched> {
        info!("Launching {} through the shell", executable.display());

        let mut cmd = platform::shell_command(executable);
        cmd.stdin(Stdio::null());
        let path = executable.to_path_buf();

        std::thread::Builder::new()
            .name("shell-launch".into())
            .spawn(move || match cmd.status() {
                Ok(status) if status.success() => {
                    info!("{} exited cleanly", path.display());
                }
                Ok(status) => {
                    warn!("{} exited with {}", path.display(), status);
                }
                Err(e) => {
                    error!("Failed to run {} through the shell: {}", path.display(), e);
                }
            })
            .map_err(|e| LauncherError::spawn_failed(executable, e))?;

        Ok(Launched::Detached)
    }

    fn terminate_untracked(&self, executable: &Path) -> Result<u32> {
        let killed = platform::kill_processes_by_name(executable);
        info!(
            "Kill-by-name sweep for {} stopped {} process(es)",
            executable.display(),
            killed
        );
        Ok(killed)
    }

    fn find_untracked(&self, executable: &Path) -> Vec<u32> {
        platform::find_processes_by_name(executable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_for_strategy() {
        assert_eq!(
            launcher_for(LaunchStrategy::Direct).strategy(),
            LaunchStrategy::Direct
        );
        assert_eq!(
            launcher_for(LaunchStrategy::Shell).strategy(),
            LaunchStrategy::Shell
        );
    }

    #[test]
    fn test_direct_launch_missing_executable() {
        let result = DirectLauncher.launch(Path::new("/definitely/missing/game.exe"));
        match result {
            Err(LauncherError::SpawnFailed { path, .. }) => {
                assert_eq!(path, Path::new("/definitely/missing/game.exe"));
            }
            other => panic!("expected SpawnFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_untracked_stop_is_noop() {
        let killed = DirectLauncher
            .terminate_untracked(Path::new("/definitely/missing/game.exe"))
            .unwrap();
        assert_eq!(killed, 0);
    }

    #[test]
    fn test_shell_launch_is_detached() {
        // Returns before the shell reports the missing file.
        let result = ShellLauncher
            .launch(Path::new("/definitely/missing/game-7f3a.exe"))
            .unwrap();
        assert!(matches!(result, Launched::Detached));
    }

    #[cfg(unix)]
    #[test]
    fn test_managed_process_kill() {
        let child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let mut process = ManagedProcess::new(child);
        assert!(process.is_running());

        process.kill().unwrap();
        assert!(!process.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_managed_process_exit_status() {
        let child = Command::new("true").spawn().unwrap();
        let mut process = ManagedProcess::new(child);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while process.is_running() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        let status = process.exit_status().unwrap();
        assert!(status.success());
    }
}

//! Platform-specific process helpers.
//!
//! Used by the shell launcher, which has no child handle and therefore finds
//! the game again by name when asked to stop it.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, warn};

/// Build a command that runs `executable` through the platform shell.
///
/// # Platform Behavior
/// - **Windows**: `cmd /C "<path>"`
/// - **Others**: `sh -c "<path>"`
pub fn shell_command(executable: &Path) -> Command {
    let quoted = format!("\"{}\"", executable.display());

    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", &quoted]);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", &quoted]);
        cmd
    }
}

fn refreshed_system() -> System {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::new()
            .with_exe(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet),
    );
    system
}

/// Whether a command-line argument names `executable`, with or without the
/// quotes `shell_command` wraps it in.
fn arg_names_executable(arg: &OsStr, executable: &Path) -> bool {
    if Path::new(arg) == executable {
        return true;
    }
    arg.to_str()
        .map(|arg| Path::new(arg.trim_matches('"')) == executable)
        .unwrap_or(false)
}

fn matching_pids(system: &System, executable: &Path) -> Vec<Pid> {
    let Some(file_name) = executable.file_name() else {
        return vec![];
    };
    let own_pid = std::process::id();

    system
        .processes()
        .iter()
        .filter(|(pid, _)| pid.as_u32() != own_pid)
        .filter(|(_, process)| process.status() != ProcessStatus::Zombie)
        .filter(|(_, process)| {
            // Names are truncated on Linux and `exe` is the interpreter for
            // scripts, so the command line is checked too.
            process.name() == file_name
                || process.exe() == Some(executable)
                || process
                    .cmd()
                    .iter()
                    .any(|arg| arg_names_executable(arg, executable))
        })
        .map(|(pid, _)| *pid)
        .collect()
}

/// Find processes whose name equals the executable's file name, whose
/// executable path equals `executable`, or whose command line contains it.
///
/// Returns a list of pids, never including the current process.
pub fn find_processes_by_name(executable: &Path) -> Vec<u32> {
    let system = refreshed_system();
    matching_pids(&system, executable)
        .into_iter()
        .map(|pid| pid.as_u32())
        .collect()
}

/// Force-kill every process matching `executable` (see
/// [`find_processes_by_name`]).
///
/// Best effort: failures are logged and skipped. Returns the number of
/// processes the OS accepted a kill signal for.
pub fn kill_processes_by_name(executable: &Path) -> u32 {
    let system = refreshed_system();
    let mut killed = 0;

    for pid in matching_pids(&system, executable) {
        let Some(process) = system.process(pid) else {
            continue;
        };
        if process.kill() {
            debug!("Killed process {} matching {}", pid, executable.display());
            killed += 1;
        } else {
            warn!("Failed to kill process {} matching {}", pid, executable.display());
        }
    }

    killed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_nonexistent_name() {
        let pids = find_processes_by_name(Path::new("/nowhere/no-such-game-7f3a.exe"));
        assert!(pids.is_empty());
    }

    #[test]
    fn test_kill_nonexistent_name() {
        assert_eq!(kill_processes_by_name(Path::new("no-such-game-7f3a.exe")), 0);
    }

    #[test]
    fn test_path_without_file_name_matches_nothing() {
        assert!(find_processes_by_name(Path::new("/")).is_empty());
    }

    #[test]
    fn test_own_process_is_excluded() {
        let own_exe = std::env::current_exe().unwrap();
        let pids = find_processes_by_name(&own_exe);
        assert!(!pids.contains(&std::process::id()));
    }

    #[test]
    fn test_arg_names_executable() {
        let exe = Path::new("/opt/games/iB Cricket Long Name.exe");
        assert!(arg_names_executable(OsStr::new("/opt/games/iB Cricket Long Name.exe"), exe));
        assert!(arg_names_executable(OsStr::new("\"/opt/games/iB Cricket Long Name.exe\""), exe));
        assert!(!arg_names_executable(OsStr::new("/opt/games/iB Cricket"), exe));
        assert!(!arg_names_executable(OsStr::new("-c"), exe));
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_running_script_with_long_name() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        // Longer than the 15 characters Linux keeps as the process name.
        let dir = tempfile::TempDir::new().unwrap();
        let game = dir.path().join("iB Cricket Long Name.exe");
        std::fs::write(&game, "#!/bin/sh\nwhile true; do sleep 1; done\n").unwrap();
        std::fs::set_permissions(&game, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut child = Command::new(&game).spawn().unwrap();
        let pid = child.id();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !find_processes_by_name(&game).contains(&pid) {
            assert!(Instant::now() < deadline, "script never showed up");
            std::thread::sleep(Duration::from_millis(20));
        }

        assert!(kill_processes_by_name(&game) >= 1);
        let status = child.wait().unwrap();
        assert!(!status.success());
        assert!(!find_processes_by_name(&game).contains(&pid));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_command_quotes_path() {
        let cmd = shell_command(Path::new("/opt/My Game/run"));
        assert_eq!(cmd.get_program(), "sh");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-c", "\"/opt/My Game/run\""]);
    }
}

//! Process Launching
//!
//! The build step and the boss process are both opaque programs whose only
//! success signal is their exit status. [`ProcessLauncher`] is the seam the
//! pipeline talks to; [`SystemLauncher`] spawns real processes and tests
//! substitute stubs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// How often a running child is polled while a timeout is armed
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Failure to run a program to completion
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("process did not exit within {after:?}")]
    TimedOut { after: Duration },
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Terminating signal, if the process was killed (unix only)
    pub signal: Option<i32>,
}

impl ProcessExit {
    /// A normal exit with the given code
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {}", code),
            (None, Some(signal)) => write!(f, "terminated by signal {}", signal),
            (None, None) => write!(f, "unknown exit status"),
        }
    }
}

/// Runs a program with positional arguments and blocks until it exits
pub trait ProcessLauncher {
    /// Run `program` with `args`.
    ///
    /// With `timeout` set, a child still running at the deadline is
    /// terminated and `LaunchError::TimedOut` is returned.
    fn launch(
        &self,
        program: &Path,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ProcessExit, LaunchError>;
}

/// Launcher backed by `std::process::Command`
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    grace: Duration,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self {
            grace: Duration::from_millis(500),
        }
    }
}

impl SystemLauncher {
    /// Create a launcher with the default 500ms SIGTERM grace period
    pub fn new() -> Self {
        Self::default()
    }

    /// Time a timed-out child gets between SIGTERM and SIGKILL
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    fn wait_with_timeout(
        &self,
        child: &mut Child,
        limit: Duration,
    ) -> Result<ExitStatus, LaunchError> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(LaunchError::Wait)? {
                return Ok(status);
            }

            let remaining = limit.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                warn!(pid = child.id(), ?limit, "process timed out, terminating");
                self.terminate(child);
                return Err(LaunchError::TimedOut { after: limit });
            }

            thread::sleep(remaining.min(POLL_INTERVAL));
        }
    }

    /// SIGTERM, wait out the grace period, then SIGKILL
    fn terminate(&self, child: &mut Child) {
        // Ignore errors: the child may already be gone
        let _ = send_sigterm(child.id());

        let deadline = Instant::now() + self.grace;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => {}
                Err(_) => break,
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            thread::sleep(remaining.min(POLL_INTERVAL));
        }

        let _ = child.kill();
        let _ = child.wait();
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(
        &self,
        program: &Path,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ProcessExit, LaunchError> {
        debug!(program = %program.display(), ?args, ?timeout, "spawning process");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let status = match timeout {
            Some(limit) => self.wait_with_timeout(&mut child, limit)?,
            None => child.wait().map_err(LaunchError::Wait)?,
        };

        let exit = ProcessExit::from(status);
        debug!(program = %program.display(), %exit, "process exited");
        Ok(exit)
    }
}

/// Send SIGTERM to a process. Returns `Err` if the signal could not be delivered.
#[cfg(unix)]
fn send_sigterm(pid: u32) -> Result<(), std::io::Error> {
    let ret = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if ret == -1 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(())
    }
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) -> Result<(), std::io::Error> {
    Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_successful_exit() {
        let exit = SystemLauncher::new()
            .launch(Path::new("sh"), &sh("exit 0"), None)
            .unwrap();
        assert!(exit.success());
        assert_eq!(exit.code, Some(0));
    }

    #[test]
    fn test_nonzero_exit() {
        let exit = SystemLauncher::new()
            .launch(Path::new("sh"), &sh("exit 3"), None)
            .unwrap();
        assert!(!exit.success());
        assert_eq!(exit.code, Some(3));
        assert_eq!(exit.to_string(), "exit code 3");
    }

    #[test]
    fn test_positional_args_are_passed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args.txt");
        let script = format!("echo \"$1 $2\" > {}", out.display());
        let args = vec![
            "-c".to_string(),
            script,
            "sh".to_string(),
            "4".to_string(),
            "100".to_string(),
        ];
        let exit = SystemLauncher::new()
            .launch(Path::new("sh"), &args, None)
            .unwrap();
        assert!(exit.success());
        assert_eq!(std::fs::read_to_string(out).unwrap().trim(), "4 100");
    }

    #[test]
    fn test_missing_program() {
        let err = SystemLauncher::new()
            .launch(Path::new("/nonexistent/primebench-boss"), &[], None)
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/primebench-boss"));
    }

    #[test]
    fn test_timeout_terminates_child() {
        let start = Instant::now();
        let err = SystemLauncher::new()
            .with_grace(Duration::from_millis(100))
            .launch(
                Path::new("sh"),
                &sh("sleep 5"),
                Some(Duration::from_millis(100)),
            )
            .unwrap_err();
        assert!(matches!(err, LaunchError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_not_hit() {
        let exit = SystemLauncher::new()
            .launch(Path::new("sh"), &sh("exit 0"), Some(Duration::from_secs(10)))
            .unwrap();
        assert!(exit.success());
    }
}

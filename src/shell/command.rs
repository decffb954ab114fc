//! Subprocess execution with time budgets.
//!
//! Every external probe goes through [`CommandRunner`] so that a hung tool
//! can never block the remaining checks, and so tests can substitute
//! [`MockRunner`](super::MockRunner).

use crate::error::{EnvReadyError, Result};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long to keep reading output after the child exits.
///
/// A background process started by the child can inherit its pipes and hold
/// them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// First non-empty line of stdout, falling back to stderr.
    ///
    /// Some tools (older `cl.exe`, `java`) print their banner on stderr.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
    }
}

/// Runs external programs on behalf of the probe and remediator.
pub trait CommandRunner {
    /// Run `program` with `args`, killing it once `timeout` elapses.
    ///
    /// Returns [`EnvReadyError::ProbeTimeout`] on timeout and
    /// [`EnvReadyError::CommandFailed`] if the program cannot be started.
    /// A program that starts and exits non-zero is *not* an error; inspect
    /// [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput>;
}

/// Runs real processes on the host.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    /// Create a runner that inherits the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that starts every command in `cwd`.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
        let cmdline = command_line(program, args);
        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| {
            tracing::debug!("Failed to start `{}`: {}", cmdline, e);
            EnvReadyError::CommandFailed {
                command: cmdline.clone(),
                code: None,
            }
        })?;

        // Drain both pipes on helper threads so a chatty child cannot fill a
        // pipe buffer and stall before we get to wait on it.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = PipeReader::spawn(stdout);
        let stderr_reader = PipeReader::spawn(stderr);

        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if start.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::warn!("`{}` exceeded {:?}, killed", cmdline, timeout);
                    return Err(EnvReadyError::ProbeTimeout {
                        command: cmdline,
                        timeout_secs: timeout.as_secs(),
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let drain_deadline = Instant::now() + DRAIN_GRACE;
        let stdout = stdout_reader.finish(drain_deadline, &cmdline);
        let stderr = stderr_reader.finish(drain_deadline, &cmdline);
        let duration = start.elapsed();

        tracing::debug!("`{}` exited with {:?} in {:?}", cmdline, status.code(), duration);

        if status.success() {
            Ok(CommandOutput::success(stdout, stderr, duration))
        } else {
            Ok(CommandOutput::failure(
                status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

/// Render a program and its arguments for logs and error messages.
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Collects a child pipe on a helper thread.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl PipeReader {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut pipe) = pipe {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => match sink.lock() {
                            Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                            Err(_) => break,
                        },
                    }
                }
            }
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Wait until EOF or `deadline`, then return what was read so far.
    fn finish(self, deadline: Instant, cmdline: &str) -> String {
        let wait = deadline.saturating_duration_since(Instant::now());
        if self.done.recv_timeout(wait).is_err() {
            tracing::debug!("`{}` left a pipe open after exiting; output may be partial", cmdline);
        }
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_successful_command() {
        let runner = SystemRunner::new();
        let out = runner
            .run("sh", &["-c", "echo hello"], Duration::from_secs(5))
            .unwrap();

        assert!(out.success);
        assert_eq!(out.exit_code, Some(0));
        assert!(out.stdout.contains("hello"));
    }

    #[test]
    fn run_failing_command_is_not_an_error() {
        let runner = SystemRunner::new();
        let out = runner
            .run("sh", &["-c", "exit 3"], Duration::from_secs(5))
            .unwrap();

        assert!(!out.success);
        assert_eq!(out.exit_code, Some(3));
    }

    #[test]
    fn run_missing_program_is_command_failed() {
        let runner = SystemRunner::new();
        let err = runner
            .run("envready-no-such-program-xyz", &[], Duration::from_secs(5))
            .unwrap_err();

        assert!(matches!(err, EnvReadyError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn run_kills_command_after_timeout() {
        let runner = SystemRunner::new();
        let start = Instant::now();
        let err = runner
            .run("sh", &["-c", "sleep 5"], Duration::from_millis(200))
            .unwrap_err();

        assert!(matches!(err, EnvReadyError::ProbeTimeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn background_child_holding_pipes_does_not_block() {
        let runner = SystemRunner::new();
        let start = Instant::now();
        let out = runner
            .run("sh", &["-c", "sleep 5 & echo ready"], Duration::from_secs(10))
            .unwrap();

        assert!(out.success);
        assert!(out.stdout.contains("ready"));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn run_in_dir_uses_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner::in_dir(temp.path());
        let out = runner.run("pwd", &[], Duration::from_secs(5)).unwrap();

        let reported = PathBuf::from(out.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn first_line_falls_back_to_stderr() {
        let out = CommandOutput::success(
            "\n".to_string(),
            "Microsoft (R) C/C++ Optimizing Compiler\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(
            out.first_line(),
            Some("Microsoft (R) C/C++ Optimizing Compiler")
        );
    }

    #[test]
    fn command_line_joins_args() {
        assert_eq!(command_line("git", &["config", "--get"]), "git config --get");
        assert_eq!(command_line("cmake", &[]), "cmake");
    }
}

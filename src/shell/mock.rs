//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! Commands are looked up by a key made of the program's file stem and its
//! arguments, so `/opt/bin/rustup --version` and `rustup --version` both
//! resolve to `"rustup --version"`.
//!
//! # Example
//!
//! ```
//! use envready::shell::{CommandRunner, MockReply, MockRunner};
//! use std::time::Duration;
//!
//! let runner = MockRunner::new()
//!     .with_reply("git config --get core.longpaths", MockReply::stdout("false\n"))
//!     .with_reply("git config --global core.longpaths true", MockReply::stdout(""))
//!     .with_effect(
//!         "git config --global core.longpaths true",
//!         "git config --get core.longpaths",
//!         MockReply::stdout("true\n"),
//!     );
//!
//! let t = Duration::from_secs(1);
//! runner.run("git", &["config", "--global", "core.longpaths", "true"], t).unwrap();
//! let out = runner.run("git", &["config", "--get", "core.longpaths"], t).unwrap();
//! assert_eq!(out.stdout.trim(), "true");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{EnvReadyError, Result};

use super::command::{command_line, CommandOutput, CommandRunner};

/// Scripted outcome for one command key.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// The command ran and exited with `code`.
    Output {
        stdout: String,
        stderr: String,
        code: i32,
    },
    /// The command exceeded its time budget.
    Timeout,
    /// The program could not be started.
    NotFound,
}

impl MockReply {
    /// A successful run printing `stdout`.
    pub fn stdout(stdout: &str) -> Self {
        Self::Output {
            stdout: stdout.to_string(),
            stderr: String::new(),
            code: 0,
        }
    }

    /// A run exiting with `code` and printing `stderr`.
    pub fn exit(code: i32, stderr: &str) -> Self {
        Self::Output {
            stdout: String::new(),
            stderr: stderr.to_string(),
            code,
        }
    }
}

/// Command runner that replays scripted replies and records every call.
#[derive(Debug, Default)]
pub struct MockRunner {
    replies: RefCell<HashMap<String, MockReply>>,
    effects: HashMap<String, Vec<(String, MockReply)>>,
    calls: RefCell<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command is [`MockReply::NotFound`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply for a command key.
    pub fn set_reply(&mut self, key: &str, reply: MockReply) {
        self.replies.get_mut().insert(key.to_string(), reply);
    }

    /// Builder form of [`set_reply`](Self::set_reply).
    pub fn with_reply(mut self, key: &str, reply: MockReply) -> Self {
        self.set_reply(key, reply);
        self
    }

    /// When `trigger` runs, replace the reply for `target` with `reply`.
    ///
    /// Models commands that change state observed by later commands, such as
    /// a `git config --global` write followed by a `git config --get` read.
    pub fn with_effect(mut self, trigger: &str, target: &str, reply: MockReply) -> Self {
        self.effects
            .entry(trigger.to_string())
            .or_default()
            .push((target.to_string(), reply));
        self
    }

    /// All command keys run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// How many times `key` has been run.
    pub fn call_count(&self, key: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == key).count()
    }

    fn key(program: &str, args: &[&str]) -> String {
        let stem = Path::new(program)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(program);
        command_line(stem, args)
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
        let key = Self::key(program, args);
        self.calls.borrow_mut().push(key.clone());

        let reply = self
            .replies
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or(MockReply::NotFound);

        if let Some(effects) = self.effects.get(&key) {
            let mut replies = self.replies.borrow_mut();
            for (target, new_reply) in effects {
                replies.insert(target.clone(), new_reply.clone());
            }
        }

        match reply {
            MockReply::Output {
                stdout,
                stderr,
                code,
            } => {
                if code == 0 {
                    Ok(CommandOutput::success(stdout, stderr, Duration::ZERO))
                } else {
                    Ok(CommandOutput::failure(
                        Some(code),
                        stdout,
                        stderr,
                        Duration::ZERO,
                    ))
                }
            }
            MockReply::Timeout => Err(EnvReadyError::ProbeTimeout {
                command: key,
                timeout_secs: timeout.as_secs(),
            }),
            MockReply::NotFound => Err(EnvReadyError::CommandFailed {
                command: key,
                code: None,
            }),
        }
    }
}

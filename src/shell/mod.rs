//! Subprocess execution and platform detection.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{command_line, CommandOutput, CommandRunner, SystemRunner};
pub use mock::{MockReply, MockRunner};
pub use platform::{is_ci, is_elevated, Platform};

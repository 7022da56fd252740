//! Test Utilities and Mocks
//!
//! Shared helpers for the smash integration suites.

#![allow(dead_code)]

pub mod mock_process;

pub use mock_process::MockProcessOps;

use nix::unistd::Pid;
use smash::{Command, Shell, ShellConfig};
use std::sync::Arc;

/// A shell whose signals and reaping go to the returned mock
pub fn mock_shell() -> (Shell, Arc<MockProcessOps>) {
    let ops = MockProcessOps::shared();
    (Shell::with_ops(ShellConfig::default(), ops.clone()), ops)
}

/// Parse a line that is known to be valid
pub fn command(line: &str) -> Command {
    Command::parse(line, 20)
        .expect("line should parse")
        .expect("line should not be empty")
}

/// File a fake job into the shell's table; returns its id
pub fn add_job(shell: &mut Shell, line: &str, pid: i32, stopped: bool) -> u32 {
    shell
        .context_mut()
        .jobs
        .add_job(command(line), Pid::from_raw(pid), stopped)
}

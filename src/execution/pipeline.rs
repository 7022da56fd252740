//! Two-stage pipelines
//!
//! The left stage writes into the pipe (standard output for `|`, standard
//! error for `|&`); the right stage reads from it. Each stage is a forked
//! copy of the shell that runs its sub-command and exits. The shell keeps
//! no pipe ends open, so the reader sees end-of-file once the writer is
//! done.

use nix::libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::sys::wait::WaitStatus;
use nix::unistd::{fork, pipe, ForkResult};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::execution::{self, dup_onto, enter_own_process_group, exit_child, flush_stdio};
use crate::models::{Command, PipeSource, PipelineCommand};

/// How each stage ended; `None` for a stage reaped elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    pub left: Option<WaitStatus>,
    pub right: Option<WaitStatus>,
}

/// Run both stages and wait for them, right stage first
pub fn run(cmd: &PipelineCommand, ctx: &mut ShellContext) -> Result<()> {
    run_and_collect(cmd, ctx).map(drop)
}

/// [`run`], handing back each stage's wait status
///
/// A stage whose sub-command returns to the shell code (a builtin, a
/// redirection, a failed exec) always exits with status 1.
pub fn run_and_collect(cmd: &PipelineCommand, ctx: &mut ShellContext) -> Result<StageStatus> {
    let (read_end, write_end) = pipe().map_err(|e| Error::syscall("pipe", e))?;

    let writer_target = match cmd.source {
        PipeSource::Stdout => STDOUT_FILENO,
        PipeSource::Stderr => STDERR_FILENO,
    };

    flush_stdio();
    // SAFETY: the shell is single-threaded
    let left = match unsafe { fork() } {
        Err(e) => return Err(Error::syscall("fork", e)),
        Ok(ForkResult::Child) => run_stage(ctx, &cmd.left, write_end, writer_target, read_end),
        Ok(ForkResult::Parent { child }) => child,
    };

    // SAFETY: as above
    let right = match unsafe { fork() } {
        Err(e) => {
            drop(read_end);
            drop(write_end);
            execution::wait_child(ctx, left)?;
            return Err(Error::syscall("fork", e));
        }
        Ok(ForkResult::Child) => run_stage(ctx, &cmd.right, read_end, STDIN_FILENO, write_end),
        Ok(ForkResult::Parent { child }) => child,
    };

    drop(read_end);
    drop(write_end);

    debug!("pipeline {:?}: left={} right={}", cmd.line, left, right);
    let right = execution::wait_child(ctx, right)?;
    let left = execution::wait_child(ctx, left)?;
    Ok(StageStatus { left, right })
}

/// Child side of one stage: wire `end` onto `target`, close both pipe
/// ends, run the sub-command and exit
fn run_stage(
    ctx: &mut ShellContext,
    command: &Command,
    end: OwnedFd,
    target: RawFd,
    other_end: OwnedFd,
) -> ! {
    if let Err(e) = enter_own_process_group() {
        exit_child(Some(e));
    }
    if let Err(e) = dup_onto(end.as_raw_fd(), target) {
        exit_child(Some(Error::syscall("dup2", e)));
    }
    drop(end);
    drop(other_end);

    let err = execution::run(command, ctx).err();
    exit_child(err)
}

//! Process Orchestrator
//!
//! Runs a built [`Command`]: builtins in-process, external programs via
//! fork/exec, pipelines as two forked stages joined by a pipe, and
//! redirections by swapping standard output around the inner command.
//! Foreground waits are stop-aware and hand pending Ctrl-Z / Ctrl-C /
//! alarm requests to the signal bridge when interrupted.

pub mod external;
pub mod pipeline;
pub mod redirect;
pub mod timeout;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{setpgid, Pid};
use std::io::Write;
use std::os::fd::RawFd;

use crate::builtins;
use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::models::Command;
use crate::signals;

/// Execute a command against the shell context
pub fn run(command: &Command, ctx: &mut ShellContext) -> Result<()> {
    match command {
        Command::Builtin(cmd) => builtins::execute(cmd, ctx),
        Command::External(cmd) => external::run(cmd, ctx),
        Command::Pipeline(cmd) => pipeline::run(cmd, ctx),
        Command::Redirection(cmd) => redirect::run(cmd, ctx),
    }
}

/// Record `pid` as the foreground job, wait for it, then reap
///
/// Requests raised while nothing was in the foreground are handled first,
/// so a Ctrl-C or Ctrl-Z typed at the prompt never reaches the new job.
pub fn run_in_foreground(ctx: &mut ShellContext, pid: Pid, command: Command) -> Result<()> {
    signals::dispatch(ctx);

    ctx.set_foreground(pid, command);
    let result = wait_foreground(ctx, pid);
    ctx.clear_foreground();
    ctx.jobs.remove_finished_jobs();
    result
}

/// Block until the foreground process exits, is killed, or stops
///
/// Pending signal requests are dispatched before every wait. With handlers
/// installed the wait polls and sleeps on the wake pipe, so a request that
/// lands just after a `waitpid` is still handled before the child finishes.
/// A stop the shell did not ask for files the process as a stopped job.
pub fn wait_foreground(ctx: &mut ShellContext, pid: Pid) -> Result<()> {
    let mut flags = WaitPidFlag::WUNTRACED;
    if signals::wakeups_enabled() {
        flags |= WaitPidFlag::WNOHANG;
    }

    loop {
        signals::dispatch(ctx);

        match waitpid(pid, Some(flags)) {
            Ok(WaitStatus::StillAlive) => signals::wait_for_wakeup()?,
            Ok(WaitStatus::Stopped(_, signal)) => {
                debug!("pid {} stopped by {}", pid, signal.as_str());
                if ctx.is_foreground(pid) {
                    signals::record_stopped(ctx);
                }
                return Ok(());
            }
            Ok(status) => {
                debug!("pid {} finished: {:?}", pid, status);
                return Ok(());
            }
            Err(Errno::EINTR) => {}
            Err(Errno::ECHILD) => {
                // Already reaped, e.g. by the job table after a Ctrl-C
                return Ok(());
            }
            Err(e) => return Err(Error::syscall("waitpid", e)),
        }
    }
}

/// Wait for a pipeline stage, retrying across interrupted waits
///
/// `None` when the stage was already reaped elsewhere.
fn wait_child(ctx: &mut ShellContext, pid: Pid) -> Result<Option<WaitStatus>> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => {
                debug!("pipeline stage {} finished: {:?}", pid, status);
                return Ok(Some(status));
            }
            Err(Errno::EINTR) => signals::dispatch(ctx),
            Err(Errno::ECHILD) => return Ok(None),
            Err(e) => return Err(Error::syscall("waitpid", e)),
        }
    }
}

/// Flush buffered output so a fork does not duplicate it
pub(crate) fn flush_stdio() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

/// `dup2(fd, target)`
pub(crate) fn dup_onto(fd: RawFd, target: RawFd) -> std::result::Result<(), Errno> {
    // SAFETY: both descriptors are plain integers; dup2 validates them
    Errno::result(unsafe { nix::libc::dup2(fd, target) }).map(drop)
}

/// Child side: leave the shell's process group
pub(crate) fn enter_own_process_group() -> Result<()> {
    setpgid(Pid::from_raw(0), Pid::from_raw(0)).map_err(|e| Error::syscall("setpgid", e))
}

/// Child side: report, flush and terminate without returning to the shell loop
pub(crate) fn exit_child(err: Option<Error>) -> ! {
    if let Some(err) = err {
        err.report();
    }
    flush_stdio();
    std::process::exit(1)
}

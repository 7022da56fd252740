//! External programs
//!
//! The child moves into its own process group so terminal signals reach
//! only the shell, then replaces itself with the program. Lines carrying
//! glob metacharacters are handed untouched to the configured interpreter
//! (`<interpreter> -c <line>`); everything else is exec'd directly with a
//! `PATH` search.

use nix::unistd::{execv, execvp, fork, ForkResult, Pid};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::execution::{enter_own_process_group, exit_child, flush_stdio, run_in_foreground};
use crate::models::{Command, ExternalCommand};
use crate::parser;

/// Fork and exec without waiting; returns the child's pid
pub fn launch(cmd: &ExternalCommand, ctx: &ShellContext) -> Result<Pid> {
    // Everything the child needs is allocated before the fork
    let argv = cmd
        .args
        .iter()
        .map(|arg| to_cstring(arg.as_bytes()))
        .collect::<Result<Vec<_>>>()?;
    let program = argv
        .first()
        .ok_or_else(|| Error::Parse("missing program name".to_string()))?;
    let interpreter = to_cstring(ctx.config.interpreter.as_os_str().as_bytes())?;
    let interpreter_argv = [
        interpreter.clone(),
        to_cstring(b"-c")?,
        to_cstring(cmd.line.as_bytes())?,
    ];

    flush_stdio();
    // SAFETY: the shell is single-threaded; the child only calls setpgid,
    // exec and exit
    match unsafe { fork() } {
        Err(e) => Err(Error::syscall("fork", e)),
        Ok(ForkResult::Child) => {
            if let Err(e) = enter_own_process_group() {
                exit_child(Some(e));
            }
            let err = if cmd.complex {
                match execv(&interpreter, &interpreter_argv) {
                    Err(e) => Error::syscall("execv", e),
                    Ok(never) => match never {},
                }
            } else {
                match execvp(program, &argv) {
                    Err(e) => Error::syscall("execvp", e),
                    Ok(never) => match never {},
                }
            };
            exit_child(Some(err))
        }
        Ok(ForkResult::Parent { child }) => {
            debug!(
                "forked pid {} for {:?} (complex={})",
                child, cmd.line, cmd.complex
            );
            Ok(child)
        }
    }
}

/// File a launched child as a background job, or wait for it in the foreground
pub fn settle(cmd: &ExternalCommand, pid: Pid, ctx: &mut ShellContext) -> Result<()> {
    let command = Command::External(cmd.clone());

    if parser::has_background_marker(&cmd.line) {
        ctx.jobs.add_job(command, pid, false);
        return Ok(());
    }

    run_in_foreground(ctx, pid, command)
}

/// Run an external command to completion (or into the background)
pub fn run(cmd: &ExternalCommand, ctx: &mut ShellContext) -> Result<()> {
    let pid = launch(cmd, ctx)?;
    settle(cmd, pid, ctx)
}

fn to_cstring(bytes: &[u8]) -> Result<CString> {
    CString::new(bytes).map_err(|_| Error::Parse("argument contains a NUL byte".to_string()))
}

//! Output redirection (`>` and `>>`)
//!
//! Standard output is swapped for the target file around the inner
//! command and restored by [`StdoutRedirect`]'s `Drop`, so every exit
//! path (including errors from the inner command) gets the terminal back.

use nix::libc::STDOUT_FILENO;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::execution::{self, dup_onto};
use crate::models::{RedirectMode, RedirectionCommand};

/// Permission bits for files created by a redirection
pub const REDIRECT_FILE_MODE: u32 = 0o644;

/// Open a redirection target, creating it if needed
pub fn open_target(path: &Path, mode: RedirectMode) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).mode(REDIRECT_FILE_MODE);
    match mode {
        RedirectMode::Truncate => options.truncate(true),
        RedirectMode::Append => options.append(true),
    };
    options.open(path).map_err(|e| Error::from_io("open", e))
}

/// Standard output pointed at a file until dropped
pub struct StdoutRedirect {
    saved: OwnedFd,
}

impl StdoutRedirect {
    pub fn to_file(file: &File) -> Result<Self> {
        let _ = std::io::stdout().flush();

        let saved = std::io::stdout()
            .as_fd()
            .try_clone_to_owned()
            .map_err(|e| Error::from_io("dup", e))?;
        dup_onto(file.as_raw_fd(), STDOUT_FILENO).map_err(|e| Error::syscall("dup2", e))?;

        trace!("stdout redirected (saved fd {})", saved.as_raw_fd());
        Ok(Self { saved })
    }
}

impl Drop for StdoutRedirect {
    fn drop(&mut self) {
        let _ = std::io::stdout().flush();
        if let Err(e) = dup_onto(self.saved.as_raw_fd(), STDOUT_FILENO) {
            Error::syscall("dup2", e).report();
        }
        trace!("stdout restored");
    }
}

/// Run the inner command with standard output sent to the target file
pub fn run(cmd: &RedirectionCommand, ctx: &mut ShellContext) -> Result<()> {
    let file = open_target(&cmd.target, cmd.mode)?;
    debug!("redirecting {:?} to {}", cmd.inner.line(), cmd.target.display());

    let guard = StdoutRedirect::to_file(&file)?;
    let result = execution::run(&cmd.inner, ctx);
    drop(guard);
    result
}

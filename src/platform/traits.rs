//! Platform-specific operation traits
//!
//! The job table and the signal bridge talk to the operating system
//! only through these traits, so tests can substitute a recording fake.

use crate::error::Result;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// Process-level operations used for job control
pub trait ProcessOps: Send + Sync {
    /// Deliver a signal to a process
    fn send_signal(&self, pid: Pid, signal: Signal) -> Result<()>;

    /// Non-blocking check whether a child has terminated (and reap it if so)
    fn has_terminated(&self, pid: Pid) -> bool;

    /// Zero-signal probe: does a process with this id still exist
    fn is_alive(&self, pid: Pid) -> bool;
}

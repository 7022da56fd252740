//! Mock process operations for testing
//!
//! Every pid is a live, unreaped process until the test marks it exited.
//! Signals are recorded instead of delivered.

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use smash::error::{Error, Result};
use smash::platform::ProcessOps;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recording stand-in for the OS
#[derive(Debug, Default)]
pub struct MockProcessOps {
    exited: Mutex<HashSet<i32>>,
    refused: Mutex<HashSet<i32>>,
    sent: Mutex<Vec<(i32, Signal)>>,
}

impl MockProcessOps {
    /// Create a new mock behind an `Arc`, ready to hand to a shell
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Simulate the process exiting
    pub fn exit(&self, pid: i32) {
        self.exited.lock().unwrap().insert(pid);
    }

    /// Make signal delivery to `pid` fail with EPERM
    pub fn refuse(&self, pid: i32) {
        self.refused.lock().unwrap().insert(pid);
    }

    /// Every signal delivered so far, in order
    pub fn sent(&self) -> Vec<(i32, Signal)> {
        self.sent.lock().unwrap().clone()
    }

    /// Signals delivered to one pid
    pub fn sent_to(&self, pid: i32) -> Vec<Signal> {
        self.sent()
            .into_iter()
            .filter(|(target, _)| *target == pid)
            .map(|(_, signal)| signal)
            .collect()
    }
}

impl ProcessOps for MockProcessOps {
    fn send_signal(&self, pid: Pid, signal: Signal) -> Result<()> {
        if self.refused.lock().unwrap().contains(&pid.as_raw()) {
            return Err(Error::SignalSendFailed {
                pid: pid.as_raw(),
                signal: signal.as_str().to_string(),
                source: Errno::EPERM,
            });
        }
        self.sent.lock().unwrap().push((pid.as_raw(), signal));
        if signal == Signal::SIGKILL {
            self.exit(pid.as_raw());
        }
        Ok(())
    }

    fn has_terminated(&self, pid: Pid) -> bool {
        self.exited.lock().unwrap().contains(&pid.as_raw())
    }

    fn is_alive(&self, pid: Pid) -> bool {
        !self.has_terminated(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_marks_exited() {
        let ops = MockProcessOps::default();
        ops.send_signal(Pid::from_raw(10), Signal::SIGKILL).unwrap();
        assert!(ops.has_terminated(Pid::from_raw(10)));
        assert_eq!(ops.sent_to(10), vec![Signal::SIGKILL]);
    }

    #[test]
    fn test_refused_delivery_is_not_recorded() {
        let ops = MockProcessOps::default();
        ops.refuse(11);
        assert!(ops.send_signal(Pid::from_raw(11), Signal::SIGSTOP).is_err());
        assert!(ops.sent().is_empty());
    }
}

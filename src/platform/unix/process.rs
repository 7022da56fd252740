//! Unix process operations

use crate::error::{Error, Result};
use crate::platform::traits::ProcessOps;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

pub struct UnixProcess;

impl UnixProcess {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessOps for UnixProcess {
    fn send_signal(&self, pid: Pid, signal: Signal) -> Result<()> {
        trace!("kill({}, {:?})", pid, signal);
        kill(pid, signal).map_err(|e| Error::SignalSendFailed {
            pid: pid.as_raw(),
            signal: signal.as_str().to_string(),
            source: e,
        })
    }

    fn has_terminated(&self, pid: Pid) -> bool {
        // Without WUNTRACED a stopped child reports StillAlive
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => false,
            Ok(_) => true,
            Err(_) => false,
        }
    }

    fn is_alive(&self, pid: Pid) -> bool {
        kill(pid, None).is_ok()
    }
}

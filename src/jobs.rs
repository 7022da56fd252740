//! Job Table
//!
//! Registry of background and stopped jobs. Process termination is
//! asynchronous to the shell, so every lookup first reaps entries whose
//! process has exited or disappeared.
//!
//! Job ids are not monotonic across reaps: after reaping, the next id is
//! one more than the largest live id, or 1 when the table is empty.

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::sync::Arc;

use crate::error::Error;
use crate::models::{Command, JobEntry};
use crate::platform::{Platform, ProcessOps};

/// Ordered collection of live jobs (insertion order = display order)
pub struct JobTable {
    jobs: Vec<JobEntry>,
    next_job_id: u32,
    ops: Arc<dyn ProcessOps>,
}

impl JobTable {
    /// Create an empty table backed by the real OS
    pub fn new() -> Self {
        Self::with_ops(Platform::process())
    }

    /// Create an empty table backed by the given process operations
    pub fn with_ops(ops: Arc<dyn ProcessOps>) -> Self {
        Self {
            jobs: Vec::new(),
            next_job_id: 1,
            ops,
        }
    }

    /// Process operations shared with the rest of the shell
    pub fn ops(&self) -> &Arc<dyn ProcessOps> {
        &self.ops
    }

    /// Reap finished jobs, then append a new entry; returns its id
    pub fn add_job(&mut self, command: Command, pid: Pid, stopped: bool) -> u32 {
        self.remove_finished_jobs();

        let job_id = self.next_job_id;
        let entry = JobEntry::new(job_id, pid, command, stopped);
        debug!(
            "job [{}] added: pid={} stopped={} line={:?}",
            job_id, pid, stopped, entry.command_line
        );
        self.jobs.push(entry);
        self.next_job_id += 1;
        job_id
    }

    /// Drop entries whose process was reaped or no longer exists, then
    /// recompute the next id from the largest remaining one
    pub fn remove_finished_jobs(&mut self) {
        let ops = Arc::clone(&self.ops);
        self.jobs.retain(|job| {
            let finished = ops.has_terminated(job.pid) || !ops.is_alive(job.pid);
            if finished {
                debug!("job [{}] reaped: pid={}", job.job_id, job.pid);
            }
            !finished
        });

        self.next_job_id = self.jobs.iter().map(|job| job.job_id).max().unwrap_or(0) + 1;
    }

    /// Find a live job by id
    pub fn get_job_by_id(&mut self, job_id: u32) -> Option<&mut JobEntry> {
        self.remove_finished_jobs();
        self.jobs.iter_mut().find(|job| job.job_id == job_id)
    }

    /// Find a live job by process id
    pub fn get_job_by_pid(&mut self, pid: Pid) -> Option<&mut JobEntry> {
        self.remove_finished_jobs();
        self.jobs.iter_mut().find(|job| job.pid == pid)
    }

    /// The most recently inserted live job
    pub fn get_last_job(&mut self) -> Option<&mut JobEntry> {
        self.remove_finished_jobs();
        self.jobs.last_mut()
    }

    /// The most recently inserted job whose stopped flag is set
    pub fn get_last_stopped_job(&mut self) -> Option<&mut JobEntry> {
        self.remove_finished_jobs();
        self.jobs.iter_mut().rev().find(|job| job.stopped)
    }

    /// Remove an entry without reaping and hand it back to the caller
    pub fn remove_job_by_id(&mut self, job_id: u32) -> Option<JobEntry> {
        let index = self.jobs.iter().position(|job| job.job_id == job_id)?;
        debug!("job [{}] removed", job_id);
        Some(self.jobs.remove(index))
    }

    /// Kill every live job, empty the table and reset the id counter
    ///
    /// A failed delivery does not stop the remaining jobs from being
    /// processed; the failures are returned for reporting.
    pub fn kill_all_jobs(&mut self) -> Vec<Error> {
        self.remove_finished_jobs();

        let mut failures = Vec::new();
        for job in self.jobs.drain(..) {
            if let Err(e) = self.ops.send_signal(job.pid, Signal::SIGKILL) {
                warn!("failed to kill job [{}] pid={}: {}", job.job_id, job.pid, e);
                failures.push(e);
            }
        }
        self.next_job_id = 1;
        failures
    }

    /// Reap, then iterate over the live jobs in insertion order
    pub fn live_jobs(&mut self) -> std::slice::Iter<'_, JobEntry> {
        self.remove_finished_jobs();
        self.jobs.iter()
    }

    /// Iterate without reaping
    pub fn iter(&self) -> std::slice::Iter<'_, JobEntry> {
        self.jobs.iter()
    }

    /// Id the next added job will receive (before any reaping)
    pub fn next_job_id(&self) -> u32 {
        self.next_job_id
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JobTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTable")
            .field("jobs", &self.jobs)
            .field("next_job_id", &self.next_job_id)
            .finish()
    }
}

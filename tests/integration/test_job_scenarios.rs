//! Integration tests for job-table scenarios
//!
//! Fake pids behind `MockProcessOps` stand in for real children.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use smash::JobTable;
use test_utils::{command, mock_shell, MockProcessOps};

#[test]
fn test_last_stopped_job_scenario() {
    let ops = MockProcessOps::shared();
    let mut jobs = JobTable::with_ops(ops);

    assert_eq!(jobs.add_job(command("sleep 10 &"), Pid::from_raw(100), false), 1);
    assert_eq!(jobs.add_job(command("sleep 20 &"), Pid::from_raw(200), false), 2);
    jobs.get_job_by_id(2).unwrap().mark_stopped();

    let last = jobs.get_last_stopped_job().unwrap();
    assert_eq!(last.job_id, 2);
    assert_eq!(last.pid, Pid::from_raw(200));
}

#[test]
fn test_kill_all_scenario() {
    let ops = MockProcessOps::shared();
    let mut jobs = JobTable::with_ops(ops.clone());
    jobs.add_job(command("sleep 10 &"), Pid::from_raw(100), false);
    jobs.add_job(command("sleep 20 &"), Pid::from_raw(200), false);
    jobs.add_job(command("sleep 30 &"), Pid::from_raw(300), false);
    ops.refuse(200);

    let failures = jobs.kill_all_jobs();

    assert_eq!(failures.len(), 1);
    assert_eq!(
        ops.sent(),
        vec![(100, Signal::SIGKILL), (300, Signal::SIGKILL)]
    );
    assert!(jobs.is_empty());
    assert_eq!(jobs.next_job_id(), 1);
}

#[test]
fn test_reaped_job_disappears_from_lookups() {
    let ops = MockProcessOps::shared();
    let mut jobs = JobTable::with_ops(ops.clone());
    jobs.add_job(command("sleep 10 &"), Pid::from_raw(100), false);
    jobs.add_job(command("sleep 20 &"), Pid::from_raw(200), false);

    ops.exit(100);

    assert!(jobs.get_job_by_id(1).is_none());
    assert_eq!(jobs.live_jobs().count(), 1);
    // Ids are not renumbered
    assert_eq!(jobs.get_job_by_pid(Pid::from_raw(200)).unwrap().job_id, 2);
}

#[test]
fn test_whitespace_line_touches_nothing() {
    let (mut shell, ops) = mock_shell();
    for line in ["", "   ", "\t \n", " & "] {
        shell.try_execute_line(line).unwrap();
    }
    assert!(shell.context().jobs.is_empty());
    assert!(ops.sent().is_empty());
}

#[test]
fn test_stop_and_resume_flow() {
    let (mut shell, ops) = mock_shell();
    let ctx = shell.context_mut();
    ctx.set_foreground(Pid::from_raw(900_100), command("sleep 100"));

    smash::signals::handle_stop(ctx);
    assert_eq!(ctx.jobs.len(), 1);
    assert!(ctx.jobs.get_job_by_id(1).unwrap().stopped);

    shell.try_execute_line("bg 1").unwrap();
    let job = shell.context_mut().jobs.get_job_by_id(1).unwrap();
    assert!(job.background);
    assert!(!job.stopped);
    assert_eq!(
        ops.sent_to(900_100),
        vec![Signal::SIGSTOP, Signal::SIGCONT]
    );
}

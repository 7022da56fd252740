//! Integration tests for the signal bridge against real children
//!
//! Pending requests live in process-wide state, so every test that raises
//! or dispatches one holds `PENDING_LOCK`.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;
use smash::execution::external;
use smash::models::{Command, ExternalCommand};
use smash::signals::{self, SignalRequest};
use smash::{Shell, ShellConfig, ShellContext};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use test_utils::{command, mock_shell};

static PENDING_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    PENDING_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Reap `pid`, retrying waits cut short by the SIGCHLD handler
fn reap(pid: Pid) -> Option<WaitStatus> {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => continue,
            result => return result.ok(),
        }
    }
}

fn sleeper(line: &str) -> ExternalCommand {
    match command(line) {
        Command::External(cmd) => cmd,
        other => panic!("expected external, got {:?}", other),
    }
}

#[test]
fn test_stop_without_foreground_is_noop() {
    let (mut shell, ops) = mock_shell();

    signals::handle_stop(shell.context_mut());
    signals::handle_interrupt(shell.context_mut());

    assert!(ops.sent().is_empty());
    assert!(shell.context().jobs.is_empty());
}

#[test]
fn test_pending_stop_files_real_child() {
    let _lock = serial();
    let mut ctx = ShellContext::new(ShellConfig::default());
    let cmd = sleeper("sleep 30");
    let pid = external::launch(&cmd, &ctx).unwrap();
    ctx.set_foreground(pid, Command::External(cmd));

    signals::request(SignalRequest::Stop);
    smash::execution::wait_foreground(&mut ctx, pid).unwrap();

    assert!(ctx.foreground().is_none());
    let job = ctx.jobs.get_job_by_pid(pid).unwrap();
    assert!(job.stopped);
    assert_eq!(job.command_line, "sleep 30");
    let stopped_command = job.command.clone();

    // Clean up the stopped child
    signals::request(SignalRequest::Interrupt);
    ctx.set_foreground(pid, stopped_command);
    signals::dispatch(&mut ctx);
    assert!(ctx.jobs.get_job_by_pid(pid).is_none());
    reap(pid);
}

#[test]
fn test_alarm_kills_expired_timeout() {
    let _lock = serial();
    let mut ctx = ShellContext::new(ShellConfig::default());
    let cmd = sleeper("sleep 30 &");
    let pid = external::launch(&cmd, &ctx).unwrap();
    external::settle(&cmd, pid, &mut ctx).unwrap();

    let start = std::time::Instant::now();
    ctx.timeouts.register(
        pid,
        "timeout 1 sleep 30&".to_string(),
        std::time::Duration::from_millis(1),
        start,
    );
    std::thread::sleep(std::time::Duration::from_millis(20));

    signals::handle_alarm(&mut ctx);

    let status = reap(pid);
    assert!(matches!(
        status,
        Some(WaitStatus::Signaled(p, Signal::SIGKILL, _)) if p == pid
    ));
    assert!(ctx.timeouts.is_empty());
    assert!(ctx.jobs.get_job_by_pid(pid).is_none());
}

#[test]
fn test_interrupt_without_table_entry() {
    let (mut shell, ops) = mock_shell();
    let ctx = shell.context_mut();
    ctx.set_foreground(Pid::from_raw(900_200), command("cat"));

    signals::handle_interrupt(ctx);

    assert_eq!(ops.sent_to(900_200), vec![Signal::SIGKILL]);
    assert!(ctx.jobs.is_empty());
    assert!(ctx.foreground().is_none());
}

#[test]
fn test_interrupt_at_prompt_does_not_reach_next_command() {
    let _lock = serial();
    let mut shell = Shell::new(ShellConfig::default());

    signals::request(SignalRequest::Interrupt);
    let start = Instant::now();
    shell.execute_line("sleep 0.3");

    assert!(start.elapsed() >= Duration::from_millis(250));
    assert!(shell.context().jobs.is_empty());
    assert!(signals::take_pending().is_empty());
}

#[test]
fn test_stop_at_prompt_does_not_reach_next_command() {
    let _lock = serial();
    let mut shell = Shell::new(ShellConfig::default());

    signals::request(SignalRequest::Stop);
    let start = Instant::now();
    shell.execute_line("sleep 0.3");

    assert!(start.elapsed() >= Duration::from_millis(250));
    assert!(shell.context().jobs.is_empty());
}

#[test]
fn test_stop_during_foreground_wait_is_handled_promptly() {
    let _lock = serial();
    signals::install_handlers().unwrap();
    assert!(signals::wakeups_enabled());
    let mut shell = Shell::new(ShellConfig::default());

    let raiser = thread::spawn(|| {
        thread::sleep(Duration::from_millis(300));
        signals::request(SignalRequest::Stop);
    });
    let start = Instant::now();
    shell.execute_line("sleep 30");
    raiser.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    let pid = {
        let job = shell.context_mut().jobs.get_job_by_id(1).unwrap();
        assert!(job.stopped);
        assert_eq!(job.command_line, "sleep 30");
        job.pid
    };

    shell.execute_line("kill -9 1");
    assert!(shell.context().jobs.is_empty());
    reap(pid);
}

//! Integration tests that fork real processes
//!
//! Output is checked through files, since redirection works on the
//! process-wide standard output descriptor. Every test holds
//! `STDOUT_LOCK` so one test's redirection never captures another test's
//! children.

use nix::sys::wait::{waitpid, WaitStatus};
use smash::execution::pipeline;
use smash::{Command, Shell, ShellConfig};
use std::fs::{self, File};
use std::os::fd::AsFd;
use std::os::unix::fs::MetadataExt;
use std::sync::{Mutex, MutexGuard};

static STDOUT_LOCK: Mutex<()> = Mutex::new(());

fn shell() -> (MutexGuard<'static, ()>, Shell) {
    let guard = STDOUT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    (guard, Shell::new(ShellConfig::default()))
}

/// (device, inode) of whatever fd 1 currently points at
fn stdout_identity() -> (u64, u64) {
    let fd = std::io::stdout().as_fd().try_clone_to_owned().unwrap();
    let meta = File::from(fd).metadata().unwrap();
    (meta.dev(), meta.ino())
}

#[test]
fn test_redirect_truncate_then_append() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let (_lock, mut shell) = shell();

    shell
        .try_execute_line(&format!("echo first > {}", out.display()))
        .unwrap();
    shell
        .try_execute_line(&format!("echo second >> {}", out.display()))
        .unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "first\nsecond\n");

    shell
        .try_execute_line(&format!("echo third > {}", out.display()))
        .unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "third\n");
}

#[test]
fn test_redirect_to_missing_directory_fails_cleanly() {
    let (_lock, mut shell) = shell();
    let err = shell
        .try_execute_line("echo lost > /definitely/not/here/out.txt")
        .unwrap_err();
    assert!(err.to_string().starts_with("open failed: "), "{}", err);
}

#[test]
fn test_pipeline_feeds_right_stage() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("upper.txt");
    let (_lock, mut shell) = shell();

    shell
        .try_execute_line(&format!("echo hello | tr a-z A-Z > {}", out.display()))
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "HELLO\n");
    assert!(shell.context().jobs.is_empty());
}

#[test]
fn test_stderr_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("err.txt");
    let (_lock, mut shell) = shell();

    shell
        .try_execute_line(&format!(
            "ls /definitely/not/here |& wc -l > {}",
            out.display()
        ))
        .unwrap();

    let count: u32 = fs::read_to_string(&out).unwrap().trim().parse().unwrap();
    assert!(count >= 1);
}

#[test]
fn test_complex_line_goes_through_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a1.log"), "").unwrap();
    let out = dir.path().join("glob.txt");
    let (_lock, mut shell) = shell();

    shell
        .try_execute_line(&format!(
            "ls {}/a?.log > {}",
            dir.path().display(),
            out.display()
        ))
        .unwrap();

    let listed = fs::read_to_string(&out).unwrap();
    assert!(listed.trim_end().ends_with("a1.log"), "{}", listed);
}

#[test]
fn test_background_job_then_kill() {
    let (_lock, mut shell) = shell();
    shell.try_execute_line("sleep 30 &").unwrap();

    let pid = {
        let job = shell.context_mut().jobs.get_job_by_id(1).unwrap();
        assert!(job.background);
        assert_eq!(job.command_line, "sleep 30 &");
        job.pid
    };

    shell.try_execute_line("kill -9 1").unwrap();
    assert!(shell.context().jobs.is_empty());
    let _ = waitpid(pid, None);
}

#[test]
fn test_foreground_command_leaves_no_job() {
    let (_lock, mut shell) = shell();
    shell.try_execute_line("true").unwrap();
    shell.try_execute_line("false").unwrap();

    assert!(shell.context().jobs.is_empty());
    assert!(shell.context().foreground().is_none());
}

#[test]
fn test_missing_program_does_not_break_the_shell() {
    let (_lock, mut shell) = shell();
    shell
        .try_execute_line("definitely-not-a-program-smash-test")
        .unwrap();
    assert!(shell.context().jobs.is_empty());
}

#[test]
fn test_redirect_restores_stdout_when_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fg.txt");
    let (_lock, mut shell) = shell();
    let before = stdout_identity();

    let err = shell
        .try_execute_line(&format!("fg > {}", out.display()))
        .unwrap_err();

    assert_eq!(err.to_string(), "fg: jobs list is empty");
    assert_eq!(stdout_identity(), before);
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_builtin_stage_exits_with_failure() {
    let (_lock, mut shell) = shell();
    let Command::Pipeline(cmd) = Command::parse("showpid | cat", 20).unwrap().unwrap() else {
        panic!("expected a pipeline");
    };

    let status = pipeline::run_and_collect(&cmd, shell.context_mut()).unwrap();

    assert!(
        matches!(status.left, Some(WaitStatus::Exited(_, 1))),
        "{:?}",
        status.left
    );
    assert!(
        matches!(status.right, Some(WaitStatus::Exited(_, 0))),
        "{:?}",
        status.right
    );
}

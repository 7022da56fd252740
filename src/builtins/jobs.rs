//! Job-control builtins: jobs, fg, bg, kill, quit

use nix::sys::signal::Signal;

use super::{is_number, parse_job_id};
use crate::context::ShellContext;
use crate::error::{Error, Result};
use crate::execution::{flush_stdio, run_in_foreground};
use crate::jobs::JobTable;
use crate::models::JobEntry;

fn find_job(jobs: &mut JobTable, job_id: i64) -> Option<&mut JobEntry> {
    u32::try_from(job_id)
        .ok()
        .and_then(|job_id| jobs.get_job_by_id(job_id))
}

fn missing_job(builtin: &'static str, job_id: impl std::fmt::Display) -> Error {
    Error::usage(builtin, format!("job-id {} does not exist", job_id))
}

/// `jobs`: list live jobs in insertion order
pub fn jobs(ctx: &mut ShellContext) -> Result<()> {
    for job in ctx.jobs.live_jobs() {
        println!("{}", job);
    }
    Ok(())
}

/// `fg [job-id]`: continue a job if stopped and wait for it
pub fn fg(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    let invalid = || Error::usage("fg", "invalid arguments");
    let ops = ctx.ops();

    let job = match args.get(1) {
        None => ctx
            .jobs
            .get_last_job()
            .ok_or_else(|| Error::usage("fg", "jobs list is empty"))?,
        Some(token) => {
            let job_id = parse_job_id(token).ok_or_else(invalid)?;
            let job = find_job(&mut ctx.jobs, job_id).ok_or_else(|| missing_job("fg", job_id))?;
            if args.len() > 2 {
                return Err(invalid());
            }
            job
        }
    };

    let pid = job.pid;
    if job.stopped {
        ops.send_signal(pid, Signal::SIGCONT)?;
        job.mark_running();
    }
    let command = job.command.clone();
    println!("{} {}", job.command_line, pid);

    run_in_foreground(ctx, pid, command)
}

/// `bg [job-id]`: continue a stopped job in the background
pub fn bg(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    let invalid = || Error::usage("bg", "invalid arguments");
    let ops = ctx.ops();

    let job = match args.get(1) {
        None => ctx
            .jobs
            .get_last_stopped_job()
            .ok_or_else(|| Error::usage("bg", "there is no stopped jobs to resume"))?,
        Some(token) => {
            let job_id = parse_job_id(token).ok_or_else(invalid)?;
            let job = find_job(&mut ctx.jobs, job_id).ok_or_else(|| missing_job("bg", job_id))?;
            if !job.stopped {
                return Err(Error::usage(
                    "bg",
                    format!("job-id {} is already running in the background", job_id),
                ));
            }
            if args.len() > 2 {
                return Err(invalid());
            }
            job
        }
    };

    println!("{} {}", job.command_line, job.pid);
    ops.send_signal(job.pid, Signal::SIGCONT)?;
    job.mark_resumed_in_background();
    Ok(())
}

/// `kill -<signum> <job-id>`
pub fn kill(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    let invalid = || Error::usage("kill", "invalid arguments");
    let ops = ctx.ops();

    let job_id: u32 = args
        .get(2)
        .filter(|token| is_number(token))
        .and_then(|token| token.parse().ok())
        .ok_or_else(invalid)?;
    let job = ctx
        .jobs
        .get_job_by_id(job_id)
        .ok_or_else(|| missing_job("kill", job_id))?;

    let signum: i32 = args[1]
        .strip_prefix('-')
        .filter(|digits| is_number(digits))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(invalid)?;
    if args.len() != 3 {
        return Err(invalid());
    }

    let pid = job.pid;
    let signal = Signal::try_from(signum).map_err(|e| Error::syscall("kill", e))?;
    ops.send_signal(pid, signal)?;
    match signal {
        Signal::SIGSTOP => job.stopped = true,
        Signal::SIGCONT => job.mark_running(),
        _ => {}
    }
    println!("signal number {} was sent to pid {}", signum, pid);

    if signal == Signal::SIGKILL {
        ctx.jobs.remove_job_by_id(job_id);
    }
    Ok(())
}

/// `quit [kill]`: optionally kill every job, then exit the shell
pub fn quit(args: &[String], ctx: &mut ShellContext) -> Result<()> {
    if args.get(1).map(String::as_str) == Some("kill") {
        kill_all_announced(ctx);
    }
    info!("smash exiting");
    flush_stdio();
    std::process::exit(0)
}

/// Announce and SIGKILL every live job; delivery failures are reported
/// one by one without stopping the rest
pub fn kill_all_announced(ctx: &mut ShellContext) {
    let doomed: Vec<_> = ctx
        .jobs
        .live_jobs()
        .map(|job| (job.pid, job.command_line.clone()))
        .collect();

    println!("smash: sending SIGKILL signal to {} jobs:", doomed.len());
    for (pid, line) in &doomed {
        println!("{}: {}", pid, line);
    }
    for err in ctx.jobs.kill_all_jobs() {
        err.report();
    }
}

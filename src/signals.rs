//! Signal Bridge
//!
//! Terminal-generated Ctrl-Z / Ctrl-C and the `timeout` alarm arrive
//! asynchronously. The OS-level handler does as little as possible: it
//! writes a fixed notice with a raw `write(2)`, records the request in a
//! static bit set and pokes a non-blocking wake pipe. Everything that
//! touches shell state (signal delivery, job table updates, the foreground
//! record) happens in [`dispatch`], which runs in the main control flow:
//! before each line, before a foreground job is recorded, and whenever a
//! foreground wait wakes up.
//!
//! `SIGCHLD` also pokes the wake pipe, so a foreground wait can sleep in
//! `poll(2)` and still notice both a child state change and a request that
//! raced with its last `waitpid`.

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc::c_int;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::{pipe2, read, write};
use std::os::fd::{BorrowedFd, IntoRawFd, RawFd};
use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use std::time::Instant;

use crate::context::{ForegroundJob, ShellContext};
use crate::error::{Error, Result};
use crate::execution::timeout;

const STOP_BIT: u8 = 1 << 0;
const INTERRUPT_BIT: u8 = 1 << 1;
const ALARM_BIT: u8 = 1 << 2;

static PENDING: AtomicU8 = AtomicU8::new(0);

/// Wake pipe ends; -1 until [`install_handlers`] runs
static WAKE_READ: AtomicI32 = AtomicI32::new(-1);
static WAKE_WRITE: AtomicI32 = AtomicI32::new(-1);

/// Upper bound on one sleep in [`wait_for_wakeup`]. Forked pipeline stages
/// share the pipe, so a wakeup can be drained by another process.
const WAKE_POLL_MS: u16 = 100;

/// A request recorded by a signal handler, handled later by [`dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalRequest {
    /// Ctrl-Z: stop the foreground job
    Stop,
    /// Ctrl-C: kill the foreground job
    Interrupt,
    /// A `timeout` deadline may have passed
    Alarm,
}

impl SignalRequest {
    fn bit(self) -> u8 {
        match self {
            SignalRequest::Stop => STOP_BIT,
            SignalRequest::Interrupt => INTERRUPT_BIT,
            SignalRequest::Alarm => ALARM_BIT,
        }
    }

    fn notice(self) -> &'static [u8] {
        match self {
            SignalRequest::Stop => b"smash: got ctrl-Z\n",
            SignalRequest::Interrupt => b"smash: got ctrl-C\n",
            SignalRequest::Alarm => b"smash: got an alarm\n",
        }
    }

    fn from_signal(signum: c_int) -> Option<Self> {
        match signum {
            nix::libc::SIGTSTP => Some(SignalRequest::Stop),
            nix::libc::SIGINT => Some(SignalRequest::Interrupt),
            nix::libc::SIGALRM => Some(SignalRequest::Alarm),
            _ => None,
        }
    }
}

/// Record a request as if its signal had arrived
pub fn request(req: SignalRequest) {
    PENDING.fetch_or(req.bit(), Ordering::SeqCst);
    wake();
}

/// Take and clear every pending request, in stop/interrupt/alarm order
pub fn take_pending() -> Vec<SignalRequest> {
    let bits = PENDING.swap(0, Ordering::SeqCst);
    [
        SignalRequest::Stop,
        SignalRequest::Interrupt,
        SignalRequest::Alarm,
    ]
    .into_iter()
    .filter(|req| bits & req.bit() != 0)
    .collect()
}

/// True once the wake pipe exists, i.e. handlers are installed
pub fn wakeups_enabled() -> bool {
    WAKE_READ.load(Ordering::SeqCst) >= 0
}

fn wake() {
    let fd = WAKE_WRITE.load(Ordering::SeqCst);
    if fd < 0 {
        return;
    }
    // SAFETY: the wake pipe is never closed once installed
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    // A full pipe already guarantees a wakeup
    let _ = write(fd, &[0]);
}

/// Sleep until a handler fires (or the poll bound passes), then drain
/// the wake pipe
pub fn wait_for_wakeup() -> Result<()> {
    let fd: RawFd = WAKE_READ.load(Ordering::SeqCst);
    if fd < 0 {
        return Ok(());
    }
    // SAFETY: the wake pipe is never closed once installed
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };

    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    match poll(&mut fds, PollTimeout::from(WAKE_POLL_MS)) {
        Ok(_) | Err(Errno::EINTR) => {}
        Err(e) => return Err(Error::syscall("poll", e)),
    }

    let mut buf = [0u8; 64];
    while matches!(read(fd, &mut buf), Ok(n) if n > 0) {}
    Ok(())
}

extern "C" fn on_signal(signum: c_int) {
    let saved_errno = Errno::last_raw();

    if let Some(req) = SignalRequest::from_signal(signum) {
        // SAFETY: fd 1 stays open for the life of the shell
        let stdout = unsafe { BorrowedFd::borrow_raw(nix::libc::STDOUT_FILENO) };
        let _ = write(stdout, req.notice());
        request(req);
    } else {
        wake();
    }

    Errno::set_raw(saved_errno);
}

fn open_wake_pipe() -> Result<()> {
    if wakeups_enabled() {
        return Ok(());
    }
    let (read_end, write_end) = pipe2(OFlag::O_NONBLOCK | OFlag::O_CLOEXEC)
        .map_err(|e| Error::syscall("pipe", e))?;
    WAKE_WRITE.store(write_end.into_raw_fd(), Ordering::SeqCst);
    WAKE_READ.store(read_end.into_raw_fd(), Ordering::SeqCst);
    Ok(())
}

/// Install the Ctrl-Z, Ctrl-C, alarm and child-state handlers
///
/// `SA_RESTART` is deliberately absent: blocking calls must return
/// `EINTR` so the main flow can run [`dispatch`].
pub fn install_handlers() -> Result<()> {
    open_wake_pipe()?;

    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );

    for signal in [
        Signal::SIGTSTP,
        Signal::SIGINT,
        Signal::SIGALRM,
        Signal::SIGCHLD,
    ] {
        // SAFETY: the handler only performs write(2) calls and atomic updates
        unsafe { sigaction(signal, &action) }.map_err(|e| Error::syscall("sigaction", e))?;
        debug!("installed handler for {}", signal.as_str());
    }
    Ok(())
}

/// Handle every pending request against the shell state
pub fn dispatch(ctx: &mut ShellContext) {
    for req in take_pending() {
        debug!("dispatching {:?}", req);
        match req {
            SignalRequest::Stop => handle_stop(ctx),
            SignalRequest::Interrupt => handle_interrupt(ctx),
            SignalRequest::Alarm => handle_alarm(ctx),
        }
    }
}

/// Ctrl-Z: stop the foreground job and file it as a stopped job
pub fn handle_stop(ctx: &mut ShellContext) {
    let Some(pid) = ctx.foreground().map(|fg| fg.pid) else {
        return;
    };

    if let Err(e) = ctx.ops().send_signal(pid, Signal::SIGSTOP) {
        e.report();
        return;
    }
    if let Some(fg) = ctx.take_foreground() {
        file_stopped(ctx, fg);
    }
}

/// Ctrl-C: kill the foreground job and drop any table entry for it
pub fn handle_interrupt(ctx: &mut ShellContext) {
    let Some(pid) = ctx.foreground().map(|fg| fg.pid) else {
        return;
    };

    if let Err(e) = ctx.ops().send_signal(pid, Signal::SIGKILL) {
        e.report();
        return;
    }
    println!("smash: process {} was killed", pid);

    if let Some(job_id) = ctx.jobs.get_job_by_pid(pid).map(|job| job.job_id) {
        drop(ctx.jobs.remove_job_by_id(job_id));
    }
    ctx.clear_foreground();
}

/// Alarm: kill every process whose `timeout` deadline has passed
pub fn handle_alarm(ctx: &mut ShellContext) {
    let ops = ctx.ops();
    for entry in ctx.timeouts.take_expired(Instant::now()) {
        if !ops.is_alive(entry.pid) {
            trace!("timeout for pid {} fired after it exited", entry.pid);
            continue;
        }
        match ops.send_signal(entry.pid, Signal::SIGKILL) {
            Ok(()) => println!("smash: {} timed out!", entry.command_line),
            Err(e) => e.report(),
        }
    }
    timeout::arm_alarm(&ctx.timeouts, Instant::now());
}

/// A foreground wait saw its child stop without a Ctrl-Z from us
pub fn record_stopped(ctx: &mut ShellContext) {
    if let Some(fg) = ctx.take_foreground() {
        file_stopped(ctx, fg);
    }
}

fn file_stopped(ctx: &mut ShellContext, fg: ForegroundJob) {
    match ctx.jobs.get_job_by_pid(fg.pid) {
        Some(job) => job.mark_stopped(),
        None => {
            ctx.jobs.add_job(fg.command, fg.pid, true);
        }
    }
    println!("smash: process {} was stopped", fg.pid);
}

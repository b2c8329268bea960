// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-threaded cooperative event loop (§4.1).
//!
//! Every callback the `Reactor` owns — a pending job, a timer firing, an fd
//! becoming ready — runs to completion before the next one starts. The
//! pending-job FIFO is the engine's only mechanism for breaking reentrancy:
//! a callback that needs to trigger more engine work enqueues a job and
//! returns, rather than recursing.
//!
//! Built on `tokio::task::LocalSet`: timers and fd readiness are driven by small
//! `spawn_local` tasks that push completed work onto one shared FIFO, owned
//! through `Rc<RefCell<_>>` since the whole reactor lives on a single
//! thread and no engine state needs a lock (§5).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::unix::io::{AsRawFd, RawFd};
use std::rc::Rc;
use std::time::Duration;

use tokio::io::unix::AsyncFd;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FdId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Readable,
    Writable,
}

/// A single deferred unit of work. Runs exactly once.
type Job = Box<dyn FnOnce()>;

struct TimerEntry {
    id: TimerId,
    seq: u64,
    deadline: Instant,
    period: Option<Duration>,
    callback: Option<Rc<RefCell<dyn FnMut()>>>,
}

struct FdEntry {
    id: FdId,
    generation: u64,
}

struct Inner {
    jobs: VecDeque<(JobId, Option<Job>)>,
    next_job_seq: u64,
    timers: Vec<TimerEntry>,
    next_timer_seq: u64,
    fds: Vec<FdEntry>,
    next_fd_seq: u64,
    quit: bool,
}

impl Inner {
    fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
            next_job_seq: 0,
            timers: Vec::new(),
            next_timer_seq: 0,
            fds: Vec::new(),
            next_fd_seq: 0,
            quit: false,
        }
    }
}

/// The single-threaded reactor described in §4.1.
///
/// Cloning a `Reactor` handle is cheap (it's an `Rc`); all clones share the
/// same loop state. The reactor only does useful work while driven by
/// [`Reactor::run`] inside a `tokio::task::LocalSet`.
#[derive(Clone)]
pub struct Reactor {
    inner: Rc<RefCell<Inner>>,
    notify: Rc<Notify>,
}

impl Reactor {
    pub fn new() -> Self {
        Self { inner: Rc::new(RefCell::new(Inner::new())), notify: Rc::new(Notify::new()) }
    }

    /// Enqueues `job` to run at the next loop turn, after any jobs already
    /// queued, before any further I/O polling (§4.1 contract).
    pub fn enqueue_job(&self, job: impl FnOnce() + 'static) -> JobId {
        let mut inner = self.inner.borrow_mut();
        let id = JobId(inner.next_job_seq);
        inner.next_job_seq += 1;
        inner.jobs.push_back((id, Some(Box::new(job))));
        tracing::trace!(job_id = id.0, "reactor: job enqueued");
        drop(inner);
        self.notify.notify_one();
        id
    }

    /// Cancels a pending job. A no-op if the job already ran or was never
    /// registered. Cancellation is synchronous: a cancelled job never fires.
    pub fn cancel_job(&self, id: JobId) {
        let mut inner = self.inner.borrow_mut();
        if let Some(slot) = inner.jobs.iter_mut().find(|(jid, _)| *jid == id) {
            slot.1 = None;
            tracing::trace!(job_id = id.0, "reactor: job cancelled");
        }
    }

    /// Registers a one-shot timer firing after `delay`.
    pub fn set_timeout(&self, delay: Duration, callback: impl FnMut() + 'static) -> TimerId {
        self.register_timer(delay, None, callback)
    }

    /// Registers a periodic timer firing every `period`, starting after one
    /// period has elapsed.
    pub fn set_interval(&self, period: Duration, callback: impl FnMut() + 'static) -> TimerId {
        self.register_timer(period, Some(period), callback)
    }

    fn register_timer(&self, delay: Duration, period: Option<Duration>, callback: impl FnMut() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_timer_seq);
        let seq = inner.next_timer_seq;
        inner.next_timer_seq += 1;
        let deadline = Instant::now() + delay;
        inner.timers.push(TimerEntry { id, seq, deadline, period, callback: Some(Rc::new(RefCell::new(callback))) });
        tracing::trace!(timer_id = id.0, delay_ms = delay.as_millis() as u64, "reactor: timer registered");
        drop(inner);
        self.notify.notify_one();
        id
    }

    /// Cancels a timer. It will not fire afterwards, even if already due.
    pub fn cancel_timer(&self, id: TimerId) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|t| t.id != id);
        tracing::trace!(timer_id = id.0, "reactor: timer cancelled");
    }

    /// Registers interest in an fd's readiness. `callback` fires every time
    /// the fd becomes ready for `interest`, re-arming automatically, until
    /// [`Reactor::unregister_fd`] is called.
    ///
    /// The reactor never closes `fd` — the caller owns its lifetime.
    pub fn register_fd(&self, fd: RawFd, interest: Interest, callback: impl FnMut() + 'static) -> std::io::Result<FdId> {
        struct Borrowed(RawFd);
        impl AsRawFd for Borrowed {
            fn as_raw_fd(&self) -> RawFd {
                self.0
            }
        }

        let async_fd = AsyncFd::new(Borrowed(fd))?;
        let mut inner = self.inner.borrow_mut();
        let id = FdId(inner.next_fd_seq);
        let generation = inner.next_fd_seq;
        inner.next_fd_seq += 1;
        inner.fds.push(FdEntry { id, generation });
        drop(inner);

        let callback: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new(callback));
        let reactor = self.clone();
        tokio::task::spawn_local(async move {
            loop {
                let ready = match interest {
                    Interest::Readable => async_fd.readable().await,
                    Interest::Writable => async_fd.writable().await,
                };
                let Ok(mut guard) = ready else { break };
                if !reactor.fd_still_registered(id, generation) {
                    break;
                }
                guard.clear_ready();
                // Run the callback as a pending job so fd readiness is
                // serialized through the same FIFO as every other reactor
                // callback, never called directly off the readiness future.
                let callback = callback.clone();
                reactor.enqueue_job(move || (callback.borrow_mut())());
            }
        });
        tracing::trace!(fd_id = id.0, fd, "reactor: fd registered");
        Ok(id)
    }

    fn fd_still_registered(&self, id: FdId, generation: u64) -> bool {
        self.inner.borrow().fds.iter().any(|f| f.id == id && f.generation == generation)
    }

    /// Stops watching an fd. Already-queued readiness callbacks still run.
    pub fn unregister_fd(&self, id: FdId) {
        self.inner.borrow_mut().fds.retain(|f| f.id != id);
        tracing::trace!(fd_id = id.0, "reactor: fd unregistered");
    }

    /// Requests the reactor stop after the current turn. Any remaining
    /// registrations are orphaned — owners are responsible for releasing
    /// their own resources.
    pub fn quit(&self) {
        self.inner.borrow_mut().quit = true;
        self.notify.notify_one();
    }

    fn is_quitting(&self) -> bool {
        self.inner.borrow().quit
    }

    /// Drains and runs every job currently queued, in FIFO order. Jobs
    /// enqueued by a running job are appended and run within the same
    /// drain pass, matching "enqueued jobs run in enqueue order after the
    /// current callback returns."
    fn drain_jobs(&self) {
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                inner.jobs.pop_front()
            };
            match next {
                Some((_, Some(job))) => job(),
                Some((_, None)) => {} // cancelled
                None => break,
            }
        }
    }

    /// Fires every timer whose deadline has elapsed, in `(deadline, seq)`
    /// order so ties break by registration order (§8, §9 Open Question b).
    fn fire_due_timers(&self) {
        let now = Instant::now();
        let due: Vec<(TimerId, u64, Rc<RefCell<dyn FnMut()>>, Option<Duration>)> = {
            let mut inner = self.inner.borrow_mut();
            inner.timers.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.seq.cmp(&b.seq)));
            let mut due = Vec::new();
            let mut remaining = Vec::new();
            for mut timer in std::mem::take(&mut inner.timers) {
                if timer.deadline <= now {
                    if let Some(cb) = timer.callback.take() {
                        due.push((timer.id, timer.seq, cb, timer.period));
                    }
                    if let Some(period) = timer.period {
                        remaining.push(TimerEntry {
                            id: timer.id,
                            seq: timer.seq,
                            deadline: now + period,
                            period: timer.period,
                            callback: None,
                        });
                    }
                } else {
                    remaining.push(timer);
                }
            }
            inner.timers = remaining;
            due
        };

        for (id, _seq, callback, period) in due {
            tracing::trace!(timer_id = id.0, "reactor: timer fired");
            // Re-attach the callback to its periodic slot before running it,
            // so a periodic timer survives past this single firing.
            if period.is_some() {
                let mut inner = self.inner.borrow_mut();
                if let Some(slot) = inner.timers.iter_mut().find(|t| t.id == id) {
                    slot.callback = Some(callback.clone());
                }
            }
            self.enqueue_job(move || (callback.borrow_mut())());
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().timers.iter().map(|t| t.deadline).min()
    }

    fn has_jobs(&self) -> bool {
        !self.inner.borrow().jobs.is_empty()
    }

    /// Runs the reactor until [`Reactor::quit`] is called. Must be driven
    /// from inside a `tokio::task::LocalSet` so `spawn_local` fd/timer
    /// helper tasks can run alongside it.
    pub async fn run(&self) {
        loop {
            self.drain_jobs();
            if self.is_quitting() {
                break;
            }
            self.fire_due_timers();
            if self.has_jobs() {
                continue;
            }
            match self.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {}
                        _ = self.notify.notified() => {}
                    }
                }
                None => {
                    self.notify.notified().await;
                }
            }
        }
    }

    /// Runs one turn synchronously: drains jobs, fires due timers. Useful
    /// in tests that don't need fd readiness or real sleeping.
    pub fn run_once(&self) {
        self.drain_jobs();
        self.fire_due_timers();
        self.drain_jobs();
    }
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reactor_tests.rs"]
mod tests;

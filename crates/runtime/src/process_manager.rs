// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wraps OS process spawning for the engine's `exec`-style modules (§4.2).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use thiserror::Error;

use crate::reactor::Reactor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub exited_normally: bool,
    pub code: Option<i32>,
}

impl ExitStatus {
    pub fn is_success(&self) -> bool {
        self.exited_normally && self.code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum ProcessManagerError {
    #[error("failed to spawn '{executable}': {source}")]
    Spawn { executable: String, #[source] source: std::io::Error },

    #[error("signal delivery to pid {pid} failed: {source}")]
    Signal { pid: i32, #[source] source: nix::Error },

    #[error("no such process handle")]
    UnknownHandle,
}

struct Entry {
    pid: i32,
    on_exit: Option<Box<dyn FnOnce(ExitStatus)>>,
}

/// Spawns, waits on, and signals child processes, delivering termination
/// through the [`Reactor`]'s pending-job queue (§4.2).
///
/// Invariant: at most one termination callback fires per handle — `free`
/// clears the stored callback so a child that was already exiting in the
/// background is silently discarded.
#[derive(Clone)]
pub struct ProcessManager {
    reactor: Reactor,
    entries: Rc<RefCell<HashMap<u64, Entry>>>,
    next_handle: Rc<RefCell<u64>>,
}

impl ProcessManager {
    pub fn new(reactor: Reactor) -> Self {
        Self { reactor, entries: Rc::new(RefCell::new(HashMap::new())), next_handle: Rc::new(RefCell::new(0)) }
    }

    /// Spawns `executable` with `argv`/`env`, registering `on_exit` to run
    /// (via the reactor's pending-job queue) when the child terminates.
    pub fn spawn(
        &self,
        executable: &str,
        argv: &[String],
        env: Option<&[(String, String)]>,
        on_exit: impl FnOnce(ExitStatus) + 'static,
    ) -> Result<ProcessHandle, ProcessManagerError> {
        let mut cmd = tokio::process::Command::new(executable);
        cmd.args(argv);
        if let Some(env) = env {
            for (k, v) in env {
                cmd.env(k, v);
            }
        }
        let mut child = cmd.spawn().map_err(|source| ProcessManagerError::Spawn { executable: executable.to_string(), source })?;
        let pid = child.id().unwrap_or(0) as i32;

        let handle_id = {
            let mut next = self.next_handle.borrow_mut();
            let id = *next;
            *next += 1;
            id
        };
        self.entries.borrow_mut().insert(handle_id, Entry { pid, on_exit: Some(Box::new(on_exit)) });

        let entries = self.entries.clone();
        let reactor = self.reactor.clone();
        tracing::debug!(pid, executable, "process manager: spawned child");
        tokio::task::spawn_local(async move {
            let status = child.wait().await;
            let exit = match status {
                Ok(status) => ExitStatus { exited_normally: status.success() || status.code().is_some(), code: status.code() },
                Err(_) => ExitStatus { exited_normally: false, code: None },
            };
            let callback = entries.borrow_mut().remove(&handle_id).and_then(|e| e.on_exit);
            if let Some(callback) = callback {
                reactor.enqueue_job(move || callback(exit));
            }
        });

        Ok(ProcessHandle(handle_id))
    }

    /// Sends `signal` to the child behind `handle`.
    pub fn signal(&self, handle: ProcessHandle, signal: Signal) -> Result<(), ProcessManagerError> {
        let pid = self.entries.borrow().get(&handle.0).map(|e| e.pid).ok_or(ProcessManagerError::UnknownHandle)?;
        nix::sys::signal::kill(Pid::from_raw(pid), signal).map_err(|source| ProcessManagerError::Signal { pid, source })
    }

    /// Abandons bookkeeping for `handle`. If the child is still alive the
    /// background reaper continues running and its result is discarded —
    /// no termination callback fires after `free`.
    pub fn free(&self, handle: ProcessHandle) {
        self.entries.borrow_mut().remove(&handle.0);
    }

    /// Convenience built on top of `signal` + the reactor's timer: sends
    /// SIGTERM immediately, and SIGKILL after `grace` if the process has
    /// not yet been freed (i.e. has not yet exited). Not part of the core
    /// Process Manager contract — a helper the `exec` reference module
    /// uses to implement its own timeout.
    pub fn spawn_with_timeout(
        &self,
        executable: &str,
        argv: &[String],
        env: Option<&[(String, String)]>,
        grace: Duration,
        on_exit: impl FnOnce(ExitStatus) + 'static,
    ) -> Result<ProcessHandle, ProcessManagerError> {
        let alive = Rc::new(RefCell::new(true));
        let still_alive = alive.clone();
        let handle = self.spawn(executable, argv, env, move |status| {
            *still_alive.borrow_mut() = false;
            on_exit(status);
        })?;
        let manager = self.clone();
        self.reactor.set_timeout(grace, move || {
            if *alive.borrow() {
                let _ = manager.signal(handle, Signal::SIGKILL);
            }
        });
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "process_manager_tests.rs"]
mod tests;

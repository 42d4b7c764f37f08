// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use parking_lot::{Condvar, Mutex as ParkingMutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

use crate::config::GateConfig;
use crate::error::{GateError, Interrupted};
use crate::interrupt::{self, Parked, Unpark};
use crate::time_unit::TimeUnit;

/// A reusable open/close barrier.
///
/// While the gate is closed, every call to one of the `wait*` methods blocks
/// until another thread [opens](Gate::open) it, the caller's budget runs out,
/// or the caller is [interrupted](crate::Interrupter::interrupt). While it is
/// open, waits return immediately without taking the lock.
///
/// `Gate` is a handle: clones share the same state.
///
/// ```
/// use std::thread;
/// use sync_gate::Gate;
///
/// let gate = Gate::default();
/// let worker = {
///     let gate = gate.clone();
///     thread::spawn(move || gate.wait())
/// };
///
/// gate.open();
/// worker.join().unwrap().unwrap();
/// ```
#[derive(Clone)]
pub struct Gate {
    shared: Arc<GateShared>,
}

struct GateShared {
    // Read without the lock on the fast path; written under it.
    closed: AtomicBool,
    state: ParkingMutex<WaitState>,
    hurdle: Condvar,
    name: Option<Arc<str>>,
}

struct WaitState {
    waiting: u64,
}

/// How a wait that was not interrupted ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Passage {
    Opened,
    TimedOut,
}

/// Membership in the blocking loop. Counted on entry, uncounted on drop so
/// every exit path releases its slot.
struct Waiting<'a> {
    state: MutexGuard<'a, WaitState>,
}

impl<'a> Waiting<'a> {
    fn enter(mut state: MutexGuard<'a, WaitState>) -> Self {
        state.waiting += 1;
        Self { state }
    }
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        self.state.waiting -= 1;
    }
}

impl Unpark for GateShared {
    fn unpark(&self) {
        let _state = self.state.lock();
        self.hurdle.notify_all();
    }
}

impl Gate {
    /// Create a gate in the given state.
    pub fn new(closed: bool) -> Self {
        Self::with_name(closed, None)
    }

    /// Create a closed gate.
    pub fn closed() -> Self {
        Self::new(true)
    }

    /// Create an open gate.
    pub fn opened() -> Self {
        Self::new(false)
    }

    /// Create a gate from a [`GateConfig`].
    pub fn from_config(config: GateConfig) -> Self {
        Self::with_name(config.closed, config.name.map(Arc::from))
    }

    fn with_name(closed: bool, name: Option<Arc<str>>) -> Self {
        Self {
            shared: Arc::new(GateShared {
                closed: AtomicBool::new(closed),
                state: ParkingMutex::new(WaitState { waiting: 0 }),
                hurdle: Condvar::new(),
                name,
            }),
        }
    }

    /// Diagnostic label given through [`GateConfig::name`].
    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Close the gate. Subsequent waits block until it is opened again.
    ///
    /// Threads already waiting are unaffected.
    pub fn close(&self) {
        let _state = self.shared.state.lock();
        self.shared.closed.store(true, Ordering::Release);
    }

    /// Open the gate, releasing every thread currently waiting on it.
    ///
    /// Does nothing if the gate is already open.
    pub fn open(&self) {
        let _state = self.shared.state.lock();
        if self
            .shared
            .closed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let released = self.shared.hurdle.notify_all();
            trace!(gate = self.label(), released, "gate opened");
        }
    }

    /// [`close`](Self::close) if `closed`, otherwise [`open`](Self::open).
    pub fn set_closed(&self, closed: bool) {
        if closed {
            self.close();
        } else {
            self.open();
        }
    }

    /// Whether the gate is currently closed.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Whether the gate is currently open.
    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }

    /// Number of threads currently blocked at the gate.
    ///
    /// Callers that found the gate open never count, however briefly they
    /// were inside a `wait*` call.
    pub fn waiting_count(&self) -> u64 {
        self.shared.state.lock().waiting
    }

    /// Block until the gate is open.
    ///
    /// Returns immediately if the gate is open. Fails with [`Interrupted`] if
    /// the calling thread's interrupt status is set when it would block, or
    /// becomes set while it is blocked; the status is cleared in that case.
    pub fn wait(&self) -> Result<(), Interrupted> {
        self.wait_inner(None).map(|_| ())
    }

    /// Block until the gate is open, for at most `timeout`.
    ///
    /// An open gate succeeds immediately whatever the budget. A closed gate
    /// with a zero budget times out without blocking.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), GateError> {
        match self.wait_inner(Some(timeout))? {
            Passage::Opened => Ok(()),
            Passage::TimedOut => Err(GateError::Timeout { timeout }),
        }
    }

    /// Like [`wait_timeout`](Self::wait_timeout) with the budget given as
    /// `amount` of `unit`. Negative amounts are treated as zero.
    pub fn wait_for(&self, amount: i64, unit: TimeUnit) -> Result<(), GateError> {
        self.wait_timeout(unit.to_duration(amount))
    }

    /// Like [`wait_timeout`](Self::wait_timeout), but reports an exhausted
    /// budget as `Ok(false)` instead of an error.
    pub fn try_wait_timeout(&self, timeout: Duration) -> Result<bool, Interrupted> {
        Ok(self.wait_inner(Some(timeout))? == Passage::Opened)
    }

    /// Like [`wait_for`](Self::wait_for), but reports an exhausted budget as
    /// `Ok(false)` instead of an error.
    pub fn try_wait_for(&self, amount: i64, unit: TimeUnit) -> Result<bool, Interrupted> {
        self.try_wait_timeout(unit.to_duration(amount))
    }

    fn wait_inner(&self, timeout: Option<Duration>) -> Result<Passage, Interrupted> {
        // Fast path
        if self.is_open() {
            return Ok(Passage::Opened);
        }

        let shared = &self.shared;
        let mut waiting = Waiting::enter(shared.state.lock());
        let _parked = Parked::register(self.shared.clone());
        trace!(
            gate = self.label(),
            waiting = waiting.state.waiting,
            ?timeout,
            "blocking at closed gate"
        );

        let mut remaining = timeout;
        while shared.closed.load(Ordering::Acquire) {
            match remaining {
                Some(budget) if budget.is_zero() => {
                    trace!(gate = self.label(), ?timeout, "gate wait timed out");
                    return Ok(Passage::TimedOut);
                }
                Some(budget) => {
                    self.check_interrupt()?;
                    let started = Instant::now();
                    shared.hurdle.wait_for(&mut waiting.state, budget);
                    remaining = Some(budget.saturating_sub(started.elapsed()));
                }
                None => {
                    self.check_interrupt()?;
                    shared.hurdle.wait(&mut waiting.state);
                }
            }
            // An interrupt observed on wakeup wins over both re-checks.
            self.check_interrupt()?;
        }

        Ok(Passage::Opened)
    }

    fn check_interrupt(&self) -> Result<(), Interrupted> {
        if interrupt::interrupted() {
            trace!(gate = self.label(), "gate wait interrupted");
            return Err(Interrupted);
        }
        Ok(())
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("-")
    }
}

impl Default for Gate {
    /// A closed gate.
    fn default() -> Self {
        Self::closed()
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("name", &self.shared.name)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn wait_for_waiters(gate: &Gate, expected: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while gate.waiting_count() != expected {
            assert!(
                Instant::now() < deadline,
                "expected {expected} waiters, found {}",
                gate.waiting_count()
            );
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let gate = Gate::closed();
        gate.close();
        gate.close();
        assert!(gate.is_closed());

        gate.open();
        gate.open();
        gate.open();
        assert!(gate.is_open());
    }

    #[test]
    fn clones_share_state() {
        let gate = Gate::opened();
        let other = gate.clone();
        other.close();
        assert!(gate.is_closed());
        gate.open();
        assert!(other.is_open());
    }

    #[test]
    fn zero_budget_on_closed_gate_times_out_without_blocking() {
        let gate = Gate::closed();
        let started = Instant::now();

        let err = gate.wait_timeout(Duration::ZERO).unwrap_err();
        assert_eq!(
            err,
            GateError::Timeout {
                timeout: Duration::ZERO
            }
        );
        assert!(!gate.try_wait_for(-5, TimeUnit::Seconds).unwrap());
        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(gate.waiting_count(), 0);
    }

    #[test]
    fn timeout_reports_requested_budget() {
        let gate = Gate::closed();
        let budget = Duration::from_millis(20);
        let started = Instant::now();

        let err = gate.wait_timeout(budget).unwrap_err();
        assert_eq!(err, GateError::Timeout { timeout: budget });
        assert!(started.elapsed() >= budget);
    }

    #[test]
    fn interrupt_releases_blocked_waiter() {
        let gate = Gate::closed();
        let (tx, rx) = mpsc::channel();

        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || {
                tx.send(crate::Interrupter::current()).unwrap();
                let result = gate.wait();
                (result, interrupt::is_interrupted())
            })
        };

        let interrupter = rx.recv().unwrap();
        wait_for_waiters(&gate, 1);
        interrupter.interrupt();

        let (result, still_interrupted) = waiter.join().unwrap();
        assert_eq!(result, Err(Interrupted));
        assert!(!still_interrupted, "interrupt status is consumed");
        assert_eq!(gate.waiting_count(), 0);
        assert!(gate.is_closed());
    }

    #[test]
    fn pending_interrupt_fails_closed_gate_only() {
        let closed = Gate::closed();
        let open = Gate::opened();
        let me = crate::Interrupter::current();

        me.interrupt();
        assert_eq!(open.wait(), Ok(()));
        assert!(me.is_interrupted(), "fast path leaves status alone");

        assert_eq!(closed.wait(), Err(Interrupted));
        assert!(!me.is_interrupted());
        assert_eq!(closed.waiting_count(), 0);
    }

    #[test]
    fn close_after_open_reblocks_new_waiters() {
        let gate = Gate::closed();
        gate.open();
        assert!(gate.try_wait_timeout(Duration::from_millis(1)).unwrap());
        gate.close();
        assert!(!gate.try_wait_timeout(Duration::from_millis(1)).unwrap());
    }

    #[test]
    fn debug_shows_name_and_state() {
        let gate = Gate::from_config(GateConfig {
            closed: false,
            name: Some("warmup".into()),
        });
        let rendered = format!("{gate:?}");
        assert!(rendered.contains("warmup"));
        assert!(rendered.contains("closed: false"));
    }
}

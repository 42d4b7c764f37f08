// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Per-thread interrupt status.
//!
//! Every thread owns one interrupt flag, created lazily on first use. Any
//! thread holding an [`Interrupter`] for it may raise the flag; blocking
//! gate operations observe it and abort with [`Interrupted`](crate::Interrupted),
//! clearing the flag as they do so.
//!
//! ```
//! use std::sync::mpsc;
//! use std::thread;
//! use sync_gate::{Gate, Interrupter};
//!
//! let gate = Gate::default();
//! let (tx, rx) = mpsc::channel();
//!
//! let waiter = {
//!     let gate = gate.clone();
//!     thread::spawn(move || {
//!         tx.send(Interrupter::current()).unwrap();
//!         gate.wait()
//!     })
//! };
//!
//! rx.recv().unwrap().interrupt();
//! assert!(waiter.join().unwrap().is_err());
//! assert!(gate.is_closed());
//! ```

use parking_lot::Mutex as ParkingMutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

thread_local! {
    static CURRENT: Arc<InterruptState> = Arc::new(InterruptState::default());
}

/// Something a parked thread can be kicked out of.
pub(crate) trait Unpark: Send + Sync {
    /// Wake every thread parked on this object so it re-checks its state.
    fn unpark(&self);
}

#[derive(Default)]
struct InterruptState {
    interrupted: AtomicBool,
    // The gate the owning thread is currently parked on, if any.
    parked_on: ParkingMutex<Option<Arc<dyn Unpark>>>,
}

/// Handle for raising the interrupt status of one specific thread.
///
/// Obtain it on the target thread with [`Interrupter::current`] and pass it
/// wherever the interrupt should originate.
#[derive(Clone)]
pub struct Interrupter {
    state: Arc<InterruptState>,
}

impl Interrupter {
    /// Handle for the calling thread.
    pub fn current() -> Self {
        Self {
            state: CURRENT.with(Arc::clone),
        }
    }

    /// Raise the interrupt status of the target thread.
    ///
    /// If the thread is blocked in a gate it is woken and the wait fails
    /// with [`Interrupted`](crate::Interrupted). Otherwise the status stays
    /// set until the thread next blocks on a closed gate or clears it with
    /// [`interrupted`].
    pub fn interrupt(&self) {
        self.state.interrupted.store(true, Ordering::SeqCst);

        // Clone out of the slot so no gate lock is taken while holding it.
        let parked_on = self.state.parked_on.lock().clone();
        if let Some(parked_on) = parked_on {
            parked_on.unpark();
        }
    }

    /// Whether the target thread's interrupt status is set; does not clear it.
    pub fn is_interrupted(&self) -> bool {
        self.state.interrupted.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Interrupter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupter")
            .field("interrupted", &self.is_interrupted())
            .finish_non_exhaustive()
    }
}

/// Test and clear the calling thread's interrupt status.
pub fn interrupted() -> bool {
    CURRENT.with(|state| state.interrupted.swap(false, Ordering::SeqCst))
}

/// Whether the calling thread's interrupt status is set; does not clear it.
pub fn is_interrupted() -> bool {
    CURRENT.with(|state| state.interrupted.load(Ordering::SeqCst))
}

/// Registration of the calling thread as parked on `target`.
///
/// Must be created while holding the target's lock and before the thread
/// checks its interrupt status, so an interrupt racing with the park is
/// either seen by that check or delivered through [`Unpark::unpark`].
pub(crate) struct Parked {
    state: Arc<InterruptState>,
}

impl Parked {
    pub(crate) fn register(target: Arc<dyn Unpark>) -> Self {
        let state = CURRENT.with(Arc::clone);
        *state.parked_on.lock() = Some(target);
        Self { state }
    }
}

impl Drop for Parked {
    fn drop(&mut self) {
        self.state.parked_on.lock().take();
    }
}

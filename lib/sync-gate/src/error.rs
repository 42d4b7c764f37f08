// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Error types returned by the blocking gate operations.

use std::time::Duration;

use thiserror::Error;

/// The waiting thread was interrupted through its [`Interrupter`](crate::Interrupter).
///
/// The thread's interrupt status has already been consumed when this error
/// is returned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("wait interrupted")]
pub struct Interrupted;

/// Failure of a bounded wait.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    /// The waiting thread was interrupted.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    /// The gate stayed closed for the whole budget.
    #[error("gate still closed after {timeout:?}")]
    Timeout {
        /// Budget requested by the caller, after clamping negatives to zero.
        timeout: Duration,
    },
}

impl GateError {
    /// Returns `true` if the wait ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the wait was interrupted.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

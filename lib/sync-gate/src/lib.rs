// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

// Core primitive
mod gate;

// Public types
pub mod config;
mod error;
pub mod interrupt;
mod time_unit;

// ── Re-exports ───────────────────────────────────────────────────────

pub use config::{GateConfig, GateConfigBuilder};
pub use error::{GateError, Interrupted};
pub use gate::Gate;
pub use interrupt::Interrupter;
pub use time_unit::TimeUnit;

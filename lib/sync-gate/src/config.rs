// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Declarative gate construction.
//!
//! [`GateConfig`] can be embedded in an application's own configuration and
//! deserialized with serde, or assembled in code through its builder.

use derive_builder::{Builder, UninitializedFieldError};
use serde::{Deserialize, Serialize};

use crate::gate::Gate;

/// Initial state and diagnostics label of a [`Gate`].
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    pattern = "owned",
    default,
    build_fn(error = "UninitializedFieldError")
)]
#[serde(default)]
pub struct GateConfig {
    /// Whether the gate starts closed.
    pub closed: bool,

    /// Label attached to the gate's trace events.
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            closed: true,
            name: None,
        }
    }
}

impl GateConfig {
    /// Start building a configuration; unset fields take their defaults.
    pub fn builder() -> GateConfigBuilder {
        GateConfigBuilder::default()
    }
}

impl GateConfigBuilder {
    /// Build the configuration and construct the gate in one step.
    pub fn build_gate(self) -> Result<Gate, UninitializedFieldError> {
        self.build().map(Gate::from_config)
    }
}

impl From<GateConfig> for Gate {
    fn from(config: GateConfig) -> Self {
        Gate::from_config(config)
    }
}

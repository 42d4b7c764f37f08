// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Unit for `(amount, unit)` style timeouts.
///
/// Unlike [`Duration`], amounts are signed; negative amounts are valid and
/// mean "do not wait at all".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn nanos_per_unit(self) -> i64 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => 1_000_000_000,
            Self::Minutes => 60 * 1_000_000_000,
            Self::Hours => 60 * 60 * 1_000_000_000,
            Self::Days => 24 * 60 * 60 * 1_000_000_000,
        }
    }

    /// Convert `amount` of this unit to nanoseconds, saturating at the `i64` bounds.
    pub fn to_nanos(self, amount: i64) -> i64 {
        amount.saturating_mul(self.nanos_per_unit())
    }

    /// Convert `amount` of this unit to a [`Duration`]; negative amounts clamp to zero.
    pub fn to_duration(self, amount: i64) -> Duration {
        let nanos = self.to_nanos(amount);
        if nanos <= 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_nanos() {
        assert_eq!(TimeUnit::Nanoseconds.to_nanos(7), 7);
        assert_eq!(TimeUnit::Milliseconds.to_nanos(5), 5_000_000);
        assert_eq!(TimeUnit::Seconds.to_nanos(-2), -2_000_000_000);
        assert_eq!(TimeUnit::Days.to_nanos(1), 86_400_000_000_000);
    }

    #[test]
    fn saturates_at_bounds() {
        assert_eq!(TimeUnit::Days.to_nanos(i64::MAX), i64::MAX);
        assert_eq!(TimeUnit::Days.to_nanos(i64::MIN), i64::MIN);
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        assert_eq!(TimeUnit::Milliseconds.to_duration(-1), Duration::ZERO);
        assert_eq!(TimeUnit::Hours.to_duration(0), Duration::ZERO);
        assert_eq!(
            TimeUnit::Microseconds.to_duration(1_500),
            Duration::from_micros(1_500)
        );
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TimeUnit::Milliseconds).unwrap();
        assert_eq!(json, "\"milliseconds\"");
        let unit: TimeUnit = serde_json::from_str("\"minutes\"").unwrap();
        assert_eq!(unit, TimeUnit::Minutes);
    }
}

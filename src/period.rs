/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Truncates timestamps to the fixed period grid and enumerates grid points between two
//! timestamps.
//!
//! `P` is fixed for the lifetime of a deployed ledger: changing it after data has been written
//! would break the "successive stored timestamps differ by exactly P" invariant over history, so
//! it is a construction-time parameter of [Period], never a per-call argument.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// The fixed wall-clock grain on which the measure grid is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period(Duration);

impl Period {
    pub fn minutes(minutes: i64) -> Self {
        Self(Duration::minutes(minutes))
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    /// Truncates `t` toward -∞ to the nearest multiple of the period.
    pub fn truncate(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let step = self.0.num_seconds();
        debug_assert!(step > 0, "period must be positive");
        let secs = t.timestamp();
        let truncated = secs.div_euclid(step) * step;
        Utc.timestamp_opt(truncated, 0).single().expect("in-range timestamp")
    }

    /// Yields the finite sequence `start, start+P, ..., end, end+P`.
    ///
    /// This is inclusive of one extra step past `end` — callers that want the grid strictly up
    /// to and including `end` must trim the last element themselves. The edge is preserved
    /// exactly as specified rather than hidden behind a "fixed" helper, since at least one
    /// caller ([crate::interpolate]) deliberately relies on the extra point to locate the real
    /// reading that follows a gap.
    pub fn grid_between(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut points = Vec::new();
        let mut cur = start;
        let stop = end + self.0;
        while cur < stop {
            points.push(cur);
            cur += self.0;
        }
        points
    }

    /// Number of whole periods between `from` and `to` (`to` assumed to be on the grid and at
    /// or after `from`).
    pub fn steps_between(self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        (to - from).num_seconds() / self.0.num_seconds()
    }
}

impl Default for Period {
    /// Defaults to 10 minutes, the standard metering grid interval.
    fn default() -> Self {
        Self::minutes(10)
    }
}

/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The delta calculator (C5): a pure function deriving per-period consumption/production from
//! two successive index readings.

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::types::MeterId;

/// Rounds `x` to the nearest multiple of `unit`, half-up (ties toward positive infinity).
pub fn round_half_up(x: f64, unit: f64) -> f64 {
    (x / unit + 0.5).floor() * unit
}

/// The previous reading on a series, as seen by [compute]. `None` stands in for the historical
/// source's "empty" sentinel measure: there is no preceding reading yet.
pub struct PriorReading<'a> {
    pub index_name: &'a str,
    pub index_value: u64,
    pub timestamp: DateTime<Utc>,
    pub delta: f64,
}

/// Computes the delta attributed to a new reading, given the series' previous reading (if any).
///
/// `old` is always the series' current `LAST` measure, exactly as produced by
/// [crate::bookmarks::get_last] -- never forced to empty by a coincidence with the `FIRST`
/// bookmark. See DESIGN.md Open Question 6 for why the historical source's behavior at that one
/// edge case is not reproduced: doing so would make the worked example below return 0 for the
/// second write, not 111.
pub fn compute(
    meter_id: &MeterId,
    old: Option<PriorReading<'_>>,
    new_index_name: &str,
    new_index_value: u64,
    new_timestamp: DateTime<Utc>,
) -> Result<f64, LedgerError> {
    let Some(old) = old else {
        return Ok(0.0);
    };

    if new_index_value < old.index_value {
        return Err(LedgerError::NonMonotonicIndex {
            meter_id: meter_id.clone(),
            index_name: new_index_name.to_string(),
            old_value: old.index_value,
            new_value: new_index_value,
        });
    }

    if old.index_name != new_index_name {
        return Ok(0.0);
    }

    let raw_increase = (new_index_value - old.index_value) as f64;
    if old.timestamp == new_timestamp {
        // Overwrite-accumulation: a second reading at the same grid point sums into whatever
        // delta was already recorded there, rather than replacing it.
        Ok(round_half_up(old.delta + raw_increase, 0.1))
    } else {
        Ok(round_half_up(raw_increase, 0.1))
    }
}

/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Point and range queries over the measure history (C10), applying redistribution (C9) at read
//! time rather than storing it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::pack_directory::PackDirectory;
use crate::period::Period;
use crate::redistribute;
use crate::store::Store;
use crate::types::{Measure, MeterKey};

/// All meters' measures at `timestamp`, redistributed per-operation, keyed by [MeterKey].
///
/// Every enumerated meter gets an entry, whether or not it has a real reading at this grid
/// point: a meter with no reading gets the [Measure::empty] placeholder, mirroring the original
/// source's unconditional `sunchain.Measure{}` zero-value insertion in `getMeasures` -- dropping
/// those placeholders is the range query's job (`between`), not this one's.
pub fn at<S: KvStore, D: PackDirectory>(
    store: &Store<'_, S>,
    directory: &D,
    period: Period,
    timestamp: DateTime<Utc>,
) -> Result<HashMap<MeterKey, Measure>, LedgerError> {
    let ts = period.truncate(timestamp);
    let meters = store.enumerate_meters()?;

    let mut measures: HashMap<String, Measure> = HashMap::new();
    for meter in &meters {
        let measure = store
            .get_measure(ts, &meter.id, meter.side)?
            .unwrap_or_else(|| Measure::empty(meter, ts));
        measures.insert(meter.key().as_str().to_string(), measure);
    }

    let operation_ids: HashSet<_> = meters.iter().map(|m| m.operation_id.clone()).collect();
    for operation_id in &operation_ids {
        redistribute::run(directory, operation_id, &meters, &mut measures)?;
    }

    Ok(measures
        .into_values()
        .map(|m| (m.key(), m))
        .collect())
}

/// Every meter's chronological measure list across the closed grid interval `[start, end]`.
///
/// Requires `start < end`, matching the original source's `start.After(end) || start.Equal(end)`
/// rejection in `getMeasuresBetweenFlow`.
pub fn between<S: KvStore, D: PackDirectory>(
    store: &Store<'_, S>,
    directory: &D,
    period: Period,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<HashMap<MeterKey, Vec<Measure>>, LedgerError> {
    if start >= end {
        return Err(LedgerError::InvalidRange { start, end });
    }

    let grid = period.grid_between(period.truncate(start), period.truncate(end));
    // grid_between is inclusive of one extra step past `end`; trim it so the range is
    // closed on both ends at the caller's own grid points.
    let points = &grid[..grid.len().saturating_sub(1)];

    let mut series: HashMap<MeterKey, Vec<Measure>> = HashMap::new();
    for &point in points {
        let snapshot = at(store, directory, period, point)?;
        for (key, measure) in snapshot {
            if measure.is_empty() {
                continue;
            }
            series.entry(key).or_default().push(measure);
        }
    }
    Ok(series)
}

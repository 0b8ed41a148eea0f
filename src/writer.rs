/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Commits a single finished measure and maintains its bookmarks (C6).
//!
//! [commit] additionally invokes the delta calculator (C5), mirroring the historical source's
//! `addSingleMeasure`, which is the single building block every ingestion branch (INIT,
//! SAME_OR_NEXT, INDEX_CHANGE, and each step of interpolation) funnels through.

use chrono::{DateTime, Utc};

use crate::bookmarks;
use crate::delta::{self, PriorReading};
use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::store::Store;
use crate::types::{Measure, MeterId, OperationId, Side};

/// Writes `measure` and updates `LAST`, `LAST_ANY`, and (if this is the series' first-ever
/// grid point) `FIRST`.
///
/// `measure.timestamp` must already be on the period grid and `measure.delta` must already be
/// computed (by [crate::delta::compute]) -- this function performs no arithmetic, only
/// persistence.
pub fn write<S: KvStore>(store: &mut Store<'_, S>, measure: &Measure) -> Result<(), LedgerError> {
    store.put_measure(measure)?;
    bookmarks::set_last(
        store,
        &measure.meter_id,
        &measure.index_name,
        measure.side,
        measure.timestamp,
    )?;
    bookmarks::set_last_any(store, &measure.meter_id, measure.side, measure.timestamp)?;
    bookmarks::set_first_if_absent(
        store,
        &measure.meter_id,
        &measure.index_name,
        measure.side,
        measure.timestamp,
    )?;
    Ok(())
}

/// Computes the delta for a new reading against `prior` and commits the resulting measure.
#[allow(clippy::too_many_arguments)]
pub fn commit<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    operation_id: &OperationId,
    index_name: &str,
    index_value: u64,
    timestamp: DateTime<Utc>,
    prior: Option<PriorReading<'_>>,
) -> Result<Measure, LedgerError> {
    let computed = delta::compute(meter_id, prior, index_name, index_value, timestamp)?;
    let measure = Measure {
        index_name: index_name.to_string(),
        index_value,
        timestamp,
        delta: computed,
        redistribute: 0.0,
        meter_id: meter_id.clone(),
        side,
        operation_id: operation_id.clone(),
    };
    write(store, &measure)?;
    Ok(measure)
}

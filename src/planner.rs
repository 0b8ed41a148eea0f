/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The ingestion planner (C7): decides, from the series' bookmarks, which of five branches an
//! incoming reading falls into, and drives C5/C6/C8 to realize it.

use chrono::{DateTime, Utc};

use crate::bookmarks;
use crate::delta::PriorReading;
use crate::error::LedgerError;
use crate::interpolate;
use crate::kv::KvStore;
use crate::period::Period;
use crate::registry;
use crate::store::Store;
use crate::types::{Measure, MeterId, OperationId, Side};
use crate::writer;

/// Ingests one reading: registers the meter if needed, truncates `raw_timestamp` to the period
/// grid, and dispatches to the INIT / REJECT / SAME_OR_NEXT / INDEX_CHANGE / INTERPOLATE branch
/// that applies.
#[allow(clippy::too_many_arguments)]
pub fn add_measure<S: KvStore>(
    store: &mut Store<'_, S>,
    period: Period,
    operation_id: OperationId,
    meter_id: MeterId,
    side: Side,
    index_name: &str,
    index_value: u64,
    raw_timestamp: DateTime<Utc>,
) -> Result<Measure, LedgerError> {
    registry::register(store, operation_id.clone(), meter_id.clone(), side)?;
    let ts = period.truncate(raw_timestamp);

    let last = bookmarks::get_last(store, &meter_id, index_name, side)?;

    let Some(last) = last else {
        tracing::debug!(meter_id = %meter_id, %ts, "ingestion branch: init");
        return writer::commit(
            store,
            &meter_id,
            side,
            &operation_id,
            index_name,
            index_value,
            ts,
            None,
        );
    };

    if last.timestamp > ts {
        tracing::debug!(meter_id = %meter_id, %ts, last = %last.timestamp, "ingestion branch: reject");
        return Err(LedgerError::OutOfOrder {
            meter_id,
            incoming: ts,
            last: last.timestamp,
        });
    }

    if last.timestamp == ts || last.timestamp + period.duration() == ts {
        tracing::debug!(meter_id = %meter_id, %ts, "ingestion branch: same_or_next");
        return writer::commit(
            store,
            &meter_id,
            side,
            &operation_id,
            index_name,
            index_value,
            ts,
            Some(prior_reading(&last)),
        );
    }

    if bookmarks::is_index_change(store, &meter_id, side, last.timestamp)? {
        tracing::debug!(meter_id = %meter_id, %ts, "ingestion branch: index_change");
        // Treated as a fresh index regardless of whether `last` happens to share its index
        // name: `prior = None` forces C5's "no preceding reading" rule, so delta is always 0
        // here rather than the ordinary across-the-gap delta.
        return writer::commit(
            store,
            &meter_id,
            side,
            &operation_id,
            index_name,
            index_value,
            ts,
            None,
        );
    }

    tracing::debug!(meter_id = %meter_id, %ts, last = %last.timestamp, "ingestion branch: interpolate");
    let prior = interpolate::run(
        store,
        &meter_id,
        side,
        &operation_id,
        index_name,
        index_value,
        &last,
        ts,
        period,
    )?;
    writer::commit(
        store,
        &meter_id,
        side,
        &operation_id,
        index_name,
        index_value,
        ts,
        Some(prior_reading(&prior)),
    )
}

fn prior_reading(m: &Measure) -> PriorReading<'_> {
    PriorReading {
        index_name: &m.index_name,
        index_value: m.index_value,
        timestamp: m.timestamp,
        delta: m.delta,
    }
}

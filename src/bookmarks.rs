/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Per-series bookmarks used to plan ingestion and detect index changes without a range scan
//! over every measure (C4).

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::kv::{keys, KvStore};
use crate::store::Store;
use crate::types::{Measure, MeterId, Side};

/// The most recent measure written for `(meter_id, index_name, side)`, or `None` if the series
/// has never been written to.
pub fn get_last<S: KvStore>(
    store: &Store<'_, S>,
    meter_id: &MeterId,
    index_name: &str,
    side: Side,
) -> Result<Option<Measure>, LedgerError> {
    let key = keys::last_key(meter_id.as_str(), side.letter(), index_name);
    match store.get_timestamp_bookmark(&key)? {
        None => Ok(None),
        Some(ts) => store.get_measure(ts, meter_id, side),
    }
}

/// The timestamp of the very first measure ever written for `(meter_id, index_name, side)`.
pub fn get_first<S: KvStore>(
    store: &Store<'_, S>,
    meter_id: &MeterId,
    index_name: &str,
    side: Side,
) -> Result<Option<DateTime<Utc>>, LedgerError> {
    let key = keys::first_key(meter_id.as_str(), index_name, side.as_str());
    store.get_timestamp_bookmark(&key)
}

/// True iff `(meter_id, side)` has received a write under a different index name strictly after
/// `since`. Uses strict "after" -- a write at exactly `since` does not count, per §9 Open
/// Question 4.
///
/// The historical source scans the `LAST_*` entries for this meter and silently drops any entry
/// that fails to decode. Here, a decode failure on any scanned entry aborts the scan with
/// [LedgerError::StorageError] instead (§9 Open Question 5).
pub fn is_index_change<S: KvStore>(
    store: &Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    since: DateTime<Utc>,
) -> Result<bool, LedgerError> {
    let prefix = keys::last_any_prefix(meter_id.as_str(), side.letter());
    let newest = store
        .range_last_any(&prefix)?
        .into_iter()
        .max();
    Ok(matches!(newest, Some(ts) if ts > since))
}

pub fn set_last<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    index_name: &str,
    side: Side,
    ts: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let key = keys::last_key(meter_id.as_str(), side.letter(), index_name);
    store.put_timestamp_bookmark(key, ts)
}

pub fn set_last_any<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    ts: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let key = keys::last_any_key(meter_id.as_str(), side.letter());
    store.put_last_any_bookmark(key, ts)
}

/// Writes `FIRST` only the first time it is observed absent for this series.
pub fn set_first_if_absent<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    index_name: &str,
    side: Side,
    ts: DateTime<Utc>,
) -> Result<(), LedgerError> {
    if get_first(store, meter_id, index_name, side)?.is_some() {
        return Ok(());
    }
    let key = keys::first_key(meter_id.as_str(), index_name, side.as_str());
    store.put_timestamp_bookmark(key, ts)
}

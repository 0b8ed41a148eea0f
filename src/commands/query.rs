/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Execution of [GetMeasure](super::Command::GetMeasure),
//! [GetMeasuresAndRedistribute](super::Command::GetMeasuresAndRedistribute), and
//! [GetMeasuresBetween](super::Command::GetMeasuresBetween).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::pack_directory::PackDirectory;
use crate::period::Period;
use crate::query;
use crate::store::Store;
use crate::types::{Measure, MeterId, MeterKey, Side};

/// Direct point lookup against C1, bypassing redistribution entirely -- unlike
/// [GetMeasuresAndRedistribute](super::Command::GetMeasuresAndRedistribute), this never touches
/// C9.
pub(crate) fn get_measure<S: KvStore>(
    store: &Store<'_, S>,
    period: Period,
    meter_id: MeterId,
    side: Side,
    timestamp: DateTime<Utc>,
) -> Result<Option<Measure>, LedgerError> {
    tracing::info!(%meter_id, %side, %timestamp, "command: GetMeasure");
    store.get_measure(period.truncate(timestamp), &meter_id, side)
}

pub(crate) fn get_measures_and_redistribute<S: KvStore, D: PackDirectory>(
    store: &Store<'_, S>,
    directory: &D,
    period: Period,
    timestamp: DateTime<Utc>,
) -> Result<HashMap<MeterKey, Measure>, LedgerError> {
    tracing::info!(%timestamp, "command: GetMeasuresAndRedistribute");
    query::at(store, directory, period, timestamp)
}

pub(crate) fn get_measures_between<S: KvStore, D: PackDirectory>(
    store: &Store<'_, S>,
    directory: &D,
    period: Period,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<HashMap<MeterKey, Vec<Measure>>, LedgerError> {
    tracing::info!(%start, %end, "command: GetMeasuresBetween");
    query::between(store, directory, period, start, end)
}

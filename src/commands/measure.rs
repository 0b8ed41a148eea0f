/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Execution of [AddMeasure](super::Command::AddMeasure).

use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::period::Period;
use crate::planner;
use crate::store::Store;
use crate::types::{Measure, MeterId, OperationId, Side};

#[allow(clippy::too_many_arguments)]
pub(crate) fn add_measure<S: KvStore>(
    store: &mut Store<'_, S>,
    period: Period,
    operation_id: OperationId,
    meter_id: MeterId,
    side: Side,
    index_name: String,
    index_value: u64,
    timestamp: DateTime<Utc>,
) -> Result<Measure, LedgerError> {
    tracing::info!(%operation_id, %meter_id, %side, %timestamp, "command: AddMeasure");
    planner::add_measure(
        store,
        period,
        operation_id,
        meter_id,
        side,
        &index_name,
        index_value,
        timestamp,
    )
}

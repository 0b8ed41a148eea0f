/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Execution of [AddMeter](super::Command::AddMeter) and
//! [GetMeters](super::Command::GetMeters).

use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::registry;
use crate::store::Store;
use crate::types::{Meter, MeterId, OperationId, Side};

/// Registers `(operation_id, meter_id, side)`, a no-op if already registered (§3 invariant 1).
pub(crate) fn add_meter<S: KvStore>(
    store: &mut Store<'_, S>,
    operation_id: OperationId,
    meter_id: MeterId,
    side: Side,
) -> Result<Meter, LedgerError> {
    tracing::info!(%operation_id, %meter_id, %side, "command: AddMeter");
    registry::register(store, operation_id, meter_id, side)
}

/// Enumerates every registered meter.
pub(crate) fn get_meters<S: KvStore>(
    store: &Store<'_, S>,
) -> Result<std::collections::HashMap<String, Meter>, LedgerError> {
    tracing::info!("command: GetMeters");
    registry::enumerate(store)
}

/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Idempotent meter registration and enumeration (C3).

use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::store::Store;
use crate::types::{Meter, MeterId, OperationId, Side};

/// Registers `(meter_id, side)` under `operation_id` if it is not already present.
///
/// Returns the stored [Meter], which is either the freshly created one or the pre-existing one
/// untouched -- re-registration is a no-op, per invariant 1 of §3.
pub fn register<S: KvStore>(
    store: &mut Store<'_, S>,
    operation_id: OperationId,
    meter_id: MeterId,
    side: Side,
) -> Result<Meter, LedgerError> {
    if let Some(existing) = store.get_meter(&meter_id, side)? {
        return Ok(existing);
    }
    let meter = Meter {
        id: meter_id,
        side,
        operation_id,
    };
    store.put_meter(&meter)?;
    Ok(meter)
}

/// Returns every registered meter, keyed by `meter_id+side_letter`.
pub fn enumerate<S: KvStore>(
    store: &Store<'_, S>,
) -> Result<std::collections::HashMap<String, Meter>, LedgerError> {
    Ok(store
        .enumerate_meters()?
        .into_iter()
        .map(|m| (m.key().as_str().to_string(), m))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryKv;

    #[test]
    fn reregistration_is_a_noop() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let op = OperationId::parse("OP000000001").unwrap();
        let id = MeterId::parse("11111111111111_1111").unwrap();

        let first = register(&mut store, op.clone(), id.clone(), Side::Conso).unwrap();
        let second = register(&mut store, op, id, Side::Conso).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn enumerate_returns_both_sides_independently() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let op = OperationId::parse("OP000000001").unwrap();
        let id = MeterId::parse("11111111111111_1111").unwrap();
        register(&mut store, op.clone(), id.clone(), Side::Conso).unwrap();
        register(&mut store, op, id, Side::Prod).unwrap();

        let all = enumerate(&store).unwrap();
        assert_eq!(all.len(), 2);
    }
}

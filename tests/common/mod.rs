//! Shared test doubles for the integration suite, duplicated here rather than depending on the
//! crate's own `testutil` module (which is private and only built under `#[cfg(test)]` of the
//! library target itself, not of this separate test binary).

use std::collections::{BTreeMap, HashMap};

use meter_ledger_runtime::error::LedgerError;
use meter_ledger_runtime::kv::KvStore;
use meter_ledger_runtime::pack_directory::PackDirectory;
use meter_ledger_runtime::types::{MeterId, OperationId};

#[derive(Default)]
pub struct MemoryKv {
    inner: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl KvStore for MemoryKv {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.inner.get(key).cloned())
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> anyhow::Result<()> {
        self.inner.insert(key, value);
        Ok(())
    }

    fn range_by_prefix(&self, prefix: &[u8]) -> anyhow::Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .inner
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[derive(Default)]
pub struct StaticPackDirectory {
    pub packed_operations: Vec<OperationId>,
    pub packs: HashMap<String, Vec<Vec<MeterId>>>,
}

impl PackDirectory for StaticPackDirectory {
    fn uses_packed_redistribution(&self, operation_id: &OperationId) -> Result<bool, LedgerError> {
        Ok(self.packed_operations.contains(operation_id))
    }

    fn packs_for(&self, operation_id: &OperationId) -> Result<Option<Vec<Vec<MeterId>>>, LedgerError> {
        Ok(self.packs.get(operation_id.as_str()).cloned())
    }
}

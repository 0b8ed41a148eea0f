/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! An in-memory [KvStore] used only by this crate's own unit tests. The integration test suite
//! under `tests/` keeps its own copy rather than depending on crate-internal test helpers.

use std::collections::BTreeMap;

use crate::kv::KvStore;

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

/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! An energy-metering ledger: deterministic ingestion, gap interpolation, and intra-operation
//! redistribution over a transactional key-value store.
//!
//! ## Command dispatch
//!
//! The interface this crate offers to a host is a single typed entry point, analogous in shape
//! to a state-transition function: it takes the current storage handle plus one already-parsed
//! [Command](commands::Command), and returns either an updated [Response](commands::Response) or
//! a [LedgerError].
//!
//! ```transition(ctx, command) -> Result<response, error>```
//!
//! - `ctx` bundles the [KvStore](kv::KvStore) backend, the [PackDirectory](pack_directory::PackDirectory)
//!   sidecar collaborator, and deployment [LedgerConfig](config::LedgerConfig).
//! - `command` is one of the six commands named in the external interface: `AddMeter`,
//!   `AddMeasure`, `GetMeters`, `GetMeasure`, `GetMeasuresAndRedistribute`, `GetMeasuresBetween`.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use meter_ledger_runtime::{
//!     commands::Command, config::LedgerConfig, context::LedgerContext,
//!     kv::KvStore, pack_directory::HttpPackDirectory, transition::Ledger,
//!     types::{MeterId, OperationId, Side},
//! };
//!
//! #[derive(Default)]
//! struct MapKv(BTreeMap<Vec<u8>, Vec<u8>>);
//! impl KvStore for MapKv {
//!     fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
//!         Ok(self.0.get(key).cloned())
//!     }
//!     fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> anyhow::Result<()> {
//!         self.0.insert(key, value);
//!         Ok(())
//!     }
//!     fn range_by_prefix(&self, prefix: &[u8]) -> anyhow::Result<Vec<(Vec<u8>, Vec<u8>)>> {
//!         Ok(self.0.range(prefix.to_vec()..)
//!             .take_while(|(k, _)| k.starts_with(prefix))
//!             .map(|(k, v)| (k.clone(), v.clone()))
//!             .collect())
//!     }
//! }
//!
//! let mut kv = MapKv::default();
//! let directory = HttpPackDirectory::new("https://packs.example.org", "user", "pass");
//! let mut ctx = LedgerContext::new(&mut kv, directory, LedgerConfig::default());
//!
//! let response = Ledger::dispatch(&mut ctx, Command::AddMeter {
//!     operation_id: OperationId::parse("OP000000001").unwrap(),
//!     meter_id: MeterId::parse("11111111111111_1111").unwrap(),
//!     side: Side::Conso,
//! });
//! assert!(response.is_ok());
//! ```

pub mod bookmarks;

pub mod commands;

pub mod config;

pub mod context;

pub mod delta;

pub mod error;
pub use error::LedgerError;

pub mod interpolate;

pub mod kv;

pub mod pack_directory;

pub mod period;
pub use period::Period;

pub mod planner;

pub mod query;

pub mod redistribute;

pub mod registry;

pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub mod tracing_init;
pub use tracing_init::init_tracing;

pub mod transition;
pub use transition::Ledger;

pub mod types;
pub use types::{Measure, Meter, MeterId, OperationId, Side};

pub mod writer;

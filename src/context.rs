/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Bundles everything one command dispatch needs: the typed store, the pack-directory
//! collaborator, and deployment configuration.
//!
//! Only one instance is meant to be live for the duration of a single command.

use crate::config::LedgerConfig;
use crate::kv::KvStore;
use crate::pack_directory::PackDirectory;
use crate::store::Store;

pub struct LedgerContext<'a, S: KvStore, D: PackDirectory> {
    pub store: Store<'a, S>,
    pub directory: D,
    pub config: LedgerConfig,
}

impl<'a, S: KvStore, D: PackDirectory> LedgerContext<'a, S, D> {
    pub fn new(kv: &'a mut S, directory: D, config: LedgerConfig) -> Self {
        Self {
            store: Store::new(kv),
            directory,
            config,
        }
    }
}

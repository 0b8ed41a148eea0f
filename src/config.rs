/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Deployment-time configuration for one ledger instance (A5).

use crate::period::Period;

/// Configuration assembled once at startup and threaded through every invocation, mirroring the
/// teacher's `BlockchainParams`: a plain data struct, no behavior of its own.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// The fixed measure grid. Changing this after data exists breaks the history invariant
    /// that successive stored timestamps differ by exactly one period (§3).
    pub period: Period,
    /// Base URL of the pack-directory sidecar, e.g. `https://packs.example.org`.
    pub pack_directory_base_url: String,
    /// HTTP Basic Auth username for the pack-directory sidecar.
    pub pack_directory_username: String,
    /// HTTP Basic Auth password for the pack-directory sidecar.
    pub pack_directory_password: String,
}

impl LedgerConfig {
    pub fn new(
        period: Period,
        pack_directory_base_url: impl Into<String>,
        pack_directory_username: impl Into<String>,
        pack_directory_password: impl Into<String>,
    ) -> Self {
        Self {
            period,
            pack_directory_base_url: pack_directory_base_url.into(),
            pack_directory_username: pack_directory_username.into(),
            pack_directory_password: pack_directory_password.into(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            period: Period::default(),
            pack_directory_base_url: String::new(),
            pack_directory_username: String::new(),
            pack_directory_password: String::new(),
        }
    }
}

/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The pack-directory sidecar collaborator (A3): whether an operation uses packed
//! redistribution, and if so, its ordered consumer packs.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::LedgerError;
use crate::types::{MeterId, OperationId};

/// Narrow interface the redistribution engine (C9) depends on. Production code talks to the
/// sidecar over HTTP via [HttpPackDirectory]; tests substitute a static table, per the §9
/// redesign flag calling for this collaborator to be injected rather than called directly.
pub trait PackDirectory {
    fn uses_packed_redistribution(&self, operation_id: &OperationId) -> Result<bool, LedgerError>;

    /// Returns the operation's consumer packs, ordered ascending by the sidecar's 1-based
    /// `pack_number`, or `None` if the operation has no packs on file.
    fn packs_for(&self, operation_id: &OperationId) -> Result<Option<Vec<Vec<MeterId>>>, LedgerError>;
}

#[derive(Debug, Deserialize)]
struct MeterPack {
    meters: Vec<String>,
    pack_number: u32,
}

/// Blocking HTTP implementation of [PackDirectory], talking HTTP Basic Auth to the two endpoints
/// named in §6.
pub struct HttpPackDirectory {
    client: reqwest::blocking::Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpPackDirectory {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            client,
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    fn get(&self, operation_id: &OperationId, path: &str) -> Result<reqwest::blocking::Response, LedgerError> {
        self.client
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| LedgerError::ExternalServiceError {
                op_id: operation_id.clone(),
                reason: format!("{path}: {e}"),
            })
    }
}

impl PackDirectory for HttpPackDirectory {
    fn uses_packed_redistribution(&self, operation_id: &OperationId) -> Result<bool, LedgerError> {
        let response = self.get(operation_id, "/operations/pack")?;
        if !response.status().is_success() {
            return Err(LedgerError::ExternalServiceError {
                op_id: operation_id.clone(),
                reason: format!("GET /operations/pack returned {}", response.status()),
            });
        }
        let operations: Vec<String> = response.json().map_err(|e| LedgerError::ExternalServiceError {
            op_id: operation_id.clone(),
            reason: format!("decoding /operations/pack: {e}"),
        })?;
        Ok(operations.iter().any(|op| op == operation_id.as_str()))
    }

    fn packs_for(&self, operation_id: &OperationId) -> Result<Option<Vec<Vec<MeterId>>>, LedgerError> {
        let path = format!("/operation/{}/pack/meters/anonymized", operation_id.as_str());
        let response = self.get(operation_id, &path)?;
        if !response.status().is_success() {
            return Err(LedgerError::ExternalServiceError {
                op_id: operation_id.clone(),
                reason: format!("GET {path} returned {}", response.status()),
            });
        }
        let packs: Vec<MeterPack> = response.json().map_err(|e| LedgerError::ExternalServiceError {
            op_id: operation_id.clone(),
            reason: format!("decoding {path}: {e}"),
        })?;
        Ok(Some(assemble_ordered_packs(packs)?))
    }
}

/// Reassembles the sidecar's `pack_number`-keyed, possibly out-of-order JSON array into a dense
/// vector indexed from pack 1 (per §9's `pack_number`-ordering redesign flag).
fn assemble_ordered_packs(packs: Vec<MeterPack>) -> Result<Vec<Vec<MeterId>>, LedgerError> {
    let mut by_number: HashMap<u32, Vec<MeterId>> = HashMap::new();
    let mut max_number = 0u32;
    for pack in packs {
        max_number = max_number.max(pack.pack_number);
        let meters = pack
            .meters
            .into_iter()
            .map(MeterId::parse)
            .collect::<Result<Vec<_>, _>>()?;
        by_number.insert(pack.pack_number, meters);
    }
    // Missing ordinals become empty packs so the cascade still walks every number in sequence.
    Ok((1..=max_number)
        .map(|n| by_number.remove(&n).unwrap_or_default())
        .collect())
}

#[cfg(test)]
pub struct StaticPackDirectory {
    pub packed_operations: Vec<OperationId>,
    pub packs: HashMap<String, Vec<Vec<MeterId>>>,
}

#[cfg(test)]
impl PackDirectory for StaticPackDirectory {
    fn uses_packed_redistribution(&self, operation_id: &OperationId) -> Result<bool, LedgerError> {
        Ok(self.packed_operations.contains(operation_id))
    }

    fn packs_for(&self, operation_id: &OperationId) -> Result<Option<Vec<Vec<MeterId>>>, LedgerError> {
        Ok(self.packs.get(operation_id.as_str()).cloned())
    }
}

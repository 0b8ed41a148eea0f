/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines a single error taxonomy returned by every fallible operation in this crate.
//!
//! Every command, every stage of the ingestion pipeline, and the redistribution engine all
//! return the same [LedgerError], so a host dispatcher has exactly one type to translate into
//! its own response envelope.

use chrono::{DateTime, Utc};

use crate::types::{MeterId, OperationId};

/// Descriptive error definitions of the measure-ingestion and redistribution engine.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A command argument did not satisfy the shape requirements (operation id length, meter id
    /// length, side string, non-negative index value).
    #[error("validation failed: {0}")]
    ValidationError(String),

    /// The incoming timestamp is strictly before the series' `LAST` bookmark.
    #[error("measure at {incoming} for meter {meter_id} is out of order: series is already at {last}")]
    OutOfOrder {
        meter_id: MeterId,
        incoming: DateTime<Utc>,
        last: DateTime<Utc>,
    },

    /// The new index value is smaller than the previous one on the same index name.
    #[error("index {index_name} went backwards for meter {meter_id}: {old_value} -> {new_value}")]
    NonMonotonicIndex {
        meter_id: MeterId,
        index_name: String,
        old_value: u64,
        new_value: u64,
    },

    /// The denominator of the last-week interpolation ratio was zero or negative.
    #[error(
        "last-week interpolation ratio is undefined for meter {meter_id}: denominator {denominator}"
    )]
    BadRatio { meter_id: MeterId, denominator: i64 },

    /// The range endpoints supplied to `GetMeasuresBetween` do not satisfy `start < end`.
    #[error("invalid range: start {start} is not before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The KV adapter failed to read or write a key, or returned bytes that failed to decode.
    #[error("storage error: {0}")]
    StorageError(#[from] anyhow::Error),

    /// The pack-directory sidecar returned a non-200 response or undecodable JSON.
    #[error("pack directory request for operation {op_id} failed: {reason}")]
    ExternalServiceError { op_id: OperationId, reason: String },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::ValidationError(msg.into())
    }
}

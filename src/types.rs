/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the domain types shared across this crate: meters, measures, and the identifiers
//! that key them.
//!
//! Side is modeled as a closed two-variant enum internally; the string form ("Conso"/"Prod")
//! and the single-letter form ('C'/'P') used inside composite keys are both derived from it,
//! never carried around independently as raw strings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Required length of an operation id.
pub const OPERATION_ID_LEN: usize = 11;
/// Required length of a meter id.
pub const METER_ID_LEN: usize = 20;

/// Whether a meter records consumption or production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Conso,
    Prod,
}

impl Side {
    /// The single-letter form used inside composite keys.
    pub fn letter(self) -> char {
        match self {
            Side::Conso => 'C',
            Side::Prod => 'P',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Conso => "Conso",
            Side::Prod => "Prod",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        match raw {
            "Conso" => Ok(Side::Conso),
            "Prod" => Ok(Side::Prod),
            other => Err(LedgerError::validation(format!(
                "side must be 'Conso' or 'Prod', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated operation identifier (exactly [OPERATION_ID_LEN] characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(String);

impl OperationId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, LedgerError> {
        let raw = raw.into();
        if raw.chars().count() != OPERATION_ID_LEN {
            return Err(LedgerError::validation(format!(
                "operationID hasn't the required size ({OPERATION_ID_LEN} characters): {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated meter identifier (exactly [METER_ID_LEN] characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeterId(String);

impl MeterId {
    pub fn parse(raw: impl Into<String>) -> Result<Self, LedgerError> {
        let raw = raw.into();
        if raw.chars().count() != METER_ID_LEN {
            return Err(LedgerError::validation(format!(
                "meterID hasn't the required size ({METER_ID_LEN} digits GUID): {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The key under which a meter's measures are grouped in query results:
/// `{meter_id}{side_letter}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeterKey(String);

impl MeterKey {
    pub fn new(meter_id: &MeterId, side: Side) -> Self {
        Self(format!("{}{}", meter_id.as_str(), side.letter()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A meter registered on one side of one operation. Identity is `(id, side)`; the operation is
/// metadata attached at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    #[serde(rename = "meter_id")]
    pub id: MeterId,
    #[serde(rename = "conso_prod")]
    pub side: Side,
    #[serde(rename = "op_id")]
    pub operation_id: OperationId,
}

impl Meter {
    pub fn key(&self) -> MeterKey {
        MeterKey::new(&self.id, self.side)
    }
}

/// One reading (or synthesized interpolation) in a meter's series.
///
/// `delta` is the energy attributed to the period ending at `timestamp`; `redistribute` is the
/// portion of that delta matched by intra-operation counter-flow for that timestamp, populated
/// only by the query layer (§4.10), never by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub index_name: String,
    pub index_value: u64,
    pub timestamp: DateTime<Utc>,
    pub delta: f64,
    pub redistribute: f64,
    #[serde(rename = "meter_id")]
    pub meter_id: MeterId,
    #[serde(rename = "conso_prod")]
    pub side: Side,
    #[serde(rename = "op_id")]
    pub operation_id: OperationId,
}

impl Measure {
    pub fn key(&self) -> MeterKey {
        MeterKey::new(&self.meter_id, self.side)
    }

    /// The placeholder used by the query layer for a meter with no reading at a given timestamp,
    /// matching the zero-value record the host would otherwise have to synthesize itself.
    pub fn empty(meter: &Meter, timestamp: DateTime<Utc>) -> Self {
        Self {
            index_name: String::new(),
            index_value: 0,
            timestamp,
            delta: 0.0,
            redistribute: 0.0,
            meter_id: meter.id.clone(),
            side: meter.side,
            operation_id: meter.operation_id.clone(),
        }
    }

    /// Whether this measure is the [Measure::empty] placeholder -- no real reading was recorded.
    pub fn is_empty(&self) -> bool {
        self.index_name.is_empty()
            && self.index_value == 0
            && self.delta == 0.0
            && self.redistribute == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_id_rejects_the_wrong_length() {
        assert!(OperationId::parse("short").is_err());
        assert!(OperationId::parse("OP000000001").is_ok());
        let err = OperationId::parse("TOO_LONG_OPERATION_ID").unwrap_err();
        assert!(matches!(err, LedgerError::ValidationError(_)));
    }

    #[test]
    fn meter_id_rejects_the_wrong_length() {
        assert!(MeterId::parse("11111").is_err());
        assert!(MeterId::parse("11111111111111_1111").is_ok());
        let err = MeterId::parse("1").unwrap_err();
        assert!(matches!(err, LedgerError::ValidationError(_)));
    }

    #[test]
    fn side_rejects_anything_but_conso_or_prod() {
        assert_eq!(Side::parse("Conso").unwrap(), Side::Conso);
        assert_eq!(Side::parse("Prod").unwrap(), Side::Prod);
        let err = Side::parse("conso").unwrap_err();
        assert!(matches!(err, LedgerError::ValidationError(_)));
        assert!(Side::parse("").is_err());
    }
}

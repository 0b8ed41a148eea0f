/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Business logic for the six host-facing commands (§6), one module per command family.
//!
//! - [meter] -- AddMeter, GetMeters.
//! - [measure] -- AddMeasure.
//! - [query] -- GetMeasure, GetMeasuresAndRedistribute, GetMeasuresBetween.
//!
//! Each function here takes already-typed, already-parsed arguments: stringly-typed argument
//! parsing and response marshaling are the host's job, not this crate's (§1).

pub(crate) mod measure;
pub(crate) mod meter;
pub(crate) mod query;

use chrono::{DateTime, Utc};

use crate::types::{Measure, Meter, MeterId, MeterKey, OperationId, Side};
use std::collections::HashMap;

/// One of the six host-facing commands, already validated and typed.
#[derive(Debug, Clone)]
pub enum Command {
    AddMeter {
        operation_id: OperationId,
        meter_id: MeterId,
        side: Side,
    },
    AddMeasure {
        operation_id: OperationId,
        meter_id: MeterId,
        side: Side,
        index_name: String,
        index_value: u64,
        timestamp: DateTime<Utc>,
    },
    GetMeters,
    GetMeasure {
        meter_id: MeterId,
        side: Side,
        timestamp: DateTime<Utc>,
    },
    GetMeasuresAndRedistribute {
        timestamp: DateTime<Utc>,
    },
    GetMeasuresBetween {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// The outcome of dispatching one [Command].
#[derive(Debug, Clone)]
pub enum Response {
    Meter(Meter),
    Meters(HashMap<String, Meter>),
    /// `None` where the original source's zero-value sentinel would have applied: no measure on
    /// record for this meter at this grid point.
    Measure(Option<Measure>),
    Measures(HashMap<MeterKey, Measure>),
    Series(HashMap<MeterKey, Vec<Measure>>),
}

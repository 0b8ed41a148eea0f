/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The typed layer over [KvStore]: every other component in this crate reads and writes
//! [Meter]s, [Measure]s and timestamp bookmarks through here, never raw bytes.
//!
//! A cache-free pass-through that centralizes (de)serialization and turns adapter/decode
//! failures into [LedgerError::StorageError].

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::error::LedgerError;
use crate::kv::{keys, KvStore};
use crate::types::{Meter, MeterId, Side};

pub struct Store<'a, S: KvStore> {
    kv: &'a mut S,
}

impl<'a, S: KvStore> Store<'a, S> {
    pub fn new(kv: &'a mut S) -> Self {
        Self { kv }
    }

    pub fn get_meter(&self, meter_id: &MeterId, side: Side) -> Result<Option<Meter>, LedgerError> {
        let key = keys::meter_key(meter_id.as_str(), side.letter());
        decode_opt(self.kv.get(&key).context("reading meter")?)
    }

    pub fn put_meter(&mut self, meter: &Meter) -> Result<(), LedgerError> {
        let key = keys::meter_key(meter.id.as_str(), meter.side.letter());
        self.put_json(key, meter)
    }

    pub fn enumerate_meters(&self) -> Result<Vec<Meter>, LedgerError> {
        let entries = self
            .kv
            .range_by_prefix(&keys::meter_prefix())
            .context("scanning meters")?;
        entries
            .into_iter()
            .map(|(_, v)| decode(v))
            .collect::<Result<Vec<_>, _>>()
    }

    pub fn get_measure(
        &self,
        timestamp: DateTime<Utc>,
        meter_id: &MeterId,
        side: Side,
    ) -> Result<Option<crate::types::Measure>, LedgerError> {
        let key = keys::measure_key(timestamp, meter_id.as_str(), side.letter());
        decode_opt(self.kv.get(&key).context("reading measure")?)
    }

    pub fn put_measure(&mut self, measure: &crate::types::Measure) -> Result<(), LedgerError> {
        let key = keys::measure_key(measure.timestamp, measure.meter_id.as_str(), measure.side.letter());
        self.put_json(key, measure)
    }

    /// Raw bookmark read: `FIRST_*`/`LAST_*` entries are stored as bare RFC3339 bytes, not JSON.
    pub fn get_timestamp_bookmark(&self, key: &[u8]) -> Result<Option<DateTime<Utc>>, LedgerError> {
        match self.kv.get(key).context("reading timestamp bookmark")? {
            None => Ok(None),
            Some(bytes) => {
                let raw = String::from_utf8(bytes)
                    .context("bookmark bytes are not valid utf-8")?;
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .context("bookmark bytes are not a valid RFC3339 timestamp")?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
        }
    }

    pub fn put_timestamp_bookmark(
        &mut self,
        key: Vec<u8>,
        ts: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        self.kv
            .put(key, keys::rfc3339(ts).into_bytes())
            .context("writing timestamp bookmark")
            .map_err(LedgerError::from)
    }

    /// `LAST_ANY` is JSON-encoded (per §3), unlike the other bookmarks.
    pub fn get_last_any_bookmark(&self, key: &[u8]) -> Result<Option<DateTime<Utc>>, LedgerError> {
        decode_opt(self.kv.get(key).context("reading LAST_ANY bookmark")?)
    }

    pub fn put_last_any_bookmark(
        &mut self,
        key: Vec<u8>,
        ts: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        self.put_json(key, &ts)
    }

    pub fn range_last_any(
        &self,
        prefix: &[u8],
    ) -> Result<Vec<DateTime<Utc>>, LedgerError> {
        let entries = self
            .kv
            .range_by_prefix(prefix)
            .context("scanning LAST_ANY bookmarks")?;
        entries.into_iter().map(|(_, v)| decode(v)).collect()
    }

    fn put_json<T: serde::Serialize>(&mut self, key: Vec<u8>, value: &T) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec(value).context("encoding value to JSON")?;
        self.kv.put(key, bytes).context("writing value")?;
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(bytes: Vec<u8>) -> Result<T, LedgerError> {
    serde_json::from_slice(&bytes)
        .context("decoding JSON value from storage")
        .map_err(LedgerError::from)
}

fn decode_opt<T: serde::de::DeserializeOwned>(
    bytes: Option<Vec<u8>>,
) -> Result<Option<T>, LedgerError> {
    bytes.map(decode).transpose()
}

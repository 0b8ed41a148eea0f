/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The raw key-value adapter (C1) and the centralized composite-key encoding used by every
//! other component in this crate.
//!
//! The historical source built these keys with ad-hoc string concatenation at each call site,
//! in two mutually inconsistent orders (`FIRST_{id}{index}{side}` vs `LAST_{id}{side}{index}`).
//! Both orders are preserved here, but neither is ever constructed outside this module again:
//! every other component calls a named function from [keys].

use std::fmt;

use chrono::{DateTime, Utc};

/// A byte-oriented view over the host's transactional key-value store.
///
/// All operations are synchronous and are expected to execute inside the host's own transaction
/// boundary: a failure here is surfaced as a [crate::error::LedgerError::StorageError] and
/// aborts the enclosing command, never a partial write.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> anyhow::Result<()>;
    /// Returns every stored `(key, value)` pair whose key starts with `prefix`, in key order.
    fn range_by_prefix(&self, prefix: &[u8]) -> anyhow::Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

/// Composite-key construction, centralized so each of the five key layouts is written exactly
/// once.
pub mod keys {
    use super::*;

    /// Separator between parts of a composite key. Chosen to be a byte that cannot appear in any
    /// of the string parts we encode (meter ids, index names, RFC3339 timestamps), so prefix
    /// scans over a partial set of parts cannot accidentally match a key whose next part merely
    /// starts with the same characters.
    const SEP: u8 = 0u8;

    fn composite(namespace: &str, parts: &[&str]) -> Vec<u8> {
        let mut buf = namespace.as_bytes().to_vec();
        for part in parts {
            buf.push(SEP);
            buf.extend_from_slice(part.as_bytes());
        }
        buf.push(SEP);
        buf
    }

    /// The same encoding as [composite], but without the trailing separator, so it can be used
    /// as a prefix to match any key that begins with exactly these parts (including keys that
    /// have further parts after them).
    fn composite_prefix(namespace: &str, parts: &[&str]) -> Vec<u8> {
        let mut buf = namespace.as_bytes().to_vec();
        for part in parts {
            buf.push(SEP);
            buf.extend_from_slice(part.as_bytes());
        }
        buf
    }

    /// `meter:{meter_id}|{side_letter}`
    pub fn meter_key(meter_id: &str, side_letter: char) -> Vec<u8> {
        composite("meter:", &[meter_id, &side_letter.to_string()])
    }

    /// Prefix matching every stored meter, for enumeration.
    pub fn meter_prefix() -> Vec<u8> {
        composite_prefix("meter:", &[])
    }

    /// `measure:{timestamp_rfc3339}|{meter_id}|{side_letter}`
    pub fn measure_key(timestamp: DateTime<Utc>, meter_id: &str, side_letter: char) -> Vec<u8> {
        composite(
            "measure:",
            &[&rfc3339(timestamp), meter_id, &side_letter.to_string()],
        )
    }

    /// `FIRST_{meter_id}{index_name}{side}` -- note: the full side word, not the letter, and the
    /// field order (id, index, side) differs from [last_key]. This mismatch is the historical
    /// layout and is kept for state compatibility rather than "fixed".
    pub fn first_key(meter_id: &str, index_name: &str, side_word: &str) -> Vec<u8> {
        format!("FIRST_{meter_id}{index_name}{side_word}").into_bytes()
    }

    /// `LAST_{meter_id}{side_letter}{index_name}`
    pub fn last_key(meter_id: &str, side_letter: char, index_name: &str) -> Vec<u8> {
        format!("LAST_{meter_id}{side_letter}{index_name}").into_bytes()
    }

    /// `LAST_|{meter_id}{side_letter}` -- the cross-index bookmark used to detect index changes.
    pub fn last_any_key(meter_id: &str, side_letter: char) -> Vec<u8> {
        let combined = format!("{meter_id}{side_letter}");
        composite("LAST_", &[&combined])
    }

    /// Prefix matching every `LAST_|{meter_id}{side_letter}` entry (there is exactly one, but it
    /// shares the same composite namespace as every other `LAST_` bookmark would if the layout
    /// were ever extended, so it is scanned rather than read directly).
    pub fn last_any_prefix(meter_id: &str, side_letter: char) -> Vec<u8> {
        let combined = format!("{meter_id}{side_letter}");
        composite_prefix("LAST_", &[&combined])
    }

    pub fn rfc3339(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

impl fmt::Debug for dyn KvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<dyn KvStore>")
    }
}

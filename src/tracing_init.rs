/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Host-facing helper for wiring up this crate's `tracing` output (A4).
//!
//! This is a library with no binary entry point of its own, so nothing initializes a global
//! subscriber automatically; a host that wants the spans and events described in A4 on stderr
//! calls [init_tracing] once at process startup, before the first [crate::transition::Ledger::dispatch].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber writing to stderr, honoring `RUST_LOG` and defaulting
/// to `info` for this crate's own spans if unset.
///
/// Panics if a global subscriber is already installed, matching `tracing`'s own `set_global_default`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "meter_ledger_runtime=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

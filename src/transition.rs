/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Entry point for command dispatch.
//!
//! [Ledger::dispatch] is the single place a host hands this crate a typed [Command] and gets
//! back a typed [Response] or a [LedgerError].

use crate::commands::{measure, meter, query, Command, Response};
use crate::context::LedgerContext;
use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::pack_directory::PackDirectory;

/// Dispatches one command through the ledger, given a context borrowing the storage backend and
/// pack-directory collaborator for the duration of this single call.
pub struct Ledger;

impl Ledger {
    pub fn dispatch<S: KvStore, D: PackDirectory>(
        ctx: &mut LedgerContext<'_, S, D>,
        command: Command,
    ) -> Result<Response, LedgerError> {
        let period = ctx.config.period;
        match command {
            Command::AddMeter {
                operation_id,
                meter_id,
                side,
            } => meter::add_meter(&mut ctx.store, operation_id, meter_id, side).map(Response::Meter),

            Command::AddMeasure {
                operation_id,
                meter_id,
                side,
                index_name,
                index_value,
                timestamp,
            } => measure::add_measure(
                &mut ctx.store,
                period,
                operation_id,
                meter_id,
                side,
                index_name,
                index_value,
                timestamp,
            )
            .map(|m| Response::Measure(Some(m))),

            Command::GetMeters => meter::get_meters(&ctx.store).map(Response::Meters),

            Command::GetMeasure {
                meter_id,
                side,
                timestamp,
            } => query::get_measure(&ctx.store, period, meter_id, side, timestamp)
                .map(Response::Measure),

            Command::GetMeasuresAndRedistribute { timestamp } => {
                query::get_measures_and_redistribute(&ctx.store, &ctx.directory, period, timestamp)
                    .map(Response::Measures)
            }

            Command::GetMeasuresBetween { start, end } => {
                query::get_measures_between(&ctx.store, &ctx.directory, period, start, end)
                    .map(Response::Series)
            }
        }
    }
}

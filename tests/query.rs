mod common;

use chrono::{TimeZone, Utc};
use common::{MemoryKv, StaticPackDirectory};
use meter_ledger_runtime::commands::{Command, Response};
use meter_ledger_runtime::config::LedgerConfig;
use meter_ledger_runtime::context::LedgerContext;
use meter_ledger_runtime::error::LedgerError;
use meter_ledger_runtime::transition::Ledger;
use meter_ledger_runtime::types::{MeterId, OperationId, Side};

fn ts(h: u32, m: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
}

fn ctx(kv: &mut MemoryKv) -> LedgerContext<'_, MemoryKv, StaticPackDirectory> {
    LedgerContext::new(kv, StaticPackDirectory::default(), LedgerConfig::default())
}

#[test]
fn between_rejects_start_at_or_after_end() {
    let mut kv = MemoryKv::default();
    let mut ctx = ctx(&mut kv);
    let err = Ledger::dispatch(
        &mut ctx,
        Command::GetMeasuresBetween {
            start: ts(10, 0),
            end: ts(10, 0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidRange { .. }));
}

#[test]
fn between_composes_point_queries_across_the_grid() {
    let mut kv = MemoryKv::default();
    let mut ctx = ctx(&mut kv);
    let operation_id = OperationId::parse("OP000000001").unwrap();
    let meter_id = MeterId::parse("11111111111111_1111").unwrap();

    Ledger::dispatch(
        &mut ctx,
        Command::AddMeter {
            operation_id: operation_id.clone(),
            meter_id: meter_id.clone(),
            side: Side::Conso,
        },
    )
    .unwrap();

    for (index_value, t) in [(100, ts(10, 0)), (150, ts(10, 10)), (220, ts(10, 20))] {
        Ledger::dispatch(
            &mut ctx,
            Command::AddMeasure {
                operation_id: operation_id.clone(),
                meter_id: meter_id.clone(),
                side: Side::Conso,
                index_name: "base".to_string(),
                index_value,
                timestamp: t,
            },
        )
        .unwrap();
    }

    let response = Ledger::dispatch(
        &mut ctx,
        Command::GetMeasuresBetween {
            start: ts(10, 0),
            end: ts(10, 20),
        },
    )
    .unwrap();
    let Response::Series(series) = response else {
        panic!("expected Series response");
    };
    assert_eq!(series.len(), 1);
    let values: Vec<_> = series.values().next().unwrap().iter().map(|m| m.index_value).collect();
    assert_eq!(values, vec![100, 150, 220]);
}

#[test]
fn get_measure_returns_none_for_a_meter_never_written() {
    let mut kv = MemoryKv::default();
    let mut ctx = ctx(&mut kv);
    let meter_id = MeterId::parse("11111111111111_1111").unwrap();

    let response = Ledger::dispatch(
        &mut ctx,
        Command::GetMeasure {
            meter_id,
            side: Side::Conso,
            timestamp: ts(10, 0),
        },
    )
    .unwrap();
    assert!(matches!(response, Response::Measure(None)));
}

#[test]
fn get_meters_enumerates_registered_meters_by_side() {
    let mut kv = MemoryKv::default();
    let mut ctx = ctx(&mut kv);
    let operation_id = OperationId::parse("OP000000001").unwrap();
    let meter_id = MeterId::parse("11111111111111_1111").unwrap();

    Ledger::dispatch(
        &mut ctx,
        Command::AddMeter {
            operation_id: operation_id.clone(),
            meter_id: meter_id.clone(),
            side: Side::Conso,
        },
    )
    .unwrap();
    Ledger::dispatch(
        &mut ctx,
        Command::AddMeter {
            operation_id,
            meter_id,
            side: Side::Prod,
        },
    )
    .unwrap();

    let response = Ledger::dispatch(&mut ctx, Command::GetMeters).unwrap();
    let Response::Meters(meters) = response else {
        panic!("expected Meters response");
    };
    assert_eq!(meters.len(), 2);
}

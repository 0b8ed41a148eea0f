/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The redistribution engine (C9): per-timestamp allocation of produced energy to consumers
//! within one operation, in its classic and packed variants.

use std::collections::HashMap;

use crate::delta::round_half_up;
use crate::error::LedgerError;
use crate::pack_directory::PackDirectory;
use crate::types::{Measure, Meter, OperationId, Side};

/// Runs classic or packed redistribution for `operation_id`, mutating `measures[meter_key]`'s
/// `redistribute` field in place. `measures` holds, at minimum, every meter of this operation
/// that has a reading at the timestamp being redistributed, keyed by [crate::types::MeterKey].
pub fn run<D: PackDirectory>(
    directory: &D,
    operation_id: &OperationId,
    meters: &[Meter],
    measures: &mut HashMap<String, Measure>,
) -> Result<(), LedgerError> {
    if directory.uses_packed_redistribution(operation_id)? {
        packed(directory, operation_id, meters, measures)
    } else {
        classic(operation_id, meters, measures);
        Ok(())
    }
}

fn operation_totals(
    operation_id: &OperationId,
    meters: &[Meter],
    measures: &HashMap<String, Measure>,
) -> (f64, f64) {
    let mut conso = 0.0;
    let mut prod = 0.0;
    for meter in meters {
        if &meter.operation_id != operation_id {
            continue;
        }
        let Some(measure) = measures.get(meter.key().as_str()) else {
            continue;
        };
        match meter.side {
            Side::Conso => conso += measure.delta,
            Side::Prod => prod += measure.delta,
        }
    }
    (conso, prod)
}

/// A consumer's share of `total_prod`, given the operation (or pack)'s `total_conso`.
pub fn allocate_consumption(total_prod: f64, delta: f64, total_conso: f64) -> f64 {
    if total_prod > total_conso {
        return round_half_up(delta, 0.1);
    }
    if total_prod == 0.0 {
        return 0.0;
    }
    round_half_up((delta / total_conso) * total_prod, 0.1)
}

/// A producer's share of the surplus over `total_conso`.
pub fn allocate_production(total_conso: f64, delta: f64, total_prod: f64) -> f64 {
    if total_prod < total_conso {
        return 0.0;
    }
    round_half_up((total_prod - total_conso) * (delta / total_prod), 0.1)
}

fn classic(operation_id: &OperationId, meters: &[Meter], measures: &mut HashMap<String, Measure>) {
    let (conso_total, prod_total) = operation_totals(operation_id, meters, measures);
    tracing::debug!(
        %operation_id,
        conso_total,
        prod_total,
        surplus = (prod_total - conso_total).max(0.0),
        "redistribution: classic"
    );
    for meter in meters {
        if &meter.operation_id != operation_id {
            continue;
        }
        let key = meter.key().as_str().to_string();
        let Some(measure) = measures.get_mut(&key) else {
            continue;
        };
        match meter.side {
            Side::Conso if conso_total > 0.0 => {
                measure.redistribute = allocate_consumption(prod_total, measure.delta, conso_total);
            }
            Side::Prod if prod_total > 0.0 => {
                measure.redistribute = allocate_production(conso_total, measure.delta, prod_total);
            }
            _ => {}
        }
    }
}

fn packed<D: PackDirectory>(
    directory: &D,
    operation_id: &OperationId,
    meters: &[Meter],
    measures: &mut HashMap<String, Measure>,
) -> Result<(), LedgerError> {
    let (conso_total, prod_total) = operation_totals(operation_id, meters, measures);
    tracing::debug!(%operation_id, conso_total, prod_total, "redistribution: packed");

    for meter in meters {
        if &meter.operation_id != operation_id || meter.side != Side::Prod || prod_total <= 0.0 {
            continue;
        }
        let key = meter.key().as_str().to_string();
        if let Some(measure) = measures.get_mut(&key) {
            measure.redistribute = allocate_production(conso_total, measure.delta, prod_total);
        }
    }

    let packs = directory.packs_for(operation_id)?.unwrap_or_default();
    let mut available = prod_total;
    for (pack_number, pack) in packs.into_iter().enumerate() {
        let pack_keys: Vec<String> = pack
            .iter()
            .map(|id| format!("{}{}", id.as_str(), Side::Conso.letter()))
            .collect();
        let pack_total: f64 = pack_keys
            .iter()
            .filter_map(|key| measures.get(key))
            .map(|m| m.delta)
            .sum();

        let mut distributed = 0.0;
        for key in &pack_keys {
            if let Some(measure) = measures.get_mut(key) {
                measure.redistribute = allocate_consumption(available, measure.delta, pack_total);
                distributed += measure.redistribute;
            }
        }
        tracing::debug!(%operation_id, pack_number = pack_number + 1, available, distributed, "redistribution: pack");
        available = round_half_up((available - distributed).max(0.0), 0.1);
    }
    Ok(())
}

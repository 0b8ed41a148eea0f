/*
    Copyright © 2024, Sunchain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Gap-filling between two real readings on the same series (C8).
//!
//! [run] picks one of three regimes -- linear, last-week-proportional, or drop -- and returns
//! the measure the ingestion planner should treat as the immediate predecessor of the real
//! reading it is about to write. For linear and last-week regimes that is the last synthesized
//! grid point; for drop it is `last`, unchanged.

use chrono::{DateTime, Duration, Utc};

use crate::bookmarks;
use crate::delta::{self, PriorReading};
use crate::error::LedgerError;
use crate::kv::KvStore;
use crate::period::Period;
use crate::store::Store;
use crate::types::{Measure, MeterId, OperationId, Side};
use crate::writer;

const LAST_WEEK_OFFSET_MINUTES: i64 = 40;

/// Fills the gap between `last` and `ts`, writing zero or more synthesized measures, and returns
/// the measure the caller should chain its own write against.
#[allow(clippy::too_many_arguments)]
pub fn run<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    operation_id: &OperationId,
    index_name: &str,
    new_index_value: u64,
    last: &Measure,
    ts: DateTime<Utc>,
    period: Period,
) -> Result<Measure, LedgerError> {
    let gap = ts - last.timestamp;
    let one_hour = Duration::hours(1);
    let one_day = Duration::hours(24);

    let first = bookmarks::get_first(store, meter_id, index_name, side)?;
    let meter_week_old = first
        .map(|f| last.timestamp - f >= Duration::days(7))
        .unwrap_or(false);

    if gap <= one_hour || (gap <= one_day && !meter_week_old) {
        linear(
            store,
            meter_id,
            side,
            operation_id,
            index_name,
            new_index_value,
            last,
            ts,
            period,
        )
    } else if gap <= one_day {
        last_week(
            store,
            meter_id,
            side,
            operation_id,
            index_name,
            new_index_value,
            last,
            ts,
            period,
        )
    } else {
        tracing::debug!(meter_id = %meter_id, gap_seconds = gap.num_seconds(), "interpolation regime: drop");
        Ok(last.clone())
    }
}

/// The grid points strictly between `last.timestamp` and `ts`, relying on [Period::grid_between]'s
/// documented extra trailing step to locate `ts` itself and trim past it.
fn intermediate_points(period: Period, last_ts: DateTime<Utc>, ts: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let points = period.grid_between(last_ts, ts);
    if points.len() < 3 {
        return Vec::new();
    }
    points[1..points.len() - 2].to_vec()
}

#[allow(clippy::too_many_arguments)]
fn linear<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    operation_id: &OperationId,
    index_name: &str,
    new_index_value: u64,
    last: &Measure,
    ts: DateTime<Utc>,
    period: Period,
) -> Result<Measure, LedgerError> {
    let points = intermediate_points(period, last.timestamp, ts);
    tracing::debug!(meter_id = %meter_id, steps = points.len(), "interpolation regime: linear");
    if points.is_empty() {
        return Ok(last.clone());
    }

    let steps = period.steps_between(last.timestamp, ts);
    let slope = delta::round_half_up(
        (new_index_value as f64 - last.index_value as f64) / steps as f64,
        1.0,
    ) as i64;

    let mut prev = last.clone();
    for v in points {
        let next_index = (prev.index_value as i64 + slope).max(0) as u64;
        prev = writer::commit(
            store,
            meter_id,
            side,
            operation_id,
            index_name,
            next_index,
            v,
            Some(PriorReading {
                index_name: &prev.index_name,
                index_value: prev.index_value,
                timestamp: prev.timestamp,
                delta: prev.delta,
            }),
        )?;
    }
    Ok(prev)
}

#[allow(clippy::too_many_arguments)]
fn last_week<S: KvStore>(
    store: &mut Store<'_, S>,
    meter_id: &MeterId,
    side: Side,
    operation_id: &OperationId,
    index_name: &str,
    new_index_value: u64,
    last: &Measure,
    ts: DateTime<Utc>,
    period: Period,
) -> Result<Measure, LedgerError> {
    let offset = Duration::minutes(LAST_WEEK_OFFSET_MINUTES);

    let oldm1 = store.get_measure(last.timestamp - offset, meter_id, side)?;
    let oldm2 = store.get_measure(ts - offset, meter_id, side)?;
    let (Some(oldm1), Some(oldm2)) = (oldm1, oldm2) else {
        tracing::debug!(meter_id = %meter_id, "interpolation regime: last-week, baseline missing, no fill");
        return Ok(last.clone());
    };

    let denominator = oldm2.index_value as i64 - oldm1.index_value as i64;
    if denominator <= 0 {
        return Err(LedgerError::BadRatio {
            meter_id: meter_id.clone(),
            denominator,
        });
    }
    let ratio = (new_index_value as f64 - last.index_value as f64) / denominator as f64;

    let points = intermediate_points(period, last.timestamp, ts);
    tracing::debug!(meter_id = %meter_id, steps = points.len(), ratio, "interpolation regime: last-week");
    if points.is_empty() {
        return Ok(last.clone());
    }

    let mut prev = last.clone();
    for v in points {
        // The baseline reading one offset-period earlier, per the same -40min key used above.
        // Its absence mid-gap is only handled at the two boundary lookups, not here; this stops
        // the fill early and leaves `prev` as the chain's tail rather than guessing a value.
        let Some(week_ago) = store.get_measure(v - offset, meter_id, side)? else {
            break;
        };
        let next_index =
            delta::round_half_up(prev.index_value as f64 + week_ago.delta * ratio, 1.0) as u64;
        prev = writer::commit(
            store,
            meter_id,
            side,
            operation_id,
            index_name,
            next_index,
            v,
            Some(PriorReading {
                index_name: &prev.index_name,
                index_value: prev.index_value,
                timestamp: prev.timestamp,
                delta: prev.delta,
            }),
        )?;
    }
    Ok(prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryKv;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn day_ts(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
    }

    fn meter() -> MeterId {
        MeterId::parse("11111111111111_1111").unwrap()
    }

    fn op() -> OperationId {
        OperationId::parse("OP000000001").unwrap()
    }

    #[test]
    fn linear_fills_intermediate_grid_points_scenario_6() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let id = meter();
        let operation_id = op();
        let period = Period::default();

        let first = writer::commit(
            &mut store,
            &id,
            Side::Conso,
            &operation_id,
            "base",
            130,
            ts(15, 30),
            None,
        )
        .unwrap();

        let prev = run(
            &mut store,
            &id,
            Side::Conso,
            &operation_id,
            "base",
            200,
            &first,
            ts(17, 0),
            period,
        )
        .unwrap();

        // 9 steps, slope = round((200-130)/9) = round(7.78) = 8.
        assert_eq!(prev.index_value, 130 + 8 * 8);
        assert_eq!(prev.timestamp, ts(16, 50));

        let mid = store.get_measure(ts(15, 40), &id, Side::Conso).unwrap().unwrap();
        assert_eq!(mid.index_value, 138);
        assert_eq!(mid.delta, 8.0);
    }

    #[test]
    fn drop_regime_leaves_gap_untouched() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let id = meter();
        let operation_id = op();
        let period = Period::default();

        let first = writer::commit(
            &mut store,
            &id,
            Side::Conso,
            &operation_id,
            "base",
            100,
            ts(0, 0),
            None,
        )
        .unwrap();

        let far = first.timestamp + Duration::hours(25);
        let prev = run(
            &mut store,
            &id,
            Side::Conso,
            &operation_id,
            "base",
            500,
            &first,
            far,
            period,
        )
        .unwrap();

        assert_eq!(prev, first);
        let untouched = store
            .get_measure(first.timestamp + period.duration(), &id, Side::Conso)
            .unwrap();
        assert!(untouched.is_none());
    }

    fn raw_measure(
        id: &MeterId,
        side: Side,
        operation_id: &OperationId,
        index_value: u64,
        timestamp: DateTime<Utc>,
        delta: f64,
    ) -> Measure {
        Measure {
            index_name: "base".to_string(),
            index_value,
            timestamp,
            delta,
            redistribute: 0.0,
            meter_id: id.clone(),
            side,
            operation_id: operation_id.clone(),
        }
    }

    #[test]
    fn last_week_scales_the_gap_by_the_ratio_observed_forty_minutes_earlier() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let id = meter();
        let operation_id = op();
        let period = Period::default();

        // A first-ever reading more than a week before `last` makes the meter old enough for
        // the last-week regime to apply instead of linear.
        let first = writer::commit(
            &mut store, &id, Side::Conso, &operation_id, "base", 0, day_ts(2, 0, 0), None,
        ).unwrap();
        let last = writer::commit(
            &mut store, &id, Side::Conso, &operation_id, "base", 500, day_ts(10, 10, 0),
            Some(PriorReading {
                index_name: &first.index_name,
                index_value: first.index_value,
                timestamp: first.timestamp,
                delta: first.delta,
            }),
        ).unwrap();
        assert_eq!(last.delta, 500.0);

        // The two boundary baselines 40 minutes before `last` and before `ts`; their index
        // values set the ratio's denominator to 200.
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 1000, day_ts(10, 9, 20), 0.0)).unwrap();
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 1200, day_ts(10, 10, 30), 0.0)).unwrap();
        // Baselines for the three earliest intermediate points' own 40-minutes-earlier lookups.
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 0, day_ts(10, 9, 30), 20.0)).unwrap();
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 0, day_ts(10, 9, 40), 20.0)).unwrap();
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 0, day_ts(10, 9, 50), 20.0)).unwrap();

        let ts_new = day_ts(10, 11, 10);
        let prev = last_week(
            &mut store, &id, Side::Conso, &operation_id, "base", 700, &last, ts_new, period,
        ).unwrap();

        // ratio = (700 - 500) / (1200 - 1000) = 1.0. Each of the six 10-minute steps adds its
        // own 40-minutes-earlier delta (20, 20, 20, then `last`'s own 500, then the two
        // freshly-synthesized 10:10/10:20 points' 20s) scaled by that ratio.
        assert_eq!(prev.index_value, 1100);
        assert_eq!(prev.timestamp, day_ts(10, 11, 0));

        let at_10_40 = store.get_measure(day_ts(10, 10, 40), &id, Side::Conso).unwrap().unwrap();
        assert_eq!(at_10_40.index_value, 1060);
        assert_eq!(at_10_40.delta, 500.0);
    }

    #[test]
    fn last_week_rejects_a_nonpositive_ratio_denominator() {
        let mut kv = MemoryKv::default();
        let mut store = Store::new(&mut kv);
        let id = meter();
        let operation_id = op();
        let period = Period::default();

        let last = raw_measure(&id, Side::Conso, &operation_id, 500, ts(10, 0), 0.0);
        // Equal index values 40 minutes before `last` and before `ts` make the denominator 0.
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 500, ts(9, 20), 0.0)).unwrap();
        store.put_measure(&raw_measure(&id, Side::Conso, &operation_id, 500, ts(10, 30), 0.0)).unwrap();

        let err = last_week(
            &mut store, &id, Side::Conso, &operation_id, "base", 600, &last, ts(11, 10), period,
        ).unwrap_err();
        assert!(matches!(err, LedgerError::BadRatio { .. }));
    }
}

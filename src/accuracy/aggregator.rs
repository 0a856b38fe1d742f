use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::outcome::classify;
use crate::types::{AccuracyCounters, DailyPerformance, DateScope, EnrichedRecord, OutcomeStatus};

/// Settled result of a record, if it counts toward accuracy at all.
/// Only completed games with a prediction that classify as Win or Loss count.
fn decided(rec: &EnrichedRecord) -> Option<bool> {
    if !rec.completed || rec.model_prediction.is_none() {
        return None;
    }
    match classify(rec) {
        OutcomeStatus::Win => Some(true),
        OutcomeStatus::Loss => Some(false),
        OutcomeStatus::Push | OutcomeStatus::Pending => None,
    }
}

/// Full reduction of `records` within `scope` into win/loss counters.
pub fn tally(records: &[EnrichedRecord], scope: &DateScope, zone: Tz) -> AccuracyCounters {
    let (wins, losses) = records
        .iter()
        .filter(|r| scope.contains(r.local_date(zone)))
        .filter_map(decided)
        .fold((0u32, 0u32), |(w, l), won| if won { (w + 1, l) } else { (w, l + 1) });
    AccuracyCounters::from_counts(wins, losses)
}

/// Per-day counters for every day that has at least one decided game, oldest first.
pub fn daily_breakdown(records: &[EnrichedRecord], zone: Tz) -> Vec<DailyPerformance> {
    let mut days: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for rec in records {
        let (Some(date), Some(won)) = (rec.local_date(zone), decided(rec)) else {
            continue;
        };
        let entry = days.entry(date).or_default();
        if won {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    days.into_iter()
        .map(|(date, (wins, losses))| DailyPerformance {
            date,
            counters: AccuracyCounters::from_counts(wins, losses),
        })
        .collect()
}

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::{LINEUP_SLOTS, NO_DATA};
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Over/under side. Serialized as the model's raw flag: over=1, under=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Side {
    Under,
    Over,
}

impl Side {
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Side::Under),
            1 => Some(Side::Over),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Over => "Over",
            Side::Under => "Under",
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        match side {
            Side::Under => 0,
            Side::Over => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(flag: u8) -> std::result::Result<Self, Self::Error> {
        Side::from_flag(i64::from(flag)).ok_or_else(|| format!("side flag must be 0 or 1, got {flag}"))
    }
}

// ---------------------------------------------------------------------------
// Game metadata + lineups
// ---------------------------------------------------------------------------

/// Posted batting order plus starting pitcher. Slots stay fixed-size while unfilled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineup {
    pub batters: [Option<String>; LINEUP_SLOTS],
    pub pitcher: Option<String>,
}

impl Lineup {
    /// Every posted, non-empty identifier: pitcher first, then batters in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&self.pitcher)
            .chain(self.batters.iter())
            .filter_map(|id| id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Calendar date of an instant as seen in `zone`.
pub fn local_date(start: Option<DateTime<Utc>>, zone: Tz) -> Option<NaiveDate> {
    start.map(|t| t.with_timezone(&zone).date_naive())
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    /// Published over/under threshold.
    pub line: Option<f64>,
    pub home_lineup: Lineup,
    pub away_lineup: Lineup,
}

// ---------------------------------------------------------------------------
// Prediction / outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRecord {
    pub game_id: String,
    pub model_prediction: Option<Side>,
    /// Model probability in [0, 1].
    pub confidence: Option<f64>,
    /// Side already decided while the game is still running.
    pub early_label: Option<Side>,
    pub completed: bool,
    /// Always true when `completed` is.
    pub started: bool,
    /// Combined runs so far; may be live before `completed`.
    pub actual_total: Option<f64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    /// Status text from the feed, e.g. "Final" or the current play.
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Enriched view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLineup {
    pub pitcher: String,
    pub batters: [String; LINEUP_SLOTS],
}

/// One game joined with its latest prediction and resolved player names.
/// Immutable snapshot; the outcome is derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<DateTime<Utc>>,
    pub line: Option<f64>,
    pub model_prediction: Option<Side>,
    pub confidence: Option<f64>,
    pub early_label: Option<Side>,
    pub completed: bool,
    pub started: bool,
    pub actual_total: Option<f64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub description: Option<String>,
    pub home_lineup: ResolvedLineup,
    pub away_lineup: ResolvedLineup,
}

impl EnrichedRecord {
    /// Calendar date of the scheduled start in `zone`; None until the start is known.
    pub fn local_date(&self, zone: Tz) -> Option<NaiveDate> {
        local_date(self.start_time, zone)
    }

    pub fn pick_label(&self) -> &'static str {
        self.model_prediction.map_or("-", Side::label)
    }
}

// ---------------------------------------------------------------------------
// Outcome classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Pending,
    Win,
    Loss,
    Push,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeStatus::Pending => "PENDING",
            OutcomeStatus::Win => "WIN",
            OutcomeStatus::Loss => "LOSS",
            OutcomeStatus::Push => "PUSH",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Accuracy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccuracyCounters {
    pub wins: u32,
    pub losses: u32,
    /// "62.5%", or "no data" when nothing has been decided.
    pub percent: String,
    /// wins + losses; pushes and pending never count.
    pub total: u32,
}

impl AccuracyCounters {
    pub fn from_counts(wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        let percent = if total > 0 {
            format!("{:.1}%", f64::from(wins) / f64::from(total) * 100.0)
        } else {
            NO_DATA.to_string()
        };
        Self { wins, losses, percent, total }
    }
}

impl Default for AccuracyCounters {
    fn default() -> Self {
        Self::from_counts(0, 0)
    }
}

// ---------------------------------------------------------------------------
// Date scope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateScope {
    /// One calendar day in the reference zone.
    Day(NaiveDate),
    All,
}

impl DateScope {
    /// Parse a request's date parameter. Absent means today in `zone`.
    pub fn parse(raw: Option<&str>, zone: Tz, now: DateTime<Utc>) -> Result<Self> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(DateScope::Day(now.with_timezone(&zone).date_naive()));
        };
        if raw.eq_ignore_ascii_case("all") {
            return Ok(DateScope::All);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(DateScope::Day)
            .map_err(|_| AppError::InvalidDate(format!("'{raw}' is not a YYYY-MM-DD date")))
    }

    /// A record with an unknown start only belongs to the unscoped view.
    pub fn contains(&self, local_date: Option<NaiveDate>) -> bool {
        match self {
            DateScope::All => true,
            DateScope::Day(day) => local_date == Some(*day),
        }
    }
}

impl std::fmt::Display for DateScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateScope::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            DateScope::All => write!(f, "all"),
        }
    }
}

// ---------------------------------------------------------------------------
// Report payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: EnrichedRecord,
    pub pick: &'static str,
    pub outcome_status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ScoredRecord>,
    pub daily: AccuracyCounters,
    pub all_time: AccuracyCounters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPerformance {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counters: AccuracyCounters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    #[test]
    fn counters_without_decisions_report_no_data() {
        let c = AccuracyCounters::from_counts(0, 0);
        assert_eq!(c.percent, "no data");
        assert_eq!(c.total, 0);
    }

    #[test]
    fn counters_format_one_decimal() {
        let c = AccuracyCounters::from_counts(5, 3);
        assert_eq!(c.percent, "62.5%");
        assert_eq!(c.total, 8);
    }

    #[test]
    fn missing_date_is_today_in_reference_zone() {
        // 03:00 UTC on the 2nd is still the evening of the 1st in Los Angeles.
        let now = Utc.with_ymd_and_hms(2025, 7, 2, 3, 0, 0).unwrap();
        let scope = DateScope::parse(None, Los_Angeles, now).unwrap();
        assert_eq!(scope, DateScope::Day(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let now = Utc::now();
        assert!(matches!(
            DateScope::parse(Some("07/01/2025"), Los_Angeles, now),
            Err(AppError::InvalidDate(_))
        ));
        assert!(DateScope::parse(Some("2025-02-30"), Los_Angeles, now).is_err());
        assert_eq!(DateScope::parse(Some("ALL"), Los_Angeles, now).unwrap(), DateScope::All);
    }

    #[test]
    fn lineup_ids_skip_empty_slots() {
        let mut lineup = Lineup::default();
        lineup.pitcher = Some("p1".to_string());
        lineup.batters[0] = Some("b1".to_string());
        lineup.batters[4] = Some(String::new());
        let ids: Vec<&str> = lineup.ids().collect();
        assert_eq!(ids, vec!["p1", "b1"]);
    }

    #[test]
    fn side_serializes_as_flag() {
        assert_eq!(serde_json::to_string(&Side::Over).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Side>("0").unwrap(), Side::Under);
        assert!(serde_json::from_str::<Side>("2").is_err());
    }
}

//! Database row types matching migrations/0001_create_ledger_tables.sql.
//! Decoded by sqlx, then converted into the typed domain records.
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::types::{GameRecord, Lineup, PredictionRecord, Side};

#[derive(Debug, sqlx::FromRow)]
pub struct GameRow {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: Option<String>,
    pub line: Option<f64>,
    pub home_sp_id: Option<String>,
    pub away_sp_id: Option<String>,
    pub home_1_id: Option<String>,
    pub home_2_id: Option<String>,
    pub home_3_id: Option<String>,
    pub home_4_id: Option<String>,
    pub home_5_id: Option<String>,
    pub home_6_id: Option<String>,
    pub home_7_id: Option<String>,
    pub home_8_id: Option<String>,
    pub home_9_id: Option<String>,
    pub away_1_id: Option<String>,
    pub away_2_id: Option<String>,
    pub away_3_id: Option<String>,
    pub away_4_id: Option<String>,
    pub away_5_id: Option<String>,
    pub away_6_id: Option<String>,
    pub away_7_id: Option<String>,
    pub away_8_id: Option<String>,
    pub away_9_id: Option<String>,
}

impl GameRow {
    pub fn into_record(self) -> GameRecord {
        let start_time = self
            .start_time
            .as_deref()
            .and_then(|raw| parse_start_time(&self.game_id, raw));
        GameRecord {
            home_lineup: Lineup {
                pitcher: self.home_sp_id,
                batters: [
                    self.home_1_id, self.home_2_id, self.home_3_id,
                    self.home_4_id, self.home_5_id, self.home_6_id,
                    self.home_7_id, self.home_8_id, self.home_9_id,
                ],
            },
            away_lineup: Lineup {
                pitcher: self.away_sp_id,
                batters: [
                    self.away_1_id, self.away_2_id, self.away_3_id,
                    self.away_4_id, self.away_5_id, self.away_6_id,
                    self.away_7_id, self.away_8_id, self.away_9_id,
                ],
            },
            game_id: self.game_id,
            home_team: self.home_team,
            away_team: self.away_team,
            start_time,
            line: self.line,
        }
    }
}

fn parse_start_time(game_id: &str, raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            warn!(game_id, raw, "unparseable start_time treated as unknown: {e}");
            None
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PredictionRow {
    pub id: i64,
    pub game_id: String,
    pub model_prediction: Option<i64>,
    pub confidence: Option<f64>,
    pub early_label: Option<i64>,
    pub completed: bool,
    pub started: bool,
    pub actual_total: Option<f64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub description: Option<String>,
}

impl PredictionRow {
    pub fn into_record(self) -> PredictionRecord {
        let model_prediction = self.side_flag("model_prediction", self.model_prediction);
        let early_label = self.side_flag("early_label", self.early_label);
        PredictionRecord {
            game_id: self.game_id,
            model_prediction,
            confidence: self.confidence,
            early_label,
            completed: self.completed,
            started: self.started || self.completed,
            actual_total: self.actual_total,
            home_score: self.home_score,
            away_score: self.away_score,
            description: self.description,
        }
    }

    fn side_flag(&self, column: &'static str, flag: Option<i64>) -> Option<Side> {
        let flag = flag?;
        let side = Side::from_flag(flag);
        if side.is_none() {
            warn!(row_id = self.id, game_id = %self.game_id, column, flag, "side flag out of range, treated as null");
        }
        side
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PlayerRow {
    pub player_id: String,
    pub player_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn game_row(start_time: Option<&str>) -> GameRow {
        GameRow {
            game_id: "778899".to_string(),
            home_team: "Boston Red Sox".to_string(),
            away_team: "New York Yankees".to_string(),
            start_time: start_time.map(str::to_string),
            line: Some(9.0),
            home_sp_id: Some("sp-h".to_string()),
            away_sp_id: None,
            home_1_id: Some("h1".to_string()),
            home_2_id: None,
            home_3_id: None,
            home_4_id: None,
            home_5_id: None,
            home_6_id: None,
            home_7_id: None,
            home_8_id: None,
            home_9_id: Some("h9".to_string()),
            away_1_id: None,
            away_2_id: None,
            away_3_id: None,
            away_4_id: None,
            away_5_id: None,
            away_6_id: None,
            away_7_id: None,
            away_8_id: None,
            away_9_id: None,
        }
    }

    #[test]
    fn game_row_maps_slots_in_order() {
        let rec = game_row(Some("2025-07-04T23:10:00Z")).into_record();
        assert_eq!(rec.home_lineup.pitcher.as_deref(), Some("sp-h"));
        assert_eq!(rec.home_lineup.batters[0].as_deref(), Some("h1"));
        assert_eq!(rec.home_lineup.batters[8].as_deref(), Some("h9"));
        assert_eq!(rec.away_lineup, Lineup::default());
        assert_eq!(rec.start_time, Some(Utc.with_ymd_and_hms(2025, 7, 4, 23, 10, 0).unwrap()));
    }

    #[test]
    fn offset_start_times_normalise_to_utc() {
        let rec = game_row(Some("2025-07-04T16:10:00-07:00")).into_record();
        assert_eq!(rec.start_time, Some(Utc.with_ymd_and_hms(2025, 7, 4, 23, 10, 0).unwrap()));
    }

    #[test]
    fn garbage_start_time_is_unknown() {
        assert_eq!(game_row(Some("7:10 PM")).into_record().start_time, None);
    }

    #[test]
    fn prediction_row_normalises_flags() {
        let row = PredictionRow {
            id: 1,
            game_id: "778899".to_string(),
            model_prediction: Some(3),
            confidence: Some(0.7),
            early_label: Some(1),
            completed: true,
            started: false,
            actual_total: Some(10.0),
            home_score: Some(6),
            away_score: Some(4),
            description: Some("Final".to_string()),
        };
        let rec = row.into_record();
        assert_eq!(rec.model_prediction, None);
        assert_eq!(rec.early_label, Some(Side::Over));
        assert!(rec.started);
    }
}

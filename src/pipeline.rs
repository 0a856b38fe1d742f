use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::info;

use crate::accuracy::{daily_breakdown, tally};
use crate::error::{AppError, Result};
use crate::joiner::join_records;
use crate::outcome::classify;
use crate::source::RecordSource;
use crate::types::{
    DailyPerformance, DailyReport, DateScope, EnrichedRecord, GameRecord, OutcomeStatus,
    PredictionRecord, ScoredRecord,
};

/// The three source sets as read for one request.
struct Snapshot {
    games: Vec<GameRecord>,
    predictions: Vec<PredictionRecord>,
    players: HashMap<String, String>,
}

impl Snapshot {
    fn join(&self, scope: &DateScope, zone: Tz) -> Vec<EnrichedRecord> {
        join_records(&self.games, &self.predictions, &self.players, scope, zone)
    }
}

/// Builds report payloads from an injected source. Holds no per-request state,
/// so one instance serves every request for the life of the process.
pub struct ReportBuilder<S> {
    source: S,
    zone: Tz,
    source_timeout: Duration,
}

impl<S: RecordSource> ReportBuilder<S> {
    pub fn new(source: S, zone: Tz, source_timeout: Duration) -> Self {
        Self { source, zone, source_timeout }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Enriched records for `scope` plus day-scoped and all-time accuracy.
    pub async fn build_report(&self, scope: DateScope) -> Result<DailyReport> {
        let snapshot = self.load().await?;
        let history = snapshot.join(&DateScope::All, self.zone);
        let records = match scope {
            DateScope::All => history.clone(),
            DateScope::Day(_) => snapshot.join(&scope, self.zone),
        };

        let daily = tally(&history, &scope, self.zone);
        let all_time = tally(&history, &DateScope::All, self.zone);

        let records: Vec<ScoredRecord> = records
            .into_iter()
            .map(|record| ScoredRecord {
                pick: record.pick_label(),
                outcome_status: classify(&record),
                record,
            })
            .collect();

        let pending = records
            .iter()
            .filter(|r| r.outcome_status == OutcomeStatus::Pending)
            .count();
        info!(
            event = "REPORT_BUILT",
            date = %scope,
            games = records.len(),
            pending,
            daily_wins = daily.wins,
            daily_losses = daily.losses,
            all_time_total = all_time.total,
            "report {} | {} games ({} pending) | day {}-{} | all-time {} ({})",
            scope, records.len(), pending, daily.wins, daily.losses, all_time.total, all_time.percent,
        );

        Ok(DailyReport {
            date: scope.to_string(),
            generated_at: Utc::now(),
            records,
            daily,
            all_time,
        })
    }

    /// Accuracy for every day in history with at least one decided game.
    pub async fn performance(&self) -> Result<Vec<DailyPerformance>> {
        let snapshot = self.load().await?;
        let history = snapshot.join(&DateScope::All, self.zone);
        Ok(daily_breakdown(&history, self.zone))
    }

    /// Read all three sets concurrently; any one failing or overrunning fails the whole read.
    async fn load(&self) -> Result<Snapshot> {
        let limit = self.source_timeout;
        let (games, predictions, players) = tokio::try_join!(
            bounded("games", limit, self.source.fetch_games()),
            bounded("predictions", limit, self.source.fetch_predictions()),
            bounded("players", limit, self.source.fetch_players()),
        )?;
        Ok(Snapshot { games, predictions, players })
    }
}

async fn bounded<T>(
    feed: &'static str,
    limit: Duration,
    read: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, read)
        .await
        .map_err(|_| AppError::SourceTimeout { feed })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::reader::test_support::*;
    use crate::db::SqliteSource;
    use chrono::NaiveDate;
    use chrono_tz::America::Los_Angeles;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn day(y: i32, m: u32, d: u32) -> DateScope {
        DateScope::Day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    async fn seeded() -> ReportBuilder<SqliteSource> {
        let pool = memory_pool().await;
        // July 1 (Los Angeles): one win, one push, one pending.
        insert_game(&pool, "g1", "2025-07-01T20:05:00Z", Some(7.5), Some("sp1")).await;
        insert_game(&pool, "g2", "2025-07-01T23:40:00Z", Some(8.5), None).await;
        insert_game(&pool, "g3", "2025-07-02T02:10:00Z", Some(9.0), None).await;
        // July 2: one loss.
        insert_game(&pool, "g4", "2025-07-02T19:05:00Z", Some(7.5), None).await;

        insert_prediction(&pool, "g1", Some(1), true, Some(9.0)).await;
        insert_prediction(&pool, "g2", Some(0), true, Some(8.5)).await;
        insert_prediction(&pool, "g3", Some(1), false, None).await;
        insert_prediction(&pool, "g4", Some(1), true, Some(6.0)).await;

        insert_player(&pool, "sp1", "Logan Webb").await;
        ReportBuilder::new(SqliteSource::new(pool), Los_Angeles, TIMEOUT)
    }

    #[tokio::test]
    async fn day_report_classifies_and_counts() {
        let builder = seeded().await;
        let report = builder.build_report(day(2025, 7, 1)).await.unwrap();

        let statuses: Vec<(&str, OutcomeStatus)> = report
            .records
            .iter()
            .map(|r| (r.record.game_id.as_str(), r.outcome_status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("g1", OutcomeStatus::Win),
                ("g2", OutcomeStatus::Push),
                ("g3", OutcomeStatus::Pending),
            ]
        );
        assert_eq!(report.records[0].record.home_lineup.pitcher, "Logan Webb");
        assert_eq!(report.records[0].pick, "Over");
        assert_eq!(report.records[1].pick, "Under");

        assert_eq!((report.daily.wins, report.daily.losses, report.daily.total), (1, 0, 1));
        assert_eq!((report.all_time.wins, report.all_time.losses, report.all_time.total), (1, 1, 2));
        assert_eq!(report.all_time.percent, "50.0%");
        assert_eq!(report.date, "2025-07-01");
    }

    #[tokio::test]
    async fn empty_day_keeps_all_time_history() {
        let builder = seeded().await;
        let report = builder.build_report(day(2025, 8, 15)).await.unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.daily.percent, "no data");
        assert_eq!(report.daily.total, 0);
        assert_eq!(report.all_time.total, 2);
    }

    #[tokio::test]
    async fn all_scope_returns_every_game() {
        let builder = seeded().await;
        let report = builder.build_report(DateScope::All).await.unwrap();
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.daily, report.all_time);
    }

    #[tokio::test]
    async fn empty_sources_are_not_errors() {
        let builder = ReportBuilder::new(SqliteSource::new(memory_pool().await), Los_Angeles, TIMEOUT);
        let report = builder.build_report(day(2025, 7, 1)).await.unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.all_time.percent, "no data");
        assert!(builder.performance().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn performance_groups_by_reference_day() {
        let builder = seeded().await;
        let days = builder.performance().await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(days[0].counters.wins, 1);
        assert_eq!(days[1].counters.losses, 1);
    }

    struct StalledPlayers;

    impl RecordSource for StalledPlayers {
        async fn fetch_games(&self) -> Result<Vec<GameRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_predictions(&self) -> Result<Vec<PredictionRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_players(&self) -> Result<HashMap<String, String>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(HashMap::new())
        }
    }

    #[tokio::test]
    async fn stalled_source_fails_fast() {
        let builder = ReportBuilder::new(StalledPlayers, Los_Angeles, Duration::from_millis(20));
        let err = builder.build_report(DateScope::All).await.unwrap_err();
        assert!(matches!(err, AppError::SourceTimeout { feed: "players" }));
        assert!(err.retryable());
    }
}

use std::collections::HashMap;

use chrono_tz::Tz;
use tracing::debug;

use crate::identity::{resolve, NameBook};
use crate::types::{local_date, DateScope, EnrichedRecord, GameRecord, PredictionRecord};

/// Left-join the games in `scope` to their predictions and resolve lineup names.
///
/// * Games are kept in their source order; nothing is re-sorted.
/// * A game without a prediction still yields a record, with every prediction field empty.
/// * When a game has several prediction runs, the last one in `predictions` wins.
/// * Names for the whole surviving set are resolved in a single batch.
pub fn join_records(
    games: &[GameRecord],
    predictions: &[PredictionRecord],
    directory: &HashMap<String, String>,
    scope: &DateScope,
    zone: Tz,
) -> Vec<EnrichedRecord> {
    let in_scope: Vec<&GameRecord> = games
        .iter()
        .filter(|g| scope.contains(local_date(g.start_time, zone)))
        .collect();

    let mut by_game: HashMap<&str, &PredictionRecord> = HashMap::with_capacity(predictions.len());
    let mut superseded = 0usize;
    for p in predictions {
        if by_game.insert(p.game_id.as_str(), p).is_some() {
            superseded += 1;
        }
    }
    if superseded > 0 {
        debug!(superseded, "older prediction runs replaced by newer ones");
    }

    let names = resolve(
        directory,
        in_scope
            .iter()
            .flat_map(|g| g.home_lineup.ids().chain(g.away_lineup.ids())),
    );

    in_scope
        .into_iter()
        .map(|g| enrich(g, by_game.get(g.game_id.as_str()).copied(), &names))
        .collect()
}

fn enrich(game: &GameRecord, prediction: Option<&PredictionRecord>, names: &NameBook) -> EnrichedRecord {
    let p = prediction.cloned().unwrap_or_default();
    EnrichedRecord {
        game_id: game.game_id.clone(),
        home_team: game.home_team.clone(),
        away_team: game.away_team.clone(),
        start_time: game.start_time,
        line: game.line,
        model_prediction: p.model_prediction,
        confidence: p.confidence,
        early_label: p.early_label,
        completed: p.completed,
        started: p.started || p.completed,
        actual_total: p.actual_total,
        home_score: p.home_score,
        away_score: p.away_score,
        description: p.description,
        home_lineup: names.resolve_lineup(&game.home_lineup),
        away_lineup: names.resolve_lineup(&game.away_lineup),
    }
}

//! Collaborator boundary for the three independently-owned record sets.
//! The pipeline takes an explicit `RecordSource` rather than reaching for a
//! process-global client; production wires in `db::SqliteSource`.

use std::collections::HashMap;
use std::future::Future;

use crate::error::Result;
use crate::types::{GameRecord, PredictionRecord};

pub trait RecordSource: Send + Sync {
    /// All game metadata, in source order.
    fn fetch_games(&self) -> impl Future<Output = Result<Vec<GameRecord>>> + Send;

    /// All prediction runs, oldest first.
    fn fetch_predictions(&self) -> impl Future<Output = Result<Vec<PredictionRecord>>> + Send;

    /// player_id → display name.
    fn fetch_players(&self) -> impl Future<Output = Result<HashMap<String, String>>> + Send;
}

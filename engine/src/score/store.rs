use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{PlayerId, PlayerIdentity};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
const MAX_LEADERBOARD_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreStoreError {
    Unavailable(String),
    Rejected(String),
}

impl ScoreStoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScoreStoreError::Unavailable(_))
    }
}

impl fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStoreError::Unavailable(reason) => write!(f, "score store unavailable: {}", reason),
            ScoreStoreError::Rejected(reason) => write!(f, "score rejected: {}", reason),
        }
    }
}

impl std::error::Error for ScoreStoreError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitAck {
    /// False when the stored best was already at least as high.
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub display_name: String,
    pub score: u32,
    pub updated_at: DateTime<Utc>,
}

pub trait ScoreStore: Send + Sync + Clone + 'static {
    fn submit_score(
        &self,
        player: &PlayerIdentity,
        score: u32,
    ) -> impl Future<Output = Result<SubmitAck, ScoreStoreError>> + Send;

    fn query_best_score(
        &self,
        player_id: &PlayerId,
    ) -> impl Future<Output = Result<Option<u32>, ScoreStoreError>> + Send;

    fn leaderboard(
        &self,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, ScoreStoreError>> + Send;
}

/// Keeps each player's best score; lower or equal submissions are no-ops.
#[derive(Clone, Default)]
pub struct InMemoryScoreStore {
    entries: Arc<Mutex<HashMap<PlayerId, LeaderboardEntry>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for InMemoryScoreStore {
    async fn submit_score(&self, player: &PlayerIdentity, score: u32) -> Result<SubmitAck, ScoreStoreError> {
        if player.player_id.as_str().trim().is_empty() {
            return Err(ScoreStoreError::Rejected("missing player id".to_string()));
        }

        let mut entries = self.entries.lock().await;
        let now = Utc::now();
        match entries.get_mut(&player.player_id) {
            Some(existing) if score <= existing.score => Ok(SubmitAck { replaced: false }),
            Some(existing) => {
                existing.score = score;
                existing.display_name = player.display_name.clone();
                existing.updated_at = now;
                Ok(SubmitAck { replaced: true })
            }
            None => {
                entries.insert(
                    player.player_id.clone(),
                    LeaderboardEntry {
                        player_id: player.player_id.clone(),
                        display_name: player.display_name.clone(),
                        score,
                        updated_at: now,
                    },
                );
                Ok(SubmitAck { replaced: true })
            }
        }
    }

    async fn query_best_score(&self, player_id: &PlayerId) -> Result<Option<u32>, ScoreStoreError> {
        Ok(self.entries.lock().await.get(player_id).map(|e| e.score))
    }

    async fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, ScoreStoreError> {
        let limit = limit
            .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
            .clamp(1, MAX_LEADERBOARD_SIZE);
        let mut entries: Vec<LeaderboardEntry> = self.entries.lock().await.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.updated_at.cmp(&b.updated_at))
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}

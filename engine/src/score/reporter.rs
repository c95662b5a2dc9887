use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::game::TerminalEvent;
use crate::{log, warn};
use super::store::{ScoreStore, ScoreStoreError};
use super::tracker::{BestScoreTracker, SubmissionStatus, SubmitDecision};

/// Submits finished runs in the background; the simulation never waits on it.
#[derive(Clone)]
pub struct ScoreReporter<S: ScoreStore> {
    store: S,
    tracker: Arc<Mutex<BestScoreTracker>>,
}

impl<S: ScoreStore> ScoreReporter<S> {
    pub fn new(store: S, tracker: BestScoreTracker) -> Self {
        Self {
            store,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn tracker(&self) -> Arc<Mutex<BestScoreTracker>> {
        self.tracker.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raises the tracker's best score to what the store holds. Returns the
    /// stored value.
    pub async fn load_best(&self) -> Result<Option<u32>, ScoreStoreError> {
        let player_id = self.tracker.lock().await.player().player_id.clone();
        let best = self.store.query_best_score(&player_id).await?;
        self.tracker.lock().await.observe_best(best);
        Ok(best)
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.tracker.lock().await.status().clone()
    }

    pub async fn session_started(&self, generation: u64) {
        self.tracker.lock().await.on_session_started(generation);
    }

    /// Returns the background task when a submission was dispatched.
    pub async fn report(&self, event: &TerminalEvent) -> Option<JoinHandle<()>> {
        let decision = self
            .tracker
            .lock()
            .await
            .decide(event.generation, event.final_score);

        match decision {
            SubmitDecision::Submit => Some(self.dispatch(event.generation, event.final_score).await),
            SubmitDecision::Skip => {
                log!("Score {} not submitted, not above previous best", event.final_score);
                None
            }
        }
    }

    pub async fn retry(&self, generation: u64) -> Option<JoinHandle<()>> {
        let score = self.tracker.lock().await.retry(generation)?;
        Some(self.dispatch(generation, score).await)
    }

    async fn dispatch(&self, generation: u64, score: u32) -> JoinHandle<()> {
        let player = self.tracker.lock().await.player().clone();
        let store = self.store.clone();
        let tracker = self.tracker.clone();

        tokio::spawn(async move {
            let result = store.submit_score(&player, score).await;
            match &result {
                Ok(ack) => log!(
                    "Submitted score {} for {} (replaced: {})",
                    score,
                    player.player_id,
                    ack.replaced
                ),
                Err(e) => warn!("Score submit for {} failed: {}", player.player_id, e),
            }
            tracker.lock().await.complete(generation, score, result);
        })
    }
}

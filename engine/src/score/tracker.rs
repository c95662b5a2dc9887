use crate::{PlayerIdentity, warn};
use super::policy::should_persist;
use super::store::{ScoreStoreError, SubmitAck};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Skipped,
    Pending,
    Submitted,
    Failed { reason: String, retryable: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Submit,
    Skip,
}

/// Best score and submission state for one player across restarts.
#[derive(Debug, Clone)]
pub struct BestScoreTracker {
    player: PlayerIdentity,
    previous_best: Option<u32>,
    generation: u64,
    status: SubmissionStatus,
    pending_score: Option<u32>,
}

impl BestScoreTracker {
    pub fn new(player: PlayerIdentity, previous_best: Option<u32>) -> Self {
        Self {
            player,
            previous_best,
            generation: 0,
            status: SubmissionStatus::Idle,
            pending_score: None,
        }
    }

    pub fn player(&self) -> &PlayerIdentity {
        &self.player
    }

    pub fn previous_best(&self) -> Option<u32> {
        self.previous_best
    }

    /// Best scores only move up; a lower or missing value is ignored.
    pub fn observe_best(&mut self, best: Option<u32>) {
        if let Some(score) = best {
            self.raise_best(score);
        }
    }

    fn raise_best(&mut self, score: u32) {
        self.previous_best = Some(self.previous_best.map_or(score, |best| best.max(score)));
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn on_session_started(&mut self, generation: u64) {
        self.generation = generation;
        self.status = SubmissionStatus::Idle;
        self.pending_score = None;
    }

    /// At most one `Submit` per generation.
    pub fn decide(&mut self, generation: u64, final_score: u32) -> SubmitDecision {
        if generation != self.generation || self.status != SubmissionStatus::Idle {
            return SubmitDecision::Skip;
        }

        if should_persist(final_score, self.previous_best) {
            self.status = SubmissionStatus::Pending;
            self.pending_score = Some(final_score);
            SubmitDecision::Submit
        } else {
            self.status = SubmissionStatus::Skipped;
            SubmitDecision::Skip
        }
    }

    /// Applies a submission result. A result from an older generation only
    /// raises the best score; the current status is left alone. Returns
    /// false in that case.
    pub fn complete(
        &mut self,
        generation: u64,
        score: u32,
        result: Result<SubmitAck, ScoreStoreError>,
    ) -> bool {
        if generation != self.generation {
            warn!(
                "Stale score result for {} (generation {}, current {})",
                self.player.player_id, generation, self.generation
            );
            if result.is_ok() {
                self.raise_best(score);
            }
            return false;
        }

        match result {
            Ok(_) => {
                self.raise_best(score);
                self.status = SubmissionStatus::Submitted;
                self.pending_score = None;
            }
            Err(e) => {
                self.status = SubmissionStatus::Failed {
                    retryable: e.is_retryable(),
                    reason: e.to_string(),
                };
            }
        }
        true
    }

    /// Score to resubmit if the current generation failed retryably.
    pub fn retry(&mut self, generation: u64) -> Option<u32> {
        if generation != self.generation {
            return None;
        }
        match self.status {
            SubmissionStatus::Failed { retryable: true, .. } => {
                self.status = SubmissionStatus::Pending;
                self.pending_score
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(best: Option<u32>) -> BestScoreTracker {
        let mut tracker = BestScoreTracker::new(PlayerIdentity::new("7", "eve"), best);
        tracker.on_session_started(1);
        tracker
    }

    #[test]
    fn test_decides_once_per_generation() {
        let mut tracker = tracker(None);
        assert_eq!(tracker.decide(1, 6), SubmitDecision::Submit);
        assert_eq!(tracker.decide(1, 6), SubmitDecision::Skip);
    }

    #[test]
    fn test_tie_with_best_is_skipped() {
        let mut tracker = tracker(Some(10));
        assert_eq!(tracker.decide(1, 10), SubmitDecision::Skip);
        assert_eq!(tracker.status(), &SubmissionStatus::Skipped);
    }

    #[test]
    fn test_success_raises_best() {
        let mut tracker = tracker(Some(10));
        assert_eq!(tracker.decide(1, 14), SubmitDecision::Submit);
        assert!(tracker.complete(1, 14, Ok(SubmitAck { replaced: true })));
        assert_eq!(tracker.previous_best(), Some(14));
        assert_eq!(tracker.status(), &SubmissionStatus::Submitted);
    }

    #[test]
    fn test_stale_success_still_raises_best() {
        let mut tracker = tracker(None);
        tracker.decide(1, 8);
        tracker.on_session_started(2);

        assert!(!tracker.complete(1, 8, Ok(SubmitAck { replaced: true })));
        assert_eq!(tracker.previous_best(), Some(8));
        assert_eq!(tracker.status(), &SubmissionStatus::Idle);
        assert_eq!(tracker.decide(2, 8), SubmitDecision::Skip);
    }

    #[test]
    fn test_stale_failure_is_dropped() {
        let mut tracker = tracker(None);
        tracker.decide(1, 8);
        tracker.on_session_started(2);

        tracker.complete(1, 8, Err(ScoreStoreError::Unavailable("offline".to_string())));
        assert_eq!(tracker.previous_best(), None);
        assert_eq!(tracker.status(), &SubmissionStatus::Idle);
        assert_eq!(tracker.retry(2), None);
    }

    #[test]
    fn test_observed_best_never_lowers() {
        let mut tracker = tracker(Some(10));
        tracker.observe_best(None);
        tracker.observe_best(Some(4));
        assert_eq!(tracker.previous_best(), Some(10));
        tracker.observe_best(Some(12));
        assert_eq!(tracker.previous_best(), Some(12));
    }

    #[test]
    fn test_retryable_failure_can_be_retried() {
        let mut tracker = tracker(None);
        tracker.decide(1, 8);
        tracker.complete(1, 8, Err(ScoreStoreError::Unavailable("offline".to_string())));
        assert!(matches!(tracker.status(), SubmissionStatus::Failed { retryable: true, .. }));
        assert_eq!(tracker.previous_best(), None);

        assert_eq!(tracker.retry(1), Some(8));
        assert_eq!(tracker.status(), &SubmissionStatus::Pending);
        assert_eq!(tracker.retry(1), None);
    }

    #[test]
    fn test_rejected_failure_is_final() {
        let mut tracker = tracker(None);
        tracker.decide(1, 8);
        tracker.complete(1, 8, Err(ScoreStoreError::Rejected("bad".to_string())));
        assert_eq!(tracker.retry(1), None);
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::id_generator::generate_challenge_id;
use crate::{ChallengeId, PlayerId, PlayerIdentity, log};

pub const DEFAULT_CHALLENGE_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    NotFound(ChallengeId),
    Expired(ChallengeId),
    NotParticipant(PlayerId),
    AlreadyCompleted(ChallengeId),
}

impl fmt::Display for ChallengeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeError::NotFound(id) => write!(f, "challenge {} not found", id),
            ChallengeError::Expired(id) => write!(f, "challenge {} has expired", id),
            ChallengeError::NotParticipant(id) => write!(f, "player {} is not part of this challenge", id),
            ChallengeError::AlreadyCompleted(id) => write!(f, "challenge {} is already completed", id),
        }
    }
}

impl std::error::Error for ChallengeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeOutcome {
    Challenger,
    Challenged,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeParticipant {
    pub player: PlayerIdentity,
    pub score: u32,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ChallengeParticipant {
    fn new(player: PlayerIdentity) -> Self {
        Self {
            player,
            score: 0,
            submitted_at: None,
        }
    }

    pub fn has_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub challenger: ChallengeParticipant,
    pub challenged: ChallengeParticipant,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: ChallengeStatus,
    pub winner: Option<ChallengeOutcome>,
}

impl Challenge {
    /// A supplied challenger score counts as already submitted.
    pub fn create(
        challenger: PlayerIdentity,
        challenged: PlayerIdentity,
        challenger_score: Option<u32>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let mut challenger = ChallengeParticipant::new(challenger);
        if let Some(score) = challenger_score {
            challenger.score = score;
            challenger.submitted_at = Some(now);
        }

        Self {
            id: generate_challenge_id(now),
            challenger,
            challenged: ChallengeParticipant::new(challenged),
            created_at: now,
            expires_at: now + ttl,
            status: ChallengeStatus::Active,
            winner: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn participant(&self, player_id: &PlayerId) -> Option<&ChallengeParticipant> {
        if &self.challenger.player.player_id == player_id {
            Some(&self.challenger)
        } else if &self.challenged.player.player_id == player_id {
            Some(&self.challenged)
        } else {
            None
        }
    }

    /// Last write wins. A completed challenge past its expiry is frozen.
    pub fn submit(&mut self, player_id: &PlayerId, score: u32, now: DateTime<Utc>) -> Result<(), ChallengeError> {
        if self.is_expired_at(now) {
            if self.status == ChallengeStatus::Completed {
                return Err(ChallengeError::AlreadyCompleted(self.id.clone()));
            }
            self.status = ChallengeStatus::Expired;
            return Err(ChallengeError::Expired(self.id.clone()));
        }
        if self.status == ChallengeStatus::Expired {
            return Err(ChallengeError::Expired(self.id.clone()));
        }

        let side = if &self.challenger.player.player_id == player_id {
            &mut self.challenger
        } else if &self.challenged.player.player_id == player_id {
            &mut self.challenged
        } else {
            return Err(ChallengeError::NotParticipant(player_id.clone()));
        };
        side.score = score;
        side.submitted_at = Some(now);

        if self.challenger.has_submitted() && self.challenged.has_submitted() {
            self.status = ChallengeStatus::Completed;
            self.winner = Some(self.decide_winner());
        }
        Ok(())
    }

    fn decide_winner(&self) -> ChallengeOutcome {
        match self.challenger.score.cmp(&self.challenged.score) {
            std::cmp::Ordering::Greater => ChallengeOutcome::Challenger,
            std::cmp::Ordering::Less => ChallengeOutcome::Challenged,
            std::cmp::Ordering::Equal => ChallengeOutcome::Tie,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryChallengeStore {
    challenges: Arc<Mutex<HashMap<ChallengeId, Challenge>>>,
    ttl: Duration,
}

impl Default for InMemoryChallengeStore {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_CHALLENGE_TTL_HOURS))
    }
}

impl InMemoryChallengeStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            challenges: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(
        &self,
        challenger: PlayerIdentity,
        challenged: PlayerIdentity,
        challenger_score: Option<u32>,
        now: DateTime<Utc>,
    ) -> Challenge {
        let challenge = Challenge::create(challenger, challenged, challenger_score, now, self.ttl);
        log!(
            "Challenge {} created: {} vs {}",
            challenge.id,
            challenge.challenger.player.player_id,
            challenge.challenged.player.player_id
        );
        self.challenges.lock().await.insert(challenge.id.clone(), challenge.clone());
        challenge
    }

    pub async fn get(&self, id: &ChallengeId) -> Option<Challenge> {
        self.challenges.lock().await.get(id).cloned()
    }

    /// The expiry transition is stored even though the call fails.
    pub async fn submit(
        &self,
        id: &ChallengeId,
        player_id: &PlayerId,
        score: u32,
        now: DateTime<Utc>,
    ) -> Result<Challenge, ChallengeError> {
        let mut challenges = self.challenges.lock().await;
        let challenge = challenges
            .get_mut(id)
            .ok_or_else(|| ChallengeError::NotFound(id.clone()))?;
        challenge.submit(player_id, score, now)?;
        Ok(challenge.clone())
    }

    /// Newest first.
    pub async fn for_player(&self, player_id: &PlayerId) -> Vec<Challenge> {
        let challenges = self.challenges.lock().await;
        let mut result: Vec<Challenge> = challenges
            .values()
            .filter(|c| c.participant(player_id).is_some())
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        result
    }
}

use std::fmt;
use std::future::Future;

use crate::game::{EntityIdentity, EntityPool};
use crate::{PlayerIdentity, log, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError(pub String);

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity provider failed: {}", self.0)
    }
}

impl std::error::Error for ProviderError {}

/// Source of the identities a player gets to eat.
pub trait EntityProvider: Send + Sync {
    fn fetch_candidates(
        &self,
        player: &PlayerIdentity,
    ) -> impl Future<Output = Result<Vec<EntityIdentity>, ProviderError>> + Send;
}

/// Serves a fixed list regardless of player.
#[derive(Debug, Clone, Default)]
pub struct StaticEntityProvider {
    candidates: Vec<EntityIdentity>,
}

impl StaticEntityProvider {
    pub fn new(candidates: Vec<EntityIdentity>) -> Self {
        Self { candidates }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let candidates = names
            .iter()
            .enumerate()
            .map(|(i, name)| EntityIdentity::new(format!("static-{}", i), name.as_ref()))
            .collect();
        Self { candidates }
    }
}

impl EntityProvider for StaticEntityProvider {
    async fn fetch_candidates(&self, _player: &PlayerIdentity) -> Result<Vec<EntityIdentity>, ProviderError> {
        Ok(self.candidates.clone())
    }
}

/// Never fails: an error or an empty answer becomes the fallback pool.
pub async fn load_entity_pool(provider: &impl EntityProvider, player: &PlayerIdentity) -> EntityPool {
    match provider.fetch_candidates(player).await {
        Ok(candidates) if candidates.is_empty() => {
            warn!("No entities for {}, using the default snack", player.player_id);
            EntityPool::fallback()
        }
        Ok(candidates) => {
            log!("Loaded {} entities for {}", candidates.len(), player.player_id);
            EntityPool::new(candidates)
        }
        Err(e) => {
            warn!("{} for {}, using the default snack", e, player.player_id);
            EntityPool::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    impl EntityProvider for FailingProvider {
        async fn fetch_candidates(&self, _player: &PlayerIdentity) -> Result<Vec<EntityIdentity>, ProviderError> {
            Err(ProviderError("timeout".to_string()))
        }
    }

    fn player() -> PlayerIdentity {
        PlayerIdentity::new("42", "dana")
    }

    #[tokio::test]
    async fn test_static_provider_pool() {
        let provider = StaticEntityProvider::from_names(&["ann", "ben"]);
        let pool = load_entity_pool(&provider, &player()).await;
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.identities()[1].display_name, "ben");
    }

    #[tokio::test]
    async fn test_empty_provider_falls_back() {
        let pool = load_entity_pool(&StaticEntityProvider::default(), &player()).await;
        assert_eq!(pool.identities(), &[EntityIdentity::fallback()]);
    }

    #[tokio::test]
    async fn test_failing_provider_falls_back() {
        let pool = load_entity_pool(&FailingProvider, &player()).await;
        assert_eq!(pool.identities(), &[EntityIdentity::fallback()]);
    }
}

use crate::SessionRng;
use super::types::EntityIdentity;

/// Identities handed to spawned entities in a fixed cyclic order.
#[derive(Clone, Debug)]
pub struct EntityPool {
    identities: Vec<EntityIdentity>,
    cursor: usize,
}

impl EntityPool {
    /// An empty list degrades to the single fallback identity.
    pub fn new(identities: Vec<EntityIdentity>) -> Self {
        if identities.is_empty() {
            return Self::fallback();
        }
        Self { identities, cursor: 0 }
    }

    pub fn fallback() -> Self {
        Self {
            identities: vec![EntityIdentity::fallback()],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn next_identity(&mut self) -> EntityIdentity {
        let identity = self.identities[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.identities.len();
        identity
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn reshuffle(&mut self, rng: &mut SessionRng) {
        rng.shuffle(&mut self.identities);
        self.cursor = 0;
    }

    pub fn identities(&self) -> &[EntityIdentity] {
        &self.identities
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(names: &[&str]) -> EntityPool {
        EntityPool::new(names.iter().map(|n| EntityIdentity::new(*n, *n)).collect())
    }

    #[test]
    fn test_cycles_in_order() {
        let mut pool = pool(&["a", "b", "c"]);
        let ids: Vec<String> = (0..7).map(|_| pool.next_identity().id).collect();
        assert_eq!(ids, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_empty_list_falls_back() {
        let mut pool = EntityPool::new(Vec::new());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.next_identity(), EntityIdentity::fallback());
        assert_eq!(pool.next_identity(), EntityIdentity::fallback());
    }

    #[test]
    fn test_reshuffle_rewinds_cursor() {
        let mut pool = pool(&["a", "b", "c", "d"]);
        pool.next_identity();
        pool.next_identity();
        pool.reshuffle(&mut SessionRng::new(4));
        let first = pool.identities()[0].clone();
        assert_eq!(pool.next_identity(), first);
    }
}

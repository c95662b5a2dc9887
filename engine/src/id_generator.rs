use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{ChallengeId, SessionId};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const ADJECTIVES: &[&str] = &[
    "Hungry", "Thirsty", "Sneaky", "Coiled", "Swift", "Sleepy", "Greedy", "Lucky",
];

const NOUNS: &[&str] = &[
    "Python", "Adder", "Mamba", "Viper", "Cobra", "Boa", "Krait", "Taipan",
];

fn random_base36(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

pub fn generate_challenge_id(now: DateTime<Utc>) -> ChallengeId {
    ChallengeId::new(format!("challenge_{}_{}", now.timestamp_millis(), random_base36(9)))
}

pub fn generate_session_id() -> SessionId {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    SessionId::new(format!("{}{}-{}", adjective, noun, random_base36(4)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_id_shape() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = generate_challenge_id(now);
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "challenge");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }
}

/// A run is worth persisting only if it beats the stored best; ties are not.
pub fn should_persist(final_score: u32, previous_best: Option<u32>) -> bool {
    match previous_best {
        None => true,
        Some(best) => final_score > best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_is_not_an_improvement() {
        assert!(!should_persist(10, Some(10)));
    }

    #[test]
    fn test_higher_score_persists() {
        assert!(should_persist(11, Some(10)));
        assert!(!should_persist(9, Some(10)));
    }

    #[test]
    fn test_first_score_always_persists() {
        assert!(should_persist(5, None));
        assert!(should_persist(0, None));
    }
}

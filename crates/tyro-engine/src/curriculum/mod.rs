//! Curriculum registry: the built-in level and challenge set.
//!
//! Loaded once at process start; append-only afterwards. Challenges are
//! keyed by (level, number) and by flat id (`L2-C1`).

mod level_01;
mod level_02;
mod level_03;
mod level_04;

use serde::{Deserialize, Serialize};

use crate::challenge::{ChallengeSpec, TestSpec};

/// One curriculum level: a titled, ordered group of challenges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDef {
    pub number: u32,
    pub title: String,
    pub description: String,
    pub challenges: Vec<ChallengeSpec>,
}

/// The loaded challenge set.
#[derive(Debug, Clone)]
pub struct Curriculum {
    levels: Vec<LevelDef>,
}

impl Curriculum {
    /// Load the built-in curriculum.
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                level_01::level(),
                level_02::level(),
                level_03::level(),
                level_04::level(),
            ],
        }
    }

    /// All levels, in order.
    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    /// Look up a level by number.
    pub fn level(&self, number: u32) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.number == number)
    }

    /// Look up a challenge by (level, number).
    pub fn challenge(&self, level: u32, number: u32) -> Option<&ChallengeSpec> {
        self.level(level)?
            .challenges
            .iter()
            .find(|c| c.number == number)
    }

    /// Look up a challenge by flat id, e.g. `L2-C1`.
    pub fn challenge_by_id(&self, id: &str) -> Option<&ChallengeSpec> {
        self.levels
            .iter()
            .flat_map(|l| l.challenges.iter())
            .find(|c| c.id == id)
    }

    /// The (level, number) after the given position, if any.
    pub fn next_after(&self, level: u32, number: u32) -> Option<(u32, u32)> {
        if self.challenge(level, number + 1).is_some() {
            return Some((level, number + 1));
        }
        let next_level = self
            .levels
            .iter()
            .find(|l| l.number > level)
            .map(|l| l.number)?;
        let first = self.level(next_level)?.challenges.first()?;
        Some((next_level, first.number))
    }

    /// Total challenge count across all levels.
    pub fn total_challenges(&self) -> usize {
        self.levels.iter().map(|l| l.challenges.len()).sum()
    }
}

/// Shorthand for authoring test specs.
pub(crate) fn test_spec(description: &str, test: &str, error_hint: &str) -> TestSpec {
    TestSpec {
        description: description.to_string(),
        test: test.to_string(),
        error_hint: error_hint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shape() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.levels().len(), 4);
        assert_eq!(curriculum.total_challenges(), 11);
    }

    #[test]
    fn test_lookup_by_position_and_id() {
        let curriculum = Curriculum::builtin();
        let by_pos = curriculum.challenge(2, 1).unwrap();
        let by_id = curriculum.challenge_by_id("L2-C1").unwrap();
        assert_eq!(by_pos.id, by_id.id);
    }

    #[test]
    fn test_ids_are_unique_and_consistent() {
        let curriculum = Curriculum::builtin();
        let mut seen = std::collections::HashSet::new();
        for level in curriculum.levels() {
            for challenge in &level.challenges {
                assert_eq!(challenge.level, level.number);
                assert_eq!(
                    challenge.id,
                    format!("L{}-C{}", challenge.level, challenge.number)
                );
                assert!(seen.insert(challenge.id.clone()), "duplicate {}", challenge.id);
            }
        }
    }

    #[test]
    fn test_next_after_crosses_levels() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.next_after(1, 1), Some((1, 2)));
        assert_eq!(curriculum.next_after(1, 3), Some((2, 1)));
        assert_eq!(curriculum.next_after(4, 2), None);
    }

    #[test]
    fn test_every_challenge_has_tests_and_hints() {
        let curriculum = Curriculum::builtin();
        for level in curriculum.levels() {
            for challenge in &level.challenges {
                assert!(!challenge.tests.is_empty(), "{} has no tests", challenge.id);
                assert!(!challenge.hints.is_empty(), "{} has no hints", challenge.id);
                assert!(!challenge.scaffold.is_empty());
                assert!(!challenge.solution.is_empty());
            }
        }
    }
}

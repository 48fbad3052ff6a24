//! Learner progress: XP, streaks, completions, ranks.
//!
//! Entirely downstream of validation; the CLI decides when to record an
//! attempt or award a completion; the validator itself never touches this.
//! State persists as JSON (`progress.json` by default); a corrupt or
//! missing file starts fresh rather than crashing the learner's session.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;

// ══════════════════════════════════════════════════════════════════════════════
// Ranks
// ══════════════════════════════════════════════════════════════════════════════

/// A named XP tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub name: &'static str,
    pub min_xp: u32,
}

/// All ranks, ascending by XP threshold.
pub const RANKS: &[Rank] = &[
    Rank { name: "Novice Coder", min_xp: 0 },
    Rank { name: "Type Apprentice", min_xp: 100 },
    Rank { name: "Syntax Warrior", min_xp: 300 },
    Rank { name: "List Wrangler", min_xp: 600 },
    Rank { name: "Pattern Matcher", min_xp: 1000 },
    Rank { name: "Tyro Graduate", min_xp: 1500 },
];

/// The highest rank whose threshold `xp` meets.
pub fn rank_for(xp: u32) -> &'static Rank {
    let mut current = &RANKS[0];
    for rank in RANKS {
        if xp >= rank.min_xp {
            current = rank;
        }
    }
    current
}

/// The next rank above `xp`, if any.
pub fn next_rank(xp: u32) -> Option<&'static Rank> {
    RANKS.iter().find(|r| xp < r.min_xp)
}

// ══════════════════════════════════════════════════════════════════════════════
// Progress
// ══════════════════════════════════════════════════════════════════════════════

/// Persisted learner state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_level: u32,
    pub current_challenge: u32,
    pub xp: u32,
    pub rank: String,
    pub streak: u32,
    pub best_streak: u32,
    pub completed_challenges: Vec<String>,
    /// Attempt counts keyed by challenge id.
    pub attempts: BTreeMap<String, u32>,
    /// Challenges solved on the first attempt.
    pub flawless: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
}

/// What a completion earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionReward {
    pub xp_awarded: u32,
    pub flawless: bool,
    pub streak: u32,
}

impl Progress {
    /// Fresh progress for a new learner.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            current_level: 1,
            current_challenge: 1,
            xp: 0,
            rank: RANKS[0].name.to_string(),
            streak: 0,
            best_streak: 0,
            completed_challenges: Vec::new(),
            attempts: BTreeMap::new(),
            flawless: Vec::new(),
            started_at: now,
            last_played_at: now,
        }
    }

    /// Load progress from disk. Missing or corrupt files start fresh.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(progress) => progress,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt progress file, starting fresh");
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Persist progress, refreshing the last-played timestamp and rank.
    pub fn save(&mut self, path: &Path) -> Result<(), EngineError> {
        self.last_played_at = Utc::now();
        self.rank = rank_for(self.xp).name.to_string();
        let json = serde_json::to_string_pretty(self).map_err(|e| EngineError::Persist {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| EngineError::io(path, e))
    }

    /// Count one attempt at a challenge.
    pub fn record_attempt(&mut self, challenge_id: &str) {
        *self.attempts.entry(challenge_id.to_string()).or_insert(0) += 1;
    }

    pub fn attempt_count(&self, challenge_id: &str) -> u32 {
        self.attempts.get(challenge_id).copied().unwrap_or(0)
    }

    pub fn is_completed(&self, challenge_id: &str) -> bool {
        self.completed_challenges
            .iter()
            .any(|id| id == challenge_id)
    }

    /// Award a completion.
    ///
    /// Bonuses: +50% for a first-attempt (flawless) solve, then +25% once
    /// the streak reaches 3. An already-completed challenge awards nothing
    /// and leaves all state untouched.
    pub fn complete_challenge(&mut self, challenge_id: &str, base_xp: u32) -> CompletionReward {
        if self.is_completed(challenge_id) {
            return CompletionReward {
                xp_awarded: 0,
                flawless: false,
                streak: self.streak,
            };
        }

        let attempts = self.attempt_count(challenge_id).max(1);
        let flawless = attempts <= 1;

        let mut xp_awarded = base_xp;
        if flawless {
            xp_awarded = xp_awarded * 3 / 2;
            self.flawless.push(challenge_id.to_string());
        }

        self.streak += 1;
        if self.streak >= 3 {
            xp_awarded = xp_awarded * 5 / 4;
        }
        if self.streak > self.best_streak {
            self.best_streak = self.streak;
        }

        self.xp += xp_awarded;
        self.completed_challenges.push(challenge_id.to_string());
        self.rank = rank_for(self.xp).name.to_string();

        info!(
            challenge = challenge_id,
            xp_awarded, flawless, streak = self.streak,
            "challenge completed"
        );

        CompletionReward {
            xp_awarded,
            flawless,
            streak: self.streak,
        }
    }

    /// A failed attempt breaks the streak.
    pub fn reset_streak(&mut self) {
        self.streak = 0;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

//! Learning insights over a player's performance history
//!
//! Heuristics that look across sessions rather than at one record: the difficulty
//! a player should play at, a learning-style suggestion, and whether scores are
//! trending up.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::features::mean;
use crate::history::PerformanceHistory;
use crate::types::{DifficultyLabel, LearningStyle};

/// Sessions longer than this on average suggest an analytical (reading) learner
const READING_MIN_AVG_DURATION_SEC: f64 = 300.0;

/// Many attempts per session suggest learning by doing
const KINESTHETIC_MIN_AVG_ATTEMPTS: f64 = 20.0;

/// Number of sessions compared at each end of the history for trend detection
const TREND_SPAN: usize = 3;

/// Suggest the difficulty a player should play at.
///
/// ```text
/// mean score > 15 and mean collisions < 3  -> hard
/// mean score > 8  and mean collisions < 6  -> medium
/// otherwise (or no history)                -> easy
/// ```
pub fn predict_optimal_difficulty(history: &PerformanceHistory) -> DifficultyLabel {
    let (Some(avg_score), Some(avg_collisions)) =
        (history.mean_of(|f| f.score), history.mean_of(|f| f.collisions))
    else {
        return DifficultyLabel::Easy;
    };

    if avg_score > 15.0 && avg_collisions < 3.0 {
        DifficultyLabel::Hard
    } else if avg_score > 8.0 && avg_collisions < 6.0 {
        DifficultyLabel::Medium
    } else {
        DifficultyLabel::Easy
    }
}

/// Learning-style detector with an injectable random source
pub struct LearningStyleDetector {
    rng: Mutex<ChaCha8Rng>,
}

impl Default for LearningStyleDetector {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LearningStyleDetector {
    /// Create a detector, seeded from the clock when no seed is given
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Deterministic detector for tests and reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Suggest a learning style from play patterns.
    ///
    /// Long sessions point to reading, many attempts to kinesthetic. Otherwise the
    /// history carries no signal and a style is drawn at random.
    pub fn identify(&self, history: &PerformanceHistory) -> LearningStyle {
        if history.is_empty() {
            return self.choose(&[
                LearningStyle::Visual,
                LearningStyle::Auditory,
                LearningStyle::Kinesthetic,
            ]);
        }

        let avg_duration = history.mean_of(|f| f.session_duration).unwrap_or(0.0);
        let avg_attempts = history.mean_of(|f| f.attempts).unwrap_or(0.0);

        if avg_duration > READING_MIN_AVG_DURATION_SEC {
            LearningStyle::Reading
        } else if avg_attempts > KINESTHETIC_MIN_AVG_ATTEMPTS {
            LearningStyle::Kinesthetic
        } else {
            self.choose(&[LearningStyle::Visual, LearningStyle::Auditory])
        }
    }

    fn choose(&self, candidates: &[LearningStyle]) -> LearningStyle {
        let mut rng = self.rng.lock();
        candidates
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    NewPlayer,
    Improving,
    Plateau,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Positive,
    Stable,
}

/// Score trend across a player's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPattern {
    pub pattern: PatternKind,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
    pub sessions_analyzed: usize,
}

/// Compare the mean score of the last three sessions against the first three.
pub fn analyze_learning_patterns(history: &PerformanceHistory) -> LearningPattern {
    if history.is_empty() {
        return LearningPattern {
            pattern: PatternKind::NewPlayer,
            confidence: 0.5,
            trend: None,
            sessions_analyzed: 0,
        };
    }

    let scores: Vec<f64> = history.sessions().map(|f| f.score).collect();
    let improving = scores.len() >= TREND_SPAN && {
        let early = mean(&scores[..TREND_SPAN]).unwrap_or(0.0);
        let recent = mean(&scores[scores.len() - TREND_SPAN..]).unwrap_or(0.0);
        recent > early
    };

    LearningPattern {
        pattern: if improving {
            PatternKind::Improving
        } else {
            PatternKind::Plateau
        },
        confidence: 0.8,
        trend: Some(if improving {
            TrendDirection::Positive
        } else {
            TrendDirection::Stable
        }),
        sessions_analyzed: scores.len(),
    }
}

/// Cross-session insights for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningInsights {
    pub player_id: String,
    pub optimal_difficulty: DifficultyLabel,
    pub suggested_learning_style: LearningStyle,
    pub learning_pattern: LearningPattern,
}

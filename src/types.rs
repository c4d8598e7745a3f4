//! Core data types for the adaptive tutor
//!
//! This module defines the records that flow through the personalization pipeline:
//! raw game metrics in, player profiles and tutorial sessions held by the stores,
//! and the transient analysis/feedback values handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TutorError;

/// Skill score below which a player is treated as a beginner
pub const BEGINNER_CUTOFF: f64 = 0.3;

/// Skill score at or above which a player is treated as advanced
pub const ADVANCED_CUTOFF: f64 = 0.7;

/// Game difficulty selected by the player for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "easy",
            DifficultyLabel::Medium => "medium",
            DifficultyLabel::Hard => "hard",
        }
    }
}

impl FromStr for DifficultyLabel {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(DifficultyLabel::Easy),
            "medium" => Ok(DifficultyLabel::Medium),
            "hard" => Ok(DifficultyLabel::Hard),
            other => Err(TutorError::Validation(format!(
                "unknown difficulty level '{other}' (expected easy, medium or hard)"
            ))),
        }
    }
}

/// Discrete skill tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillTier {
    /// Map a continuous skill score onto a tier using the 0.3 / 0.7 cutoffs
    pub fn from_skill_score(skill_score: f64) -> Self {
        if skill_score < BEGINNER_CUTOFF {
            SkillTier::Beginner
        } else if skill_score < ADVANCED_CUTOFF {
            SkillTier::Intermediate
        } else {
            SkillTier::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "beginner",
            SkillTier::Intermediate => "intermediate",
            SkillTier::Advanced => "advanced",
        }
    }

    /// Player-facing label shown in progress reports
    pub fn display_label(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "Principiante",
            SkillTier::Intermediate => "Intermedio",
            SkillTier::Advanced => "Avanzado",
        }
    }

    pub const ALL: [SkillTier; 3] = [
        SkillTier::Beginner,
        SkillTier::Intermediate,
        SkillTier::Advanced,
    ];
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a player prefers to take in tutorial content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
    /// Unrecognized styles are kept verbatim and receive no annotation
    #[serde(untagged)]
    Other(String),
}

impl LearningStyle {
    pub fn as_str(&self) -> &str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Kinesthetic => "kinesthetic",
            LearningStyle::Reading => "reading",
            LearningStyle::Other(name) => name.as_str(),
        }
    }
}

impl Default for LearningStyle {
    fn default() -> Self {
        LearningStyle::Visual
    }
}

impl From<&str> for LearningStyle {
    /// Exact, case-sensitive match; anything else becomes `Other`
    fn from(s: &str) -> Self {
        match s {
            "visual" => LearningStyle::Visual,
            "auditory" => LearningStyle::Auditory,
            "kinesthetic" => LearningStyle::Kinesthetic,
            "reading" => LearningStyle::Reading,
            other => LearningStyle::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tutorial family chosen by the need selector or requested by a caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialCategory {
    Onboarding,
    CollisionReduction,
    BasicSkills,
    AdvancedTechniques,
    SkillRefinement,
    /// Unknown categories fall back to generic content
    #[serde(untagged)]
    Other(String),
}

impl TutorialCategory {
    pub fn as_str(&self) -> &str {
        match self {
            TutorialCategory::Onboarding => "onboarding",
            TutorialCategory::CollisionReduction => "collision_reduction",
            TutorialCategory::BasicSkills => "basic_skills",
            TutorialCategory::AdvancedTechniques => "advanced_techniques",
            TutorialCategory::SkillRefinement => "skill_refinement",
            TutorialCategory::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for TutorialCategory {
    fn from(s: &str) -> Self {
        match s {
            "onboarding" => TutorialCategory::Onboarding,
            "collision_reduction" => TutorialCategory::CollisionReduction,
            "basic_skills" => TutorialCategory::BasicSkills,
            "advanced_techniques" => TutorialCategory::AdvancedTechniques,
            "skill_refinement" => TutorialCategory::SkillRefinement,
            other => TutorialCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TutorialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-game event or state that triggers feedback or contextual content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Collision,
    PipeCollision,
    HighScore,
    GameStart,
    GameOver,
    #[serde(untagged)]
    Other(String),
}

impl GameEvent {
    pub fn as_str(&self) -> &str {
        match self {
            GameEvent::Collision => "collision",
            GameEvent::PipeCollision => "pipe_collision",
            GameEvent::HighScore => "high_score",
            GameEvent::GameStart => "game_start",
            GameEvent::GameOver => "game_over",
            GameEvent::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for GameEvent {
    fn from(s: &str) -> Self {
        match s {
            "collision" => GameEvent::Collision,
            "pipe_collision" => GameEvent::PipeCollision,
            "high_score" => GameEvent::HighScore,
            "game_start" => GameEvent::GameStart,
            "game_over" => GameEvent::GameOver,
            other => GameEvent::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw gameplay metrics for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetrics {
    /// Player the session belongs to
    pub player_id: String,
    /// Session duration in seconds
    pub session_duration: f64,
    /// Final score
    pub score: i64,
    /// Number of attempts (runs) in the session
    pub attempts: i64,
    /// Number of obstacle collisions
    #[serde(alias = "pipe_collisions")]
    pub collisions: i64,
    /// Reaction-time samples in seconds, in observation order
    #[serde(default)]
    pub reaction_times: Vec<f64>,
    /// Difficulty the session was played at
    pub difficulty_level: DifficultyLabel,
    /// When the metrics were recorded
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl GameMetrics {
    /// Reject malformed or out-of-range fields.
    ///
    /// Collisions greater than attempts are accepted.
    pub fn validate(&self) -> Result<(), TutorError> {
        if self.player_id.trim().is_empty() {
            return Err(TutorError::Validation(
                "player_id must not be empty".to_string(),
            ));
        }
        if !self.session_duration.is_finite() || self.session_duration < 0.0 {
            return Err(TutorError::Validation(format!(
                "session_duration must be a finite value >= 0, got {}",
                self.session_duration
            )));
        }
        if self.score < 0 {
            return Err(TutorError::Validation(format!(
                "score must be >= 0, got {}",
                self.score
            )));
        }
        if self.attempts < 0 {
            return Err(TutorError::Validation(format!(
                "attempts must be >= 0, got {}",
                self.attempts
            )));
        }
        if self.collisions < 0 {
            return Err(TutorError::Validation(format!(
                "collisions must be >= 0, got {}",
                self.collisions
            )));
        }
        if let Some((index, sample)) = self
            .reaction_times
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_finite() || **t <= 0.0)
        {
            return Err(TutorError::Validation(format!(
                "reaction_times[{index}] must be a finite value > 0, got {sample}"
            )));
        }
        Ok(())
    }
}

/// Persistent per-player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    /// Continuous skill score in [0, 1]
    pub skill_level: f64,
    pub learning_style: LearningStyle,
    pub preferred_language: String,
    /// Distinct difficulty-area tags in insertion order
    #[serde(default)]
    pub difficulty_areas: Vec<String>,
}

impl PlayerProfile {
    /// Profile with the given defaults and an empty difficulty-area list
    pub fn new(
        player_id: impl Into<String>,
        skill_level: f64,
        learning_style: LearningStyle,
        preferred_language: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            skill_level,
            learning_style,
            preferred_language: preferred_language.into(),
            difficulty_areas: Vec::new(),
        }
    }

    pub fn skill_tier(&self) -> SkillTier {
        SkillTier::from_skill_score(self.skill_level)
    }

    /// Union-insert a difficulty tag. Returns false if it was already present.
    pub fn append_difficulty_area(&mut self, tag: &str) -> bool {
        if self.difficulty_areas.iter().any(|t| t == tag) {
            return false;
        }
        self.difficulty_areas.push(tag.to_string());
        true
    }
}

/// Explicit registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRegistration {
    pub player_id: String,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
    #[serde(default)]
    pub initial_skill_level: Option<f64>,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub difficulty_areas: Option<Vec<String>>,
}

/// Output of the skill classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    /// Discrete tier label
    pub skill_level: SkillTier,
    /// Fixed score attached to the tier
    pub skill_score: f64,
    pub confidence: f64,
    pub raw_score: i64,
    /// score / max(attempts, 1), unclamped
    pub efficiency: f64,
    /// 1 / (1 + collision_rate * 10)
    pub consistency: f64,
    pub reaction_time_avg: f64,
    pub collision_rate: f64,
}

/// Result of analyzing one metrics record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub player_profile: PlayerProfile,
    pub skill_analysis: SkillAnalysis,
    pub recommendations: Vec<String>,
    pub tutorial_needed: TutorialCategory,
}

/// Optional game context supplied when a tutorial is requested
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameContext {
    #[serde(default)]
    pub game_state: Option<GameEvent>,
    #[serde(default)]
    pub current_score: Option<i64>,
    #[serde(default)]
    pub attempts: Option<i64>,
}

/// Snapshot of the running game when feedback is requested
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub attempts: i64,
}

/// A generated tutorial, owned by the session registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialSession {
    pub session_id: String,
    pub player_id: String,
    pub tutorial_type: TutorialCategory,
    pub content: String,
    /// Tier of the profile's skill score at creation time
    pub difficulty_level: SkillTier,
    pub learning_objectives: Vec<String>,
    /// Minutes
    pub estimated_duration: u32,
    pub created_at: DateTime<Utc>,
}

/// Real-time feedback for a single triggering event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveFeedback {
    pub feedback_id: String,
    pub player_id: String,
    pub trigger_event: GameEvent,
    pub message: String,
    pub tips: Vec<String>,
    pub encouragement: String,
    pub next_steps: Vec<String>,
    pub confidence_score: f64,
}

/// Sentiment label from keyword counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

/// A difficulty keyword found in feedback text and the category it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyIndicator {
    pub keyword: String,
    pub category: String,
}

/// Result of analyzing free-text player feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    pub sentiment: Sentiment,
    pub difficulty_indicators: Vec<DifficultyIndicator>,
    /// Whitespace-separated word count
    pub text_complexity: usize,
    pub key_topics: Vec<String>,
}

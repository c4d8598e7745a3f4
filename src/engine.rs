//! Tutor engine
//!
//! [`TutorEngine`] wires the pipeline stages together and owns every store. It is
//! `Send + Sync` and meant to be shared by reference between request handlers.
//!
//! Metrics analysis runs:
//!
//! ```text
//! GameMetrics -> validate -> SkillClassifier -> ProfileStore::get_or_create
//!             -> MetricsFeatureExtractor -> HistoryStore
//!             -> TutorialNeedSelector -> PerformanceAnalysis
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analytics::{
    self, LearningPatternsReport, LearningProgress, PlayerAnalytics, PlayerRecommendations,
    SystemOverview, TutorialEffectiveness,
};
use crate::classifier::{improvement_recommendations, SkillClassifier, ThresholdSkillClassifier};
use crate::config::TutorConfig;
use crate::content::{estimate_duration, learning_objectives, ContentSelector, TemplateContentGenerator};
use crate::error::TutorError;
use crate::feedback::FeedbackComposer;
use crate::features::MetricsFeatureExtractor;
use crate::history::{HistoryStore, PerformanceHistory};
use crate::insights::{
    analyze_learning_patterns, predict_optimal_difficulty, LearningInsights, LearningStyleDetector,
};
use crate::selector::TutorialNeedSelector;
use crate::store::{ProfileDefaults, ProfileStore, SessionRegistry};
use crate::text::TextFeedbackAnalyzer;
use crate::types::{
    AdaptiveFeedback, FeedbackAnalysis, GameContext, GameEvent, GameMetrics, GameState,
    PerformanceAnalysis, PlayerProfile, ProfileRegistration, ProfileUpdate, TutorialCategory,
    TutorialSession,
};
use crate::TUTOR_VERSION;

/// Everything the engine holds, as written by [`TutorEngine::save_state`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub profiles: Vec<PlayerProfile>,
    pub sessions: Vec<TutorialSession>,
    #[serde(default)]
    pub histories: BTreeMap<String, PerformanceHistory>,
}

pub struct TutorEngine {
    config: TutorConfig,
    classifier: Box<dyn SkillClassifier>,
    content: Box<dyn ContentSelector>,
    profiles: ProfileStore,
    sessions: SessionRegistry,
    histories: HistoryStore,
    style_detector: LearningStyleDetector,
    text_analyzer: TextFeedbackAnalyzer,
}

impl Default for TutorEngine {
    fn default() -> Self {
        Self::new(TutorConfig::default())
    }
}

impl TutorEngine {
    /// Engine with the threshold classifier and template content
    pub fn new(config: TutorConfig) -> Self {
        Self::with_strategies(
            config,
            Box::new(ThresholdSkillClassifier),
            Box::new(TemplateContentGenerator),
        )
    }

    /// Engine with caller-supplied classification and content strategies
    pub fn with_strategies(
        config: TutorConfig,
        classifier: Box<dyn SkillClassifier>,
        content: Box<dyn ContentSelector>,
    ) -> Self {
        let defaults = ProfileDefaults {
            learning_style: config.default_learning_style.clone(),
            preferred_language: config.default_language.clone(),
        };

        Self {
            profiles: ProfileStore::new(defaults),
            sessions: SessionRegistry::new(),
            histories: HistoryStore::new(config.history_window),
            style_detector: LearningStyleDetector::new(config.rng_seed),
            text_analyzer: TextFeedbackAnalyzer::for_language(&config.default_language),
            classifier,
            content,
            config,
        }
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Classify a session, update the player's profile and pick a tutorial.
    ///
    /// Fails only on malformed metrics, including metrics recorded for a different
    /// player than `player_id`.
    pub fn analyze_performance(
        &self,
        player_id: &str,
        metrics: &GameMetrics,
    ) -> Result<PerformanceAnalysis, TutorError> {
        if metrics.player_id != player_id {
            return Err(TutorError::Validation(format!(
                "metrics belong to '{}', not '{player_id}'",
                metrics.player_id
            )));
        }
        metrics.validate()?;

        let skill_analysis = self.classifier.classify(metrics);
        let player_profile = self.profiles.get_or_create(player_id, &skill_analysis);

        let sessions_held = self
            .histories
            .record(player_id, MetricsFeatureExtractor::extract(metrics));

        let recommendations = improvement_recommendations(&skill_analysis);
        let tutorial_needed = TutorialNeedSelector::select(&skill_analysis, metrics);

        debug!(
            player_id,
            tier = skill_analysis.skill_level.as_str(),
            efficiency = skill_analysis.efficiency,
            collision_rate = skill_analysis.collision_rate,
            tutorial = tutorial_needed.as_str(),
            sessions_held,
            "analyzed performance"
        );

        Ok(PerformanceAnalysis {
            player_profile,
            skill_analysis,
            recommendations,
            tutorial_needed,
        })
    }

    /// Generate and register a tutorial session. Never fails.
    ///
    /// Unknown players get a default profile for this call only.
    pub fn generate_tutorial(
        &self,
        player_id: &str,
        category: &TutorialCategory,
        context: &GameContext,
    ) -> TutorialSession {
        let profile = self.profile_or_default(player_id);

        let session = TutorialSession {
            session_id: format!("tutorial_{}", Uuid::new_v4()),
            player_id: player_id.to_string(),
            tutorial_type: category.clone(),
            content: self.content.tutorial_content(category, &profile, context),
            difficulty_level: profile.skill_tier(),
            learning_objectives: learning_objectives(category),
            estimated_duration: estimate_duration(category, profile.skill_level),
            created_at: Utc::now(),
        };

        info!(
            player_id,
            session_id = %session.session_id,
            category = category.as_str(),
            tier = session.difficulty_level.as_str(),
            minutes = session.estimated_duration,
            "created tutorial session"
        );
        self.sessions.insert(session.clone());
        session
    }

    /// Compose feedback for an in-game event. Never fails.
    pub fn generate_feedback(
        &self,
        player_id: &str,
        event: &GameEvent,
        state: &GameState,
    ) -> AdaptiveFeedback {
        let profile = self.profile_or_default(player_id);
        let feedback = FeedbackComposer::compose(event, &profile, state, self.content.as_ref());

        debug!(
            player_id,
            event = event.as_str(),
            score = state.score,
            tips = feedback.tips.len(),
            "composed feedback"
        );
        feedback
    }

    /// Analyze text in the configured default language
    pub fn analyze_feedback_text(&self, text: &str) -> FeedbackAnalysis {
        self.text_analyzer.analyze(text)
    }

    /// Analyze a player's text and record detected difficulty categories on their
    /// profile. Unknown players still get the analysis; nothing is recorded.
    pub fn submit_player_feedback(&self, player_id: &str, text: &str) -> FeedbackAnalysis {
        let Ok(profile) = self.profiles.get(player_id) else {
            debug!(player_id, "feedback from unknown player, nothing recorded");
            return self.analyze_feedback_text(text);
        };

        let analysis = TextFeedbackAnalyzer::for_language(&profile.preferred_language).analyze(text);
        for indicator in &analysis.difficulty_indicators {
            // the player may have been deleted since the lookup above
            match self.profiles.append_difficulty_area(player_id, &indicator.category) {
                Ok(true) => debug!(player_id, area = %indicator.category, "recorded difficulty area"),
                Ok(false) => {}
                Err(_) => break,
            }
        }
        analysis
    }

    /// Register a player, replacing any existing profile
    pub fn register_profile(
        &self,
        registration: ProfileRegistration,
    ) -> Result<PlayerProfile, TutorError> {
        if registration.player_id.trim().is_empty() {
            return Err(TutorError::Validation(
                "player_id must not be empty".to_string(),
            ));
        }

        let mut profile = self.profiles.default_profile(&registration.player_id);
        if let Some(skill_level) = registration.initial_skill_level {
            if !(0.0..=1.0).contains(&skill_level) {
                return Err(TutorError::Validation(format!(
                    "initial_skill_level must be within [0, 1], got {skill_level}"
                )));
            }
            profile.skill_level = skill_level;
        }
        if let Some(style) = registration.learning_style {
            profile.learning_style = style;
        }
        if let Some(language) = registration.preferred_language {
            profile.preferred_language = language;
        }

        let replaced = self.profiles.insert(profile.clone()).is_some();
        info!(player_id = %profile.player_id, replaced, "registered player profile");
        Ok(profile)
    }

    pub fn get_profile(&self, player_id: &str) -> Result<PlayerProfile, TutorError> {
        self.profiles.get(player_id)
    }

    pub fn update_profile(
        &self,
        player_id: &str,
        update: &ProfileUpdate,
    ) -> Result<PlayerProfile, TutorError> {
        let profile = self.profiles.update(player_id, update)?;
        debug!(player_id, "updated player profile");
        Ok(profile)
    }

    /// Delete a player together with their sessions and history.
    ///
    /// Returns the number of tutorial sessions removed.
    pub fn delete_profile(&self, player_id: &str) -> Result<usize, TutorError> {
        self.profiles.remove(player_id)?;
        let sessions_removed = self.sessions.remove_for_player(player_id);
        self.histories.remove(player_id);

        info!(player_id, sessions_removed, "deleted player profile");
        Ok(sessions_removed)
    }

    pub fn list_profiles(&self) -> Vec<PlayerProfile> {
        self.profiles.list()
    }

    /// Tutorial sessions held for a player, oldest first
    pub fn active_sessions(&self, player_id: &str) -> Vec<TutorialSession> {
        self.sessions.for_player(player_id)
    }

    /// Mark a tutorial as completed by removing its session
    pub fn complete_session(&self, session_id: &str) -> Result<TutorialSession, TutorError> {
        let session = self.sessions.remove(session_id)?;
        info!(session_id, player_id = %session.player_id, "completed tutorial session");
        Ok(session)
    }

    pub fn player_recommendations(
        &self,
        player_id: &str,
    ) -> Result<PlayerRecommendations, TutorError> {
        let profile = self.profiles.get(player_id)?;
        Ok(analytics::player_recommendations(&profile))
    }

    pub fn learning_progress(&self, player_id: &str) -> Result<LearningProgress, TutorError> {
        let profile = self.profiles.get(player_id)?;
        let sessions = self.sessions.for_player(player_id).len();
        Ok(analytics::learning_progress(&profile, sessions))
    }

    /// Cross-session insights. Read-only: the suggested learning style is not
    /// written back to the profile.
    pub fn learning_insights(&self, player_id: &str) -> Result<LearningInsights, TutorError> {
        let profile = self.profiles.get(player_id)?;
        let history = self.histories.get(player_id);

        Ok(LearningInsights {
            player_id: profile.player_id,
            optimal_difficulty: predict_optimal_difficulty(&history),
            suggested_learning_style: self.style_detector.identify(&history),
            learning_pattern: analyze_learning_patterns(&history),
        })
    }

    /// Number of sessions currently in a player's history window
    pub fn history_len(&self, player_id: &str) -> usize {
        self.histories.get(player_id).len()
    }

    pub fn system_overview(&self) -> SystemOverview {
        let profiles = self.profiles.list();
        analytics::system_overview(&profiles, self.sessions.len())
    }

    pub fn player_analytics(&self, player_id: &str) -> Result<PlayerAnalytics, TutorError> {
        let profile = self.profiles.get(player_id)?;
        let sessions = self.sessions.for_player(player_id);
        Ok(analytics::player_analytics(&profile, &sessions))
    }

    pub fn tutorial_effectiveness(&self) -> TutorialEffectiveness {
        analytics::tutorial_effectiveness(&self.sessions.list())
    }

    pub fn learning_patterns(&self) -> LearningPatternsReport {
        analytics::learning_patterns(&self.profiles.list())
    }

    /// Snapshot all stores
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            version: TUTOR_VERSION.to_string(),
            saved_at: Utc::now(),
            profiles: self.profiles.list(),
            sessions: self.sessions.list(),
            histories: self.histories.export().into_iter().collect(),
        }
    }

    /// Replace all stores with the contents of a snapshot
    pub fn restore(&self, snapshot: StateSnapshot) {
        info!(
            version = %snapshot.version,
            profiles = snapshot.profiles.len(),
            sessions = snapshot.sessions.len(),
            "restoring state"
        );
        self.profiles.import(snapshot.profiles);
        self.sessions.import(snapshot.sessions);
        self.histories.import(snapshot.histories.into_iter().collect());
    }

    /// Save state to JSON for persistence
    pub fn save_state(&self) -> Result<String, TutorError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Load state from JSON
    pub fn load_state(&self, json: &str) -> Result<(), TutorError> {
        let snapshot: StateSnapshot = serde_json::from_str(json)?;
        self.restore(snapshot);
        Ok(())
    }

    fn profile_or_default(&self, player_id: &str) -> PlayerProfile {
        match self.profiles.get(player_id) {
            Ok(profile) => profile,
            Err(_) => {
                debug!(player_id, "no profile, using defaults for this call");
                self.profiles.default_profile(player_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::PatternKind;
    use crate::types::{DifficultyLabel, LearningStyle, SentimentLabel, SkillTier};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn seeded_engine() -> TutorEngine {
        TutorEngine::new(TutorConfig {
            rng_seed: Some(42),
            ..TutorConfig::default()
        })
    }

    fn make_metrics(
        player_id: &str,
        score: i64,
        attempts: i64,
        collisions: i64,
        reaction_times: Vec<f64>,
    ) -> GameMetrics {
        GameMetrics {
            player_id: player_id.to_string(),
            session_duration: 180.0,
            score,
            attempts,
            collisions,
            reaction_times,
            difficulty_level: DifficultyLabel::Medium,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap(),
        }
    }

    fn struggling(player_id: &str) -> GameMetrics {
        make_metrics(player_id, 5, 25, 20, vec![0.8, 0.9, 1.2, 0.7, 1.1, 0.9, 1.0])
    }

    fn improving(player_id: &str) -> GameMetrics {
        make_metrics(player_id, 15, 20, 8, vec![0.6, 0.7, 0.8, 0.5, 0.7, 0.6, 0.8])
    }

    #[test]
    fn test_struggling_session() {
        let engine = seeded_engine();
        let result = engine.analyze_performance("p1", &struggling("p1")).unwrap();

        assert_eq!(result.skill_analysis.skill_level, SkillTier::Beginner);
        assert_eq!(result.tutorial_needed, TutorialCategory::CollisionReduction);
        assert!((result.player_profile.skill_level - 0.2).abs() < 1e-9);
        assert_eq!(result.player_profile.learning_style, LearningStyle::Visual);
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(engine.history_len("p1"), 1);
    }

    #[test]
    fn test_skill_level_is_overwritten() {
        let engine = seeded_engine();
        engine.analyze_performance("p1", &struggling("p1")).unwrap();
        let result = engine.analyze_performance("p1", &improving("p1")).unwrap();

        assert_eq!(result.skill_analysis.skill_level, SkillTier::Intermediate);
        assert_eq!(result.tutorial_needed, TutorialCategory::SkillRefinement);
        assert!((engine.get_profile("p1").unwrap().skill_level - 0.75).abs() < 1e-9);
        assert_eq!(engine.list_profiles().len(), 1);
    }

    #[test]
    fn test_invalid_metrics() {
        let engine = seeded_engine();

        let mut metrics = struggling("p1");
        metrics.session_duration = -5.0;
        assert!(matches!(
            engine.analyze_performance("p1", &metrics),
            Err(TutorError::Validation(_))
        ));

        assert!(matches!(
            engine.analyze_performance("p2", &struggling("p1")),
            Err(TutorError::Validation(_))
        ));
        assert!(engine.list_profiles().is_empty());
    }

    #[test]
    fn test_tutorial_duration_follows_profile() {
        let engine = seeded_engine();
        engine.analyze_performance("weak", &struggling("weak")).unwrap();
        engine
            .register_profile(ProfileRegistration {
                player_id: "strong".to_string(),
                initial_skill_level: Some(0.9),
                ..ProfileRegistration::default()
            })
            .unwrap();

        let context = GameContext::default();
        let weak = engine.generate_tutorial("weak", &TutorialCategory::Onboarding, &context);
        let strong = engine.generate_tutorial("strong", &TutorialCategory::Onboarding, &context);

        assert_eq!(weak.estimated_duration, 7);
        assert_eq!(weak.difficulty_level, SkillTier::Beginner);
        assert_eq!(strong.estimated_duration, 4);
        assert_eq!(strong.difficulty_level, SkillTier::Advanced);
        assert!(weak.session_id.starts_with("tutorial_"));
        assert_ne!(weak.session_id, strong.session_id);
    }

    #[test]
    fn test_tutorial_for_unknown_player_uses_ephemeral_defaults() {
        let engine = seeded_engine();
        let session = engine.generate_tutorial(
            "ghost",
            &TutorialCategory::Other("speedrun".into()),
            &GameContext::default(),
        );

        assert_eq!(session.difficulty_level, SkillTier::Intermediate);
        assert_eq!(session.estimated_duration, 10);
        assert!(session.content.starts_with("💡 Observa:"));
        assert!(matches!(
            engine.get_profile("ghost"),
            Err(TutorError::PlayerNotFound(_))
        ));
        assert_eq!(engine.active_sessions("ghost").len(), 1);
    }

    #[test]
    fn test_feedback_uses_profile_style() {
        let engine = seeded_engine();
        engine
            .register_profile(ProfileRegistration {
                player_id: "p1".to_string(),
                learning_style: Some(LearningStyle::Kinesthetic),
                ..ProfileRegistration::default()
            })
            .unwrap();

        let feedback = engine.generate_feedback(
            "p1",
            &GameEvent::HighScore,
            &GameState { score: 22, attempts: 3 },
        );
        assert!(feedback.message.starts_with("✋ Práctica:"));
        assert!(feedback.encouragement.starts_with("¡Increíble"));
        assert_eq!(feedback.trigger_event, GameEvent::HighScore);

        let anonymous = engine.generate_feedback("nobody", &GameEvent::GameStart, &GameState::default());
        assert!(anonymous.message.starts_with("💡 Observa:"));
        assert!(engine.get_profile("nobody").is_err());
    }

    #[test]
    fn test_submit_feedback_records_difficulty_areas() {
        let engine = seeded_engine();
        engine.analyze_performance("p1", &struggling("p1")).unwrap();

        let text = "Este juego es muy difícil, no entiendo el timing correcto";
        let analysis = engine.submit_player_feedback("p1", text);
        assert_eq!(analysis.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(analysis.difficulty_indicators[0].keyword, "difícil");

        engine.submit_player_feedback("p1", "Sigue siendo difícil y complicado");
        assert_eq!(
            engine.get_profile("p1").unwrap().difficulty_areas,
            vec!["hard".to_string()]
        );

        let unknown = engine.submit_player_feedback("ghost", text);
        assert_eq!(unknown.difficulty_indicators.len(), 1);
        assert!(engine.get_profile("ghost").is_err());
    }

    #[test]
    fn test_delete_cascades_to_sessions() {
        let engine = seeded_engine();
        engine.analyze_performance("p1", &struggling("p1")).unwrap();
        engine.analyze_performance("p2", &improving("p2")).unwrap();

        let context = GameContext::default();
        engine.generate_tutorial("p1", &TutorialCategory::Onboarding, &context);
        engine.generate_tutorial("p1", &TutorialCategory::CollisionReduction, &context);
        let kept = engine.generate_tutorial("p2", &TutorialCategory::SkillRefinement, &context);

        assert_eq!(engine.delete_profile("p1").unwrap(), 2);
        assert!(matches!(
            engine.get_profile("p1"),
            Err(TutorError::PlayerNotFound(_))
        ));
        assert!(engine.active_sessions("p1").is_empty());
        assert_eq!(engine.history_len("p1"), 0);
        assert_eq!(engine.active_sessions("p2"), vec![kept]);
        assert!(engine.delete_profile("p1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_profile_crud() {
        let engine = seeded_engine();
        let profile = engine
            .register_profile(ProfileRegistration {
                player_id: "p1".to_string(),
                ..ProfileRegistration::default()
            })
            .unwrap();
        assert_eq!(profile.skill_level, 0.3);
        assert_eq!(profile.preferred_language, "es");

        let updated = engine
            .update_profile(
                "p1",
                &ProfileUpdate {
                    preferred_language: Some("en".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.preferred_language, "en");
        assert!(engine.update_profile("p2", &ProfileUpdate::default()).is_err());

        assert!(engine
            .register_profile(ProfileRegistration {
                player_id: "p3".to_string(),
                initial_skill_level: Some(1.5),
                ..ProfileRegistration::default()
            })
            .is_err());
        assert!(engine
            .register_profile(ProfileRegistration::default())
            .is_err());
    }

    #[test]
    fn test_complete_session() {
        let engine = seeded_engine();
        let session = engine.generate_tutorial("p1", &TutorialCategory::BasicSkills, &GameContext::default());

        let completed = engine.complete_session(&session.session_id).unwrap();
        assert_eq!(completed, session);
        assert!(matches!(
            engine.complete_session(&session.session_id),
            Err(TutorError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_player_queries_require_profile() {
        let engine = seeded_engine();
        assert!(engine.player_recommendations("ghost").unwrap_err().is_not_found());
        assert!(engine.learning_progress("ghost").unwrap_err().is_not_found());
        assert!(engine.learning_insights("ghost").unwrap_err().is_not_found());
        assert!(engine.player_analytics("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_learning_insights_do_not_mutate_profile() {
        let engine = seeded_engine();
        for _ in 0..3 {
            engine.analyze_performance("p1", &improving("p1")).unwrap();
        }
        let before = engine.get_profile("p1").unwrap();

        let insights = engine.learning_insights("p1").unwrap();
        assert_eq!(insights.optimal_difficulty, DifficultyLabel::Easy);
        assert_eq!(insights.learning_pattern.pattern, PatternKind::Plateau);
        assert_eq!(insights.learning_pattern.sessions_analyzed, 3);
        assert!(matches!(
            insights.suggested_learning_style,
            LearningStyle::Visual | LearningStyle::Auditory
        ));
        assert_eq!(engine.get_profile("p1").unwrap(), before);
    }

    #[test]
    fn test_reports() {
        let engine = seeded_engine();
        engine.analyze_performance("p1", &struggling("p1")).unwrap();
        engine.analyze_performance("p2", &improving("p2")).unwrap();
        engine.generate_tutorial("p1", &TutorialCategory::CollisionReduction, &GameContext::default());

        let overview = engine.system_overview();
        assert_eq!(overview.total_players, 2);
        assert_eq!(overview.active_sessions, 1);
        assert_eq!(overview.skill_distribution.beginner, 1);
        assert_eq!(overview.skill_distribution.advanced, 1);

        let effectiveness = engine.tutorial_effectiveness();
        assert_eq!(effectiveness.most_popular.as_deref(), Some("collision_reduction"));
        assert_eq!(effectiveness.problem_solving_requests, 1);

        let progress = engine.learning_progress("p1").unwrap();
        assert_eq!(progress.tutorial_sessions, 1);
        assert_eq!(progress.next_tutorial, TutorialCategory::BasicSkills);

        assert_eq!(engine.learning_patterns().total_learners, 2);
    }

    #[test]
    fn test_state_survives_save_and_load() {
        let engine = seeded_engine();
        engine.analyze_performance("p1", &struggling("p1")).unwrap();
        engine.submit_player_feedback("p1", "muy difícil");
        let session = engine.generate_tutorial("p1", &TutorialCategory::Onboarding, &GameContext::default());

        let json = engine.save_state().unwrap();

        let restored = seeded_engine();
        restored.load_state(&json).unwrap();
        assert_eq!(restored.get_profile("p1").unwrap(), engine.get_profile("p1").unwrap());
        assert_eq!(restored.active_sessions("p1"), vec![session]);
        assert_eq!(restored.history_len("p1"), 1);

        assert!(matches!(
            restored.load_state("{not json"),
            Err(TutorError::Json(_))
        ));
    }

    #[test]
    fn test_concurrent_analyses_and_feedback() {
        let engine = seeded_engine();
        engine.analyze_performance("shared", &struggling("shared")).unwrap();

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        engine.analyze_performance("shared", &improving("shared")).unwrap();
                    }
                });
            }
            scope.spawn(|| {
                for text in ["es difícil", "es confuso", "es imposible", "no está claro"] {
                    engine.submit_player_feedback("shared", text);
                }
            });
        });

        let profile = engine.get_profile("shared").unwrap();
        assert!((profile.skill_level - 0.75).abs() < 1e-9);
        assert_eq!(
            profile.difficulty_areas,
            vec!["hard", "confusing", "impossible", "clear"]
        );
        assert_eq!(engine.history_len("shared"), 20);
    }
}

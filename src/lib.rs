//! Adaptive Tutor - tutorial personalization and real-time feedback for casual games
//!
//! The tutor turns raw gameplay metrics and free-text player feedback into
//! personalized guidance through a deterministic pipeline: metrics validation →
//! skill classification → profile update → tutorial selection → content
//! generation.
//!
//! ## Modules
//!
//! - **Pipeline**: [`features`], [`classifier`], [`selector`], [`content`], [`feedback`]
//! - **Text analysis**: [`text`] keyword sentiment, difficulty and topic extraction
//! - **State**: [`store`] profiles and sessions, [`history`] per-player feature windows
//! - **Reporting**: [`insights`] and [`analytics`]
//!
//! [`TutorEngine`] ties everything together:
//!
//! ```ignore
//! let engine = TutorEngine::new(TutorConfig::default());
//! let analysis = engine.analyze_performance("player-1", &metrics)?;
//! let session = engine.generate_tutorial(
//!     "player-1",
//!     &analysis.tutorial_needed,
//!     &GameContext::default(),
//! );
//! ```

pub mod analytics;
pub mod classifier;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod features;
pub mod history;
pub mod insights;
pub mod selector;
pub mod store;
pub mod text;
pub mod types;

#[cfg(feature = "cli")]
pub mod logging;

pub use classifier::{SkillClassifier, ThresholdSkillClassifier};
pub use config::TutorConfig;
pub use content::{ContentSelector, TemplateContentGenerator};
pub use engine::{StateSnapshot, TutorEngine};
pub use error::TutorError;
pub use text::TextFeedbackAnalyzer;
pub use types::{
    AdaptiveFeedback, FeedbackAnalysis, GameContext, GameEvent, GameMetrics, GameState,
    LearningStyle, PerformanceAnalysis, PlayerProfile, SkillTier, TutorialCategory,
    TutorialSession,
};

/// Crate version recorded in saved state
pub const TUTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "adaptive-tutor";

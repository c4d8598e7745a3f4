//! Tutorial need selection
//!
//! Decides which tutorial family a player needs after a session. Rules are
//! evaluated in a fixed order and the first match wins.

use crate::features::collision_rate;
use crate::types::{GameMetrics, SkillAnalysis, TutorialCategory};

/// Sessions with fewer attempts than this always get onboarding
const ONBOARDING_MAX_ATTEMPTS: i64 = 5;
const COLLISION_RATE_THRESHOLD: f64 = 0.7;
const BASIC_SKILLS_EFFICIENCY: f64 = 0.3;
const ADVANCED_EFFICIENCY: f64 = 0.8;

pub struct TutorialNeedSelector;

impl TutorialNeedSelector {
    /// Select the tutorial category for a classified session
    pub fn select(analysis: &SkillAnalysis, metrics: &GameMetrics) -> TutorialCategory {
        let collision_rate = collision_rate(metrics.collisions, metrics.attempts);
        Self::select_from(analysis.efficiency, metrics.attempts, collision_rate)
    }

    fn select_from(efficiency: f64, attempts: i64, collision_rate: f64) -> TutorialCategory {
        if attempts < ONBOARDING_MAX_ATTEMPTS {
            TutorialCategory::Onboarding
        } else if collision_rate > COLLISION_RATE_THRESHOLD {
            TutorialCategory::CollisionReduction
        } else if efficiency < BASIC_SKILLS_EFFICIENCY {
            TutorialCategory::BasicSkills
        } else if efficiency > ADVANCED_EFFICIENCY {
            TutorialCategory::AdvancedTechniques
        } else {
            TutorialCategory::SkillRefinement
        }
    }
}

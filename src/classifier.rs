//! Skill classification
//!
//! Maps a metrics record to a discrete skill tier and numeric skill score. The
//! classifier sits behind the [`SkillClassifier`] trait so a trained model can be
//! swapped in without touching the engine.

use crate::features::{collision_rate, efficiency, mean};
use crate::types::{GameMetrics, SkillAnalysis, SkillTier};

/// Confidence reported with every threshold classification
pub const CLASSIFIER_CONFIDENCE: f64 = 0.85;

/// Mean reaction time assumed when a session has no samples
const DEFAULT_REACTION_TIME_SEC: f64 = 1.0;

/// Capability: classify the skill shown in one metrics record
pub trait SkillClassifier: Send + Sync {
    /// Classify a single metrics record. Must be a pure function of its input.
    fn classify(&self, metrics: &GameMetrics) -> SkillAnalysis;
}

/// Thresholds for one tier of the cascade
#[derive(Debug, Clone, Copy)]
struct TierRule {
    tier: SkillTier,
    score: f64,
    min_efficiency: f64,
    max_collision_rate: f64,
    max_reaction_time: f64,
}

/// Evaluated in order, first match wins
const TIER_RULES: [TierRule; 2] = [
    TierRule {
        tier: SkillTier::Advanced,
        score: 0.9,
        min_efficiency: 0.8,
        max_collision_rate: 0.2,
        max_reaction_time: 0.8,
    },
    TierRule {
        tier: SkillTier::Intermediate,
        score: 0.6,
        min_efficiency: 0.5,
        max_collision_rate: 0.5,
        max_reaction_time: 1.2,
    },
];

const FALLBACK_TIER: SkillTier = SkillTier::Beginner;
const FALLBACK_SCORE: f64 = 0.3;

/// Rule-based classifier using a fixed three-way threshold cascade
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdSkillClassifier;

impl SkillClassifier for ThresholdSkillClassifier {
    fn classify(&self, metrics: &GameMetrics) -> SkillAnalysis {
        let efficiency = efficiency(metrics.score, metrics.attempts);
        let collision_rate = collision_rate(metrics.collisions, metrics.attempts);
        let reaction_time_avg =
            mean(&metrics.reaction_times).unwrap_or(DEFAULT_REACTION_TIME_SEC);

        let (skill_level, skill_score) = TIER_RULES
            .iter()
            .find(|rule| {
                efficiency > rule.min_efficiency
                    && collision_rate < rule.max_collision_rate
                    && reaction_time_avg < rule.max_reaction_time
            })
            .map(|rule| (rule.tier, rule.score))
            .unwrap_or((FALLBACK_TIER, FALLBACK_SCORE));

        SkillAnalysis {
            skill_level,
            skill_score,
            confidence: CLASSIFIER_CONFIDENCE,
            raw_score: metrics.score,
            efficiency,
            consistency: consistency(collision_rate),
            reaction_time_avg,
            collision_rate,
        }
    }
}

/// Consistency: `1 / (1 + collision_rate * 10)`, in (0, 1] and decreasing
fn consistency(collision_rate: f64) -> f64 {
    1.0 / (1.0 + collision_rate * 10.0)
}

/// Improvement recommendations for a classified session.
///
/// Three recommendations for the skill band, plus targeted ones for a high
/// collision rate and low efficiency.
pub fn improvement_recommendations(analysis: &SkillAnalysis) -> Vec<String> {
    let mut recommendations: Vec<String> = if analysis.skill_score < 0.4 {
        vec![
            "Practica 10 minutos diarios para mejorar tus habilidades básicas".to_string(),
            "Enfócate en pasar al menos 3 obstáculos consecutivos".to_string(),
            "Usa toques suaves y constantes en lugar de toques fuertes".to_string(),
        ]
    } else if analysis.skill_score < 0.7 {
        vec![
            "Experimenta con diferentes estrategias de vuelo".to_string(),
            "Intenta mantener el pájaro en el centro de las aberturas".to_string(),
            "Practica sesiones de 15-20 minutos para mejorar la consistencia".to_string(),
        ]
    } else {
        vec![
            "Perfecciona técnicas avanzadas como el vuelo rasante".to_string(),
            "Intenta establecer récords de consistencia".to_string(),
            "Experimenta con desafíos autoimpuestos".to_string(),
        ]
    };

    if analysis.collision_rate > 0.6 {
        recommendations.push("Trabaja en reducir las colisiones con obstáculos".to_string());
    }
    if analysis.efficiency < 0.3 {
        recommendations.push("Mejora tu eficiencia practicando el timing perfecto".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DifficultyLabel;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn make_metrics(score: i64, attempts: i64, collisions: i64, reaction_times: Vec<f64>) -> GameMetrics {
        GameMetrics {
            player_id: "player".to_string(),
            session_duration: 180.0,
            score,
            attempts,
            collisions,
            reaction_times,
            difficulty_level: DifficultyLabel::Medium,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_struggling_player_is_beginner() {
        let metrics = make_metrics(5, 25, 20, vec![0.8, 0.9, 1.2, 0.7, 1.1, 0.9, 1.0]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);

        assert!((analysis.efficiency - 0.2).abs() < 1e-9);
        assert!((analysis.collision_rate - 0.8).abs() < 1e-9);
        assert_eq!(analysis.skill_level, SkillTier::Beginner);
        assert_eq!(analysis.skill_score, 0.3);
        assert_eq!(analysis.confidence, CLASSIFIER_CONFIDENCE);
    }

    #[test]
    fn test_intermediate_branch() {
        let metrics = make_metrics(15, 20, 8, vec![0.6, 0.7, 0.8, 0.5, 0.7, 0.6, 0.8]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);

        assert!((analysis.efficiency - 0.75).abs() < 1e-9);
        assert!((analysis.collision_rate - 0.4).abs() < 1e-9);
        assert_eq!(analysis.skill_level, SkillTier::Intermediate);
        assert_eq!(analysis.skill_score, 0.6);
    }

    #[test]
    fn test_advanced_branch() {
        let metrics = make_metrics(28, 30, 3, vec![0.4, 0.5, 0.6]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);

        assert_eq!(analysis.skill_level, SkillTier::Advanced);
        assert_eq!(analysis.skill_score, 0.9);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // efficiency exactly 0.8 does not satisfy "> 0.8"
        let metrics = make_metrics(8, 10, 0, vec![0.5]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);
        assert_eq!(analysis.skill_level, SkillTier::Intermediate);
    }

    #[test]
    fn test_missing_reaction_times_blocks_advanced() {
        let metrics = make_metrics(28, 30, 0, vec![]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);

        assert_eq!(analysis.reaction_time_avg, DEFAULT_REACTION_TIME_SEC);
        assert_eq!(analysis.skill_level, SkillTier::Intermediate);
    }

    #[test]
    fn test_zero_attempts_do_not_fail() {
        let metrics = make_metrics(0, 0, 0, vec![]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);

        assert_eq!(analysis.efficiency, 0.0);
        assert_eq!(analysis.collision_rate, 0.0);
        assert_eq!(analysis.consistency, 1.0);
        assert_eq!(analysis.skill_level, SkillTier::Beginner);
    }

    #[test]
    fn test_consistency_decreases_with_collisions() {
        assert_eq!(consistency(0.0), 1.0);
        assert!((consistency(0.1) - 0.5).abs() < 1e-9);
        assert!(consistency(0.8) < consistency(0.4));
    }

    #[test]
    fn test_recommendations_for_beginner() {
        let metrics = make_metrics(5, 25, 20, vec![0.9]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);
        let recommendations = improvement_recommendations(&analysis);

        // band (3) + collision (0.8 > 0.6) + efficiency (0.2 < 0.3)
        assert_eq!(recommendations.len(), 5);
        assert!(recommendations[3].contains("colisiones"));
        assert!(recommendations[4].contains("eficiencia"));
    }

    #[test]
    fn test_recommendations_for_advanced() {
        let metrics = make_metrics(28, 30, 3, vec![0.4]);
        let analysis = ThresholdSkillClassifier.classify(&metrics);
        let recommendations = improvement_recommendations(&analysis);

        assert_eq!(recommendations.len(), 3);
        assert!(recommendations[0].contains("vuelo rasante"));
    }

    proptest! {
        #[test]
        fn prop_classification_is_pure(
            score in 0i64..200,
            attempts in 0i64..200,
            collisions in 0i64..200,
            reaction_times in proptest::collection::vec(0.05f64..3.0, 0..12),
        ) {
            let metrics = make_metrics(score, attempts, collisions, reaction_times);
            let first = ThresholdSkillClassifier.classify(&metrics);
            let second = ThresholdSkillClassifier.classify(&metrics.clone());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_consistency_in_unit_interval(collisions in 0i64..500, attempts in 0i64..500) {
            let metrics = make_metrics(0, attempts, collisions, vec![]);
            let analysis = ThresholdSkillClassifier.classify(&metrics);
            prop_assert!(analysis.consistency > 0.0 && analysis.consistency <= 1.0);
        }
    }
}

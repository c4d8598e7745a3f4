//! Metrics feature extraction
//!
//! Derives the scalar features used by classification and history tracking from a
//! raw metrics record. Every ratio floors its divisor at 1 so empty sessions yield
//! defined zero rates instead of failing.

use serde::{Deserialize, Serialize};

use crate::types::GameMetrics;

/// Number of entries in [`MetricsFeatures::to_vector`]
pub const FEATURE_COUNT: usize = 9;

/// Features derived from one metrics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsFeatures {
    /// Session duration in seconds
    pub session_duration: f64,
    pub score: f64,
    pub attempts: f64,
    pub collisions: f64,
    /// Mean reaction time in seconds (0 without samples)
    pub reaction_time_mean: f64,
    /// Population standard deviation of reaction time (0 with fewer than 2 samples)
    pub reaction_time_std: f64,
    pub reaction_sample_count: f64,
    /// collisions / max(attempts, 1)
    pub collision_rate: f64,
    /// score / max(duration, 1)
    pub score_rate: f64,
}

impl MetricsFeatures {
    /// Fixed-order feature vector
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.session_duration,
            self.score,
            self.attempts,
            self.collisions,
            self.reaction_time_mean,
            self.reaction_time_std,
            self.reaction_sample_count,
            self.collision_rate,
            self.score_rate,
        ]
    }
}

/// Feature extractor for game metrics
pub struct MetricsFeatureExtractor;

impl MetricsFeatureExtractor {
    /// Extract features from a metrics record
    pub fn extract(metrics: &GameMetrics) -> MetricsFeatures {
        MetricsFeatures {
            session_duration: metrics.session_duration,
            score: metrics.score as f64,
            attempts: metrics.attempts as f64,
            collisions: metrics.collisions as f64,
            reaction_time_mean: mean(&metrics.reaction_times).unwrap_or(0.0),
            reaction_time_std: population_std(&metrics.reaction_times),
            reaction_sample_count: metrics.reaction_times.len() as f64,
            collision_rate: collision_rate(metrics.collisions, metrics.attempts),
            score_rate: score_rate(metrics.score, metrics.session_duration),
        }
    }
}

/// Efficiency: `score / max(attempts, 1)`
pub fn efficiency(score: i64, attempts: i64) -> f64 {
    score as f64 / attempts.max(1) as f64
}

/// Collision rate: `collisions / max(attempts, 1)`
pub fn collision_rate(collisions: i64, attempts: i64) -> f64 {
    collisions as f64 / attempts.max(1) as f64
}

/// Score rate: `score / max(duration_sec, 1)`
fn score_rate(score: i64, duration_sec: f64) -> f64 {
    score as f64 / duration_sec.max(1.0)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; 0 when fewer than two samples
fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DifficultyLabel;
    use chrono::Utc;

    fn make_metrics(score: i64, attempts: i64, collisions: i64, reaction_times: Vec<f64>) -> GameMetrics {
        GameMetrics {
            player_id: "test".to_string(),
            session_duration: 300.0,
            score,
            attempts,
            collisions,
            reaction_times,
            difficulty_level: DifficultyLabel::Medium,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_zero_attempts_yield_zero_rates() {
        let metrics = make_metrics(0, 0, 0, vec![]);
        assert_eq!(efficiency(metrics.score, metrics.attempts), 0.0);
        assert_eq!(collision_rate(metrics.collisions, metrics.attempts), 0.0);

        let features = MetricsFeatureExtractor::extract(&metrics);
        assert_eq!(features.collision_rate, 0.0);
        assert_eq!(features.reaction_time_mean, 0.0);
        assert_eq!(features.reaction_time_std, 0.0);
    }

    #[test]
    fn test_divisor_floor_applies_to_single_attempt() {
        // attempts = 0 and attempts = 1 share the same divisor
        assert_eq!(collision_rate(3, 0), collision_rate(3, 1));
        assert_eq!(efficiency(7, 0), 7.0);
    }

    #[test]
    fn test_score_rate_floors_short_sessions() {
        let mut metrics = make_metrics(10, 5, 0, vec![]);
        metrics.session_duration = 0.25;
        let features = MetricsFeatureExtractor::extract(&metrics);
        assert_eq!(features.score_rate, 10.0);
    }

    #[test]
    fn test_reaction_time_statistics() {
        let metrics = make_metrics(15, 20, 8, vec![0.5, 0.7, 0.9]);
        let features = MetricsFeatureExtractor::extract(&metrics);

        assert!((features.reaction_time_mean - 0.7).abs() < 1e-9);
        // population std of [0.5, 0.7, 0.9] = sqrt(0.08 / 3)
        assert!((features.reaction_time_std - (0.08f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(features.reaction_sample_count, 3.0);
    }

    #[test]
    fn test_single_sample_has_zero_std() {
        let metrics = make_metrics(1, 1, 0, vec![0.9]);
        let features = MetricsFeatureExtractor::extract(&metrics);
        assert!((features.reaction_time_mean - 0.9).abs() < 1e-9);
        assert_eq!(features.reaction_time_std, 0.0);
    }

    #[test]
    fn test_vector_order() {
        let metrics = make_metrics(5, 25, 20, vec![0.8, 1.2]);
        let vector = MetricsFeatureExtractor::extract(&metrics).to_vector();

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector[0], 300.0);
        assert_eq!(vector[1], 5.0);
        assert_eq!(vector[2], 25.0);
        assert_eq!(vector[3], 20.0);
        assert!((vector[4] - 1.0).abs() < 1e-9);
        assert_eq!(vector[6], 2.0);
        assert!((vector[7] - 0.8).abs() < 1e-9);
        assert!((vector[8] - 5.0 / 300.0).abs() < 1e-9);
    }
}

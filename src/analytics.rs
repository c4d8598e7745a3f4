//! Reports over stored profiles and sessions
//!
//! Every function here is a pure read over snapshots taken from the stores. Maps
//! are `BTreeMap`s so report JSON is stable across runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::features::mean;
use crate::types::{LearningStyle, PlayerProfile, SkillTier, TutorialCategory, TutorialSession};

/// Player counts per skill tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDistribution {
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

impl SkillDistribution {
    fn add(&mut self, tier: SkillTier) {
        match tier {
            SkillTier::Beginner => self.beginner += 1,
            SkillTier::Intermediate => self.intermediate += 1,
            SkillTier::Advanced => self.advanced += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemOverview {
    pub total_players: usize,
    pub active_sessions: usize,
    pub skill_distribution: SkillDistribution,
    pub learning_style_distribution: BTreeMap<String, usize>,
}

pub fn system_overview(profiles: &[PlayerProfile], active_sessions: usize) -> SystemOverview {
    let mut skill_distribution = SkillDistribution::default();
    let mut learning_style_distribution = BTreeMap::new();

    for profile in profiles {
        skill_distribution.add(profile.skill_tier());
        *learning_style_distribution
            .entry(profile.learning_style.as_str().to_string())
            .or_insert(0) += 1;
    }

    SystemOverview {
        total_players: profiles.len(),
        active_sessions,
        skill_distribution,
        learning_style_distribution,
    }
}

/// Profile fields shown in per-player reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub skill_level: f64,
    pub skill_category: String,
    pub learning_style: LearningStyle,
    pub preferred_language: String,
    pub difficulty_areas: Vec<String>,
}

impl From<&PlayerProfile> for ProfileSummary {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            skill_level: profile.skill_level,
            skill_category: profile.skill_tier().display_label().to_string(),
            learning_style: profile.learning_style.clone(),
            preferred_language: profile.preferred_language.clone(),
            difficulty_areas: profile.difficulty_areas.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialActivity {
    pub total_sessions: usize,
    /// Distinct categories in alphabetical order
    pub tutorial_types: Vec<String>,
    /// Mean estimated duration in minutes, 0 without sessions
    pub average_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnalytics {
    pub player_id: String,
    pub profile: ProfileSummary,
    pub tutorial_activity: TutorialActivity,
    /// Last five difficulty areas
    pub improvement_areas: Vec<String>,
    pub recommended_focus: String,
    /// `min(sessions * 0.2, 1)`
    pub personalization_confidence: f64,
}

/// Per-player analytics. `sessions` must already be filtered to the player.
pub fn player_analytics(profile: &PlayerProfile, sessions: &[TutorialSession]) -> PlayerAnalytics {
    let tutorial_types: BTreeSet<String> = sessions
        .iter()
        .map(|s| s.tutorial_type.as_str().to_string())
        .collect();
    let durations: Vec<f64> = sessions
        .iter()
        .map(|s| f64::from(s.estimated_duration))
        .collect();

    let recommended_focus = match profile.skill_tier() {
        SkillTier::Beginner => "timing",
        SkillTier::Intermediate => "consistency",
        SkillTier::Advanced => "advanced_techniques",
    };

    PlayerAnalytics {
        player_id: profile.player_id.clone(),
        profile: ProfileSummary::from(profile),
        tutorial_activity: TutorialActivity {
            total_sessions: sessions.len(),
            tutorial_types: tutorial_types.into_iter().collect(),
            average_duration: mean(&durations).unwrap_or(0.0),
        },
        improvement_areas: last_n(&profile.difficulty_areas, 5),
        recommended_focus: recommended_focus.to_string(),
        personalization_confidence: (sessions.len() as f64 * 0.2).min(1.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: usize,
    pub average_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialEffectiveness {
    pub tutorial_types: BTreeMap<String, CategoryStats>,
    /// Category with the most sessions; ties go to the alphabetically first
    pub most_popular: Option<String>,
    pub onboarding_usage: usize,
    pub advanced_engagement: usize,
    /// Sessions whose category mentions collisions or skills
    pub problem_solving_requests: usize,
}

pub fn tutorial_effectiveness(sessions: &[TutorialSession]) -> TutorialEffectiveness {
    let mut durations: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for session in sessions {
        durations
            .entry(session.tutorial_type.as_str().to_string())
            .or_default()
            .push(f64::from(session.estimated_duration));
    }

    let tutorial_types: BTreeMap<String, CategoryStats> = durations
        .into_iter()
        .map(|(category, minutes)| {
            let stats = CategoryStats {
                count: minutes.len(),
                average_duration: mean(&minutes).unwrap_or(0.0),
            };
            (category, stats)
        })
        .collect();

    let most_popular = tutorial_types
        .iter()
        .fold(None::<(&String, usize)>, |best, (category, stats)| match best {
            Some((_, count)) if count >= stats.count => best,
            _ => Some((category, stats.count)),
        })
        .map(|(category, _)| category.clone());

    let count_of = |category: &TutorialCategory| {
        tutorial_types
            .get(category.as_str())
            .map(|s| s.count)
            .unwrap_or(0)
    };
    let problem_solving_requests: usize = tutorial_types
        .iter()
        .filter(|(category, _)| category.contains("collision") || category.contains("skills"))
        .map(|(_, stats)| stats.count)
        .sum();

    TutorialEffectiveness {
        onboarding_usage: count_of(&TutorialCategory::Onboarding),
        advanced_engagement: count_of(&TutorialCategory::AdvancedTechniques),
        problem_solving_requests,
        most_popular,
        tutorial_types,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub count: usize,
    pub average_skill: f64,
    /// `[min, max]` skill level within the tier
    pub skill_range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleStats {
    pub players: usize,
    pub average_skill: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCount {
    pub area: String,
    pub players: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPatternsReport {
    pub total_learners: usize,
    /// Only tiers with at least one player appear
    pub skill_distribution: BTreeMap<String, TierStats>,
    pub learning_style_insights: BTreeMap<String, StyleStats>,
    /// At most five, most common first
    pub top_difficulty_areas: Vec<AreaCount>,
    pub focus_on_beginners: bool,
    pub personalization_priority: String,
}

pub fn learning_patterns(profiles: &[PlayerProfile]) -> LearningPatternsReport {
    let mut skills_by_tier: BTreeMap<SkillTier, Vec<f64>> = BTreeMap::new();
    let mut skills_by_style: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut area_counts: BTreeMap<String, usize> = BTreeMap::new();

    for profile in profiles {
        skills_by_tier
            .entry(profile.skill_tier())
            .or_default()
            .push(profile.skill_level);
        skills_by_style
            .entry(profile.learning_style.as_str().to_string())
            .or_default()
            .push(profile.skill_level);
        for area in &profile.difficulty_areas {
            *area_counts.entry(area.clone()).or_insert(0) += 1;
        }
    }

    let tier_count = |tier: SkillTier| skills_by_tier.get(&tier).map(Vec::len).unwrap_or(0);
    let focus_on_beginners =
        tier_count(SkillTier::Beginner) > 0 && tier_count(SkillTier::Beginner) > tier_count(SkillTier::Advanced);

    let skill_distribution: BTreeMap<String, TierStats> = skills_by_tier
        .iter()
        .map(|(tier, skills)| {
            let min = skills.iter().copied().fold(f64::INFINITY, f64::min);
            let max = skills.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let stats = TierStats {
                count: skills.len(),
                average_skill: mean(skills).unwrap_or(0.0),
                skill_range: [min, max],
            };
            (tier.as_str().to_string(), stats)
        })
        .collect();

    let learning_style_insights: BTreeMap<String, StyleStats> = skills_by_style
        .into_iter()
        .map(|(style, skills)| {
            let stats = StyleStats {
                players: skills.len(),
                average_skill: mean(&skills).unwrap_or(0.0),
            };
            (style, stats)
        })
        .collect();

    let personalization_priority = learning_style_insights
        .iter()
        .fold(None::<(&String, usize)>, |best, (style, stats)| match best {
            Some((_, players)) if players >= stats.players => best,
            _ => Some((style, stats.players)),
        })
        .map(|(style, _)| style.clone())
        .unwrap_or_else(|| LearningStyle::Visual.as_str().to_string());

    let mut top_difficulty_areas: Vec<AreaCount> = area_counts
        .into_iter()
        .map(|(area, players)| AreaCount { area, players })
        .collect();
    // stable sort keeps alphabetical order among equal counts
    top_difficulty_areas.sort_by(|a, b| b.players.cmp(&a.players));
    top_difficulty_areas.truncate(5);

    LearningPatternsReport {
        total_learners: profiles.len(),
        skill_distribution,
        learning_style_insights,
        top_difficulty_areas,
        focus_on_beginners,
        personalization_priority,
    }
}

/// Tutorials and practice suggestions for a player's skill band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecommendations {
    pub player_id: String,
    pub skill_level: f64,
    pub learning_style: LearningStyle,
    pub recommended_tutorials: Vec<TutorialCategory>,
    pub practice_suggestions: Vec<String>,
}

pub fn player_recommendations(profile: &PlayerProfile) -> PlayerRecommendations {
    let (recommended_tutorials, practice_suggestions): (Vec<TutorialCategory>, &[&str]) =
        match profile.skill_tier() {
            SkillTier::Beginner => (
                vec![TutorialCategory::Onboarding, TutorialCategory::BasicSkills],
                &[
                    "Practica 10 minutos diarios",
                    "Enfócate en pasar 3 obstáculos consecutivos",
                    "Usa toques suaves y constantes",
                ],
            ),
            SkillTier::Intermediate => (
                vec![
                    TutorialCategory::SkillRefinement,
                    TutorialCategory::CollisionReduction,
                ],
                &[
                    "Experimenta con diferentes estrategias",
                    "Intenta mantener el pájaro en el centro",
                    "Practica sesiones de 15-20 minutos",
                ],
            ),
            SkillTier::Advanced => (
                vec![TutorialCategory::AdvancedTechniques],
                &[
                    "Perfecciona técnicas avanzadas",
                    "Intenta récords de consistencia",
                    "Experimenta con desafíos autoimpuestos",
                ],
            ),
        };

    PlayerRecommendations {
        player_id: profile.player_id.clone(),
        skill_level: profile.skill_level,
        learning_style: profile.learning_style.clone(),
        recommended_tutorials,
        practice_suggestions: practice_suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningProgress {
    pub player_id: String,
    pub current_skill_level: f64,
    pub skill_category: String,
    pub learning_style: LearningStyle,
    pub difficulty_areas: Vec<String>,
    /// Tutorial sessions currently held for the player
    pub tutorial_sessions: usize,
    pub next_tutorial: TutorialCategory,
    pub focus_areas: Vec<String>,
}

pub fn learning_progress(profile: &PlayerProfile, tutorial_sessions: usize) -> LearningProgress {
    let next_tutorial = match profile.skill_tier() {
        SkillTier::Beginner => TutorialCategory::BasicSkills,
        SkillTier::Intermediate => TutorialCategory::SkillRefinement,
        SkillTier::Advanced => TutorialCategory::AdvancedTechniques,
    };
    let focus_areas = if profile.difficulty_areas.is_empty() {
        vec!["timing".to_string(), "consistency".to_string()]
    } else {
        last_n(&profile.difficulty_areas, 3)
    };

    LearningProgress {
        player_id: profile.player_id.clone(),
        current_skill_level: profile.skill_level,
        skill_category: profile.skill_tier().display_label().to_string(),
        learning_style: profile.learning_style.clone(),
        difficulty_areas: profile.difficulty_areas.clone(),
        tutorial_sessions,
        next_tutorial,
        focus_areas,
    }
}

fn last_n(items: &[String], n: usize) -> Vec<String> {
    items[items.len().saturating_sub(n)..].to_vec()
}

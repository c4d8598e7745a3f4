//! Tutorial and contextual content generation
//!
//! Content comes from two template tables:
//!
//! - tutorial content keyed by tutorial category, then skill tier
//! - contextual content keyed by game state, then skill tier
//!
//! The tier always comes from the profile's current skill score, never from the
//! metrics of the session that triggered the request. Selected content is then
//! personalized with a learning-style annotation.
//!
//! Templates sit behind the [`ContentSelector`] trait so a generative model can
//! replace them without changing the engine.

use tracing::warn;

use crate::types::{GameContext, GameEvent, LearningStyle, PlayerProfile, SkillTier, TutorialCategory};

/// Returned when no tutorial template exists for a category/tier pair
pub const GENERIC_TUTORIAL_CONTENT: &str =
    "Tutorial personalizado para mejorar tus habilidades de juego.";

/// Returned when no contextual template exists for a game state/tier pair
pub const GENERIC_CONTEXTUAL_CONTENT: &str = "Continúa practicando para mejorar.";

/// Capability: choose the prose shown to a player
pub trait ContentSelector: Send + Sync {
    /// Personalized tutorial text for a category
    fn tutorial_content(
        &self,
        category: &TutorialCategory,
        profile: &PlayerProfile,
        context: &GameContext,
    ) -> String;

    /// Personalized contextual message for an in-game state or event
    fn contextual_message(&self, game_state: &GameEvent, profile: &PlayerProfile) -> String;
}

/// Template-table content generator
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateContentGenerator;

impl ContentSelector for TemplateContentGenerator {
    fn tutorial_content(
        &self,
        category: &TutorialCategory,
        profile: &PlayerProfile,
        context: &GameContext,
    ) -> String {
        let tier = profile.skill_tier();
        let mut content = match tutorial_template(category, tier) {
            Some(template) => template.to_string(),
            None => {
                warn!(
                    category = category.as_str(),
                    tier = tier.as_str(),
                    "no tutorial template, using generic content"
                );
                GENERIC_TUTORIAL_CONTENT.to_string()
            }
        };

        if let Some(sentence) = context
            .game_state
            .as_ref()
            .and_then(|state| contextual_template(state, tier))
        {
            content.push(' ');
            content.push_str(sentence);
        }

        personalize(&content, &profile.learning_style)
    }

    fn contextual_message(&self, game_state: &GameEvent, profile: &PlayerProfile) -> String {
        let content =
            contextual_template(game_state, profile.skill_tier()).unwrap_or(GENERIC_CONTEXTUAL_CONTENT);
        personalize(content, &profile.learning_style)
    }
}

fn tutorial_template(category: &TutorialCategory, tier: SkillTier) -> Option<&'static str> {
    use SkillTier::*;
    use TutorialCategory::*;

    let template = match (category, tier) {
        (Onboarding, Beginner) => {
            "En este tutorial aprenderás los fundamentos del juego paso a paso. Toca la pantalla para que el pájaro suba y suelta para dejarlo caer."
        }
        (Onboarding, Intermediate) => {
            "Vamos a perfeccionar tu técnica con ejercicios específicos. Repasa los controles y ajusta la fuerza de cada toque."
        }
        (CollisionReduction, Beginner) => {
            "Estrategias para reducir colisiones con obstáculos. Toca justo antes de llegar a cada tubería y no después."
        }
        (CollisionReduction, Intermediate) => {
            "Estrategias para reducir colisiones con obstáculos. Observa la altura de la siguiente abertura mientras pasas la actual."
        }
        (CollisionReduction, Advanced) => {
            "Estrategias para reducir colisiones con obstáculos. Ajusta tu trayectoria con toques cortos para entrar centrado en cada abertura."
        }
        (BasicSkills, Beginner) => {
            "Practica el timing perfecto con estos ejercicios de precisión. Mantén el pájaro a media altura con toques regulares."
        }
        (BasicSkills, Intermediate) => {
            "Desarrolla consistencia con patrones de vuelo repetitivos. Cuenta el ritmo de tus toques entre tuberías."
        }
        (AdvancedTechniques, Intermediate) => {
            "Técnicas avanzadas para jugadores experimentados. Empieza a practicar el vuelo rasante sobre la tubería inferior."
        }
        (AdvancedTechniques, Advanced) => {
            "Técnicas avanzadas para jugadores experimentados. Domina el vuelo rasante y optimiza cada trayectoria."
        }
        (SkillRefinement, Beginner) => {
            "Desarrolla consistencia con patrones de vuelo repetitivos. Repite la misma secuencia hasta que salga sin pensar."
        }
        (SkillRefinement, Intermediate) => {
            "Técnicas para superar mesetas de puntaje. Identifica en qué tramo fallas más y practícalo por separado."
        }
        (SkillRefinement, Advanced) => {
            "Técnicas para superar mesetas de puntaje. Mantén la concentración en sesiones largas sin cambiar tu técnica."
        }
        _ => return None,
    };
    Some(template)
}

fn contextual_template(game_state: &GameEvent, tier: SkillTier) -> Option<&'static str> {
    use GameEvent::*;
    use SkillTier::*;

    let template = match (game_state, tier) {
        (HighScore, Beginner) => {
            "¡Excelente trabajo! Has logrado un puntaje alto. Para seguir mejorando, intenta mantener un ritmo constante."
        }
        (GameOver, Beginner) => {
            "No te preocupes, es normal fallar al principio. Intenta tocar la pantalla con un ritmo más suave."
        }
        (PipeCollision | Collision, Beginner) => {
            "Toca la pantalla justo antes de llegar a las tuberías. Practica el timing poco a poco."
        }
        (HighScore, Intermediate) => {
            "Gran puntaje. Ahora puedes intentar técnicas más avanzadas como el vuelo rasante."
        }
        (GameOver, Intermediate) => {
            "Analiza el patrón de las tuberías. Cada conjunto tiene un ritmo específico."
        }
        (PipeCollision | Collision, Intermediate) => {
            "Considera la física del vuelo: cada toque impulsa al pájaro hacia arriba con la misma fuerza."
        }
        (HighScore, Advanced) => {
            "Rendimiento excepcional. Puedes intentar desafíos como mantener el pájaro en el centro de las aberturas."
        }
        (GameOver, Advanced) => {
            "Revisa tu estrategia de anticipación. Los jugadores expertos predicen el próximo movimiento."
        }
        (PipeCollision | Collision, Advanced) => {
            "Optimiza tu trayectoria considerando la velocidad y aceleración del pájaro."
        }
        _ => return None,
    };
    Some(template)
}

/// Wrap content with the fixed annotation for a learning style.
///
/// Unrecognized styles get the content back unchanged.
pub fn personalize(content: &str, style: &LearningStyle) -> String {
    match style {
        LearningStyle::Visual => {
            format!("💡 Observa: {content} Imagina la trayectoria ideal del pájaro.")
        }
        LearningStyle::Auditory => {
            format!("🔊 Escucha: {content} Intenta seguir el ritmo de los sonidos del juego.")
        }
        LearningStyle::Kinesthetic => {
            format!("✋ Práctica: {content} Experimenta con diferentes intensidades de toque.")
        }
        LearningStyle::Reading => {
            format!("📚 Análisis: {content} Estudia los patrones y desarrolla una estrategia.")
        }
        LearningStyle::Other(_) => content.to_string(),
    }
}

/// Fixed learning objectives for a tutorial category
pub fn learning_objectives(category: &TutorialCategory) -> Vec<String> {
    let objectives: &[&str] = match category {
        TutorialCategory::Onboarding => &[
            "Comprender controles básicos del juego",
            "Aprender mecánica de vuelo del pájaro",
            "Familiarizarse con obstáculos",
        ],
        TutorialCategory::CollisionReduction => &[
            "Mejorar timing de toques",
            "Desarrollar anticipación visual",
            "Reducir colisiones en 50%",
        ],
        TutorialCategory::BasicSkills => &[
            "Mantener vuelo estable",
            "Lograr puntaje consistente",
            "Desarrollar confianza",
        ],
        TutorialCategory::AdvancedTechniques => &[
            "Dominar vuelo rasante",
            "Optimizar trayectorias",
            "Maximizar eficiencia de movimientos",
        ],
        _ => &["Mejorar habilidades generales"],
    };
    objectives.iter().map(|s| s.to_string()).collect()
}

/// Estimated tutorial duration in minutes.
///
/// ```text
/// base     = onboarding 5, collision_reduction 8, basic_skills 10,
///            advanced_techniques 15, skill_refinement 12, other 10
/// scaled   = base * 1.5 if skill < 0.3, base * 0.8 if skill > 0.7, else base
/// duration = max(trunc(scaled), 1)
/// ```
pub fn estimate_duration(category: &TutorialCategory, skill_level: f64) -> u32 {
    let base: f64 = match category {
        TutorialCategory::Onboarding => 5.0,
        TutorialCategory::CollisionReduction => 8.0,
        TutorialCategory::BasicSkills => 10.0,
        TutorialCategory::AdvancedTechniques => 15.0,
        TutorialCategory::SkillRefinement => 12.0,
        TutorialCategory::Other(_) => 10.0,
    };

    let multiplier = if skill_level < 0.3 {
        1.5
    } else if skill_level > 0.7 {
        0.8
    } else {
        1.0
    };

    ((base * multiplier).trunc() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(skill_level: f64, style: LearningStyle) -> PlayerProfile {
        PlayerProfile::new("player", skill_level, style, "es")
    }

    #[test]
    fn test_duration_examples() {
        assert_eq!(estimate_duration(&TutorialCategory::Onboarding, 0.2), 7);
        assert_eq!(estimate_duration(&TutorialCategory::Onboarding, 0.9), 4);
        assert_eq!(estimate_duration(&TutorialCategory::Onboarding, 0.5), 5);
        assert_eq!(estimate_duration(&TutorialCategory::AdvancedTechniques, 0.9), 12);
        assert_eq!(
            estimate_duration(&TutorialCategory::Other("speedrun".into()), 0.1),
            15
        );
    }

    #[test]
    fn test_duration_cutoffs_are_strict() {
        assert_eq!(estimate_duration(&TutorialCategory::CollisionReduction, 0.3), 8);
        assert_eq!(estimate_duration(&TutorialCategory::CollisionReduction, 0.7), 8);
    }

    #[test]
    fn test_tier_follows_profile_skill() {
        let generator = TemplateContentGenerator;
        let context = GameContext::default();
        let style = LearningStyle::Other("none".into());

        let beginner = generator.tutorial_content(
            &TutorialCategory::Onboarding,
            &profile(0.1, style.clone()),
            &context,
        );
        assert!(beginner.starts_with("En este tutorial aprenderás"));

        let intermediate = generator.tutorial_content(
            &TutorialCategory::Onboarding,
            &profile(0.5, style),
            &context,
        );
        assert!(intermediate.starts_with("Vamos a perfeccionar tu técnica"));
    }

    #[test]
    fn test_missing_template_falls_back() {
        let generator = TemplateContentGenerator;
        let style = LearningStyle::Other("none".into());

        // onboarding has no advanced template
        let content = generator.tutorial_content(
            &TutorialCategory::Onboarding,
            &profile(0.9, style.clone()),
            &GameContext::default(),
        );
        assert_eq!(content, GENERIC_TUTORIAL_CONTENT);

        let content = generator.tutorial_content(
            &TutorialCategory::Other("speedrun".into()),
            &profile(0.5, style),
            &GameContext::default(),
        );
        assert_eq!(content, GENERIC_TUTORIAL_CONTENT);
    }

    #[test]
    fn test_style_annotations() {
        assert_eq!(
            personalize("Hola.", &LearningStyle::Visual),
            "💡 Observa: Hola. Imagina la trayectoria ideal del pájaro."
        );
        assert!(personalize("Hola.", &LearningStyle::Auditory).starts_with("🔊 Escucha:"));
        assert!(personalize("Hola.", &LearningStyle::Kinesthetic).starts_with("✋ Práctica:"));
        assert!(personalize("Hola.", &LearningStyle::Reading).starts_with("📚 Análisis:"));
        assert_eq!(personalize("Hola.", &LearningStyle::Other("Visual".into())), "Hola.");
    }

    #[test]
    fn test_context_sentence_precedes_annotation() {
        let generator = TemplateContentGenerator;
        let context = GameContext {
            game_state: Some(GameEvent::GameOver),
            current_score: Some(2),
            attempts: Some(3),
        };

        let content = generator.tutorial_content(
            &TutorialCategory::BasicSkills,
            &profile(0.1, LearningStyle::Visual),
            &context,
        );
        assert!(content.contains("es normal fallar al principio"));
        assert!(content.ends_with("Imagina la trayectoria ideal del pájaro."));
    }

    #[test]
    fn test_contextual_message() {
        let generator = TemplateContentGenerator;
        let reader = profile(0.8, LearningStyle::Reading);

        let message = generator.contextual_message(&GameEvent::HighScore, &reader);
        assert!(message.contains("Rendimiento excepcional"));

        let message = generator.contextual_message(&GameEvent::GameStart, &reader);
        assert!(message.contains(GENERIC_CONTEXTUAL_CONTENT));
    }

    #[test]
    fn test_learning_objectives() {
        assert_eq!(learning_objectives(&TutorialCategory::Onboarding).len(), 3);
        assert_eq!(
            learning_objectives(&TutorialCategory::SkillRefinement),
            vec!["Mejorar habilidades generales".to_string()]
        );
    }
}

//! Real-time feedback composition
//!
//! Assembles an [`AdaptiveFeedback`] for a triggering in-game event: a contextual
//! message, up to three tips, one encouragement line and up to three next steps.

use uuid::Uuid;

use crate::content::ContentSelector;
use crate::types::{AdaptiveFeedback, GameEvent, GameState, LearningStyle, PlayerProfile};

/// Fixed confidence attached to composed feedback (not computed)
pub const FEEDBACK_CONFIDENCE: f64 = 0.85;

const MAX_TIPS: usize = 3;
const MAX_NEXT_STEPS: usize = 3;

pub struct FeedbackComposer;

impl FeedbackComposer {
    /// Compose feedback for one event
    pub fn compose(
        event: &GameEvent,
        profile: &PlayerProfile,
        state: &GameState,
        content: &dyn ContentSelector,
    ) -> AdaptiveFeedback {
        AdaptiveFeedback {
            feedback_id: format!("feedback_{}", Uuid::new_v4()),
            player_id: profile.player_id.clone(),
            trigger_event: event.clone(),
            message: content.contextual_message(event, profile),
            tips: tips(event, &profile.learning_style),
            encouragement: encouragement(state.score).to_string(),
            next_steps: next_steps(event),
            confidence_score: FEEDBACK_CONFIDENCE,
        }
    }
}

/// Event tips plus one style tip for visual or kinesthetic players, capped at three.
///
/// The cap applies after the style tip is appended, so it only survives when the
/// event list is shorter than three.
pub fn tips(event: &GameEvent, style: &LearningStyle) -> Vec<String> {
    let base: &[&str] = match event {
        GameEvent::Collision => &[
            "Intenta tocar la pantalla justo antes de llegar al obstáculo",
            "Mantén un ritmo constante en lugar de toques desesperados",
            "Observa el patrón de altura de las tuberías",
        ],
        GameEvent::HighScore => &[
            "¡Excelente! Mantén este ritmo",
            "Intenta no cambiar tu técnica cuando tengas una buena racha",
            "La consistencia es clave para puntajes altos",
        ],
        GameEvent::GameStart => &[
            "Comienza con toques suaves para calibrar el control",
            "Enfócate en pasar los primeros obstáculos sin prisa",
            "Establece un ritmo cómodo desde el inicio",
        ],
        _ => &["Continúa practicando"],
    };

    let mut tips: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    match style {
        LearningStyle::Visual => tips.push("Imagina la trayectoria ideal antes de actuar".to_string()),
        LearningStyle::Kinesthetic => {
            tips.push("Experimenta con diferentes intensidades de toque".to_string())
        }
        _ => {}
    }
    tips.truncate(MAX_TIPS);
    tips
}

/// Encouragement by current score: > 20, > 10, > 5, otherwise
pub fn encouragement(score: i64) -> &'static str {
    if score > 20 {
        "¡Increíble progreso! Estás dominando el juego."
    } else if score > 10 {
        "¡Muy bien! Tu técnica está mejorando notablemente."
    } else if score > 5 {
        "¡Buen trabajo! Cada intento te acerca más al éxito."
    } else {
        "¡No te rindas! Cada jugador experto comenzó como tú."
    }
}

pub fn next_steps(event: &GameEvent) -> Vec<String> {
    let steps: &[&str] = match event {
        GameEvent::Collision => &[
            "Practica en modo lento si está disponible",
            "Concéntrate en pasar 3 obstáculos seguidos",
            "Observa el patrón antes de intentar nuevamente",
        ],
        GameEvent::HighScore => &[
            "Intenta superar tu récord actual",
            "Experimenta con técnicas más avanzadas",
            "Mantén la concentración por períodos más largos",
        ],
        _ => &[
            "Continúa practicando regularmente",
            "Revisa los tutoriales disponibles",
            "Analiza tu progreso en las estadísticas",
        ],
    };
    steps.iter().take(MAX_NEXT_STEPS).map(|s| s.to_string()).collect()
}

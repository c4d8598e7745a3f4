//! Keyword analysis of free-text player feedback
//!
//! Sentiment, difficulty indicators and topics are all found by case-insensitive
//! literal substring search. Nothing is tokenized, so a keyword that sits inside a
//! longer word still matches ("mejor" inside "mejorar" counts twice).

use tracing::{debug, warn};

use crate::types::{DifficultyIndicator, FeedbackAnalysis, Sentiment, SentimentLabel};

const POSITIVE_SCORE: f64 = 0.8;
const NEGATIVE_SCORE: f64 = 0.2;
const NEUTRAL_SCORE: f64 = 0.5;

/// Keyword tables for one language
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub language: &'static str,
    pub positive: &'static [&'static str],
    /// Words that also appear in `difficulty` are deliberately absent here
    pub negative: &'static [&'static str],
    /// Keyword to difficulty category, in reporting order
    pub difficulty: &'static [(&'static str, &'static str)],
    pub topics: &'static [&'static str],
}

pub const SPANISH: Lexicon = Lexicon {
    language: "es",
    positive: &[
        "excelente", "bueno", "genial", "perfecto", "mejor", "progreso", "mejorar",
        "aprender", "lograr", "conseguir", "superar",
    ],
    negative: &[
        "malo", "terrible", "frustrante", "perder", "fallar", "fracasar", "abandonar",
        "renunciar",
    ],
    difficulty: &[
        ("difícil", "hard"),
        ("complicado", "hard"),
        ("fácil", "easy"),
        ("simple", "easy"),
        ("confuso", "confusing"),
        ("claro", "clear"),
        ("imposible", "impossible"),
        ("sencillo", "easy"),
    ],
    topics: &[
        "pájaro", "tubería", "puntuación", "juego", "control", "timing", "colisión",
        "vuelo", "obstáculo", "pantalla", "toque",
    ],
};

pub const ENGLISH: Lexicon = Lexicon {
    language: "en",
    positive: &[
        "excellent", "good", "great", "perfect", "better", "progress", "improve",
        "learn", "achieve", "fun",
    ],
    negative: &[
        "bad", "terrible", "frustrating", "lose", "fail", "quit", "give up", "boring",
    ],
    difficulty: &[
        ("difficult", "hard"),
        ("hard", "hard"),
        ("complicated", "hard"),
        ("easy", "easy"),
        ("simple", "easy"),
        ("confusing", "confusing"),
        ("clear", "clear"),
        ("impossible", "impossible"),
    ],
    topics: &[
        "bird", "pipe", "score", "game", "control", "timing", "collision", "flight",
        "obstacle", "screen", "tap",
    ],
};

/// Keyword-based sentiment, difficulty and topic extraction
#[derive(Debug, Clone, Copy)]
pub struct TextFeedbackAnalyzer {
    lexicon: Lexicon,
}

impl Default for TextFeedbackAnalyzer {
    fn default() -> Self {
        Self { lexicon: SPANISH }
    }
}

impl TextFeedbackAnalyzer {
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Analyzer for a language code, Spanish when the language has no lexicon
    pub fn for_language(language: &str) -> Self {
        match language {
            "es" => Self::with_lexicon(SPANISH),
            "en" => Self::with_lexicon(ENGLISH),
            other => {
                warn!(language = other, "no lexicon for language, using es");
                Self::with_lexicon(SPANISH)
            }
        }
    }

    pub fn language(&self) -> &'static str {
        self.lexicon.language
    }

    /// Analyze one piece of feedback text. Never fails; empty text is neutral.
    pub fn analyze(&self, text: &str) -> FeedbackAnalysis {
        let lowered = text.to_lowercase();

        let sentiment = self.sentiment(&lowered);
        let difficulty_indicators: Vec<DifficultyIndicator> = self
            .lexicon
            .difficulty
            .iter()
            .filter(|(keyword, _)| lowered.contains(keyword))
            .map(|(keyword, category)| DifficultyIndicator {
                keyword: keyword.to_string(),
                category: category.to_string(),
            })
            .collect();
        let key_topics: Vec<String> = self
            .lexicon
            .topics
            .iter()
            .filter(|topic| lowered.contains(*topic))
            .map(|topic| topic.to_string())
            .collect();

        debug!(
            language = self.lexicon.language,
            sentiment = ?sentiment.label,
            indicators = difficulty_indicators.len(),
            topics = key_topics.len(),
            "analyzed feedback text"
        );

        FeedbackAnalysis {
            sentiment,
            difficulty_indicators,
            text_complexity: text.split_whitespace().count(),
            key_topics,
        }
    }

    fn sentiment(&self, lowered: &str) -> Sentiment {
        let positive = count_matches(lowered, self.lexicon.positive);
        let negative = count_matches(lowered, self.lexicon.negative);

        if positive > negative {
            Sentiment {
                label: SentimentLabel::Positive,
                score: POSITIVE_SCORE,
            }
        } else if negative > positive {
            Sentiment {
                label: SentimentLabel::Negative,
                score: NEGATIVE_SCORE,
            }
        } else {
            Sentiment {
                label: SentimentLabel::Neutral,
                score: NEUTRAL_SCORE,
            }
        }
    }
}

/// Number of keywords that occur anywhere in the text (each counted once)
fn count_matches(lowered: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_difficult_timing_feedback_is_neutral() {
        let analysis = TextFeedbackAnalyzer::default()
            .analyze("Este juego es muy difícil, no entiendo el timing correcto");

        assert_eq!(analysis.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(analysis.sentiment.score, 0.5);
        assert_eq!(
            analysis.difficulty_indicators,
            vec![DifficultyIndicator {
                keyword: "difícil".to_string(),
                category: "hard".to_string(),
            }]
        );
        assert_eq!(analysis.key_topics, vec!["juego".to_string(), "timing".to_string()]);
        assert_eq!(analysis.text_complexity, 10);
    }

    #[test]
    fn test_empty_text() {
        let analysis = TextFeedbackAnalyzer::default().analyze("");

        assert_eq!(analysis.sentiment.label, SentimentLabel::Neutral);
        assert!(analysis.difficulty_indicators.is_empty());
        assert!(analysis.key_topics.is_empty());
        assert_eq!(analysis.text_complexity, 0);
    }

    #[test]
    fn test_case_insensitive_sentiment() {
        let analyzer = TextFeedbackAnalyzer::default();

        let positive = analyzer.analyze("¡EXCELENTE! Estoy aprendiendo mucho");
        assert_eq!(positive.sentiment.label, SentimentLabel::Positive);
        assert_eq!(positive.sentiment.score, 0.8);

        let negative = analyzer.analyze("Es frustrante, voy a abandonar");
        assert_eq!(negative.sentiment.label, SentimentLabel::Negative);
        assert_eq!(negative.sentiment.score, 0.2);

        let tied = analyzer.analyze("bueno pero malo");
        assert_eq!(tied.sentiment.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_substring_matching_double_counts() {
        let analysis = TextFeedbackAnalyzer::default().analyze("quiero mejorar");
        // "mejor" and "mejorar" both match
        assert_eq!(analysis.sentiment.label, SentimentLabel::Positive);

        let analysis = TextFeedbackAnalyzer::default().analyze("Es un poco complicado pero claro");
        let categories: Vec<&str> = analysis
            .difficulty_indicators
            .iter()
            .map(|d| d.category.as_str())
            .collect();
        assert_eq!(categories, vec!["hard", "clear"]);
    }

    #[test]
    fn test_english_lexicon() {
        let analyzer = TextFeedbackAnalyzer::for_language("en");
        assert_eq!(analyzer.language(), "en");

        let analysis = analyzer.analyze("The pipes are too hard, I want to quit");
        assert_eq!(analysis.sentiment.label, SentimentLabel::Negative);
        assert_eq!(analysis.difficulty_indicators[0].category, "hard");
        assert_eq!(analysis.key_topics, vec!["pipe".to_string()]);
    }

    #[test]
    fn test_unknown_language_uses_spanish() {
        assert_eq!(TextFeedbackAnalyzer::for_language("fr").language(), "es");
    }
}

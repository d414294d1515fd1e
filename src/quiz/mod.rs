// Core quiz data model
//
// These types cross the pipeline boundary: the generation pipeline produces
// them, storage and UI layers consume them as an opaque ordered list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix carried by the question of every degraded-mode placeholder item.
///
/// Placeholder items render like normal quiz content but calling UIs can
/// detect the degraded state by checking for this marker.
pub const DEGRADED_MARKER: &str = "⚠️";

/// Lower bound on the number of questions per request.
pub const MIN_QUESTIONS: usize = 1;
/// Upper bound on the number of questions per request.
pub const MAX_QUESTIONS: usize = 20;

/// Requested quiz difficulty.
///
/// Parsed case-insensitively from both English and French labels since the
/// surrounding forms were written in French.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Standard,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// French display label, used in prompts and UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Intermediate => "Intermédiaire",
            Self::Advanced => "Avancée",
            Self::Expert => "Expert",
        }
    }

    /// Word-count window (exclusive bounds) a sentence must fall in to be a
    /// candidate for extractive question synthesis at this difficulty.
    pub fn sentence_window(&self) -> (usize, usize) {
        match self {
            Self::Standard => (15, 50),
            Self::Intermediate => (18, 55),
            Self::Advanced => (20, 60),
            Self::Expert => (25, 80),
        }
    }

    /// Expert questions must be anchored on a sentence naming a proper noun.
    pub fn requires_proper_noun(&self) -> bool {
        matches!(self, Self::Expert)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a difficulty label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty label: {0}")]
pub struct UnknownDifficulty(String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "intermediate" | "intermédiaire" | "intermediaire" => Ok(Self::Intermediate),
            "advanced" | "avancée" | "avancee" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// A single generation request.
///
/// All fields are request-scoped; nothing in the pipeline retains state
/// across requests.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub source_text: String,
    pub num_questions: usize,
    pub difficulty: Difficulty,
}

impl QuizRequest {
    /// Build a request, clamping the question count to the supported range.
    pub fn new(source_text: impl Into<String>, num_questions: usize, difficulty: Difficulty) -> Self {
        Self {
            source_text: source_text.into(),
            num_questions: num_questions.clamp(MIN_QUESTIONS, MAX_QUESTIONS),
            difficulty,
        }
    }
}

/// One multiple-choice question.
///
/// Invariants: `options` holds exactly 4 unique strings and `answer` equals
/// one of them byte-for-byte. The UI compares submitted answers against
/// `answer` by exact string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizItem {
    /// True when this item is a degraded-mode placeholder rather than
    /// generated quiz content.
    pub fn is_degraded(&self) -> bool {
        self.question.starts_with(DEGRADED_MARKER)
    }

    /// Structural validity check: non-empty question, exactly 4 options
    /// with no duplicates, and the answer present among them.
    pub fn is_well_formed(&self) -> bool {
        if self.question.trim().is_empty() || self.options.len() != 4 {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        if !self.options.iter().all(|o| seen.insert(o.as_str())) {
            return false;
        }
        self.options.iter().any(|o| o == &self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(options: &[&str], answer: &str) -> QuizItem {
        QuizItem {
            question: "Quelle est la capitale de la France ?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
            explanation: String::new(),
        }
    }

    #[test]
    fn test_difficulty_parses_french_and_english_labels() {
        assert_eq!("standard".parse::<Difficulty>().unwrap(), Difficulty::Standard);
        assert_eq!("Avancée".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert_eq!("ADVANCED".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert_eq!("Intermédiaire".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert_eq!("expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_windows_widen() {
        let (std_min, std_max) = Difficulty::Standard.sentence_window();
        let (exp_min, exp_max) = Difficulty::Expert.sentence_window();
        assert!(exp_min > std_min);
        assert!(exp_max > std_max);
        assert!(Difficulty::Expert.requires_proper_noun());
        assert!(!Difficulty::Standard.requires_proper_noun());
    }

    #[test]
    fn test_request_clamps_question_count() {
        assert_eq!(QuizRequest::new("texte", 0, Difficulty::Standard).num_questions, 1);
        assert_eq!(QuizRequest::new("texte", 7, Difficulty::Standard).num_questions, 7);
        assert_eq!(QuizRequest::new("texte", 500, Difficulty::Standard).num_questions, 20);
    }

    #[test]
    fn test_well_formed_item() {
        assert!(item(&["Paris", "Lyon", "Nice", "Lille"], "Paris").is_well_formed());
    }

    #[test]
    fn test_item_with_wrong_option_count_rejected() {
        assert!(!item(&["Paris", "Lyon", "Nice"], "Paris").is_well_formed());
    }

    #[test]
    fn test_item_with_duplicate_options_rejected() {
        assert!(!item(&["Paris", "Paris", "Nice", "Lille"], "Paris").is_well_formed());
    }

    #[test]
    fn test_item_with_foreign_answer_rejected() {
        assert!(!item(&["Paris", "Lyon", "Nice", "Lille"], "Marseille").is_well_formed());
    }

    #[test]
    fn test_degraded_marker_detection() {
        let mut degraded = item(&["A", "B", "C", "D"], "A");
        degraded.question = format!("{DEGRADED_MARKER} Mode Dégradé");
        assert!(degraded.is_degraded());
        assert!(!item(&["A", "B", "C", "D"], "A").is_degraded());
    }

    #[test]
    fn test_item_serializes_expected_json_fields() {
        let json = serde_json::to_value(item(&["A", "B", "C", "D"], "B")).unwrap();
        assert!(json.get("question").is_some());
        assert!(json.get("options").is_some());
        assert!(json.get("answer").is_some());
        assert!(json.get("explanation").is_some());
    }
}

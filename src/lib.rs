// EduQuiz - document-to-quiz generation pipeline
// Library exports

pub mod config;
pub mod generate;
pub mod nlp;
pub mod providers;
pub mod quiz;

// Re-export the types surrounding code depends on
pub use generate::{generate_quiz, QuizGenerator};
pub use quiz::{Difficulty, QuizItem, QuizRequest};

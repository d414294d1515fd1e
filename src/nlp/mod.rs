// Lightweight linguistic helpers
//
// Sentence segmentation and tokenization are deliberately simple surface
// heuristics; the POS lexicon is the only external linguistic resource and
// lives in `lexicon`.

use once_cell::sync::Lazy;
use regex::Regex;

mod lexicon;

pub use lexicon::{Lexicon, LinguisticSupport, WordClass};

// Apostrophes split tokens so French elisions (l', d', qu') detach from the
// word they precede; hyphens stay inside compounds (Jean-Pierre).
static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-zÀ-ÖØ-öø-ÿ]+(?:-[A-Za-zÀ-ÖØ-öø-ÿ]+)*").expect("valid word pattern")
});

/// Split text into sentences on terminal punctuation.
///
/// Keeps the punctuation attached to the sentence. Abbreviation periods are
/// not special-cased; downstream filters discard the resulting fragments by
/// word count.
pub fn segment_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            flush(&mut current, &mut sentences);
        }
    }
    flush(&mut current, &mut sentences);
    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().any(char::is_alphabetic) {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

/// Word tokens of a sentence, hyphens kept inside compound words.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_on_terminal_punctuation() {
        let sentences = segment_sentences("Premier point. Deuxième point ! Troisième ?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "Premier point.");
        assert_eq!(sentences[2], "Troisième ?");
    }

    #[test]
    fn test_trailing_text_without_punctuation_is_kept() {
        let sentences = segment_sentences("Une phrase. Une autre sans point final");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "Une autre sans point final");
    }

    #[test]
    fn test_punctuation_runs_produce_no_empty_sentences() {
        let sentences = segment_sentences("Vraiment... incroyable !!! ...");
        assert!(sentences.iter().all(|s| s.chars().any(char::is_alphabetic)));
    }

    #[test]
    fn test_empty_input_yields_no_sentences() {
        assert!(segment_sentences("").is_empty());
        assert!(segment_sentences("  .?! ").is_empty());
    }

    #[test]
    fn test_tokenize_detaches_elisions_and_keeps_accents() {
        let tokens = tokenize("L'algorithme d'Euclide est très ancien.");
        assert!(tokens.contains(&"algorithme"));
        assert!(tokens.contains(&"Euclide"));
        assert!(tokens.contains(&"très"));
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_compounds() {
        let tokens = tokenize("Jean-Pierre habite à Aix-en-Provence.");
        assert!(tokens.contains(&"Jean-Pierre"));
        assert!(tokens.contains(&"Aix-en-Provence"));
    }
}

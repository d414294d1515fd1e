// Representative text sampling
//
// Long documents carry their definitions up front and their summaries at the
// end; naive truncation would only ever show a provider the introduction.
// The sampler keeps head, midpoint and tail shares instead.

/// Separator inserted between the sampled shares.
const SEPARATOR: &str = "\n\n[...]\n\n";

/// Reduce `text` to at most roughly `max_chars` characters.
///
/// Short texts are returned unchanged. Longer texts become
/// `head + [...] + middle + [...] + tail` where each share is about a third
/// of the budget and the middle share is centered on the text's midpoint.
/// Pure and deterministic: identical input and budget always produce
/// identical output.
pub fn sample_text(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let share = max_chars / 3;
    let midpoint = chars.len() / 2;

    let head: String = chars[..share].iter().collect();
    let middle: String = chars[midpoint - share / 2..midpoint + share / 2].iter().collect();
    let tail: String = chars[chars.len() - share..].iter().collect();

    format!("{head}{SEPARATOR}{middle}{SEPARATOR}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        let text = "Un texte court.";
        assert_eq!(sample_text(text, 4000), text);
    }

    #[test]
    fn test_exact_budget_unchanged() {
        let text = "x".repeat(100);
        assert_eq!(sample_text(&text, 100), text);
    }

    #[test]
    fn test_long_text_keeps_head_middle_and_tail() {
        let text = format!("DEBUT{}MILIEU{}FIN", "a".repeat(5000), "b".repeat(5000));
        let sampled = sample_text(&text, 600);
        assert!(sampled.starts_with("DEBUT"));
        assert!(sampled.contains("MILIEU"));
        assert!(sampled.ends_with("FIN"));
        assert!(sampled.matches("[...]").count() == 2);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let text = "phrase assez longue pour être échantillonnée. ".repeat(500);
        assert_eq!(sample_text(&text, 900), sample_text(&text, 900));
    }

    #[test]
    fn test_output_respects_budget_roughly() {
        let text = "x".repeat(100_000);
        let sampled = sample_text(&text, 3000);
        // three shares plus two separators
        assert!(sampled.chars().count() <= 3000 + 2 * SEPARATOR.len());
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "éàüç💡".repeat(2000);
        let sampled = sample_text(&text, 300);
        assert!(!sampled.is_empty());
    }
}

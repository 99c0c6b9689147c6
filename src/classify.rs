use serde::Serialize;

/// Display category for a signature word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// The word is the disambiguated word itself.
    Selected,
    /// The word occurs somewhere in the cleaned sentence.
    Contextual,
    Neutral,
}

/// Classifies one signature word. First match wins:
/// exact equality with `selected`, then substring containment in
/// `cleaned_sentence`, then neutral.
///
/// Containment is by substring, not by token: `"loud"` is contextual in
/// `"the dog can bark loudly"`.
pub fn classify(word: &str, selected: Option<&str>, cleaned_sentence: &str) -> Highlight {
    if selected == Some(word) {
        Highlight::Selected
    } else if cleaned_sentence.contains(word) {
        Highlight::Contextual
    } else {
        Highlight::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedWord {
    pub word: String,
    pub highlight: Highlight,
}

pub fn highlight_signature(
    signature: &[String],
    selected: Option<&str>,
    cleaned_sentence: &str,
) -> Vec<HighlightedWord> {
    signature
        .iter()
        .map(|word| HighlightedWord {
            word: word.clone(),
            highlight: classify(word, selected, cleaned_sentence),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEANED: &str = "the dog can bark loudly";

    #[test]
    fn classifies_in_rule_order() {
        assert_eq!(classify("bark", Some("bark"), CLEANED), Highlight::Selected);
        assert_eq!(classify("loud", Some("bark"), CLEANED), Highlight::Contextual);
        assert_eq!(classify("cat", Some("bark"), CLEANED), Highlight::Neutral);
    }

    #[test]
    fn selection_beats_context() {
        assert_eq!(classify("dog", Some("dog"), CLEANED), Highlight::Selected);
    }

    #[test]
    fn no_selection_falls_through_to_context() {
        assert_eq!(classify("dog", None, CLEANED), Highlight::Contextual);
        assert_eq!(classify("cat", None, CLEANED), Highlight::Neutral);
    }

    #[test]
    fn equality_is_case_sensitive() {
        assert_eq!(classify("Bark", Some("bark"), CLEANED), Highlight::Neutral);
    }

    #[test]
    fn substring_of_unrelated_word_counts_as_context() {
        assert_eq!(classify("an", Some("bark"), CLEANED), Highlight::Contextual);
    }

    #[test]
    fn highlights_keep_signature_order() {
        let signature = vec!["mammal".to_string(), "bat".to_string(), "fly".to_string()];
        let words = highlight_signature(&signature, Some("bat"), "i saw a bat fly");
        let got: Vec<_> = words.iter().map(|w| (w.word.as_str(), w.highlight)).collect();
        assert_eq!(
            got,
            vec![
                ("mammal", Highlight::Neutral),
                ("bat", Highlight::Selected),
                ("fly", Highlight::Contextual),
            ]
        );
    }
}

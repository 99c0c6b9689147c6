//! Read-only projection of [`ControllerState`] for display.
//!
//! Views render this and raise sentence, selection, and strategy events back
//! into the controller; they never mutate it.

use crate::classify::{HighlightedWord, highlight_signature};
use crate::state::{ControllerState, RequestPhase, Strategy};
use crate::tree::RelationNode;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    Original,
    Related,
}

impl SignatureKind {
    pub fn label(&self) -> &'static str {
        match self {
            SignatureKind::Original => "Original Signature",
            SignatureKind::Related => "Related Signature from Hypernym and Hyponyms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureGroup {
    pub kind: SignatureKind,
    pub label: &'static str,
    pub words: Vec<HighlightedWord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensePanel {
    pub sense: String,
    pub definition: String,
    pub signatures: Vec<SignatureGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    pub index: usize,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub sentence: String,
    pub tokens: Vec<TokenView>,
    pub selected_word: Option<String>,
    pub strategy: Strategy,
    pub phase: RequestPhase,
    pub can_find_sense: bool,
    pub sense: Option<SensePanel>,
    pub relation_tree: Option<RelationNode>,
    pub word_info: Option<Value>,
}

impl ViewModel {
    pub fn from_state(state: &ControllerState) -> Self {
        let selected = state.selected_word();
        let tokens = state
            .tokens()
            .into_iter()
            .enumerate()
            .map(|(index, text)| TokenView {
                index,
                text: text.to_string(),
                selected: selected == Some(text),
            })
            .collect();

        let sense = state
            .sense()
            .filter(|group| !group.result.sense.is_empty() && !group.result.definition.is_empty())
            .map(|group| {
                let cleaned = group.result.cleaned_sentence.as_str();
                let signatures = [
                    (SignatureKind::Original, &group.signatures.original),
                    (SignatureKind::Related, &group.signatures.related),
                ]
                .into_iter()
                .filter(|(_, words)| !words.is_empty())
                .map(|(kind, words)| SignatureGroup {
                    kind,
                    label: kind.label(),
                    words: highlight_signature(words, selected, cleaned),
                })
                .collect();
                SensePanel {
                    sense: group.result.sense.clone(),
                    definition: group.result.definition.clone(),
                    signatures,
                }
            });

        Self {
            sentence: state.sentence().to_string(),
            tokens,
            selected_word: selected.map(str::to_string),
            strategy: state.strategy(),
            phase: state.phase(),
            can_find_sense: selected.is_some(),
            sense,
            relation_tree: state.relation_tree().cloned(),
            word_info: state.word_info().map(|group| group.info.raw.clone()),
        }
    }
}

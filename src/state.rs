use crate::api::{SenseRequest, SenseResponse, WordInfo};
use crate::error::{BackendError, ParseStrategyError, SelectionError};
use crate::tokenize::tokenize;
use crate::tree::{RelationNode, build_tree};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    BasicLesk,
    ExtendedLesk,
}

impl Strategy {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Strategy::BasicLesk => "basic_lesk",
            Strategy::ExtendedLesk => "extended_lesk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::BasicLesk => "Basic Lesk",
            Strategy::ExtendedLesk => "Extended Lesk",
        }
    }

    /// Only extended results carry signatures; basic results never do,
    /// whatever the response contains.
    pub fn keeps_signatures(&self) -> bool {
        matches!(self, Strategy::ExtendedLesk)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "basic_lesk" | "basic-lesk" => Ok(Strategy::BasicLesk),
            "extended" | "extended_lesk" | "extended-lesk" => Ok(Strategy::ExtendedLesk),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenseResult {
    pub sense: String,
    pub definition: String,
    pub cleaned_sentence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Signatures {
    pub original: Vec<String>,
    pub related: Vec<String>,
}

impl Signatures {
    pub fn is_empty(&self) -> bool {
        self.original.is_empty() && self.related.is_empty()
    }
}

/// Everything one sense lookup produces. Set and cleared as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenseGroup {
    pub result: SenseResult,
    pub signatures: Signatures,
}

impl SenseGroup {
    pub fn from_response(strategy: Strategy, response: SenseResponse) -> Self {
        let signatures = if strategy.keeps_signatures() {
            Signatures {
                original: response.original_signature.unwrap_or_default(),
                related: response.related_signature.unwrap_or_default(),
            }
        } else {
            Signatures::default()
        };
        Self {
            result: SenseResult {
                sense: response.sense,
                definition: response.definition,
                cleaned_sentence: response.cleaned_sentence,
            },
            signatures,
        }
    }
}

/// Word metadata together with the tree derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordInfoGroup {
    pub info: WordInfo,
    pub tree: RelationNode,
}

impl WordInfoGroup {
    pub fn new(info: WordInfo) -> Self {
        let tree = build_tree(&info.senses);
        Self { info, tree }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    #[default]
    Idle,
    AwaitingSenseResponse,
    AwaitingWordInfoResponse,
}

/// How settled outcomes from older requests are treated.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SettlePolicy {
    /// Every outcome is applied when it settles, even if newer requests or
    /// edits happened in between.
    #[default]
    LastSettledWins,
    /// Outcomes whose ticket is no longer current are dropped.
    DiscardSuperseded,
}

/// A disambiguation request. Only obtainable from a state with a selected word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    strategy: Strategy,
    sentence: String,
    word: String,
}

impl SearchRequest {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn to_wire(&self) -> SenseRequest {
        SenseRequest {
            context_sentence: self.sentence.clone(),
            ambiguous_word: self.word.clone(),
        }
    }
}

/// An issued request, stamped with the generation it was issued at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub request: SearchRequest,
}

/// The controller's whole state. Every transition returns a new value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    sentence: String,
    selected: Option<String>,
    strategy: Strategy,
    phase: RequestPhase,
    generation: u64,
    sense: Option<SenseGroup>,
    word_info: Option<WordInfoGroup>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn tokens(&self) -> Vec<&str> {
        tokenize(&self.sentence)
    }

    pub fn selected_word(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sense(&self) -> Option<&SenseGroup> {
        self.sense.as_ref()
    }

    pub fn word_info(&self) -> Option<&WordInfoGroup> {
        self.word_info.as_ref()
    }

    pub fn relation_tree(&self) -> Option<&RelationNode> {
        self.word_info.as_ref().map(|group| &group.tree)
    }

    pub fn has_results(&self) -> bool {
        self.sense.is_some() || self.word_info.is_some()
    }

    /// Replaces the sentence. Selection and all results are cleared.
    pub fn with_sentence(&self, sentence: &str) -> Self {
        Self {
            sentence: sentence.to_string(),
            ..self.invalidated(None)
        }
    }

    /// Selects a token. Re-selecting the current word returns an identical
    /// state; any other selection clears displayed results.
    pub fn select(&self, token: &str) -> Result<Self, SelectionError> {
        if token.is_empty() {
            return Err(SelectionError::EmptyToken);
        }
        if !self.tokens().contains(&token) {
            return Err(SelectionError::UnknownToken(token.to_string()));
        }
        if self.selected.as_deref() == Some(token) {
            return Ok(self.clone());
        }
        Ok(self.invalidated(Some(token.to_string())))
    }

    pub fn select_at(&self, index: usize) -> Result<Self, SelectionError> {
        let tokens = self.tokens();
        let token = tokens.get(index).ok_or(SelectionError::OutOfRange {
            index,
            len: tokens.len(),
        })?;
        self.select(token)
    }

    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// Starts over on the same sentence: no selection, no results.
    pub fn restart_search(&self) -> Self {
        self.invalidated(None)
    }

    fn invalidated(&self, selected: Option<String>) -> Self {
        Self {
            sentence: self.sentence.clone(),
            selected,
            strategy: self.strategy,
            phase: RequestPhase::Idle,
            generation: self.generation + 1,
            sense: None,
            word_info: None,
        }
    }

    pub fn search_request(&self) -> Option<SearchRequest> {
        let word = self.selected.clone()?;
        Some(SearchRequest {
            strategy: self.strategy,
            sentence: self.sentence.clone(),
            word,
        })
    }

    pub fn issue(&self, request: SearchRequest) -> (Self, Ticket) {
        let generation = self.generation + 1;
        let next = Self {
            phase: RequestPhase::AwaitingSenseResponse,
            generation,
            ..self.clone()
        };
        (next, Ticket { generation, request })
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    pub fn accepts(&self, ticket: &Ticket, policy: SettlePolicy) -> bool {
        match policy {
            SettlePolicy::LastSettledWins => true,
            SettlePolicy::DiscardSuperseded => self.is_current(ticket),
        }
    }

    /// Applies a sense lookup outcome. Failure leaves the sense group unset.
    pub fn settle_sense(
        &self,
        ticket: &Ticket,
        outcome: Result<SenseResponse, BackendError>,
        policy: SettlePolicy,
    ) -> Self {
        if !self.accepts(ticket, policy) {
            return self.clone();
        }
        let phase = if self.is_current(ticket) {
            RequestPhase::AwaitingWordInfoResponse
        } else {
            self.phase
        };
        Self {
            phase,
            sense: outcome
                .ok()
                .map(|response| SenseGroup::from_response(ticket.request.strategy, response)),
            ..self.clone()
        }
    }

    /// Applies a word-info outcome. The sense group is never touched.
    pub fn settle_word_info(
        &self,
        ticket: &Ticket,
        outcome: Result<WordInfo, BackendError>,
        policy: SettlePolicy,
    ) -> Self {
        if !self.accepts(ticket, policy) {
            return self.clone();
        }
        let phase = if self.is_current(ticket) {
            RequestPhase::Idle
        } else {
            self.phase
        };
        Self {
            phase,
            word_info: outcome.ok().map(WordInfoGroup::new),
            ..self.clone()
        }
    }
}

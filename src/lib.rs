//! Client-side workflow for Lesk word-sense disambiguation.
//!
//! A sentence is tokenized, one token is selected as the ambiguous word, and
//! [`Controller`] runs the sense lookup and word-info lookup against a
//! [`WsdBackend`]. Results are exposed through an immutable
//! [`ControllerState`] and projected for display by [`ViewModel`].

pub mod api;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod tokenize;
pub mod tree;
pub mod view;

pub use api::{
    HttpBackend, RelatedSense, SenseRecord, SenseRequest, SenseResponse, WordInfo, WsdBackend,
};
pub use classify::{Highlight, HighlightedWord, classify, highlight_signature};
pub use config::ClientConfig;
pub use controller::{Controller, CycleReport};
pub use error::{BackendError, ConfigError, ParseStrategyError, SelectionError};
pub use state::{
    ControllerState, RequestPhase, SearchRequest, SenseGroup, SenseResult, SettlePolicy,
    Signatures, Strategy, Ticket, WordInfoGroup,
};
pub use tokenize::tokenize;
pub use tree::{RelationNode, build_tree};
pub use view::{SensePanel, SignatureGroup, SignatureKind, TokenView, ViewModel};

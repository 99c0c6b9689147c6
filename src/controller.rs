use crate::api::WsdBackend;
use crate::error::{BackendError, SelectionError};
use crate::state::{ControllerState, SearchRequest, SettlePolicy, Strategy, Ticket};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// What happened to each result group during one request cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub ticket: Ticket,
    pub sense_error: Option<BackendError>,
    pub word_info_error: Option<BackendError>,
}

impl CycleReport {
    pub fn is_complete(&self) -> bool {
        self.sense_error.is_none() && self.word_info_error.is_none()
    }
}

/// Drives the disambiguation workflow against a backend.
///
/// State is only ever swapped whole under a short lock, which is never held
/// across a backend call, so overlapping cycles interleave at the two await
/// points and nowhere else.
pub struct Controller<B> {
    backend: B,
    state: Mutex<ControllerState>,
    policy: SettlePolicy,
}

impl<B: WsdBackend + Sync> Controller<B> {
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, SettlePolicy::default())
    }

    pub fn with_policy(backend: B, policy: SettlePolicy) -> Self {
        Self {
            backend,
            state: Mutex::new(ControllerState::new()),
            policy,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    pub fn snapshot(&self) -> ControllerState {
        self.state.lock().clone()
    }

    pub fn set_sentence(&self, sentence: &str) {
        let mut guard = self.state.lock();
        let next = guard.with_sentence(sentence);
        *guard = next;
    }

    pub fn select(&self, token: &str) -> Result<(), SelectionError> {
        let mut guard = self.state.lock();
        let next = guard.select(token)?;
        *guard = next;
        Ok(())
    }

    pub fn select_at(&self, index: usize) -> Result<(), SelectionError> {
        let mut guard = self.state.lock();
        let next = guard.select_at(index)?;
        *guard = next;
        Ok(())
    }

    pub fn set_strategy(&self, strategy: Strategy) {
        let mut guard = self.state.lock();
        let next = guard.with_strategy(strategy);
        *guard = next;
    }

    pub fn restart_search(&self) {
        let mut guard = self.state.lock();
        let next = guard.restart_search();
        *guard = next;
    }

    /// Runs a cycle for the current selection, or returns `None` when no word
    /// is selected.
    pub async fn find_sense(&self) -> Option<CycleReport> {
        let request = self.state.lock().search_request()?;
        Some(self.request_disambiguation(request).await)
    }

    /// Runs one cycle: sense lookup, then word-info lookup. Each outcome is
    /// applied as soon as it settles; a failure in one never rolls back the
    /// other.
    pub async fn request_disambiguation(&self, request: SearchRequest) -> CycleReport {
        let ticket = {
            let mut guard = self.state.lock();
            let (next, ticket) = guard.issue(request);
            *guard = next;
            ticket
        };
        debug!(
            generation = ticket.generation,
            strategy = %ticket.request.strategy(),
            word = ticket.request.word(),
            "issuing disambiguation request"
        );

        let outcome = self
            .backend
            .disambiguate(ticket.request.strategy(), &ticket.request.to_wire())
            .await;
        let sense_error = outcome.as_ref().err().cloned();
        if let Some(err) = &sense_error {
            warn!(generation = ticket.generation, error = %err, "sense lookup failed");
        }
        self.settle(&ticket, |state| state.settle_sense(&ticket, outcome, self.policy));

        let outcome = self.backend.word_info(ticket.request.word()).await;
        let word_info_error = outcome.as_ref().err().cloned();
        if let Some(err) = &word_info_error {
            warn!(generation = ticket.generation, error = %err, "word info lookup failed");
        }
        self.settle(&ticket, |state| {
            state.settle_word_info(&ticket, outcome, self.policy)
        });

        CycleReport {
            ticket,
            sense_error,
            word_info_error,
        }
    }

    fn settle<F>(&self, ticket: &Ticket, apply: F)
    where
        F: FnOnce(&ControllerState) -> ControllerState,
    {
        let mut guard = self.state.lock();
        if !guard.is_current(ticket) {
            if guard.accepts(ticket, self.policy) {
                debug!(
                    generation = ticket.generation,
                    current = guard.generation(),
                    "applying outcome from a superseded request"
                );
            } else {
                debug!(
                    generation = ticket.generation,
                    current = guard.generation(),
                    "discarding outcome from a superseded request"
                );
            }
        }
        let next = apply(&guard);
        *guard = next;
    }
}

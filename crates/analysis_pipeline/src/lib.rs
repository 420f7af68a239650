//! Live validation pipeline for the playground editor.
//!
//! Owns the current source text plus the status/rows/outcome triple and drives the two-stage
//! remote analysis: edits are debounced, the lex call runs first and its result is applied as
//! soon as it lands, and the validate call is only issued after lex succeeds with a non-empty
//! row list. In-flight calls are never cancelled;
//! by default the most recently completed call overwrites state regardless of which edit it
//! belongs to, with an opt-in generation guard that drops stale cycle results.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{cell::Cell, rc::Rc};

use leptos::{create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet};
use platform_analysis::{AnalysisClient, LexSuccess, TimerService};
use playground_contract::{PipelineStatus, TokenRow, ValidationOutcome};

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Quiet interval an edit must survive before a cycle fires, in milliseconds.
    pub debounce_ms: u64,
    /// When enabled, a cycle result is dropped if a newer edit was scheduled while it was in
    /// flight. Off by default: the faithful behavior is last-completed-wins.
    pub guard_stale_responses: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            guard_stale_responses: false,
        }
    }
}

/// Debounced orchestrator over the remote lex/validate calls.
#[derive(Clone)]
pub struct AnalysisPipeline {
    client: AnalysisClient,
    timer: Rc<dyn TimerService>,
    options: PipelineOptions,
    generation: Rc<Cell<u64>>,
    source: RwSignal<String>,
    status: RwSignal<PipelineStatus>,
    rows: RwSignal<Vec<TokenRow>>,
    outcome: RwSignal<Option<ValidationOutcome>>,
    lex_warning: RwSignal<Option<String>>,
    last_error: RwSignal<Option<String>>,
}

impl AnalysisPipeline {
    /// Creates an idle pipeline over the given client and timer.
    pub fn new(client: AnalysisClient, timer: Rc<dyn TimerService>, options: PipelineOptions) -> Self {
        Self {
            client,
            timer,
            options,
            generation: Rc::new(Cell::new(0)),
            source: create_rw_signal(String::new()),
            status: create_rw_signal(PipelineStatus::Idle),
            rows: create_rw_signal(Vec::new()),
            outcome: create_rw_signal(None),
            lex_warning: create_rw_signal(None),
            last_error: create_rw_signal(None),
        }
    }

    /// Reactive current source text.
    pub fn source(&self) -> ReadSignal<String> {
        self.source.read_only()
    }

    /// Reactive pipeline status.
    pub fn status(&self) -> ReadSignal<PipelineStatus> {
        self.status.read_only()
    }

    /// Reactive token rows from the most recent successful lex call.
    pub fn rows(&self) -> ReadSignal<Vec<TokenRow>> {
        self.rows.read_only()
    }

    /// Reactive validation outcome from the most recent validate call.
    pub fn outcome(&self) -> ReadSignal<Option<ValidationOutcome>> {
        self.outcome.read_only()
    }

    /// Reactive non-fatal warning carried by the most recent lex response.
    pub fn lex_warning(&self) -> ReadSignal<Option<String>> {
        self.lex_warning.read_only()
    }

    /// Reactive message recorded by the most recent failed lex call.
    pub fn last_error(&self) -> ReadSignal<Option<String>> {
        self.last_error.read_only()
    }

    /// Records an edit and schedules a debounced analysis cycle.
    ///
    /// A newer edit inside the debounce window supersedes the pending trigger, so only the
    /// most recent edit ever fires.
    pub fn set_source(&self, text: impl Into<String>) {
        self.source.set(text.into());
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let pipeline = self.clone();
        leptos::spawn_local(async move {
            pipeline.timer.sleep_ms(pipeline.options.debounce_ms).await;
            pipeline.fire(generation).await;
        });
    }

    /// Runs one debounce firing: a superseded generation is dropped without any remote call.
    async fn fire(&self, generation: u64) {
        if self.generation.get() != generation {
            return;
        }
        self.run_cycle(generation).await;
    }

    /// Runs one full analysis cycle for the current source text.
    ///
    /// The lex result is applied to the signals before the validate call starts, so the token
    /// table and `Ready` status never wait out the second round-trip.
    async fn run_cycle(&self, generation: u64) {
        let text = self.source.get_untracked();
        if text.trim().is_empty() {
            self.clear_to_idle();
            return;
        }

        self.status.set(PipelineStatus::Lexing);
        self.last_error.set(None);

        let lex = self.client.lex(&text).await;
        if self.options.guard_stale_responses && self.generation.get() != generation {
            return;
        }
        let success = match lex {
            Err(message) => {
                self.apply_lex_failure(message);
                return;
            }
            Ok(success) => success,
        };

        let has_rows = !success.rows.is_empty();
        self.apply_lex_success(success);
        if !has_rows {
            self.outcome.set(None);
            return;
        }

        let outcome = self.client.validate(&text).await;
        if self.options.guard_stale_responses && self.generation.get() != generation {
            return;
        }
        self.outcome.set(Some(outcome));
    }

    fn clear_to_idle(&self) {
        self.status.set(PipelineStatus::Idle);
        self.rows.set(Vec::new());
        self.outcome.set(None);
        self.lex_warning.set(None);
        self.last_error.set(None);
    }

    fn apply_lex_failure(&self, message: String) {
        leptos::logging::warn!("lex call failed: {message}");
        self.status.set(PipelineStatus::Errored);
        self.last_error.set(Some(message));
        self.rows.set(Vec::new());
        self.outcome.set(None);
        self.lex_warning.set(None);
    }

    fn apply_lex_success(&self, success: LexSuccess) {
        self.status.set(PipelineStatus::Ready);
        self.last_error.set(None);
        self.lex_warning.set(success.warning);
        self.rows.set(success.rows);
    }

    /// Manually lexes the current source and returns the token count.
    ///
    /// Applies status/rows/warning like a debounced cycle but never issues the validate call.
    pub async fn lex_now(&self) -> Result<usize, String> {
        let text = self.source.get_untracked();
        if text.trim().is_empty() {
            self.clear_to_idle();
            return Ok(0);
        }
        self.status.set(PipelineStatus::Lexing);
        self.last_error.set(None);
        match self.client.lex(&text).await {
            Err(message) => {
                self.apply_lex_failure(message.clone());
                Err(message)
            }
            Ok(success) => {
                let count = success.rows.len();
                self.apply_lex_success(success);
                Ok(count)
            }
        }
    }

    /// Manually validates the current source and records the outcome.
    pub async fn validate_now(&self) -> ValidationOutcome {
        let outcome = self.client.validate(&self.source.get_untracked()).await;
        self.outcome.set(Some(outcome.clone()));
        outcome
    }
}

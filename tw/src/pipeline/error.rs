//! Pipeline error taxonomy and run results
//!
//! Three families with different propagation policies: validation errors
//! abort the run before any external call; adapter errors are fatal at the
//! failing stage; persistence errors degrade gracefully (load) or are
//! reported without invalidating the plan (save).

use chrono::NaiveDate;
use thiserror::Error;

use super::Stage;
use crate::domain::TravelState;
use crate::llm::LlmError;
use crate::search::SearchError;

/// Malformed or logically inconsistent caller input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("end date {end} is before start date {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

/// Anything that can stop a run at a stage boundary
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("completion service: {0}")]
    Completion(#[from] LlmError),

    #[error("search provider: {0}")]
    Search(#[from] SearchError),

    #[error("prompt rendering: {0}")]
    Prompt(#[from] handlebars::RenderError),

    /// The provider answered successfully but with no usable text. Kept
    /// distinct from provider errors so callers can tell the two apart.
    #[error("completion service returned no content")]
    EmptyCompletion,
}

/// A run that stopped at a stage boundary
///
/// Carries the state as populated up to the failure point so callers can
/// inspect partial progress; a failed run is never presented as complete.
#[derive(Debug, Error)]
#[error("plan failed at {stage}: {error}")]
pub struct RunFailure {
    /// The stage that failed
    pub stage: Stage,
    /// What went wrong
    pub error: PipelineError,
    /// Fields populated before the failure point, for observability
    pub state: Box<TravelState>,
}

/// A run that completed
#[derive(Debug)]
pub struct RunOutcome {
    /// The full state with all derived fields populated; `final_plan` is
    /// the primary consumable artifact
    pub state: TravelState,
    /// Set when the terminal preference save failed; the plan itself is
    /// still valid
    pub save_warning: Option<String>,
}

//! TripWeaver - personalized multi-day trip planning pipeline
//!
//! TripWeaver plans a trip by running a fixed sequence of stages that each
//! enrich a shared travel-request record using an LLM completion service and
//! a web-search provider, then persists per-user preferences across sessions.
//!
//! # Core Concepts
//!
//! - **Snapshot In, Delta Out**: Stages never mutate shared state. Each stage
//!   takes an immutable snapshot and returns a [`domain::StageDelta`] that an
//!   explicit reducer folds into the next snapshot.
//! - **Single-Pass Topology**: The stage order is fixed and linear with one
//!   branch, gated on user identity resolved once at run start. No cycles,
//!   no retry edges.
//! - **Retry Lives in Adapters**: The pipeline never retries. Transient
//!   provider errors are handled inside the completion adapter per its
//!   configuration.
//! - **Preferences Outlive Runs**: The preference store is the only state
//!   that crosses runs; everything else belongs to exactly one run.
//!
//! # Modules
//!
//! - [`llm`] - Completion adapter trait and Anthropic implementation
//! - [`search`] - Search adapter trait and Tavily implementation
//! - [`domain`] - Travel state, trip request, and stage delta types
//! - [`pipeline`] - The stage pipeline orchestrator
//! - [`prompts`] - Embedded prompt templates and rendering
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod search;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SearchConfig, StorageConfig};
pub use domain::{RunMode, StageDelta, TravelState, TripRequest};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, Role};
pub use pipeline::{PipelineError, Planner, RunFailure, RunOutcome, Stage, ValidationError};
pub use search::{SearchClient, SearchError, Snippet, TavilyClient};

//! Trip request input and run mode

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller input for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Optional user identifier; absence disables preference persistence
    pub user_id: Option<String>,
    /// Starting location
    pub source: String,
    /// Destination location
    pub destination: String,
    /// Trip start date
    pub start_date: NaiveDate,
    /// Trip end date
    pub end_date: NaiveDate,
    /// Free-text preferences (budget level, travel style)
    pub preferences: String,
    /// Free-text hobbies and interests
    pub hobbies: String,
}

/// Whether a run persists preferences, resolved once at run start
///
/// Modeled as an explicit tagged choice instead of re-checking the optional
/// `user_id` at each gated stage. An empty or whitespace-only identifier
/// counts as anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Load and save preferences for this user
    WithUser(String),
    /// Skip both preference stages; the store is never invoked
    Anonymous,
}

impl RunMode {
    /// Resolve the mode from an optional user identifier
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        let mode = match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => RunMode::WithUser(id.to_string()),
            _ => RunMode::Anonymous,
        };
        debug!(?mode, "RunMode::from_user_id: resolved");
        mode
    }

    /// The user identifier, if this run has one
    pub fn user_id(&self) -> Option<&str> {
        match self {
            RunMode::WithUser(id) => Some(id),
            RunMode::Anonymous => None,
        }
    }
}

//! Travel state record and stage deltas
//!
//! One [`TravelState`] belongs to exactly one pipeline run. Stages take the
//! state as an immutable snapshot and return a [`StageDelta`]; the reducer
//! [`TravelState::apply`] folds each delta into the next snapshot. Derived
//! fields are append-only within a run: a stage sets its field once and
//! nothing clears it afterwards.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::TripRequest;
use crate::llm::Message;

/// The state record threaded through the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct TravelState {
    /// Optional user identifier
    pub user_id: Option<String>,
    /// Starting location
    pub source: String,
    /// Destination location
    pub destination: String,
    /// Trip start date
    pub start_date: NaiveDate,
    /// Trip end date
    pub end_date: NaiveDate,
    /// Free-text preferences
    pub preferences: String,
    /// Free-text hobbies and interests
    pub hobbies: String,
    /// Previously saved preferences, empty if none on record
    pub saved_preferences: String,
    /// Research about the destination
    pub destination_info: String,
    /// Suggested daily itinerary
    pub itinerary: String,
    /// Accommodation recommendations
    pub accommodations: String,
    /// Activity recommendations based on hobbies
    pub activities: String,
    /// Complete compiled travel plan
    pub final_plan: String,
    /// Ordered role-tagged messages giving later stages context of earlier
    /// stage outputs
    pub conversation_log: Vec<Message>,
}

impl TravelState {
    /// Initialize state from caller input; all derived fields start empty
    pub fn from_request(request: TripRequest) -> Self {
        Self {
            user_id: request.user_id,
            source: request.source,
            destination: request.destination,
            start_date: request.start_date,
            end_date: request.end_date,
            preferences: request.preferences,
            hobbies: request.hobbies,
            saved_preferences: String::new(),
            destination_info: String::new(),
            itinerary: String::new(),
            accommodations: String::new(),
            activities: String::new(),
            final_plan: String::new(),
            conversation_log: Vec::new(),
        }
    }

    /// Trip duration in days, inclusive of both endpoints
    pub fn trip_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Fold a stage delta into the state
    pub fn apply(&mut self, delta: StageDelta) {
        debug!(message_count = delta.messages.len(), "TravelState::apply: called");
        if let Some(saved_preferences) = delta.saved_preferences {
            self.saved_preferences = saved_preferences;
        }
        if let Some(destination_info) = delta.destination_info {
            self.destination_info = destination_info;
        }
        if let Some(itinerary) = delta.itinerary {
            self.itinerary = itinerary;
        }
        if let Some(accommodations) = delta.accommodations {
            self.accommodations = accommodations;
        }
        if let Some(activities) = delta.activities {
            self.activities = activities;
        }
        if let Some(final_plan) = delta.final_plan {
            self.final_plan = final_plan;
        }
        self.conversation_log.extend(delta.messages);
    }
}

/// Output of one stage: the fields it produced plus conversation entries
///
/// Each stage fills at most one derived field; the reducer owns all writes
/// to the state so there is no hidden cross-stage coupling.
#[derive(Debug, Clone, Default)]
pub struct StageDelta {
    pub saved_preferences: Option<String>,
    pub destination_info: Option<String>,
    pub itinerary: Option<String>,
    pub accommodations: Option<String>,
    pub activities: Option<String>,
    pub final_plan: Option<String>,
    /// Messages to append to the conversation log
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> TripRequest {
        TripRequest {
            user_id: Some("a@b.com".to_string()),
            source: "SF".to_string(),
            destination: "Tokyo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 22).expect("valid date"),
            preferences: "mid-range".to_string(),
            hobbies: "photography".to_string(),
        }
    }

    #[test]
    fn test_from_request_starts_with_empty_derived_fields() {
        let state = TravelState::from_request(test_request());
        assert_eq!(state.destination, "Tokyo");
        assert!(state.saved_preferences.is_empty());
        assert!(state.destination_info.is_empty());
        assert!(state.final_plan.is_empty());
        assert!(state.conversation_log.is_empty());
    }

    #[test]
    fn test_trip_days_inclusive() {
        let state = TravelState::from_request(test_request());
        // 2024-06-15 through 2024-06-22, both endpoints counted
        assert_eq!(state.trip_days(), 8);
    }

    #[test]
    fn test_apply_sets_only_delta_fields() {
        let mut state = TravelState::from_request(test_request());
        state.apply(StageDelta {
            destination_info: Some("Tokyo is vast".to_string()),
            messages: vec![Message::assistant("Tokyo is vast")],
            ..Default::default()
        });

        assert_eq!(state.destination_info, "Tokyo is vast");
        assert!(state.itinerary.is_empty());
        assert_eq!(state.conversation_log.len(), 1);
    }

    #[test]
    fn test_apply_preserves_earlier_fields() {
        let mut state = TravelState::from_request(test_request());
        state.apply(StageDelta {
            destination_info: Some("research".to_string()),
            ..Default::default()
        });
        state.apply(StageDelta {
            itinerary: Some("day by day".to_string()),
            ..Default::default()
        });

        assert_eq!(state.destination_info, "research");
        assert_eq!(state.itinerary, "day by day");
    }
}

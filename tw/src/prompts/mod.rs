//! Prompt rendering
//!
//! Each completion stage has a specialist system prompt and a Handlebars
//! user prompt template carrying the relevant state fields. Templates are
//! embedded in the binary and registered once at planner construction.

use eyre::{Context as _, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::domain::TravelState;

pub mod embedded;

/// Context for rendering stage prompt templates
///
/// Snapshot of the travel state fields templates can reference. Dates are
/// pre-formatted as YYYY-MM-DD strings.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub source: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub trip_days: i64,
    pub preferences: String,
    pub hobbies: String,
    pub saved_preferences: String,
    pub destination_info: String,
    pub itinerary: String,
    pub accommodations: String,
    pub activities: String,
}

impl PromptContext {
    /// Build a rendering context from the current state snapshot
    pub fn from_state(state: &TravelState) -> Self {
        Self {
            source: state.source.clone(),
            destination: state.destination.clone(),
            start_date: state.start_date.format("%Y-%m-%d").to_string(),
            end_date: state.end_date.format("%Y-%m-%d").to_string(),
            trip_days: state.trip_days(),
            preferences: state.preferences.clone(),
            hobbies: state.hobbies.clone(),
            saved_preferences: state.saved_preferences.clone(),
            destination_info: state.destination_info.clone(),
            itinerary: state.itinerary.clone(),
            accommodations: state.accommodations.clone(),
            activities: state.activities.clone(),
        }
    }
}

/// Registered prompt templates for the completion stages
pub struct Prompts {
    registry: Handlebars<'static>,
}

impl Prompts {
    /// Register all embedded templates
    pub fn new() -> Result<Self> {
        debug!("Prompts::new: registering templates");
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        registry
            .register_template_string("itinerary", embedded::ITINERARY_USER)
            .context("Failed to register itinerary template")?;
        registry
            .register_template_string("accommodations", embedded::ACCOMMODATIONS_USER)
            .context("Failed to register accommodations template")?;
        registry
            .register_template_string("activities", embedded::ACTIVITIES_USER)
            .context("Failed to register activities template")?;
        registry
            .register_template_string("compile", embedded::COMPILE_USER)
            .context("Failed to register compile template")?;

        Ok(Self { registry })
    }

    /// System and user prompt for the itinerary stage
    pub fn itinerary(&self, ctx: &PromptContext) -> Result<(String, String), handlebars::RenderError> {
        let user = self.registry.render("itinerary", ctx)?;
        Ok((embedded::ITINERARY_SYSTEM.to_string(), user))
    }

    /// System and user prompt for the accommodation stage
    pub fn accommodations(&self, ctx: &PromptContext) -> Result<(String, String), handlebars::RenderError> {
        let user = self.registry.render("accommodations", ctx)?;
        Ok((embedded::ACCOMMODATIONS_SYSTEM.to_string(), user))
    }

    /// System and user prompt for the activity stage
    pub fn activities(&self, ctx: &PromptContext) -> Result<(String, String), handlebars::RenderError> {
        let user = self.registry.render("activities", ctx)?;
        Ok((embedded::ACTIVITIES_SYSTEM.to_string(), user))
    }

    /// System and user prompt for the final compilation stage
    pub fn compile(&self, ctx: &PromptContext) -> Result<(String, String), handlebars::RenderError> {
        let user = self.registry.render("compile", ctx)?;
        Ok((embedded::COMPILE_SYSTEM.to_string(), user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripRequest;
    use chrono::NaiveDate;

    fn test_state() -> TravelState {
        let mut state = TravelState::from_request(TripRequest {
            user_id: None,
            source: "SF".to_string(),
            destination: "Tokyo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 22).expect("valid date"),
            preferences: "mid-range".to_string(),
            hobbies: "photography".to_string(),
        });
        state.destination_info = "Tokyo is vast".to_string();
        state.itinerary = "Day 1: Shibuya".to_string();
        state
    }

    #[test]
    fn test_itinerary_prompt_carries_state_fields() {
        let prompts = Prompts::new().expect("template registration failed");
        let ctx = PromptContext::from_state(&test_state());

        let (system, user) = prompts.itinerary(&ctx).expect("render failed");
        assert!(system.contains("itinerary planner"));
        assert!(user.contains("Tokyo"));
        assert!(user.contains("2024-06-15"));
        assert!(user.contains("8 days"));
        assert!(user.contains("photography"));
        assert!(user.contains("Tokyo is vast"));
    }

    #[test]
    fn test_itinerary_prompt_omits_empty_saved_preferences() {
        let prompts = Prompts::new().expect("template registration failed");

        let mut state = test_state();
        let ctx = PromptContext::from_state(&state);
        let (_, user) = prompts.itinerary(&ctx).expect("render failed");
        assert!(!user.contains("Previously saved traveler profile"));

        state.saved_preferences = "Preferences: luxury".to_string();
        let ctx = PromptContext::from_state(&state);
        let (_, user) = prompts.itinerary(&ctx).expect("render failed");
        assert!(user.contains("Previously saved traveler profile"));
        assert!(user.contains("Preferences: luxury"));
    }

    #[test]
    fn test_compile_prompt_concatenates_all_fields() {
        let prompts = Prompts::new().expect("template registration failed");

        let mut state = test_state();
        state.accommodations = "Hotel A".to_string();
        state.activities = "Street photography walk".to_string();
        let ctx = PromptContext::from_state(&state);

        let (system, user) = prompts.compile(&ctx).expect("render failed");
        assert!(system.contains("3000-5000 words"));
        assert!(user.contains("Tokyo is vast"));
        assert!(user.contains("Day 1: Shibuya"));
        assert!(user.contains("Hotel A"));
        assert!(user.contains("Street photography walk"));
        assert!(user.contains("from SF to Tokyo"));
    }
}

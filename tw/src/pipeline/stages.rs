//! Stage functions
//!
//! Each stage consumes an immutable snapshot of the travel state and
//! produces a [`StageDelta`]; the orchestrator folds deltas between stages.
//! Stages that call external services are async; none of them retry.

use tracing::{debug, warn};

use prefstore::PreferenceStore;

use super::error::{PipelineError, ValidationError};
use crate::domain::{StageDelta, TravelState};
use crate::llm::{CompletionRequest, LlmClient, Message, StopReason};
use crate::prompts::{PromptContext, Prompts};
use crate::search::{SearchClient, Snippet};

/// Max response tokens for intermediate completion stages
const STAGE_MAX_TOKENS: u32 = 4096;

/// Max response tokens for the final plan (3000-5000 word target)
const FINAL_PLAN_MAX_TOKENS: u32 = 8192;

/// Load previously saved preferences for a user
///
/// A store miss and a load failure both degrade to empty saved preferences:
/// neither aborts the run.
pub fn load_preferences(store: &dyn PreferenceStore, user_id: &str) -> StageDelta {
    debug!(%user_id, "load_preferences: called");
    match store.load(user_id) {
        Ok(Some(record)) => {
            debug!(%user_id, "load_preferences: record found");
            StageDelta {
                saved_preferences: Some(format!(
                    "Preferences: {}\nHobbies: {}",
                    record.preferences, record.hobbies
                )),
                ..Default::default()
            }
        }
        Ok(None) => {
            debug!(%user_id, "load_preferences: no record");
            StageDelta::default()
        }
        Err(e) => {
            warn!(%user_id, error = %e, "load_preferences: load failed, proceeding without saved preferences");
            StageDelta::default()
        }
    }
}

/// Check required fields and date ordering
///
/// Runs before any external call; on success the travel details are echoed
/// into the conversation log so later stages see them as context.
pub fn validate_input(state: &TravelState) -> Result<StageDelta, ValidationError> {
    debug!("validate_input: called");
    if state.source.trim().is_empty() {
        return Err(ValidationError::MissingField("source"));
    }
    if state.destination.trim().is_empty() {
        return Err(ValidationError::MissingField("destination"));
    }
    if state.end_date < state.start_date {
        return Err(ValidationError::DateOrder {
            start: state.start_date,
            end: state.end_date,
        });
    }

    let confirmation = format!(
        "Travel Details Received:\n\
         - Source: {}\n\
         - Destination: {}\n\
         - Dates: {} to {}\n\
         - Preferences: {}\n\
         - Hobbies/Interests: {}",
        state.source, state.destination, state.start_date, state.end_date, state.preferences, state.hobbies
    );

    Ok(StageDelta {
        messages: vec![Message::user(confirmation)],
        ..Default::default()
    })
}

/// Research the destination through the search provider
///
/// An empty result list is a valid answer and produces a "no information
/// found" placeholder rather than a failure.
pub async fn research_destination(search: &dyn SearchClient, state: &TravelState) -> Result<StageDelta, PipelineError> {
    debug!(destination = %state.destination, "research_destination: called");
    let query = format!(
        "{} travel guide: attractions, local culture, transportation, weather, safety",
        state.destination
    );

    let snippets = search.search(&query).await?;

    let info = if snippets.is_empty() {
        debug!("research_destination: no results");
        format!("No information found for {}.", state.destination)
    } else {
        format_snippets(&snippets)
    };

    Ok(StageDelta {
        destination_info: Some(info.clone()),
        messages: vec![
            Message::user(format!("Research {} for the upcoming trip.", state.destination)),
            Message::assistant(info),
        ],
        ..Default::default()
    })
}

/// Format ranked snippets as a numbered list
fn format_snippets(snippets: &[Snippet]) -> String {
    snippets
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}\n   {}\n   {}", i + 1, s.title, s.url, s.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Create a day-by-day itinerary
pub async fn plan_itinerary(
    llm: &dyn LlmClient,
    prompts: &Prompts,
    state: &TravelState,
) -> Result<StageDelta, PipelineError> {
    debug!("plan_itinerary: called");
    let (system, user) = prompts.itinerary(&PromptContext::from_state(state))?;
    let (itinerary, messages) = run_completion(llm, state, system, user, STAGE_MAX_TOKENS).await?;

    Ok(StageDelta {
        itinerary: Some(itinerary),
        messages,
        ..Default::default()
    })
}

/// Suggest accommodations matching the traveler's preferences
pub async fn suggest_accommodations(
    llm: &dyn LlmClient,
    prompts: &Prompts,
    state: &TravelState,
) -> Result<StageDelta, PipelineError> {
    debug!("suggest_accommodations: called");
    let (system, user) = prompts.accommodations(&PromptContext::from_state(state))?;
    let (accommodations, messages) = run_completion(llm, state, system, user, STAGE_MAX_TOKENS).await?;

    Ok(StageDelta {
        accommodations: Some(accommodations),
        messages,
        ..Default::default()
    })
}

/// Recommend activities based on hobbies and interests
pub async fn recommend_activities(
    llm: &dyn LlmClient,
    prompts: &Prompts,
    state: &TravelState,
) -> Result<StageDelta, PipelineError> {
    debug!("recommend_activities: called");
    let (system, user) = prompts.activities(&PromptContext::from_state(state))?;
    let (activities, messages) = run_completion(llm, state, system, user, STAGE_MAX_TOKENS).await?;

    Ok(StageDelta {
        activities: Some(activities),
        messages,
        ..Default::default()
    })
}

/// Compile all prior fields into one cohesive travel plan
pub async fn compile_final_plan(
    llm: &dyn LlmClient,
    prompts: &Prompts,
    state: &TravelState,
) -> Result<StageDelta, PipelineError> {
    debug!("compile_final_plan: called");
    let (system, user) = prompts.compile(&PromptContext::from_state(state))?;
    let (final_plan, messages) = run_completion(llm, state, system, user, FINAL_PLAN_MAX_TOKENS).await?;

    Ok(StageDelta {
        final_plan: Some(final_plan),
        messages,
        ..Default::default()
    })
}

/// Run one completion with the conversation log as context
///
/// Returns the response text plus the user/assistant message pair to append
/// to the log. A successful response with no usable text is reported as
/// [`PipelineError::EmptyCompletion`].
async fn run_completion(
    llm: &dyn LlmClient,
    state: &TravelState,
    system_prompt: String,
    user_prompt: String,
    max_tokens: u32,
) -> Result<(String, Vec<Message>), PipelineError> {
    let mut messages = state.conversation_log.clone();
    messages.push(Message::user(user_prompt.clone()));

    let response = llm
        .complete(CompletionRequest {
            system_prompt,
            messages,
            max_tokens,
        })
        .await?;

    debug!(
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "run_completion: usage"
    );

    if response.stop_reason == StopReason::MaxTokens {
        warn!("run_completion: response truncated at max tokens");
    }

    let text = match response.content {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(PipelineError::EmptyCompletion),
    };

    let log = vec![Message::user(user_prompt), Message::assistant(text.clone())];
    Ok((text, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripRequest;
    use chrono::NaiveDate;

    fn state_with_dates(start: (i32, u32, u32), end: (i32, u32, u32)) -> TravelState {
        TravelState::from_request(TripRequest {
            user_id: None,
            source: "SF".to_string(),
            destination: "Tokyo".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).expect("valid date"),
            preferences: "mid-range".to_string(),
            hobbies: "photography".to_string(),
        })
    }

    #[test]
    fn test_validate_input_passes_for_ordered_dates() {
        let state = state_with_dates((2024, 6, 15), (2024, 6, 22));
        let delta = validate_input(&state).expect("should pass");
        assert_eq!(delta.messages.len(), 1);
        assert!(delta.messages[0].content.contains("Tokyo"));
    }

    #[test]
    fn test_validate_input_accepts_single_day_trip() {
        let state = state_with_dates((2024, 6, 15), (2024, 6, 15));
        assert!(validate_input(&state).is_ok());
    }

    #[test]
    fn test_validate_input_rejects_reversed_dates() {
        let state = state_with_dates((2024, 6, 22), (2024, 6, 15));
        let err = validate_input(&state).expect_err("should fail");
        assert!(matches!(err, ValidationError::DateOrder { .. }));
    }

    #[test]
    fn test_validate_input_rejects_blank_destination() {
        let mut state = state_with_dates((2024, 6, 15), (2024, 6, 22));
        state.destination = "  ".to_string();
        let err = validate_input(&state).expect_err("should fail");
        assert_eq!(err, ValidationError::MissingField("destination"));
    }

    #[test]
    fn test_format_snippets_numbers_results() {
        let snippets = vec![
            Snippet {
                title: "Tokyo guide".to_string(),
                url: "https://example.com/a".to_string(),
                content: "Visit Shibuya".to_string(),
            },
            Snippet {
                title: "Transit".to_string(),
                url: "https://example.com/b".to_string(),
                content: "Use the JR Pass".to_string(),
            },
        ];

        let formatted = format_snippets(&snippets);
        assert!(formatted.starts_with("1. Tokyo guide"));
        assert!(formatted.contains("2. Transit"));
        assert!(formatted.contains("Use the JR Pass"));
    }
}

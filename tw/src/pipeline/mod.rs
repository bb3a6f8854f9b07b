//! Pipeline orchestrator
//!
//! Fixed-topology stage pipeline: linear order with one branch gating
//! preference load/save on user identity. The orchestrator initializes state
//! from caller input, runs each stage against an immutable snapshot, folds
//! the returned delta, and hands back either the full final state or a
//! stage-tagged failure carrying partial progress.
//!
//! One run is driven synchronously by its caller task; stages execute
//! strictly sequentially. Concurrent runs are independent tasks that share
//! nothing except the preference store.

use std::sync::Arc;

use eyre::Result;
use tracing::{info, warn};
use uuid::Uuid;

use prefstore::{PreferenceStore, SqliteStore};

mod error;
mod stages;

pub use error::{PipelineError, RunFailure, RunOutcome, ValidationError};

use crate::config::Config;
use crate::domain::{RunMode, TravelState, TripRequest};
use crate::llm::{self, LlmClient};
use crate::prompts::Prompts;
use crate::search::{SearchClient, TavilyClient};

/// One named transformation step in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadPreferences,
    ValidateInput,
    ResearchDestination,
    PlanItinerary,
    SuggestAccommodations,
    RecommendActivities,
    CompileFinalPlan,
    SavePreferences,
}

impl Stage {
    /// Stage name as used in logs and error reports
    pub fn name(&self) -> &'static str {
        match self {
            Stage::LoadPreferences => "load_preferences",
            Stage::ValidateInput => "validate_input",
            Stage::ResearchDestination => "research_destination",
            Stage::PlanItinerary => "plan_itinerary",
            Stage::SuggestAccommodations => "suggest_accommodations",
            Stage::RecommendActivities => "recommend_activities",
            Stage::CompileFinalPlan => "compile_final_plan",
            Stage::SavePreferences => "save_preferences",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The pipeline orchestrator
///
/// Holds the external capability adapters and the preference store. All
/// configuration is passed in at construction; a `Planner` can drive any
/// number of runs, each owning its own state.
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
    store: Arc<dyn PreferenceStore>,
    prompts: Prompts,
}

impl Planner {
    /// Create a planner from explicit adapters (used by tests with fakes)
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>, store: Arc<dyn PreferenceStore>) -> Result<Self> {
        let prompts = Prompts::new()?;
        Ok(Self {
            llm,
            search,
            store,
            prompts,
        })
    }

    /// Create a planner with real clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = llm::create_client(&config.llm)?;
        let search = Arc::new(TavilyClient::from_config(&config.search)?);
        let store = Arc::new(SqliteStore::open(&config.storage.prefstore_dir)?);
        Self::new(llm, search, store)
    }

    /// Run the pipeline to completion for one trip request
    ///
    /// Deterministic single-pass execution: stages 3-7 always run in fixed
    /// order; preference load/save run only when the request carries a user
    /// identifier. On failure the returned error names the stage and carries
    /// the state populated up to that point.
    pub async fn run(&self, request: TripRequest) -> Result<RunOutcome, RunFailure> {
        let run_id = Uuid::now_v7();
        let mode = RunMode::from_user_id(request.user_id.as_deref());
        let mut state = TravelState::from_request(request);

        info!(
            %run_id,
            destination = %state.destination,
            anonymous = mode.user_id().is_none(),
            "run: starting"
        );

        // 1. load_preferences - only with a user; degrades on store errors
        if let RunMode::WithUser(user_id) = &mode {
            info!(%run_id, stage = %Stage::LoadPreferences, "run: stage");
            state.apply(stages::load_preferences(self.store.as_ref(), user_id));
        }

        // 2. validate_input - aborts before any external call
        info!(%run_id, stage = %Stage::ValidateInput, "run: stage");
        match stages::validate_input(&state) {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::ValidateInput, error.into(), state)),
        }

        // 3. research_destination
        info!(%run_id, stage = %Stage::ResearchDestination, "run: stage");
        let result = stages::research_destination(self.search.as_ref(), &state).await;
        match result {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::ResearchDestination, error, state)),
        }

        // 4. plan_itinerary
        info!(%run_id, stage = %Stage::PlanItinerary, "run: stage");
        let result = stages::plan_itinerary(self.llm.as_ref(), &self.prompts, &state).await;
        match result {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::PlanItinerary, error, state)),
        }

        // 5. suggest_accommodations
        info!(%run_id, stage = %Stage::SuggestAccommodations, "run: stage");
        let result = stages::suggest_accommodations(self.llm.as_ref(), &self.prompts, &state).await;
        match result {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::SuggestAccommodations, error, state)),
        }

        // 6. recommend_activities
        info!(%run_id, stage = %Stage::RecommendActivities, "run: stage");
        let result = stages::recommend_activities(self.llm.as_ref(), &self.prompts, &state).await;
        match result {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::RecommendActivities, error, state)),
        }

        // 7. compile_final_plan
        info!(%run_id, stage = %Stage::CompileFinalPlan, "run: stage");
        let result = stages::compile_final_plan(self.llm.as_ref(), &self.prompts, &state).await;
        match result {
            Ok(delta) => state.apply(delta),
            Err(error) => return Err(fail(run_id, Stage::CompileFinalPlan, error, state)),
        }

        // 8. save_preferences - same gate as stage 1; failure is reported
        // but never invalidates the plan
        let mut save_warning = None;
        if let RunMode::WithUser(user_id) = &mode {
            info!(%run_id, stage = %Stage::SavePreferences, "run: stage");
            if let Err(e) = self.store.save(user_id, &state.preferences, &state.hobbies) {
                warn!(%run_id, %user_id, error = %e, "run: preference save failed");
                save_warning = Some(format!("failed to save preferences for {}: {}", user_id, e));
            }
        }

        info!(%run_id, plan_bytes = state.final_plan.len(), "run: complete");
        Ok(RunOutcome { state, save_warning })
    }
}

/// Build a stage-tagged failure carrying partial progress
fn fail(run_id: Uuid, stage: Stage, error: PipelineError, state: TravelState) -> RunFailure {
    warn!(%run_id, %stage, %error, "run: stage failed");
    RunFailure {
        stage,
        error,
        state: Box::new(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::LoadPreferences.name(), "load_preferences");
        assert_eq!(Stage::CompileFinalPlan.name(), "compile_final_plan");
        assert_eq!(format!("{}", Stage::ValidateInput), "validate_input");
    }
}

//! Domain types for TripWeaver
//!
//! The travel request that starts a run, the state record threaded through
//! the pipeline, and the delta type stages hand back to the reducer.

mod request;
mod state;

pub use request::{RunMode, TripRequest};
pub use state::{StageDelta, TravelState};

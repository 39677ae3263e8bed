//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use travel_nutrition_core::TargetAdjustmentEngine;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing in here is mutated after startup; every request recomputes its targets.
#[derive(Clone)]
pub struct AppState {
    pub engine: TargetAdjustmentEngine,
}

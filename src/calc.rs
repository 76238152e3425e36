//! Derived income. Pure and total: no division, so finite inputs give
//! finite outputs.

use crate::state::{ActiveEvent, EventMultipliers, GameState};

/// Multipliers of the active event, or neutral ones when there is none.
pub fn event_multipliers(active_event: Option<&ActiveEvent>) -> EventMultipliers {
    active_event
        .map(|event| event.multipliers)
        .unwrap_or(EventMultipliers::NEUTRAL)
}

/// Score gained per second from passive income.
pub fn passive_income_per_sec(state: &GameState) -> f64 {
    state.base_passive_income
        * state.block_multiplier
        * event_multipliers(state.active_event.as_ref()).passive_multiplier
}

/// Score gained per click.
pub fn click_income(state: &GameState) -> f64 {
    state.click_power
        * state.block_multiplier
        * event_multipliers(state.active_event.as_ref()).click_multiplier
}

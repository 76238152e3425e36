//! Block Clicker reducers: pure functions, fully testable.
//!
//! Every reducer borrows the current state and returns a new one. The
//! caller's value is never touched, so a rejected purchase leaves it
//! exactly as it was.

use log::{debug, trace};

use crate::calc::{click_income, passive_income_per_sec};
use crate::config::MAX_DELTA_MS;
use crate::error::BuyError;
use crate::state::{GameState, ServiceConfig, ServiceProgress};
use crate::time;

/// Outcome of a slow or ban purchase.
pub type BuyResult = Result<GameState, BuyError>;

/// Add one click's worth of income.
pub fn apply_click(state: &GameState) -> GameState {
    GameState {
        score: state.score + click_income(state),
        ..state.clone()
    }
}

/// Accrue passive income for the time since the last tick, capped at
/// [`MAX_DELTA_MS`].
pub fn apply_tick(state: &GameState, now: u64) -> GameState {
    apply_tick_capped(state, now, MAX_DELTA_MS)
}

/// [`apply_tick`] with an explicit ceiling, e.g. from a loaded
/// [`GameBalance`](crate::config::GameBalance).
///
/// `last_tick_at` always moves to `now`, even when the clock went
/// backwards and nothing was earned.
pub fn apply_tick_capped(state: &GameState, now: u64, max_delta_ms: u64) -> GameState {
    let delta_ms = time::clamped_delta_ms(state.last_tick_at, now, max_delta_ms);
    if now < state.last_tick_at {
        trace!(
            "clock went backwards ({} -> {}), no income this tick",
            state.last_tick_at,
            now
        );
    } else if delta_ms < now - state.last_tick_at {
        trace!(
            "tick of {}ms clamped to {}ms",
            now - state.last_tick_at,
            delta_ms
        );
    }

    let earned = passive_income_per_sec(state) * (delta_ms as f64 / 1000.0);
    GameState {
        score: state.score + earned,
        last_tick_at: now,
        ..state.clone()
    }
}

/// [`apply_tick`] at the current wall-clock time, capped at the built-in
/// [`MAX_DELTA_MS`]. Hosts running a loaded balance sheet should call
/// [`apply_tick_now_capped`] with its `max_delta_ms` instead.
pub fn apply_tick_now(state: &GameState) -> GameState {
    apply_tick_now_capped(state, MAX_DELTA_MS)
}

/// [`apply_tick_capped`] at the current wall-clock time.
pub fn apply_tick_now_capped(state: &GameState, max_delta_ms: u64) -> GameState {
    apply_tick_capped(state, time::now_ms(), max_delta_ms)
}

/// Slow a service: pay `slow_cost`, gain `slow_effect` passive income.
pub fn buy_slow(state: &GameState, service_id: &str) -> BuyResult {
    let result = try_slow(state, service_id);
    log_outcome("slow", service_id, &result);
    result
}

/// Ban a service: pay `ban_cost`, multiply the block multiplier, and bump
/// dissent. Allowed whether or not the service was slowed first.
pub fn buy_ban(state: &GameState, service_id: &str) -> BuyResult {
    let result = try_ban(state, service_id);
    log_outcome("ban", service_id, &result);
    result
}

/// Both read models must know the id.
fn lookup<'a>(
    state: &'a GameState,
    service_id: &str,
) -> Result<(ServiceProgress, &'a ServiceConfig), BuyError> {
    match (state.progress(service_id), state.service_config(service_id)) {
        (Some(progress), Some(config)) => Ok((progress, config)),
        _ => Err(BuyError::ServiceNotFound),
    }
}

fn try_slow(state: &GameState, service_id: &str) -> BuyResult {
    let (progress, config) = lookup(state, service_id)?;
    match progress {
        ServiceProgress::Banned => return Err(BuyError::AlreadyBanned),
        ServiceProgress::Slowed => return Err(BuyError::AlreadySlowed),
        ServiceProgress::None => {}
    }
    if state.score < config.slow_cost {
        return Err(BuyError::NotEnoughScore);
    }

    let mut service_progresses = state.service_progresses.clone();
    service_progresses.insert(config.id.clone(), ServiceProgress::Slowed);

    Ok(GameState {
        score: state.score - config.slow_cost,
        base_passive_income: state.base_passive_income + config.slow_effect,
        service_progresses,
        ..state.clone()
    })
}

fn try_ban(state: &GameState, service_id: &str) -> BuyResult {
    let (progress, config) = lookup(state, service_id)?;
    if progress == ServiceProgress::Banned {
        return Err(BuyError::AlreadyBanned);
    }
    if state.score < config.ban_cost {
        return Err(BuyError::NotEnoughScore);
    }

    let mut service_progresses = state.service_progresses.clone();
    service_progresses.insert(config.id.clone(), ServiceProgress::Banned);

    let banned = state
        .service_configs
        .iter()
        .filter(|c| service_progresses.get(&c.id) == Some(&ServiceProgress::Banned))
        .count();
    let dissent_percent = dissent_percent(banned, state.total_services());

    Ok(GameState {
        score: state.score - config.ban_cost,
        block_multiplier: state.block_multiplier * config.ban_multiplier,
        banned_count: state.banned_count.saturating_add(1),
        dissent_percent,
        max_unlocked: dissent_percent >= 100,
        service_progresses,
        ..state.clone()
    })
}

/// `floor(100 * banned / total)`, in integers.
pub(crate) fn dissent_percent(banned: usize, total: usize) -> u32 {
    let percent = (banned * 100).checked_div(total).unwrap_or(0);
    u32::try_from(percent).unwrap_or(u32::MAX).min(100)
}

fn log_outcome(kind: &str, service_id: &str, result: &BuyResult) {
    match result {
        Ok(next) => debug!(
            "{kind} {service_id}: ok (score {:.1}, block x{}, dissent {}%)",
            next.score, next.block_multiplier, next.dissent_percent
        ),
        Err(reason) => debug!("{kind} {service_id}: rejected, {}", reason.code()),
    }
}

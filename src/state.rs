//! Block Clicker game state definitions and the initial-state factory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{self, GameBalance};
use crate::error::ConfigError;
use crate::time;

/// Identifier of a service ("telegram", "youtube", ...).
pub type ServiceId = String;

/// Identifier of a timed event.
pub type EventId = String;

/// How far along a single service is. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceProgress {
    #[default]
    None,
    Slowed,
    Banned,
}

impl ServiceProgress {
    pub fn is_banned(self) -> bool {
        self == ServiceProgress::Banned
    }
}

/// Service tier, 1 through 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ServiceTier(u8);

impl ServiceTier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub const ONE: ServiceTier = ServiceTier(1);

    pub fn new(tier: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&tier) {
            Ok(Self(tier))
        } else {
            Err(ConfigError::InvalidTier { tier })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ServiceTier {
    type Error = ConfigError;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        Self::new(tier)
    }
}

impl From<ServiceTier> for u8 {
    fn from(tier: ServiceTier) -> u8 {
        tier.0
    }
}

/// Static definition of a service. Never changes after startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub id: ServiceId,
    pub name: String,
    pub tier: ServiceTier,
    /// Score spent to slow the service.
    pub slow_cost: f64,
    /// Passive income (per second) gained by slowing it.
    pub slow_effect: f64,
    /// Score spent to ban the service.
    pub ban_cost: f64,
    /// Factor applied to the block multiplier when banned.
    pub ban_multiplier: f64,
}

/// Multipliers contributed by an active event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMultipliers {
    pub click_multiplier: f64,
    pub passive_multiplier: f64,
}

impl EventMultipliers {
    /// Factors that leave income untouched.
    pub const NEUTRAL: EventMultipliers = EventMultipliers {
        click_multiplier: 1.0,
        passive_multiplier: 1.0,
    };
}

impl Default for EventMultipliers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A timed income modifier. Activation and expiry are driven by the host;
/// reducers only read it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub id: EventId,
    pub name: String,
    pub multipliers: EventMultipliers,
    /// Activation time, ms since the Unix epoch.
    pub started_at: u64,
    pub duration_ms: u64,
}

impl ActiveEvent {
    pub fn ends_at(&self) -> u64 {
        self.started_at.saturating_add(self.duration_ms)
    }

    /// Whether `now` falls inside `[started_at, ends_at)`.
    pub fn is_active_at(&self, now: u64) -> bool {
        now >= self.started_at && now < self.ends_at()
    }
}

/// Full state of a Block Clicker game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Accumulated score. Fractional because passive income is per-ms.
    pub score: f64,
    /// Score per click before multipliers.
    pub click_power: f64,
    /// Score per second before multipliers.
    pub base_passive_income: f64,
    /// Product of every ban multiplier bought so far.
    pub block_multiplier: f64,
    pub service_configs: Vec<ServiceConfig>,
    pub service_progresses: BTreeMap<ServiceId, ServiceProgress>,
    pub active_event: Option<ActiveEvent>,
    pub banned_count: u32,
    /// Share of services banned, floored to a whole percent.
    pub dissent_percent: u32,
    /// Set once every service is banned.
    pub max_unlocked: bool,
    pub is_finished: bool,
    /// Time of the last applied tick, ms since the Unix epoch.
    pub last_tick_at: u64,
    pub save_version: u32,
}

impl GameState {
    pub fn service_config(&self, id: &str) -> Option<&ServiceConfig> {
        self.service_configs.iter().find(|config| config.id == id)
    }

    pub fn progress(&self, id: &str) -> Option<ServiceProgress> {
        self.service_progresses.get(id).copied()
    }

    pub fn total_services(&self) -> usize {
        self.service_configs.len()
    }

    /// Services whose progress is `Banned`, counted over the config list.
    pub fn banned_services(&self) -> usize {
        self.service_configs
            .iter()
            .filter(|config| self.progress(&config.id).is_some_and(ServiceProgress::is_banned))
            .count()
    }
}

/// Progress map with every given service at `None`.
pub fn progresses_for(services: &[ServiceConfig]) -> BTreeMap<ServiceId, ServiceProgress> {
    services
        .iter()
        .map(|service| (service.id.clone(), ServiceProgress::None))
        .collect()
}

/// Progress map for the built-in service list.
pub fn create_initial_progresses() -> BTreeMap<ServiceId, ServiceProgress> {
    progresses_for(&config::default_services())
}

/// Fresh state from an explicit balance sheet.
pub fn create_initial_state_with(balance: &GameBalance, now: u64) -> GameState {
    GameState {
        score: balance.initial_score,
        click_power: balance.initial_click_power,
        base_passive_income: balance.initial_base_passive_income,
        block_multiplier: balance.initial_block_multiplier,
        service_configs: balance.services.clone(),
        service_progresses: progresses_for(&balance.services),
        active_event: None,
        banned_count: 0,
        dissent_percent: 0,
        max_unlocked: false,
        is_finished: false,
        last_tick_at: now,
        save_version: config::SAVE_VERSION,
    }
}

/// Fresh state from the built-in balance sheet.
pub fn create_initial_state(now: u64) -> GameState {
    create_initial_state_with(&GameBalance::default(), now)
}

/// Fresh state stamped with the wall clock.
pub fn create_initial_state_now() -> GameState {
    create_initial_state(time::now_ms())
}

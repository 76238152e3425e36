//! Balance constants and the built-in service list.
//!
//! The reducers read these through [`GameBalance`]. A host that wants to
//! tune the game can ship its own sheet as JSON and load it with
//! [`GameBalance::from_json`], which rejects sheets that would break the
//! game's invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::{ServiceConfig, ServiceTier};

/// Save format version written by this build.
pub const SAVE_VERSION: u32 = 1;

/// Oldest save version that can still be restored.
/// Bump only on breaking changes to existing fields.
pub const MIN_COMPATIBLE_SAVE_VERSION: u32 = 1;

pub const INITIAL_SCORE: f64 = 0.0;
pub const INITIAL_CLICK_POWER: f64 = 1.0;
pub const INITIAL_BASE_PASSIVE_INCOME: f64 = 0.0;
pub const INITIAL_BLOCK_MULTIPLIER: f64 = 1.0;

/// How often the host should persist the game (ms).
pub const AUTOSAVE_INTERVAL_MS: u64 = 10_000;

/// Ceiling for a single tick's elapsed time (ms). Guards against a
/// backgrounded tab or a tampered clock dumping hours of income at once.
pub const MAX_DELTA_MS: u64 = 5_000;

fn service(
    id: &str,
    name: &str,
    tier: ServiceTier,
    slow_cost: f64,
    slow_effect: f64,
    ban_cost: f64,
    ban_multiplier: f64,
) -> ServiceConfig {
    ServiceConfig {
        id: id.into(),
        name: name.into(),
        tier,
        slow_cost,
        slow_effect,
        ban_cost,
        ban_multiplier,
    }
}

/// The built-in services, in display order.
pub fn default_services() -> Vec<ServiceConfig> {
    vec![
        service("telegram", "Telegram", ServiceTier::ONE, 10.0, 10.0, 20.0, 2.0),
        service("whatsapp", "WhatsApp", ServiceTier::ONE, 50.0, 50.0, 100.0, 2.0),
        service("instagram", "Instagram", ServiceTier::ONE, 100.0, 100.0, 200.0, 2.0),
        service("youtube", "YouTube", ServiceTier::ONE, 250.0, 250.0, 500.0, 2.0),
    ]
}

/// Every tunable number of the game in one place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameBalance {
    pub initial_score: f64,
    pub initial_click_power: f64,
    pub initial_base_passive_income: f64,
    pub initial_block_multiplier: f64,
    pub autosave_interval_ms: u64,
    pub max_delta_ms: u64,
    pub services: Vec<ServiceConfig>,
}

impl Default for GameBalance {
    fn default() -> Self {
        Self {
            initial_score: INITIAL_SCORE,
            initial_click_power: INITIAL_CLICK_POWER,
            initial_base_passive_income: INITIAL_BASE_PASSIVE_INCOME,
            initial_block_multiplier: INITIAL_BLOCK_MULTIPLIER,
            autosave_interval_ms: AUTOSAVE_INTERVAL_MS,
            max_delta_ms: MAX_DELTA_MS,
            services: default_services(),
        }
    }
}

impl GameBalance {
    /// Parse and validate a balance sheet. Missing fields fall back to the
    /// built-in values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let balance: GameBalance = serde_json::from_str(json)?;
        balance.validate()?;
        Ok(balance)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.services.is_empty() {
            return Err(ConfigError::NoServices);
        }
        for (field, value) in [
            ("initial_score", self.initial_score),
            ("initial_click_power", self.initial_click_power),
            ("initial_base_passive_income", self.initial_base_passive_income),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    service: None,
                    field,
                    value,
                });
            }
        }
        if !self.initial_block_multiplier.is_finite() || self.initial_block_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                service: None,
                field: "initial_block_multiplier",
                value: self.initial_block_multiplier,
            });
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.id.as_str()) {
                return Err(ConfigError::DuplicateService(service.id.clone()));
            }
            for (field, value) in [
                ("slow_cost", service.slow_cost),
                ("slow_effect", service.slow_effect),
                ("ban_cost", service.ban_cost),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        service: Some(service.id.clone()),
                        field,
                        value,
                    });
                }
            }
            // Below 1 a ban would shrink income.
            if !service.ban_multiplier.is_finite() || service.ban_multiplier < 1.0 {
                return Err(ConfigError::InvalidValue {
                    service: Some(service.id.clone()),
                    field: "ban_multiplier",
                    value: service.ban_multiplier,
                });
            }
        }
        Ok(())
    }
}

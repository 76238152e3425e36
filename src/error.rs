//! Error types. None of these are fatal: buy rejections are ordinary game
//! outcomes, config and save errors are reported to the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a slow or ban purchase was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyError {
    #[error("unknown service")]
    ServiceNotFound,
    #[error("service is already banned")]
    AlreadyBanned,
    #[error("service is already slowed")]
    AlreadySlowed,
    #[error("not enough score")]
    NotEnoughScore,
}

impl BuyError {
    /// Stable name for UIs and telemetry.
    pub fn code(self) -> &'static str {
        match self {
            BuyError::ServiceNotFound => "service_not_found",
            BuyError::AlreadyBanned => "already_banned",
            BuyError::AlreadySlowed => "already_slowed",
            BuyError::NotEnoughScore => "not_enough_score",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("balance sheet has no services")]
    NoServices,
    #[error("duplicate service id {0:?}")]
    DuplicateService(String),
    #[error("tier {tier} is outside 1..=5")]
    InvalidTier { tier: u8 },
    #[error("invalid {field} = {value}{}", for_service(.service))]
    InvalidValue {
        service: Option<String>,
        field: &'static str,
        value: f64,
    },
    #[error("malformed balance sheet: {0}")]
    Json(#[from] serde_json::Error),
}

fn for_service(service: &Option<String>) -> String {
    match service {
        Some(id) => format!(" for {id}"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version {saved} is older than the oldest supported ({min_compatible})")]
    TooOld { saved: u32, min_compatible: u32 },
    #[error("save version {saved} is newer than this build ({current})")]
    TooNew { saved: u32, current: u32 },
    #[error("save has invalid {field} = {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

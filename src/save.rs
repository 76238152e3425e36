//! Block Clicker セーブデータの変換。
//!
//! ## バージョニング方針
//!
//! - [`SAVE_VERSION`]: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - [`MIN_COMPATIBLE_SAVE_VERSION`]: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `save_version` は必須フィールド。無いデータはパースエラーとして破棄する。
//! `MIN_COMPATIBLE_SAVE_VERSION` 以上であれば、不足フィールドにデフォルト値を
//! 補完して読み込む。
//!
//! このモジュールは [`GameState`] と JSON 文字列の変換だけを行う。
//! 保存先（localStorage など）はホスト側の責務。

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{
    GameBalance, INITIAL_BLOCK_MULTIPLIER, INITIAL_CLICK_POWER, MIN_COMPATIBLE_SAVE_VERSION,
    SAVE_VERSION,
};
use crate::error::SaveError;
use crate::logic::dissent_percent;
use crate::state::{self, GameState, ServiceId, ServiceProgress};

/// What gets persisted. Static service definitions and the active event are
/// not saved: definitions come from the running build, events are transient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// 必須。欠けているデータはパースエラーになる。
    pub save_version: u32,
    #[serde(default)]
    pub score: f64,
    #[serde(default = "default_click_power")]
    pub click_power: f64,
    #[serde(default)]
    pub base_passive_income: f64,
    #[serde(default = "default_block_multiplier")]
    pub block_multiplier: f64,
    #[serde(default)]
    pub service_progresses: BTreeMap<ServiceId, ServiceProgress>,
    #[serde(default)]
    pub banned_count: u32,
    #[serde(default)]
    pub dissent_percent: u32,
    #[serde(default)]
    pub max_unlocked: bool,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub last_saved_at: u64,
}

fn default_click_power() -> f64 {
    INITIAL_CLICK_POWER
}

fn default_block_multiplier() -> f64 {
    INITIAL_BLOCK_MULTIPLIER
}

impl Default for SaveData {
    fn default() -> Self {
        let balance = GameBalance::default();
        Self {
            save_version: SAVE_VERSION,
            score: balance.initial_score,
            click_power: balance.initial_click_power,
            base_passive_income: balance.initial_base_passive_income,
            block_multiplier: balance.initial_block_multiplier,
            service_progresses: BTreeMap::new(),
            banned_count: 0,
            dissent_percent: 0,
            max_unlocked: false,
            is_finished: false,
            last_saved_at: 0,
        }
    }
}

impl SaveData {
    /// Snapshot the persistent part of `state`, stamped with `now`.
    pub fn from_state(state: &GameState, now: u64) -> Self {
        Self {
            save_version: SAVE_VERSION,
            score: state.score,
            click_power: state.click_power,
            base_passive_income: state.base_passive_income,
            block_multiplier: state.block_multiplier,
            service_progresses: state.service_progresses.clone(),
            banned_count: state.banned_count,
            dissent_percent: state.dissent_percent,
            max_unlocked: state.max_unlocked,
            is_finished: state.is_finished,
            last_saved_at: now,
        }
    }

    /// Rebuild a live state on top of `balance`.
    ///
    /// Progress for services the balance no longer defines is dropped;
    /// services the save does not mention start at `None`. Ban tallies are
    /// recounted from the restored progress so they always agree with the
    /// current service list. The tick clock restarts at `now`.
    ///
    /// Values no reducer could have produced (non-finite numbers, negative
    /// income, a block multiplier below 1) are rejected. A negative score
    /// is floored at 0.
    pub fn restore(&self, balance: &GameBalance, now: u64) -> Result<GameState, SaveError> {
        check_version(self.save_version)?;
        self.check_values()?;
        if self.save_version < SAVE_VERSION {
            info!(
                "migrating save data (saved={}, current={})",
                self.save_version, SAVE_VERSION
            );
        }

        let fresh = state::create_initial_state_with(balance, now);

        for id in self.service_progresses.keys() {
            if !fresh.service_progresses.contains_key(id) {
                warn!("save mentions unknown service {id:?}, dropping it");
            }
        }
        let service_progresses: BTreeMap<ServiceId, ServiceProgress> = fresh
            .service_progresses
            .keys()
            .map(|id| {
                let progress = self.service_progresses.get(id).copied().unwrap_or_default();
                (id.clone(), progress)
            })
            .collect();

        let restored = GameState {
            score: self.score.max(0.0),
            click_power: self.click_power,
            base_passive_income: self.base_passive_income,
            block_multiplier: self.block_multiplier,
            service_progresses,
            is_finished: self.is_finished,
            ..fresh
        };

        let banned = restored.banned_services();
        let dissent = dissent_percent(banned, restored.total_services());
        if banned != self.banned_count as usize || dissent != self.dissent_percent {
            info!(
                "recounted bans: {} -> {}, dissent {}% -> {}%",
                self.banned_count, banned, self.dissent_percent, dissent
            );
        }

        Ok(GameState {
            banned_count: u32::try_from(banned).unwrap_or(u32::MAX),
            dissent_percent: dissent,
            max_unlocked: dissent >= 100,
            ..restored
        })
    }

    fn check_values(&self) -> Result<(), SaveError> {
        let checks = [
            ("score", self.score, f64::MIN),
            ("click_power", self.click_power, 0.0),
            ("base_passive_income", self.base_passive_income, 0.0),
            ("block_multiplier", self.block_multiplier, 1.0),
        ];
        for (field, value, min) in checks {
            if !value.is_finite() || value < min {
                warn!("save has invalid {field} = {value}, discarding");
                return Err(SaveError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

fn check_version(saved: u32) -> Result<(), SaveError> {
    if saved < MIN_COMPATIBLE_SAVE_VERSION {
        warn!(
            "save version too old (saved={saved}, min_compatible={MIN_COMPATIBLE_SAVE_VERSION}), discarding"
        );
        return Err(SaveError::TooOld {
            saved,
            min_compatible: MIN_COMPATIBLE_SAVE_VERSION,
        });
    }
    if saved > SAVE_VERSION {
        warn!("save version from a newer build (saved={saved}, current={SAVE_VERSION}), discarding");
        return Err(SaveError::TooNew {
            saved,
            current: SAVE_VERSION,
        });
    }
    Ok(())
}

/// Serialize the persistent part of `state` to JSON.
pub fn to_json(state: &GameState, now: u64) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&SaveData::from_state(state, now))?)
}

/// Parse JSON written by [`to_json`] and restore it on top of `balance`.
pub fn from_json(json: &str, balance: &GameBalance, now: u64) -> Result<GameState, SaveError> {
    let save: SaveData = serde_json::from_str(json).inspect_err(|e| {
        warn!("save data did not parse, discarding: {e}");
    })?;
    save.restore(balance, now)
}

/// Whether at least `interval_ms` has passed since the last save.
/// A clock that went backwards counts as due, so the save catches up.
pub fn autosave_due(last_saved_at: u64, now: u64, interval_ms: u64) -> bool {
    now < last_saved_at || now - last_saved_at >= interval_ms
}

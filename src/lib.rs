//! Block Clicker: the pure-state core of an incremental "ban the services"
//! clicker.
//!
//! Everything in here is a deterministic function over an immutable
//! [`GameState`]: the host keeps the current state, calls a reducer, and
//! adopts the returned value. Rendering, storage and the tick loop live
//! outside this crate.
//!
//! ```
//! use block_clicker::{logic, state};
//!
//! let s = state::create_initial_state(0);
//! let s = logic::apply_click(&s);
//! assert_eq!(s.score, 1.0);
//! match logic::buy_slow(&s, "telegram") {
//!     Ok(_) => unreachable!("slowing telegram costs 10"),
//!     Err(reason) => assert_eq!(reason.code(), "not_enough_score"),
//! }
//! ```

pub mod calc;
pub mod config;
pub mod error;
pub mod logic;
pub mod save;
pub mod state;
pub mod time;

#[cfg(test)]
mod simulator;

pub use error::{BuyError, ConfigError, SaveError};
pub use logic::BuyResult;
pub use state::{ActiveEvent, EventMultipliers, GameState, ServiceConfig, ServiceProgress};

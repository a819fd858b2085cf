//! Common utilities and shared types for bloodlink.
//!
//! - **Configuration**: layered settings via [`Config`]
//! - **Error handling**: [`AppError`] and [`AppResult`]
//! - **ID generation**: ULID identifiers and bearer tokens via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use bloodlink_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("cooldown {} days, new id {id}", config.matching.cooldown_days);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, DatabaseConfig, LoggingConfig, MatchingConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;

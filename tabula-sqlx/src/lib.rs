//! # tabula-sqlx — SQLx backend for the tabula data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! half of tabula. It depends on [`tabula`] for the entity contract, the
//! condition and statement builders and the error taxonomy, and adds the
//! manager that talks to a real database through `sqlx`'s Any driver.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxManager`] | Entity manager: create/update/delete/find over an `sqlx::AnyPool` |
//! | [`DatabaseConfig`] | Pool configuration with a `DATABASE_URL` environment overlay |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! Enable the database drivers you intend to connect to:
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```toml
//! [dependencies]
//! tabula-sqlx = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! ```ignore
//! use tabula::prelude::*;
//! use tabula_sqlx::{DatabaseConfig, SqlxManager};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = config.connect().await?;
//! let accounts = SqlxManager::<Account>::new(pool, config.dialect())?;
//!
//! let created = accounts.create(&account).await?;
//! let rich = accounts
//!     .find(&ConditionBuilder::new().where_gt("balance", 100i64))
//!     .await?;
//! ```
//!
//! # Generated keys
//!
//! `create` never sends a caller-supplied id: the INSERT renders the
//! identity column as a database-generated expression and reads the new key
//! back — through `RETURNING` on Postgres, through the driver's
//! last-insert-id elsewhere. A missing key surfaces as
//! [`DataError::NoGeneratedKey`](tabula::DataError).
//!
//! # Partial reads
//!
//! `find` returns a [`Fetched`](tabula::Fetched): rows that fail to decode
//! become per-row failures next to the entities that mapped, so a corrupt
//! row degrades the result instead of aborting or vanishing.

pub mod config;
pub mod error;
pub mod manager;
mod row;

pub use config::{install_drivers, DatabaseConfig};
pub use error::{SqlxErrorExt, SqlxResult};
pub use manager::SqlxManager;

/// Re-exports of the most commonly used types from both `tabula` and this
/// crate.
pub mod prelude {
    pub use crate::{DatabaseConfig, SqlxErrorExt, SqlxManager};
    pub use tabula::prelude::*;
}

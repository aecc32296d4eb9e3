//! # Low-level SQLite queries
//!
//! Every query is a free function taking `&mut SqliteConnection`. Pass a pooled connection for one-off calls, or
//! `&mut tx` to run several of them inside one transaction.
use std::{env, str::FromStr};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod menus;
pub mod orders;
pub mod restaurants;
pub mod users;

const SQLITE_DB_URL: &str = "sqlite://data/eats.db";

pub fn db_url() -> String {
    let result = env::var("EATS_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ EATS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

/// Opens a connection pool, creating the database file if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// True if the error is a violated `UNIQUE` constraint.
pub(crate) fn is_unique_violation(e: &SqlxError) -> bool {
    matches!(e, SqlxError::Database(db) if db.is_unique_violation())
}

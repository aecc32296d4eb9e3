//! SQLite backend for the EatsOnline engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;

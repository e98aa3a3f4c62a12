//! Batch loader for delimited tweet dumps into a single indexed SQLite table.

pub mod config;
pub mod error;
pub mod process;
pub mod schema;
pub mod store;

pub use config::{LoadConfig, UrlShortening};
pub use error::LoadError;
pub use process::{load, LoadReport};
pub use schema::SchemaVariant;

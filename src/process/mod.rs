// src/process/mod.rs
//! Per-record transforms and the loader that drives them.

pub mod date_parser;
pub mod load;
pub mod reader;
pub mod record;
pub mod urls;

pub use load::{load, numbered_inputs, LoadReport};

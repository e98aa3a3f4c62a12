//! Run configuration, passed explicitly into the loader.

use std::env;

use crate::error::{LoadError, Result};
use crate::schema::SchemaVariant;

/// Whether known URL prefixes are rewritten to short tokens before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlShortening {
    #[default]
    Enabled,
    Disabled,
}

impl UrlShortening {
    pub fn is_enabled(self) -> bool {
        self == UrlShortening::Enabled
    }
}

impl From<bool> for UrlShortening {
    fn from(enabled: bool) -> Self {
        if enabled {
            UrlShortening::Enabled
        } else {
            UrlShortening::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub schema: SchemaVariant,
    pub url_shortening: UrlShortening,
    /// Added to every derived `publish_time`, in hours. Inputs are UTC.
    pub tz_offset_hours: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVariant::Base,
            url_shortening: UrlShortening::Enabled,
            tz_offset_hours: 0.0,
        }
    }
}

pub const SCHEMA_ENV: &str = "TWEETLOAD_SCHEMA";
pub const SHORTEN_URLS_ENV: &str = "TWEETLOAD_SHORTEN_URLS";

impl LoadConfig {
    /// Defaults, overridden by `TWEETLOAD_SCHEMA` and `TWEETLOAD_SHORTEN_URLS`
    /// when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(SCHEMA_ENV) {
            cfg.schema = raw.parse()?;
        }
        if let Some(raw) = lookup(SHORTEN_URLS_ENV) {
            cfg.url_shortening = parse_flag(SHORTEN_URLS_ENV, &raw)?.into();
        }
        Ok(cfg)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(LoadError::Config(format!(
            "{key}: expected a boolean, got {other:?}"
        ))),
    }
}

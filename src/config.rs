// src/config.rs

use anyhow::{bail, Result};
use std::env;

/// Chart to target when `DATAWRAPPER_CHART_ID` is not set.
pub const DEFAULT_CHART_ID: &str = "kg7Xj";

/// Run configuration, read once from the environment at startup and passed
/// into each step. Missing required values fail here, before any network call.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the Datawrapper API.
    pub api_key: String,
    /// Target chart identifier.
    pub chart_id: String,
    /// Sharing URL of the Google Sheet holding the chart data.
    pub sheet_url: String,
}

impl Config {
    /// Build a `Config` from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a `Config` from any key → value lookup. `from_env` delegates
    /// here; tests supply a map instead of touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = match lookup("DATAWRAPPER_API_KEY") {
            Some(v) if !v.is_empty() => v,
            _ => bail!("DATAWRAPPER_API_KEY environment variable is required"),
        };
        let sheet_url = match lookup("GOOGLE_SHEET_URL") {
            Some(v) if !v.is_empty() => v,
            _ => bail!("GOOGLE_SHEET_URL environment variable is required"),
        };
        let chart_id = lookup("DATAWRAPPER_CHART_ID")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CHART_ID.to_string());

        Ok(Self {
            api_key,
            chart_id,
            sheet_url,
        })
    }
}

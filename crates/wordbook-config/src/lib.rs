use std::env;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::lookup::LookupConfig;

pub mod api;
pub mod lookup;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub lookup: LookupConfig,

    /// Emit logs as JSON lines instead of the human readable format
    pub log_json: bool,
}

impl Config {
    pub fn new() -> Self {
        let log_json = env::var("WORDBOOK_LOG_JSON")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(false);

        Config {
            api: ApiConfig::new(),
            lookup: LookupConfig::new(),
            log_json,
        }
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wordbook_types::LanguagePair;

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_word_len() -> usize {
    2
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "ru".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Quiet period after the last keystroke before a lookup starts
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Trimmed words shorter than this (in chars) are never looked up
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl LookupConfig {
    pub fn new() -> Self {
        let debounce_ms = env::var("WORDBOOK_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_debounce_ms);

        let min_word_len = env::var("WORDBOOK_MIN_WORD_LEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_min_word_len);

        let source_lang = env::var("WORDBOOK_SOURCE_LANG").unwrap_or_else(|_| default_source_lang());
        let target_lang = env::var("WORDBOOK_TARGET_LANG").unwrap_or_else(|_| default_target_lang());

        Self {
            debounce_ms,
            min_word_len,
            source_lang,
            target_lang,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn languages(&self) -> LanguagePair {
        LanguagePair::new(self.source_lang.clone(), self.target_lang.clone())
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_word_len: default_min_word_len(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}

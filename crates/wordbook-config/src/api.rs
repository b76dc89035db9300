use std::env;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Dictionary backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Authorization scheme sent in front of the token
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Empty means requests go out without an Authorization header
    #[serde(default)]
    pub token: String,
}

impl ApiConfig {
    pub fn new() -> Self {
        let base_url = env::var("WORDBOOK_API_URL").unwrap_or_else(|_| default_base_url());
        let token_type = env::var("WORDBOOK_TOKEN_TYPE").unwrap_or_else(|_| default_token_type());
        let token = env::var("WORDBOOK_TOKEN").unwrap_or_default();

        Self {
            base_url,
            token_type,
            token,
        }
    }

    pub fn lookup_url(&self) -> String {
        format!("{}/dictionary/lookup", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_type: default_token_type(),
            token: String::new(),
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use wordbook_config::api::ApiConfig;

use crate::error::LookupError;

/// Raw response body, chunked however the network delivered it
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, LookupError>>;

/// Opens the event stream for a single word.
///
/// Dropping the returned stream must release the underlying connection, the
/// controller relies on that to cancel superseded lookups.
#[async_trait]
pub trait LookupTransport: Send + Sync {
    async fn open(&self, word: &str) -> Result<ByteStream, LookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token_type: String,
    pub token: String,
}

impl Credentials {
    pub fn new(token_type: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            token: token.into(),
        }
    }

    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

/// Source of the auth token, read at request time
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Option<Credentials>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<Credentials> + Send + Sync,
{
    fn credentials(&self) -> Option<Credentials> {
        self()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<Credentials>);

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self(Some(credentials))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Option<Credentials> {
        self.0.clone()
    }
}

/// SSE lookup over HTTP
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    lookup_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpTransport {
    pub fn new(lookup_url: String, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            lookup_url,
            credentials,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let credentials = if config.token.is_empty() {
            StaticCredentials::anonymous()
        } else {
            StaticCredentials::new(Credentials::new(&config.token_type, &config.token))
        };

        Self::new(config.lookup_url(), Arc::new(credentials))
    }

    pub fn lookup_url(&self) -> &str {
        &self.lookup_url
    }
}

#[async_trait]
impl LookupTransport for HttpTransport {
    async fn open(&self, word: &str) -> Result<ByteStream, LookupError> {
        let mut request = self
            .client
            .get(&self.lookup_url)
            .query(&[("text", word)])
            .header(ACCEPT, "text/event-stream");

        if let Some(credentials) = self.credentials.credentials() {
            request = request.header(AUTHORIZATION, credentials.header_value());
        }

        tracing::debug!("Opening lookup stream for '{}'", word);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(LookupError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if response.content_length() == Some(0) {
            return Err(LookupError::NoBody);
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(LookupError::from));

        Ok(stream.boxed())
    }
}

// File: src/remote.rs
//! Network fallback for text the local dictionaries cannot handle.
//!
//! The wire contract is a single JSON request/response pair. Responses are
//! parsed into [`RemoteResponse`] with every field required; anything else is
//! reported as [`TranslationError::ExternalServiceUnavailable`] and the caller
//! keeps its local result.

use crate::error::{Result, TranslationError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResponse {
    pub translated_text: String,
    pub is_translated: bool,
    pub source_language: String,
    pub target_language: String,
}

impl RemoteResponse {
    /// Parses a response body. Missing or mistyped fields are rejected.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            TranslationError::ExternalServiceUnavailable(format!("malformed response: {e}"))
        })
    }
}

#[async_trait]
pub trait RemoteTranslator: Send + Sync {
    async fn translate(&self, request: &RemoteRequest) -> Result<RemoteResponse>;
}

/// Posts [`RemoteRequest`] as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteTranslator {
    client: Client,
    endpoint: String,
}

impl HttpRemoteTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Config(format!("http client: {e}")))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteTranslator for HttpRemoteTranslator {
    async fn translate(&self, request: &RemoteRequest) -> Result<RemoteResponse> {
        let unavailable = |e: reqwest::Error| {
            warn!(endpoint = %self.endpoint, error = %e, "remote translation request failed");
            TranslationError::ExternalServiceUnavailable(e.to_string())
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "remote translation rejected");
            return Err(TranslationError::ExternalServiceUnavailable(format!(
                "service returned {status}"
            )));
        }

        let body = response.text().await.map_err(unavailable)?;
        let parsed = RemoteResponse::from_json(&body)?;
        debug!(translated = parsed.is_translated, "remote translation received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case() {
        let request = RemoteRequest {
            text: "hi".into(),
            source_language: "english".into(),
            target_language: "hindi".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hi", "sourceLanguage": "english", "targetLanguage": "hindi"})
        );
    }

    #[test]
    fn accepts_a_complete_response() {
        let body = r#"{"translatedText":"नमस्ते","isTranslated":true,
                       "sourceLanguage":"english","targetLanguage":"hindi"}"#;
        let parsed = RemoteResponse::from_json(body).unwrap();
        assert_eq!(parsed.translated_text, "नमस्ते");
        assert!(parsed.is_translated);
    }

    #[test]
    fn rejects_malformed_responses() {
        for body in [
            "",
            "not json",
            r#"{"translatedText":"x","sourceLanguage":"en","targetLanguage":"hi"}"#,
            r#"{"translatedText":1,"isTranslated":true,"sourceLanguage":"en","targetLanguage":"hi"}"#,
            r#"{"translatedText":"x","isTranslated":"yes","sourceLanguage":"en","targetLanguage":"hi"}"#,
        ] {
            assert!(matches!(
                RemoteResponse::from_json(body),
                Err(TranslationError::ExternalServiceUnavailable(_))
            ));
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let remote = HttpRemoteTranslator::new("http://127.0.0.1:9/translate", Duration::from_millis(200)).unwrap();
        let request = RemoteRequest {
            text: "hello".into(),
            source_language: "english".into(),
            target_language: "hindi".into(),
        };
        assert!(matches!(
            remote.translate(&request).await,
            Err(TranslationError::ExternalServiceUnavailable(_))
        ));
    }
}

//! Best-effort translation collaborator.
//!
//! The contract is "never raise": any failure returns the input text
//! unchanged, so a translation outage can only cost the user a language,
//! never a tip.

use async_trait::async_trait;

use crate::config::{DEFAULT_FETCH_TIMEOUT, USER_AGENT};

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates arbitrary text to Polish, best effort.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns the translation, or the original text on any failure.
    async fn to_polish(&self, text: &str) -> String;
}

/// Identity translator for tests and offline use.
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn to_polish(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Public Google Translate endpoint (the `gtx` client, no API key).
pub struct GoogleTranslate {
    client: reqwest::Client,
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslate {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DEFAULT_FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Internal fallible path; `to_polish` flattens it.
    async fn request(&self, text: &str) -> Option<String> {
        let response = self
            .client
            .get(TRANSLATE_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "pl"),
                ("dt", "t"),
                ("q", text),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        // Response shape: [[[translated, original, ...], ...], ...]
        let value: serde_json::Value = response.json().await.ok()?;
        let segments = value.get(0)?.as_array()?;

        let mut out = String::new();
        for segment in segments {
            if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
                out.push_str(piece);
            }
        }

        let out = out.trim().to_string();
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn to_polish(&self, text: &str) -> String {
        match self.request(text).await {
            Some(translated) => translated,
            None => text.to_string(),
        }
    }
}

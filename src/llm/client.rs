// src/llm/client.rs
// Client for the local Ollama-style generation endpoint.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::LlmError;
use crate::config::Config;

/// Normalize the endpoint base URL by stripping trailing slashes.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Check if a URL points to a local address (localhost, 127.0.0.1, [::1])
fn is_local_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host() {
            Some(url::Host::Domain(d)) => d == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => true,
        },
        Err(_) => true, // Can't parse, don't warn on malformed URLs
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response envelope of the generation endpoint. Fields beyond `response`
/// are part of the endpoint's own contract and ignored here.
#[derive(Debug, Deserialize)]
pub struct GenerateEnvelope {
    #[serde(default)]
    pub response: String,
}

/// Raw outcome of one generation request: status plus the untouched body.
/// Callers decide how much of the body to trust.
#[derive(Debug)]
pub struct RawResponse {
    pub status: reqwest::StatusCode,
    pub body: String,
}

/// Client for the local inference endpoint. One synchronous request per
/// call; no retries, no streaming.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        let base_url = normalize_base_url(&config.ollama_base_url);

        if !is_local_url(&base_url) {
            warn!(
                "Inference endpoint '{}' is not a local address. For security, consider using localhost.",
                base_url
            );
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            model: config.ollama_model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one `{model, prompt, stream:false}` request and hand back the
    /// raw response. No status check here: the analyzer wants the body
    /// even for error responses, and the generator checks status itself.
    pub async fn generate_raw(&self, prompt: &str) -> Result<RawResponse, LlmError> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

// src/llm/mod.rs
// Everything that talks to (or parses output from) the inference endpoint.

pub mod analyzer;
pub mod client;
pub mod extract;
pub mod generator;

pub use analyzer::{AnalyzedProfile, analyze_writing_sample, build_analysis_prompt};
pub use client::{GenerateEnvelope, OllamaClient, RawResponse};
pub use extract::extract_json;
pub use generator::{generate_content, render_system_prompt};

use thiserror::Error;

/// Failures of the analysis/generation round trip. Every variant is scoped
/// to a single request; nothing here is retried.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("inference endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference response envelope was not valid JSON")]
    MalformedEnvelope,

    #[error("model output did not contain a usable JSON object")]
    AnalysisFailed,
}

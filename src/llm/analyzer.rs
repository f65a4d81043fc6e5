// src/llm/analyzer.rs
// Turns a free-text writing sample into structured persona attributes by
// prompting the inference endpoint and double-decoding its JSON output.

use serde::Deserialize;
use tracing::{error, warn};

use super::client::{GenerateEnvelope, OllamaClient};
use super::extract::extract_json;
use super::LlmError;
use crate::persona::{ATTRIBUTE_SPECS, PersonaAttributes};

const ANALYSIS_INSTRUCTIONS: &str = "Please analyze the writing style and personality of the \
given writing sample. Provide a detailed assessment of their characteristics using the following \
template. Rate each applicable characteristic on a scale of 1-10 where relevant, or provide a \
descriptive value. Return the results in a JSON format. Strictly only output the JSON object as \
outlined. If what you output is not in the following format reconstruct it so that it is.";

/// Result of a successful analysis: an optional persona name plus whatever
/// attribute values the model produced. Unknown keys in the model output are
/// dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzedProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: PersonaAttributes,
}

/// Render the fixed analysis template: instructions, one line per target
/// attribute with its expected value domain, then the sample itself.
pub fn build_analysis_prompt(writing_sample: &str) -> String {
    let mut lines = Vec::with_capacity(ATTRIBUTE_SPECS.len() + 1);
    lines.push(r#""name": "[Author/Character Name]","#.to_string());
    for spec in ATTRIBUTE_SPECS {
        if spec.rating {
            lines.push(format!(r#""{}": {},"#, spec.name, spec.hint));
        } else {
            lines.push(format!(r#""{}": "{}","#, spec.name, spec.hint));
        }
    }

    format!(
        "{ANALYSIS_INSTRUCTIONS}\n\n{}\n\nWriting Sample:\n{}",
        lines.join("\n"),
        writing_sample
    )
}

/// Analyze a writing sample via the inference endpoint.
///
/// The endpoint's response envelope is parsed as JSON, its `response` text
/// field is decoded again through the JSON extraction heuristic, and the
/// resulting mapping becomes an [`AnalyzedProfile`]. All-or-nothing: any
/// transport error, malformed envelope, or undecodable inner payload fails
/// the whole analysis and leaves nothing applied.
pub async fn analyze_writing_sample(
    client: &OllamaClient,
    debug_path: &str,
    writing_sample: &str,
) -> Result<AnalyzedProfile, LlmError> {
    let prompt = build_analysis_prompt(writing_sample);
    let raw = client.generate_raw(&prompt).await.map_err(|e| {
        error!("Analysis request failed: {}", e);
        e
    })?;

    dump_debug_artifact(debug_path, &raw.body).await;

    let envelope: GenerateEnvelope = serde_json::from_str(&raw.body).map_err(|e| {
        error!("Analysis envelope was not valid JSON: {}", e);
        LlmError::MalformedEnvelope
    })?;

    let map = extract_json(&envelope.response).ok_or_else(|| {
        error!("No JSON object found in analysis output");
        LlmError::AnalysisFailed
    })?;

    serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| {
        error!("Analysis output did not match the attribute template: {}", e);
        LlmError::AnalysisFailed
    })
}

/// Persist the raw response envelope as a diagnostic aid. Best-effort: not
/// part of the transactional outcome, failure is only logged.
async fn dump_debug_artifact(path: &str, body: &str) {
    if let Err(e) = tokio::fs::write(path, body).await {
        warn!("Failed to write analysis debug artifact {}: {}", path, e);
    }
}

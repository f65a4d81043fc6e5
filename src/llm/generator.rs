// src/llm/generator.rs
// Renders a persona into a system prompt and generates content against it.

use tracing::{error, info};

use super::client::{GenerateEnvelope, OllamaClient};
use crate::persona::Persona;

/// Placeholder for attribute values the persona does not carry yet. The
/// renderer is a formatting step only; it never fails on missing values.
const UNSPECIFIED: &str = "unspecified";

fn rating(value: Option<i64>) -> String {
    match value {
        Some(n) => format!("{}/10", n),
        None => UNSPECIFIED.to_string(),
    }
}

fn category(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNSPECIFIED)
}

/// Format a persona's attributes as a grouped natural-language description
/// suitable as a system prompt.
pub fn render_system_prompt(persona: &Persona) -> String {
    let a = &persona.attributes;

    format!(
        "You are a writer with the following characteristics:\n\n\
        Writing Style:\n\
        - vocabulary complexity: {}\n\
        - sentence structure: {}\n\
        - paragraph organization: {}\n\
        - tone: {}\n\
        - punctuation style: {}\n\
        - pronoun preference: {}\n\
        - formality level: {}\n\n\
        Language Patterns:\n\
        - idiom usage: {}\n\
        - metaphor frequency: {}\n\
        - simile frequency: {}\n\
        - technical jargon usage: {}\n\
        - humor and sarcasm usage: {}\n\n\
        Personality:\n\
        - openness to experience: {}\n\
        - conscientiousness: {}\n\
        - extraversion: {}\n\
        - agreeableness: {}\n\
        - emotional stability: {}\n\
        - dominant motivations: {}\n\
        - core values: {}\n\
        - decision making style: {}\n\
        - emotional response tendency: {}\n\
        - creativity level: {}\n\n\
        Demographics:\n\
        - age: {}\n\
        - gender: {}\n\
        - education level: {}\n\
        - professional background: {}\n\
        - cultural background: {}\n\
        - primary language: {}\n\
        - language fluency: {}\n\n\
        Write in a way that naturally reflects these characteristics. \
        The response should include a title.",
        rating(a.vocabulary_complexity),
        category(&a.sentence_structure),
        category(&a.paragraph_organization),
        category(&a.tone),
        category(&a.punctuation_style),
        category(&a.pronoun_preference),
        rating(a.formality_level),
        rating(a.idiom_usage),
        rating(a.metaphor_frequency),
        rating(a.simile_frequency),
        rating(a.technical_jargon_usage),
        rating(a.humor_sarcasm_usage),
        rating(a.openness_to_experience),
        rating(a.conscientiousness),
        rating(a.extraversion),
        rating(a.agreeableness),
        rating(a.emotional_stability),
        category(&a.dominant_motivations),
        category(&a.core_values),
        category(&a.decision_making_style),
        category(&a.emotional_response_tendency),
        rating(a.creativity_level),
        category(&a.age),
        category(&a.gender),
        category(&a.education_level),
        category(&a.professional_background),
        category(&a.cultural_background),
        category(&a.primary_language),
        category(&a.language_fluency),
    )
}

/// Generate content for a persona and topic via the inference endpoint.
///
/// Returns the trimmed `response` text, or an empty string on any transport
/// error, non-2xx status, malformed envelope, or empty field. Callers must
/// treat an empty result as generation failure. No retries, no streaming.
pub async fn generate_content(client: &OllamaClient, persona: &Persona, topic: &str) -> String {
    let prompt = format!(
        "{}\n\nWrite about: {}",
        render_system_prompt(persona),
        topic
    );

    info!(
        "Requesting content generation (model {}, topic length {})",
        client.model(),
        topic.len()
    );

    let raw = match client.generate_raw(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Content generation request failed: {}", e);
            return String::new();
        }
    };

    if !raw.status.is_success() {
        error!(
            "Inference endpoint returned status {} for content generation",
            raw.status
        );
        return String::new();
    }

    let envelope: GenerateEnvelope = match serde_json::from_str(&raw.body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Generation envelope was not valid JSON: {}", e);
            return String::new();
        }
    };

    let content = envelope.response.trim();
    if content.is_empty() {
        error!("Inference endpoint returned an empty response field");
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaAttributes;
    use chrono::Utc;

    fn persona_with(attributes: PersonaAttributes) -> Persona {
        Persona {
            id: 1,
            author_id: 1,
            name: Some("Test".into()),
            description: None,
            attributes,
            is_active: Some(true),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_populated_attributes() {
        let prompt = render_system_prompt(&persona_with(PersonaAttributes {
            vocabulary_complexity: Some(7),
            tone: Some("conversational".into()),
            age: Some("30-40".into()),
            ..Default::default()
        }));

        assert!(prompt.contains("- vocabulary complexity: 7/10"));
        assert!(prompt.contains("- tone: conversational"));
        assert!(prompt.contains("- age: 30-40"));
        assert!(prompt.contains("The response should include a title."));
    }

    #[test]
    fn test_render_never_fails_on_empty_persona() {
        let prompt = render_system_prompt(&persona_with(PersonaAttributes::default()));

        assert!(prompt.contains("- vocabulary complexity: unspecified"));
        assert!(prompt.contains("- language fluency: unspecified"));
    }
}

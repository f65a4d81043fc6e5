// src/persona/attributes.rs
//
// The flat persona attribute block. One declarative table drives everything
// that has to stay in sync: the struct fields, the column list used by the
// store, the template entries the analyzer shows the model, and the merge
// used when analysis results overlay client-supplied values.

use serde::{Deserialize, Serialize};

/// One target attribute: column name, the value-domain hint shown to the
/// model in the analysis template, and whether it is a 1-10 rating.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub hint: &'static str,
    pub rating: bool,
}

macro_rules! attr_type {
    (rating) => { i64 };
    (text) => { String };
}

macro_rules! attr_is_rating {
    (rating) => {
        true
    };
    (text) => {
        false
    };
}

macro_rules! persona_attributes {
    ($( $field:ident : $kind:ident = $hint:literal ),+ $(,)?) => {
        /// Descriptive persona attributes. All optional pending analysis;
        /// ratings are on a 1-10 scale, the rest free-text categories.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
        pub struct PersonaAttributes {
            $(
                #[serde(default)]
                pub $field: Option<attr_type!($kind)>,
            )+
        }

        /// Attribute column names, in schema order.
        pub const ATTRIBUTE_COLUMNS: &[&str] = &[ $( stringify!($field) ),+ ];

        /// Template entries for the analysis prompt.
        pub const ATTRIBUTE_SPECS: &[AttributeSpec] = &[
            $(
                AttributeSpec {
                    name: stringify!($field),
                    hint: $hint,
                    rating: attr_is_rating!($kind),
                }
            ),+
        ];

        impl PersonaAttributes {
            /// Overlay `other` onto `self`: fields present in `other` win,
            /// absent fields leave the current value untouched.
            pub fn merge(&mut self, other: PersonaAttributes) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )+
            }

            /// Bind every attribute onto a query, in `ATTRIBUTE_COLUMNS` order.
            pub fn bind_all<'q>(
                &self,
                query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
            ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
                $( let query = query.bind(self.$field.clone()); )+
                query
            }
        }
    };
}

persona_attributes! {
    // Writing style
    vocabulary_complexity: rating = "[1-10]",
    sentence_structure: text = "[simple/complex/varied]",
    paragraph_organization: text = "[structured/loose/stream-of-consciousness]",
    idiom_usage: rating = "[1-10]",
    metaphor_frequency: rating = "[1-10]",
    simile_frequency: rating = "[1-10]",
    tone: text = "[formal/informal/academic/conversational/etc.]",
    punctuation_style: text = "[minimal/heavy/unconventional]",
    contraction_usage: rating = "[1-10]",
    pronoun_preference: text = "[first-person/third-person/etc.]",
    passive_voice_frequency: rating = "[1-10]",
    rhetorical_question_usage: rating = "[1-10]",
    list_usage_tendency: rating = "[1-10]",
    personal_anecdote_inclusion: rating = "[1-10]",
    pop_culture_reference_frequency: rating = "[1-10]",
    technical_jargon_usage: rating = "[1-10]",
    parenthetical_aside_frequency: rating = "[1-10]",
    humor_sarcasm_usage: rating = "[1-10]",
    emotional_expressiveness: rating = "[1-10]",
    emphatic_device_usage: rating = "[1-10]",
    quotation_frequency: rating = "[1-10]",
    analogy_usage: rating = "[1-10]",
    sensory_detail_inclusion: rating = "[1-10]",
    onomatopoeia_usage: rating = "[1-10]",
    alliteration_frequency: rating = "[1-10]",
    word_length_preference: text = "[short/long/varied]",
    foreign_phrase_usage: rating = "[1-10]",
    rhetorical_device_usage: rating = "[1-10]",
    statistical_data_usage: rating = "[1-10]",
    personal_opinion_inclusion: rating = "[1-10]",
    transition_usage: rating = "[1-10]",
    reader_question_frequency: rating = "[1-10]",
    imperative_sentence_usage: rating = "[1-10]",
    dialogue_inclusion: rating = "[1-10]",
    regional_dialect_usage: rating = "[1-10]",
    hedging_language_frequency: rating = "[1-10]",
    language_abstraction: text = "[concrete/abstract/mixed]",
    personal_belief_inclusion: rating = "[1-10]",
    repetition_usage: rating = "[1-10]",
    subordinate_clause_frequency: rating = "[1-10]",
    verb_type_preference: text = "[active/stative/mixed]",
    sensory_imagery_usage: rating = "[1-10]",
    symbolism_usage: rating = "[1-10]",
    digression_frequency: rating = "[1-10]",
    formality_level: rating = "[1-10]",
    reflection_inclusion: rating = "[1-10]",
    irony_usage: rating = "[1-10]",
    neologism_frequency: rating = "[1-10]",
    ellipsis_usage: rating = "[1-10]",
    cultural_reference_inclusion: rating = "[1-10]",
    stream_of_consciousness_usage: rating = "[1-10]",

    // Personality
    openness_to_experience: rating = "[1-10]",
    conscientiousness: rating = "[1-10]",
    extraversion: rating = "[1-10]",
    agreeableness: rating = "[1-10]",
    emotional_stability: rating = "[1-10]",
    dominant_motivations: text = "[achievement/affiliation/power/etc.]",
    core_values: text = "[integrity/freedom/knowledge/etc.]",
    decision_making_style: text = "[analytical/intuitive/spontaneous/etc.]",
    empathy_level: rating = "[1-10]",
    self_confidence: rating = "[1-10]",
    risk_taking_tendency: rating = "[1-10]",
    idealism_vs_realism: text = "[idealistic/realistic/mixed]",
    conflict_resolution_style: text = "[assertive/collaborative/avoidant/etc.]",
    relationship_orientation: text = "[independent/communal/mixed]",
    emotional_response_tendency: text = "[calm/reactive/intense]",
    creativity_level: rating = "[1-10]",

    // Demographics
    age: text = "[age or age range]",
    gender: text = "[gender]",
    education_level: text = "[highest level of education]",
    professional_background: text = "[brief description]",
    cultural_background: text = "[brief description]",
    primary_language: text = "[language]",
    language_fluency: text = "[native/fluent/intermediate/beginner]",
}

//! Situational questions from a generative-language service.
//!
//! The service is an external collaborator: the session builder only sees
//! the [`QuestionGenerator`] trait, and every failure of the call collapses
//! to "no question" through [`fetch_situational`].

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bank::QuestionRecord;
use crate::error::GeneratorError;

pub const SITUATIONAL_PREFIX: &str = "Mise en situation";
pub const SITUATIONAL_THEMES: [&str; 2] = ["Laïcité et valeurs", "Droits et devoirs au quotidien"];
pub const QUESTIONS_PER_THEME: usize = 6;

/// A question as returned by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub theme: String,
    pub question: String,
    #[serde(rename = "choix")]
    pub choices: Vec<String>,
    #[serde(rename = "reponse_correcte")]
    pub correct_answer: String,
    #[serde(rename = "indice", default)]
    pub hint: Option<String>,
}

impl GeneratedQuestion {
    pub fn is_well_formed(&self) -> bool {
        self.choices.iter().any(|c| c == &self.correct_answer)
    }

    pub fn into_record(self) -> QuestionRecord {
        let label = situational_label(&self.theme);
        QuestionRecord::new(
            self.question,
            self.choices,
            self.correct_answer,
            self.hint,
            label,
        )
    }
}

pub fn situational_label(theme: &str) -> String {
    format!("{SITUATIONAL_PREFIX} · {theme}")
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, api_key: &str) -> Result<Vec<GeneratedQuestion>, GeneratorError>;
}

/// Ask `generator` for situational questions. Any failure yields an empty
/// list; malformed records are dropped.
pub async fn fetch_situational(
    generator: &dyn QuestionGenerator,
    api_key: &str,
) -> Vec<QuestionRecord> {
    match generator.generate(api_key).await {
        Ok(questions) => {
            let total = questions.len();
            let records: Vec<QuestionRecord> = questions
                .into_iter()
                .filter(GeneratedQuestion::is_well_formed)
                .map(GeneratedQuestion::into_record)
                .collect();
            if records.len() < total {
                warn!(
                    dropped = total - records.len(),
                    "generated questions whose answer is not among the choices"
                );
            }
            info!(count = records.len(), "received situational questions");
            records
        }
        Err(err) => {
            warn!(error = %err, "situational question generation failed");
            Vec::new()
        }
    }
}

pub fn situational_prompt() -> String {
    let [first, second] = SITUATIONAL_THEMES;
    let total = QUESTIONS_PER_THEME * SITUATIONAL_THEMES.len();
    format!(
        "Tu prépares des candidats à l'examen civique pour un titre de séjour en France. \
         Rédige {total} questions à choix multiples de mise en situation : \
         {QUESTIONS_PER_THEME} sur le thème \"{first}\" et {QUESTIONS_PER_THEME} sur le thème \"{second}\". \
         Chaque question décrit une situation concrète de la vie quotidienne et demande quelle règle s'applique. \
         Réponds uniquement avec un tableau JSON, sans texte autour, où chaque élément a la forme \
         {{\"theme\": \"...\", \"question\": \"...\", \"choix\": [\"...\", \"...\", \"...\", \"...\"], \
         \"reponse_correcte\": \"...\", \"indice\": \"...\"}}. \
         \"reponse_correcte\" doit reprendre mot pour mot l'un des quatre choix."
    )
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    // the payload may follow the fence on the same line; any other tag ends the line
    let body = if rest.starts_with(|c: char| c == '[' || c == '{') {
        rest
    } else {
        match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        }
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_questions(text: &str) -> Result<Vec<GeneratedQuestion>, GeneratorError> {
    Ok(serde_json::from_str(strip_code_fences(text))?)
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-1.5-flash".into(),
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("CIVIQUIZ_AI_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("CIVIQUIZ_AI_MODEL").unwrap_or(defaults.model),
        }
    }
}

/// Generator backed by the Generative Language `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    async fn generate(&self, api_key: &str) -> Result<Vec<GeneratedQuestion>, GeneratorError> {
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: situational_prompt(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeneratorError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GeneratorError::EmptyResponse)?;

        parse_questions(&text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PAYLOAD: &str = r#"[
        {"theme": "Laïcité et valeurs", "question": "Un agent de mairie porte un signe religieux ostensible au guichet. Est-ce permis ?", "choix": ["Oui", "Non, il doit rester neutre", "Seulement le vendredi", "Si le maire accepte"], "reponse_correcte": "Non, il doit rester neutre", "indice": "Neutralité du service public"}
    ]"#;

    struct Canned(Result<Vec<GeneratedQuestion>, ()>);

    #[async_trait]
    impl QuestionGenerator for Canned {
        async fn generate(&self, _api_key: &str) -> Result<Vec<GeneratedQuestion>, GeneratorError> {
            self.0.clone().map_err(|_| GeneratorError::EmptyResponse)
        }
    }

    #[test]
    fn strips_fences_with_language_tag() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        assert_eq!(strip_code_fences(&fenced), PAYLOAD.trim());
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_code_fences("```\n[]\n```\n"), "[]");
    }

    #[test]
    fn strips_single_line_fences() {
        assert_eq!(strip_code_fences("```json[1, 2]```"), "[1, 2]");
        assert_eq!(strip_code_fences("```[1, 2]```"), "[1, 2]");

        let inline = format!("```json{}```", PAYLOAD.trim());
        let questions = parse_questions(&inline).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "Non, il doit rester neutre");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }

    #[test]
    fn parses_fenced_payload() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let questions = parse_questions(&fenced).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].choices.len(), 4);
        assert!(questions[0].is_well_formed());
    }

    #[test]
    fn garbage_is_a_payload_error() {
        assert_matches!(
            parse_questions("Voici vos questions !"),
            Err(GeneratorError::Payload(_))
        );
    }

    #[test]
    fn records_carry_situational_label() {
        let question = parse_questions(PAYLOAD).unwrap().remove(0);
        let record = question.into_record();
        assert_eq!(record.theme_label, "Mise en situation · Laïcité et valeurs");
        assert_eq!(record.user_answer(), None);
    }

    #[test]
    fn prompt_names_both_themes() {
        let prompt = situational_prompt();
        for theme in SITUATIONAL_THEMES {
            assert!(prompt.contains(theme));
        }
        assert!(prompt.contains("12 questions"));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let generator = GeminiGenerator::new(GeminiConfig {
            base_url: "http://localhost:9/v1beta/".into(),
            model: "m".into(),
        });
        assert_eq!(
            generator.endpoint(),
            "http://localhost:9/v1beta/models/m:generateContent"
        );
    }

    #[tokio::test]
    async fn failure_collapses_to_no_records() {
        let records = fetch_situational(&Canned(Err(())), "key").await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_generated_records_are_dropped() {
        let mut questions = parse_questions(PAYLOAD).unwrap();
        let mut broken = questions[0].clone();
        broken.correct_answer = "Peut-être".into();
        questions.push(broken);
        let records = fetch_situational(&Canned(Ok(questions)), "key").await;
        assert_eq!(records.len(), 1);
    }
}

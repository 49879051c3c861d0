//! Adapter for the generative-language endpoint producing trivia questions.
//!
//! The request carries a JSON response MIME type and an array-of-objects
//! response schema, but the provider does not enforce the schema, so the
//! returned text is handed to the caller as-is for defensive parsing.

use serde::Deserialize;
use serde_json::{Value, json};

use fitkit_domain as domain;

use crate::http::{HttpRequest, ReqwestSendRequest, SendRequest};

const GENERATE_CONTENT_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

pub struct Gemini<S: SendRequest> {
    sender: S,
    url: String,
    api_key: String,
}

impl Gemini<ReqwestSendRequest> {
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self::with_sender(ReqwestSendRequest::default(), GENERATE_CONTENT_URL, api_key)
    }
}

impl<S: SendRequest> Gemini<S> {
    #[must_use]
    pub fn with_sender(sender: S, url: &str, api_key: &str) -> Self {
        Self {
            sender,
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl<S: SendRequest> domain::TriviaRepository for Gemini<S> {
    async fn generate_questions(&self, prompt: &str) -> Result<String, domain::ReadError> {
        let request = HttpRequest::post(&self.url, generation_body(prompt))
            .header("x-goog-api-key", &self.api_key);
        let response = self
            .sender
            .send(request)
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;
        if !response.is_success() {
            return Err(domain::ReadError::Storage(domain::StorageError::Other(
                format!("{} {}", response.status, response.body).into(),
            )));
        }
        let content: GenerateContentResponse = serde_json::from_str(&response.body)
            .map_err(|err| domain::ReadError::Other(err.into()))?;
        Ok(content
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .unwrap_or_else(|| String::from("[]")))
    }
}

fn generation_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "correctOption": { "type": "NUMBER" },
                    },
                },
            },
        },
    })
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

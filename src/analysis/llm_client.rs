use crate::analysis::response::AnalysisRequest;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_LLM_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

pub trait LLMClient: Send + Sync {
    fn generate(&self, request: &AnalysisRequest) -> Result<String>;
}

pub struct GeminiLLMClient {
    endpoint: String,
    model: String,
    api_key: String,
    http: HttpClient,
}

impl GeminiLLMClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("impossible d'initialiser le client HTTP pour Gemini")?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            http,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

impl LLMClient for GeminiLLMClient {
    fn generate(&self, request: &AnalysisRequest) -> Result<String> {
        let payload = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.system_prompt,
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.user_prompt,
                }],
            }],
        };

        let response = self
            .http
            .post(self.generate_url())
            .json(&payload)
            .send()
            .context("appel HTTP à l'API Gemini impossible")?
            .error_for_status()
            .context("l'API Gemini a renvoyé un statut d'erreur")?;

        let raw: GeminiResponse = response
            .json()
            .context("réponse de l'API Gemini illisible")?;

        let candidate = raw
            .candidates
            .into_iter()
            .next()
            .context("réponse Gemini sans candidat")?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        Ok(text.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

#[derive(Clone, Default)]
pub struct MockLLMClient {
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl MockLLMClient {
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().push_back(response.into());
    }
}

impl LLMClient for MockLLMClient {
    fn generate(&self, _: &AnalysisRequest) -> Result<String> {
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("aucune réponse mock disponible"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_response_extracts_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"data\": "}, {"text": "[]}"}]}}
            ]
        }"#;
        let raw: GeminiResponse = serde_json::from_str(json).unwrap();
        let text: String = raw.candidates[0]
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        assert_eq!(text, "{\"data\": []}");
    }

    #[test]
    fn mock_errors_once_drained() {
        let mock = MockLLMClient::default();
        mock.push_response("ok");
        let request = AnalysisRequest {
            system_prompt: String::new(),
            user_prompt: String::new(),
        };
        assert_eq!(mock.generate(&request).unwrap(), "ok");
        assert!(mock.generate(&request).is_err());
    }
}

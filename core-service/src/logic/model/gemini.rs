//! Gemini Classifier
//!
//! Calls the Gemini `generateContent` REST endpoint with the turn history and
//! the scoring instructions, then extracts the JSON verdict from the reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::extract::{format_history, parse_reply};
use super::types::{ModelError, ModelJudgement};
use super::ModelClassifier;
use crate::constants::GEMINI_API_BASE;
use crate::logic::types::Turn;

const SYSTEM_PROMPT: &str = r#"You are VoiceShield-Detect, a model that detects scam intent on live phone calls.
Analyze the ongoing conversation and output a STRICT JSON object.

TYPES OF SCAMS:
- Bank / UPI / KYC scams (OTP, PIN, CVV requests)
- Refund / cashback / lottery scams
- Remote access (AnyDesk, TeamViewer)
- Impersonation (Bank, Police, Support)

SCORING:
- 0-15 SAFE: Normal talk.
- 16-35 LOW: Slightly suspicious.
- 36-65 MEDIUM: Strong scam hints (money + urgency).
- 66-100 HIGH: Direct pressure for OTP/PIN/Remote Access.

OUTPUT FORMAT (JSON ONLY):
{
  "risk_score": int,
  "risk_label": "SAFE" | "LOW" | "MEDIUM" | "HIGH",
  "explanation": "1-2 specific sentences",
  "triggers": ["REQUEST_OTP", "REQUEST_UPI_PIN", "IMPERSONATION_BANK", ...]
}"#;

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClassifier {
    /// `timeout` bounds the HTTP exchange; the fusion policy applies its own
    /// budget on top.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, ModelError> {
        if api_key.trim().is_empty() {
            return Err(ModelError::NotConfigured("empty API key".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point at another host (proxy, local mock)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Full prompt sent for one transcript
pub fn build_prompt(turns: &[Turn]) -> String {
    format!(
        "{}\n\nConversation so far:\n{}\n\nAnalyze and return JSON:",
        SYSTEM_PROMPT,
        format_history(turns)
    )
}

#[async_trait]
impl ModelClassifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn judge(&self, turns: &[Turn]) -> Result<ModelJudgement, ModelError> {
        let prompt = build_prompt(turns);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body.text();
        log::debug!("Gemini reply ({} chars)", text.len());

        parse_reply(&text)
    }
}

//! Client for the Gemini `generateContent` endpoint.
//!
//! Sends the most recent entries with a prompt asking for a short emotional
//! analysis and constrains the reply to a four-field JSON object. Every
//! failure is logged and reported to the caller as "no insight".

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::journal_entry::JournalEntry;

/// How many of the newest entries are sent as context.
pub const CONTEXT_ENTRIES: usize = 7;

/// Entries the caller must have before asking for an insight.
pub const MIN_ENTRIES_FOR_INSIGHT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub summary: String,
    pub dominant_mood: String,
    pub recommendations: Vec<String>,
    pub growth_focus: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsightClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl InsightClient {
    pub fn new(config: &InsightConfig) -> Result<Self, InsightError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(InsightClient {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Single best-effort attempt. `None` on any failure.
    pub async fn analyze(&self, entries: &[JournalEntry]) -> Option<AiInsight> {
        match self.try_analyze(entries).await {
            Ok(insight) => {
                info!(dominant_mood = %insight.dominant_mood, "insight generated");
                Some(insight)
            }
            Err(InsightError::NoEntries) => None,
            Err(e) => {
                warn!(error = %e, "insight analysis failed");
                None
            }
        }
    }

    async fn try_analyze(&self, entries: &[JournalEntry]) -> Result<AiInsight, InsightError> {
        if entries.is_empty() {
            return Err(InsightError::NoEntries);
        }
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = request_body(&build_prompt(entries));

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "insight response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Api { status, body });
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

fn build_prompt(entries: &[JournalEntry]) -> String {
    let context = entries
        .iter()
        .take(CONTEXT_ENTRIES)
        .map(|e| {
            format!(
                "Date: {}, Mood: {}, Content: {}",
                e.date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                e.mood.id(),
                e.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        "Read the journal entries below and describe the writer's emotional state. \
         Reply with a JSON object holding a short summary, the dominant mood, \
         a few recommendations for mental wellness and one area to focus on for growth.\n\n\
         Entries:\n{context}"
    )
}

fn request_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "A brief, empathetic summary of the writer's recent emotional state."
                    },
                    "dominantMood": {
                        "type": "STRING",
                        "description": "The overarching emotional theme."
                    },
                    "recommendations": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Actionable tips for the writer."
                    },
                    "growthFocus": {
                        "type": "STRING",
                        "description": "One specific thing to reflect on or work on tomorrow."
                    }
                },
                "required": ["summary", "dominantMood", "recommendations", "growthFocus"]
            }
        }
    })
}

fn parse_response(body: &str) -> Result<AiInsight, InsightError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or(InsightError::EmptyResponse)?;

    Ok(serde_json::from_str(text.trim())?)
}

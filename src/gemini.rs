use crate::{MonitorConfig, MonitorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Anything that can answer a single prompt with text.
#[async_trait]
pub trait ContentGenerator {
    /// Sends `query` and returns the text of the first answer.
    async fn ask(&self, query: &str) -> Result<String>;
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One segment of a candidate's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    /// Inline data, function calls and anything else that is not plain text.
    Other(serde_json::Value),
}

impl Part {
    /// A short name for the segment kind, used in error messages: the first key of the
    /// segment object as it appeared in the response.
    pub fn kind(&self) -> String {
        match self {
            Part::Text { .. } => "text".to_string(),
            Part::Other(serde_json::Value::Object(map)) => map
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| "empty".to_string()),
            Part::Other(_) => "unknown".to_string(),
        }
    }
}

/// Extracts the text of the first segment of the first candidate.
///
/// # Returns
///
/// The answer text, or a `MalformedResponse` / `UnsupportedSegmentKind` error.
pub fn extract_answer(response: &GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| MonitorError::MalformedResponse("no candidates".to_string()))?;

    let content = candidate.content.as_ref().ok_or_else(|| {
        MonitorError::MalformedResponse("first candidate has no content".to_string())
    })?;

    match content.parts.first() {
        Some(Part::Text { text }) => Ok(text.clone()),
        Some(other) => Err(MonitorError::UnsupportedSegmentKind(other.kind())),
        None => Err(MonitorError::MalformedResponse(
            "first candidate has no content parts".to_string(),
        )),
    }
}

/// The `GeminiClient` struct issues `generateContent` calls against the Gemini REST API.
pub struct GeminiClient {
    /// The HTTP client used for making requests.
    client: Client,
    api_key: String,
    /// The fully built `generateContent` endpoint for the configured model.
    endpoint: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a new `GeminiClient` for the configured model.
    ///
    /// # Arguments
    ///
    /// * `config` - The monitor configuration holding the key, model and base URL.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `GeminiClient`, or an error if the HTTP client could not be created.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(MonitorError::ClientBuild)?;

        let model = config.model.trim_start_matches("models/");
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base_url.trim_end_matches('/'),
            urlencoding::encode(model)
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            timeout: crate::REQUEST_TIMEOUT,
        })
    }

    /// Overrides the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The `generateContent` URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one prompt and returns the decoded response, bounded by the client timeout.
    pub async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let call = async {
            debug!("POST {}", self.endpoint);

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-goog-api-key", &self.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            debug!("Response status: {}", status);

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(MonitorError::Api { status, body });
            }

            Ok::<_, MonitorError>(response.json::<GenerateContentResponse>().await?)
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| MonitorError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn ask(&self, query: &str) -> Result<String> {
        let response = self.generate_content(query).await?;

        extract_answer(&response).inspect_err(|_| {
            let dump = serde_json::to_string_pretty(&response)
                .unwrap_or_else(|e| format!("<unserializable response: {e}>"));
            error!("Unexpected response from Gemini API:\n{}", dump);
        })
    }
}

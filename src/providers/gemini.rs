use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::assistant::{Assistant, ChatReply, ChatRole, ChatTurn, CurrencyPair, WebSource};
use crate::core::config::GeminiConfig;

const CHAT_PERSONA: &str = "You are a friendly and helpful AI assistant for fxdesk, a currency exchange tool. \
Answer questions about currency conversion, exchange rates, the tool's features (converter, history, \
expense calculator, favorites) and general information about currencies. For recent financial news or \
very specific real-time data, use your general knowledge or suggest consulting a financial expert. \
Use the Google Search tool when web results would help. Always be polite and concise.";

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    retries: usize,
    retry_delay_ms: u64,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("fxdesk/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GeminiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<Candidate> {
        let url = self.endpoint();
        debug!("Requesting content from {}", url);

        let url = url.as_str();
        let response = with_retry(
            || async move {
                self.http
                    .post(url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(request)
                    .send()
                    .await?
                    .error_for_status()
            },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| anyhow!("Gemini request error: {} for model: {}", e, self.model))?;

        let data: GenerateContentResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Gemini response for model: {}", self.model))?;

        data.candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))
    }

    async fn prompt(&self, prompt: String) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::new("user", prompt)],
            system_instruction: None,
            tools: vec![],
        };
        self.generate(&request).await?.text()
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    #[instrument(name = "GeminiMarketTrend", skip(self), fields(pair = %pair))]
    async fn market_trend(&self, pair: CurrencyPair, rate: f64) -> Result<String> {
        let CurrencyPair { from, to } = pair;
        self.prompt(format!(
            "As a financial analyst, give a brief (1-2 sentences) market trend suggestion for \
             exchanging {from} to {to}. The current rate is 1 {from} = {rate:.4} {to}. Mention general \
             market sentiment or recent volatility only in broad terms, and keep it generic and cautious."
        ))
        .await
    }

    #[instrument(name = "GeminiOutlook", skip(self), fields(pair = %pair))]
    async fn rate_outlook(&self, pair: CurrencyPair) -> Result<String> {
        self.prompt(format!(
            "Give a very short (1 sentence) speculative outlook for the {pair} exchange rate over the \
             next 7 days. This is not financial advice."
        ))
        .await
    }

    #[instrument(name = "GeminiAlert", skip(self), fields(pair = %pair))]
    async fn alert_suggestion(&self, pair: CurrencyPair, rate: f64) -> Result<String> {
        let hint = rate * 0.98;
        self.prompt(format!(
            "Based on the current {pair} rate of {rate:.4}, suggest in one sentence a hypothetical \
             target rate worth setting an exchange alert for, for example around {hint:.4}. This is \
             not financial advice."
        ))
        .await
    }

    #[instrument(name = "GeminiChat", skip(self, history), fields(turns = history.len()))]
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                Content::new(role, turn.text.clone())
            })
            .collect();
        contents.push(Content::new("user", message.to_string()));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part {
                    text: Some(CHAT_PERSONA.to_string()),
                }],
            }),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let candidate = self.generate(&request).await?;
        let sources = candidate.sources();
        let text = candidate.text()?;
        Ok(ChatReply { text, sources })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn new(role: &str, text: String) -> Self {
        Content {
            role: Some(role.to_string()),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize, Debug)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize, Debug)]
struct GoogleSearch {}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

impl Candidate {
    fn text(&self) -> Result<String> {
        let text: String = self
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("Gemini response had no text"));
        }
        Ok(text.to_string())
    }

    fn sources(&self) -> Vec<WebSource> {
        self.grounding_metadata
            .iter()
            .flat_map(|m| m.grounding_chunks.iter())
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| WebSource {
                uri: web.uri.clone(),
                title: web.title.clone().unwrap_or_else(|| web.uri.clone()),
            })
            .collect()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize, Debug)]
struct WebChunk {
    uri: String,
    title: Option<String>,
}

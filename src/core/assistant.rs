//! AI assistant abstractions: market insights and chat.

use crate::core::currency::CurrencyCode;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    MarketTrend,
    RateOutlook,
    AlertSuggestion,
}

impl Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InsightKind::MarketTrend => "AI Market Trend Suggestion",
                InsightKind::RateOutlook => "AI Predictive Analysis (7 Days)",
                InsightKind::AlertSuggestion => "AI Alert Suggestion",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// A web page the model grounded its answer on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub sources: Vec<WebSource>,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// One or two sentences on the market trend for exchanging `pair.from` into `pair.to`.
    async fn market_trend(&self, pair: CurrencyPair, rate: f64) -> Result<String>;

    /// A one-sentence speculative 7-day outlook.
    async fn rate_outlook(&self, pair: CurrencyPair) -> Result<String>;

    /// A hypothetical alert level worth watching.
    async fn alert_suggestion(&self, pair: CurrencyPair, rate: f64) -> Result<String>;

    async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply>;
}

/// Whether AI features can be used. Passed explicitly to whoever needs it.
#[derive(Clone)]
pub enum AiCapability {
    Unavailable,
    Client(Arc<dyn Assistant>),
}

impl AiCapability {
    pub fn client(&self) -> Option<&Arc<dyn Assistant>> {
        match self {
            AiCapability::Unavailable => None,
            AiCapability::Client(client) => Some(client),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AiCapability::Client(_))
    }
}

impl std::fmt::Debug for AiCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiCapability::Unavailable => f.write_str("Unavailable"),
            AiCapability::Client(_) => f.write_str("Client(..)"),
        }
    }
}

/// Results of the three insight requests; each may fail independently.
#[derive(Debug)]
pub struct Insights {
    pub trend: Result<String>,
    pub outlook: Result<String>,
    pub alert: Result<String>,
}

/// Requests all three insights concurrently.
pub async fn fetch_insights(assistant: &dyn Assistant, pair: CurrencyPair, rate: f64) -> Insights {
    let (trend, outlook, alert) = futures::join!(
        assistant.market_trend(pair, rate),
        assistant.rate_outlook(pair),
        assistant.alert_suggestion(pair, rate),
    );
    Insights {
        trend,
        outlook,
        alert,
    }
}

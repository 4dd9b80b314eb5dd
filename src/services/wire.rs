//! JSON shapes exchanged with the chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kernel::event::Language;
use crate::kernel::intent::types::{ResolvedReply, Section};

/// Inbound body as the server sees it. Both fields stay loosely typed so that a
/// missing or non-string `message` degrades to the default reply instead of a 4xx.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub language: Value,
}

impl ChatRequest {
    /// Non-string messages read as empty.
    pub fn message_text(&self) -> &str {
        self.message.as_str().unwrap_or("")
    }

    /// Unknown or missing tags fall back to `default`.
    pub fn language_or(&self, default: Language) -> Language {
        self.language
            .as_str()
            .and_then(|tag| tag.parse().ok())
            .unwrap_or(default)
    }
}

/// Outbound body as the client sends it.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingChatRequest<'a> {
    pub message: &'a str,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "navigateToSection")]
    pub navigate_to_section: Option<Section>,
}

impl From<ResolvedReply> for ChatResponse {
    fn from(reply: ResolvedReply) -> Self {
        Self {
            response: reply.body,
            navigate_to_section: reply.navigation_target,
        }
    }
}

impl From<ChatResponse> for ResolvedReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            body: response.response,
            navigation_target: response.navigate_to_section,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub resolutions: u64,
    pub fallbacks: u64,
}

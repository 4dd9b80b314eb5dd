use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::wire::{ChatResponse, OutgoingChatRequest};
use crate::error::{ChatError, Result};
use crate::kernel::event::Utterance;
use crate::kernel::intent::types::ResolvedReply;

/// Talks to a remote chat endpoint. One request per utterance, no retries.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, utterance: &Utterance) -> Result<ResolvedReply> {
        let request_body = OutgoingChatRequest {
            message: &utterance.text,
            language: utterance.language,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        let reply: ChatResponse = response.json().await?;
        debug!(navigation = ?reply.navigate_to_section, "chat reply received");
        Ok(reply.into())
    }
}

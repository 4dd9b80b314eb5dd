use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;
use crate::kernel::intent::types::Section;

/// Language selector supplied by the caller. Never detected from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cn,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Cn => "cn",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "cn" => Ok(Language::Cn),
            other => Err(ChatError::UnknownLanguage(other.to_string())),
        }
    }
}

/// One submitted chat message. Consumed once by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub language: Language,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Correlates a user submission with the bot reply it is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeId(pub Uuid);

impl ExchangeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Why an in-flight reveal was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptionSource {
    NewMessage,
    LanguageSwitch,
    ChatClosed,
    Teardown,
}

/// Notifications the presenter hands to its host, in emission order.
/// The presenter never renders; the host decides what each one looks like.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PresenterEvent {
    MessageStarted {
        message_id: MessageId,
        sender: Sender,
        paragraphs: usize,
    },
    ParagraphRevealed {
        message_id: MessageId,
        index: usize,
        html: String,
        /// Set only on the last paragraph of a message.
        timestamp: Option<DateTime<Local>>,
    },
    TypingIndicator {
        visible: bool,
    },
    ScrollToLatest,
    NavigateTo(Section),
    SessionCompleted {
        message_id: MessageId,
    },
    SessionAbandoned {
        message_id: MessageId,
        revealed: usize,
        total: usize,
        source: InterruptionSource,
    },
}

impl PresenterEvent {
    pub fn is_reveal(&self) -> bool {
        matches!(self, PresenterEvent::ParagraphRevealed { .. })
    }
}

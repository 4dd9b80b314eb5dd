use serde::{Deserialize, Serialize};

use crate::kernel::event::{InterruptionSource, Language, MessageId};
use crate::kernel::intent::types::{MatchKind, RuleMatch};

// Allowed: ids, languages, counts, enums
// Forbidden: utterance text, reply bodies

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Resolution {
        language: Language,
        kind: ResolutionKind,
    },

    RevealLifecycle {
        message_id: MessageId,
        event: RevealEventKind,
    },

    Interruption {
        source: InterruptionSource,
        revealed: usize,
        total: usize,
    },

    /// A reply arrived for an exchange that was already superseded.
    StaleReply,

    /// A timer fired after its session was replaced or torn down.
    StaleTimer,

    TransportFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionKind {
    Exact,
    Keyword,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealEventKind {
    Started { paragraphs: usize },
    ParagraphRevealed { index: usize },
    Completed,
}

impl From<&RuleMatch> for ResolutionKind {
    fn from(matched: &RuleMatch) -> Self {
        match matched {
            RuleMatch::Rule { kind: MatchKind::Exact, .. } => ResolutionKind::Exact,
            RuleMatch::Rule { kind: MatchKind::Keyword, .. } => ResolutionKind::Keyword,
            RuleMatch::Fallback => ResolutionKind::Fallback,
        }
    }
}

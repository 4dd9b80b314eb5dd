use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::event::Language;
use crate::kernel::paragraph::wrap_paragraph;

/// Logical page anchor the host scrolls to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    About,
    Work,
    Services,
    Contact,
}

impl Section {
    pub fn anchor(&self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Work => "work",
            Section::Services => "services",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Raw utterance equals a trigger. No case folding, no trimming.
    Exact,
    /// Lower-cased utterance contains a trigger. Triggers are stored lower-case.
    Keyword,
}

/// One entry of the ordered rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRule {
    pub id: &'static str,
    pub kind: MatchKind,
    pub language: Language,
    pub triggers: &'static [&'static str],
    pub template: &'static str,
    pub navigation: Option<Section>,
}

impl MatchRule {
    pub fn matches(&self, raw: &str, lowered: &str) -> bool {
        match self.kind {
            MatchKind::Exact => self.triggers.iter().any(|t| *t == raw),
            MatchKind::Keyword => self
                .triggers
                .iter()
                .any(|t| !t.is_empty() && lowered.contains(t)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReply {
    pub body: String,
    pub navigation_target: Option<Section>,
}

pub const TRANSPORT_FALLBACK_EN: &str = "Sorry, something went wrong. Please try again.";
pub const TRANSPORT_FALLBACK_CN: &str = "抱歉，出了点问题，请重试。";

impl ResolvedReply {
    /// Shown as a bot message when the chat endpoint cannot be reached.
    pub fn transport_fallback(language: Language) -> Self {
        let text = match language {
            Language::En => TRANSPORT_FALLBACK_EN,
            Language::Cn => TRANSPORT_FALLBACK_CN,
        };
        Self {
            body: wrap_paragraph(text),
            navigation_target: None,
        }
    }
}

/// Which rule answered, if any. Carries ids only, never the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleMatch {
    Rule { id: &'static str, kind: MatchKind },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reply: ResolvedReply,
    pub matched: RuleMatch,
}

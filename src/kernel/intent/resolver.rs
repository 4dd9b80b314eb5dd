use tracing::debug;

use crate::kernel::event::{Language, Utterance};
use crate::kernel::paragraph::{has_paragraph_markup, wrap_paragraph};

use super::rules::{default_reply, RULES};
use super::types::{MatchKind, MatchRule, ResolvedReply, Resolution, RuleMatch};

/// Stateless classifier from utterance to canned reply.
///
/// Pure and total: the same `(text, language)` always yields the same reply, and
/// anything that matches no rule gets the language's default reply.
#[derive(Debug, Clone)]
pub struct IntentResolver {
    rules: Vec<MatchRule>,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentResolver {
    pub fn new() -> Self {
        Self::with_rules(RULES.to_vec())
    }

    pub fn with_rules(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn resolve(&self, text: &str, language: Language) -> ResolvedReply {
        self.resolve_detailed(text, language).reply
    }

    pub fn resolve_utterance(&self, utterance: &Utterance) -> ResolvedReply {
        self.resolve(&utterance.text, utterance.language)
    }

    pub fn resolve_detailed(&self, text: &str, language: Language) -> Resolution {
        match self.find_rule(text, language) {
            Some(rule) => {
                debug!(rule = rule.id, kind = ?rule.kind, %language, "rule matched");
                Resolution {
                    reply: ResolvedReply {
                        body: normalize_body(rule.template),
                        navigation_target: rule.navigation,
                    },
                    matched: RuleMatch::Rule {
                        id: rule.id,
                        kind: rule.kind,
                    },
                }
            }
            None => {
                debug!(%language, "no rule matched, using default reply");
                Resolution {
                    reply: ResolvedReply {
                        body: normalize_body(default_reply(language)),
                        navigation_target: None,
                    },
                    matched: RuleMatch::Fallback,
                }
            }
        }
    }

    fn find_rule(&self, text: &str, language: Language) -> Option<&MatchRule> {
        if text.trim().is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();

        // Exact rules shadow keyword rules regardless of table position.
        self.scoped(language, MatchKind::Exact)
            .find(|r| r.matches(text, &lowered))
            .or_else(|| {
                self.scoped(language, MatchKind::Keyword)
                    .find(|r| r.matches(text, &lowered))
            })
    }

    fn scoped(&self, language: Language, kind: MatchKind) -> impl Iterator<Item = &MatchRule> + '_ {
        self.rules
            .iter()
            .filter(move |r| r.language == language && r.kind == kind)
    }
}

fn normalize_body(template: &str) -> String {
    if has_paragraph_markup(template) {
        template.to_string()
    } else {
        wrap_paragraph(template)
    }
}

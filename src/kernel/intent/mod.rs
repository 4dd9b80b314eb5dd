pub mod resolver;
pub mod rules;
pub mod types;

pub use resolver::IntentResolver;
pub use types::{MatchKind, MatchRule, ResolvedReply, Resolution, RuleMatch, Section};

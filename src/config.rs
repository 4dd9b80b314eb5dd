use std::env;
use std::fs;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChatError, Result};
use crate::kernel::event::Language;
use crate::kernel::reactor::ReactorConfig;
use crate::kernel::reveal::RevealTiming;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

const DELAY_RANGE_MS: RangeInclusive<u64> = 0..=60_000;
const TIMEOUT_RANGE_MS: RangeInclusive<u64> = 100..=120_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub bind: SocketAddr,
    pub default_language: Language,
    pub display_delay_ms: u64,
    pub paragraph_delay_ms: u64,
    pub navigation_delay_ms: u64,
    /// Artificial "thinking" pause before the endpoint answers.
    pub processing_delay_ms: u64,
    /// Remote chat endpoint. Unset means the console resolves locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_language: Language::En,
            display_delay_ms: 300,
            paragraph_delay_ms: 2_000,
            navigation_delay_ms: 1_000,
            processing_delay_ms: 800,
            endpoint: None,
            request_timeout_ms: 5_000,
        }
    }
}

impl ChatConfig {
    /// Defaults, then the JSON file named by `FOLIO_CONFIG`, then `FOLIO_*` overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("FOLIO_CONFIG") {
            Ok(path) => Self::load_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("FOLIO_HTTP_BIND") {
            self.bind = bind
                .trim()
                .parse()
                .map_err(|_| ChatError::Config(format!("FOLIO_HTTP_BIND is not a socket address: {bind}")))?;
        }
        if let Some(language) = lookup("FOLIO_DEFAULT_LANGUAGE") {
            self.default_language = language.parse()?;
        }
        if let Some(endpoint) = lookup("FOLIO_CHAT_ENDPOINT") {
            let endpoint = endpoint.trim();
            self.endpoint = (!endpoint.is_empty()).then(|| endpoint.to_string());
        }

        override_ms(&lookup, "FOLIO_DISPLAY_DELAY_MS", DELAY_RANGE_MS, &mut self.display_delay_ms);
        override_ms(&lookup, "FOLIO_PARAGRAPH_DELAY_MS", DELAY_RANGE_MS, &mut self.paragraph_delay_ms);
        override_ms(&lookup, "FOLIO_NAVIGATION_DELAY_MS", DELAY_RANGE_MS, &mut self.navigation_delay_ms);
        override_ms(&lookup, "FOLIO_PROCESSING_DELAY_MS", DELAY_RANGE_MS, &mut self.processing_delay_ms);
        override_ms(&lookup, "FOLIO_REQUEST_TIMEOUT_MS", TIMEOUT_RANGE_MS, &mut self.request_timeout_ms);
        Ok(())
    }

    pub fn reactor_config(&self) -> ReactorConfig {
        ReactorConfig {
            timing: RevealTiming {
                display_delay: Duration::from_millis(self.display_delay_ms),
                paragraph_delay: Duration::from_millis(self.paragraph_delay_ms),
            },
            navigation_delay: Duration::from_millis(self.navigation_delay_ms),
            language: self.default_language,
        }
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn override_ms<F>(lookup: &F, key: &str, range: RangeInclusive<u64>, slot: &mut u64)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<u64>().ok().filter(|v| range.contains(v)) {
        Some(value) => *slot = value,
        None => warn!(key, value = %raw, "ignoring out-of-range override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_bind_matches_constant() {
        assert_eq!(ChatConfig::default().bind.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn overrides_apply_and_bad_numbers_are_ignored() {
        let mut config = ChatConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("FOLIO_HTTP_BIND", "0.0.0.0:8080"),
                ("FOLIO_DEFAULT_LANGUAGE", "cn"),
                ("FOLIO_PARAGRAPH_DELAY_MS", "1500"),
                ("FOLIO_DISPLAY_DELAY_MS", "not-a-number"),
                ("FOLIO_REQUEST_TIMEOUT_MS", "5"),
                ("FOLIO_CHAT_ENDPOINT", "  "),
            ]))
            .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.default_language, Language::Cn);
        assert_eq!(config.paragraph_delay_ms, 1_500);
        assert_eq!(config.display_delay_ms, 300);
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn invalid_bind_is_a_config_error() {
        let mut config = ChatConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("FOLIO_HTTP_BIND", "nowhere")]))
            .unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn partial_json_file_keeps_defaults() {
        let config: ChatConfig =
            serde_json::from_str(r#"{ "paragraph_delay_ms": 10, "default_language": "cn" }"#).unwrap();
        assert_eq!(config.paragraph_delay_ms, 10);
        assert_eq!(config.default_language, Language::Cn);
        assert_eq!(config.processing_delay_ms, 800);

        let reactor = config.reactor_config();
        assert_eq!(reactor.timing.paragraph_delay, Duration::from_millis(10));
        assert_eq!(reactor.language, Language::Cn);
    }
}

//! Runtime configuration, built once at startup and handed to every component
//! that talks to the backend.

use crate::types::Language;
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_VAR: &str = "FRESHAIR_API_URL";
pub const LANG_VAR: &str = "FRESHAIR_LANG";

/// Bundled config for mobile and web builds
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub default_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            default_language: Language::En,
        }
    }
}

impl AppConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(Some(api_base_url)),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = normalize_base_url(lookup(API_URL_VAR).as_deref());
        let default_language = lookup(LANG_VAR)
            .as_deref()
            .and_then(Language::from_code)
            .unwrap_or_default();
        Self {
            api_base_url,
            default_language,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: called at startup before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
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
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.default_language, Language::En);
    }

    #[test]
    fn trims_url_and_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "  https://api.freshair.test/ "),
            (LANG_VAR, "ta"),
        ]));
        assert_eq!(config.api_base_url, "https://api.freshair.test");
        assert_eq!(config.default_language, Language::Ta);
        assert_eq!(
            config.endpoint("/api/chat"),
            "https://api.freshair.test/api/chat"
        );
    }

    #[test]
    fn blank_url_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[(API_URL_VAR, "   ")]));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn parses_bundled_lines() {
        let parsed: Vec<_> = parse_env_lines("# comment\n\nA = 1\nB=two\nbroken\n").collect();
        assert_eq!(parsed, vec![("A", "1"), ("B", "two")]);
    }
}

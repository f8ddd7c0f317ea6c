//! Spell-check configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_AFF_URL: &str = "/dictionaries/en_US.aff";
const DEFAULT_DIC_URL: &str = "/dictionaries/en_US.dic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpellCheckConfig {
    /// Where the affix rules are fetched from.
    pub affix_url: String,
    /// Where the word list is fetched from.
    pub dictionary_url: String,
    /// Quiet period after an edit before the text is re-checked.
    #[serde(with = "millis")]
    pub rescan_debounce: Duration,
    /// How long a check may run before it yields.
    #[serde(with = "millis")]
    pub yield_budget: Duration,
    /// Default number of suggestions per word.
    pub suggestion_limit: usize,
    /// Send custom-word changes as one `ADD_WORDS`/`REMOVE_WORDS` pair
    /// instead of one message per word.
    pub batch_sync: bool,
}

impl Default for SpellCheckConfig {
    fn default() -> Self {
        Self {
            affix_url: DEFAULT_AFF_URL.to_string(),
            dictionary_url: DEFAULT_DIC_URL.to_string(),
            rescan_debounce: Duration::from_millis(300),
            yield_budget: Duration::from_millis(16),
            suggestion_limit: 5,
            batch_sync: false,
        }
    }
}

impl SpellCheckConfig {
    /// Load config from environment variables.
    ///
    /// - `SCRIVENER_AFF_URL`: affix resource location
    /// - `SCRIVENER_DIC_URL`: word-list resource location
    /// - `SCRIVENER_YIELD_MS`: yield budget in milliseconds
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SCRIVENER_AFF_URL") {
            config.affix_url = url;
        }
        if let Ok(url) = std::env::var("SCRIVENER_DIC_URL") {
            config.dictionary_url = url;
        }
        match std::env::var("SCRIVENER_YIELD_MS").map(|v| v.parse::<u64>()) {
            Ok(Ok(ms)) => config.yield_budget = Duration::from_millis(ms),
            Ok(Err(e)) => {
                tracing::warn!(target: "scrivener::config", "ignoring SCRIVENER_YIELD_MS: {e}")
            }
            Err(_) => {}
        }
        config
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SpellCheckConfig =
            serde_json::from_str(r#"{"yieldBudget": 8, "batchSync": true}"#).unwrap();
        assert_eq!(config.yield_budget, Duration::from_millis(8));
        assert!(config.batch_sync);
        assert_eq!(config.rescan_debounce, Duration::from_millis(300));
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.affix_url, DEFAULT_AFF_URL);
    }
}

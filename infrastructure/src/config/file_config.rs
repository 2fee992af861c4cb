//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; mapping to runtime types happens at
//! the call site.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation provider settings
    pub provider: FileProviderConfig,
    /// Negotiation run settings
    pub negotiation: FileNegotiationConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning all detected issues.
    ///
    /// Issues are warnings: the caller decides whether to proceed.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.provider.model.trim().is_empty() {
            issues.push("provider.model is empty".to_string());
        }
        if self.provider.base_url.trim().is_empty() {
            issues.push("provider.base_url is empty".to_string());
        }
        if self.negotiation.rounds == 0 {
            issues.push("negotiation.rounds is 0; nothing will happen".to_string());
        }
        if self.negotiation.budget_units == 0 {
            issues.push("negotiation.budget_units is 0; every selection will overspend".to_string());
        }
        if !matches!(
            self.negotiation.turn_policy.as_str(),
            "round-robin" | "keyword-weighted"
        ) {
            issues.push(format!(
                "negotiation.turn_policy '{}' is not one of: round-robin, keyword-weighted",
                self.negotiation.turn_policy
            ));
        }

        issues
    }
}

/// Generation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key (the key itself never
    /// lives in the config file)
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Negotiation run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNegotiationConfig {
    pub rounds: u32,
    pub budget_units: u32,
    /// "round-robin" or "keyword-weighted"
    pub turn_policy: String,
    /// Transcript entries of conversational context per turn
    pub context_window: usize,
}

impl Default for FileNegotiationConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            budget_units: 14,
            turn_policy: "round-robin".to_string(),
            context_window: 5,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// JSONL negotiation log; disabled when unset
    pub transcript_log: Option<PathBuf>,
    /// Directory for exported summaries; disabled when unset
    pub summary_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.provider.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.negotiation.budget_units, 14);
        assert_eq!(config.negotiation.turn_policy, "round-robin");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml_from_str(
            r#"
            [negotiation]
            rounds = 5
            turn_policy = "keyword-weighted"
            "#,
        );
        assert_eq!(config.negotiation.rounds, 5);
        assert_eq!(config.negotiation.turn_policy, "keyword-weighted");
        assert_eq!(config.negotiation.budget_units, 14);
        assert_eq!(config.provider.model, "llama3-70b-8192");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let config: FileConfig = toml_from_str(
            r#"
            [provider]
            model = ""

            [negotiation]
            rounds = 0
            turn_policy = "coin-flip"
            "#,
        );
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.contains("provider.model")));
        assert!(issues.iter().any(|i| i.contains("rounds")));
        assert!(issues.iter().any(|i| i.contains("coin-flip")));
    }

    fn toml_from_str(raw: &str) -> FileConfig {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };
        Figment::new()
            .merge(figment::providers::Serialized::defaults(FileConfig::default()))
            .merge(Toml::string(raw))
            .extract()
            .unwrap()
    }
}

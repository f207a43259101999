//! Configuration management for Engine Agent
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Only `[server]` is required; every other section falls back to defaults.

use crate::error::{AppError, AppResult};
use crate::router::IntentCategory;
use crate::router::rule_based::DEFAULT_MAX_QUERY_CHARS;
use crate::router::rules::{DEFAULT_KEYWORD_WEIGHT, DEFAULT_REGEX_WEIGHT, RuleSet};
use crate::session::DEFAULT_MAX_SESSIONS;
use crate::session::SubscriptionState;
use crate::session::history::{DEFAULT_MAX_ENTRIES, DEFAULT_PREVIEW_CHARS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Log levels accepted in `[observability]`
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Subscription toggles every new session starts with
    #[serde(default)]
    pub subscriptions: SubscriptionState,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Routing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    /// Longest accepted query, in Unicode characters
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_query_chars: default_max_query_chars(),
        }
    }
}

fn default_max_query_chars() -> usize {
    DEFAULT_MAX_QUERY_CHARS
}

/// Classifier weights and custom rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Weight added per matching regex rule
    #[serde(default = "default_regex_weight")]
    pub regex_weight: u32,
    /// Weight added per matching literal keyword rule
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: u32,
    /// Rules appended to the built-in table (`[[classifier.rules]]`)
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            regex_weight: default_regex_weight(),
            keyword_weight: default_keyword_weight(),
            rules: Vec::new(),
        }
    }
}

fn default_regex_weight() -> u32 {
    DEFAULT_REGEX_WEIGHT
}

fn default_keyword_weight() -> u32 {
    DEFAULT_KEYWORD_WEIGHT
}

/// Whether a rule pattern is a literal substring or a regular expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Literal,
    Regex,
}

/// One `[[classifier.rules]]` entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomRule {
    pub category: IntentCategory,
    pub pattern: String,
    #[serde(default)]
    pub kind: PatternKind,
    /// Defaults to the configured weight for the pattern kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Request history configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_history_max_entries(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_history_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

/// Session table configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionsConfig {
    /// Sessions tracked before the least recently used one is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            routing: RoutingConfig::default(),
            classifier: ClassifierConfig::default(),
            subscriptions: SubscriptionState::default(),
            history: HistoryConfig::default(),
            sessions: SessionsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: read
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        // Phase 2: parse
        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display.clone(),
            source,
        })?;

        // Phase 3: validate
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when a
    /// `Config` is built by hand.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config(
                "server.host cannot be empty".to_string(),
            ));
        }

        if self.routing.max_query_chars == 0 {
            return Err(AppError::Config(
                "routing.max_query_chars must be greater than 0".to_string(),
            ));
        }

        if self.history.max_entries == 0 {
            return Err(AppError::Config(
                "history.max_entries must be greater than 0".to_string(),
            ));
        }

        if self.history.preview_chars == 0 {
            return Err(AppError::Config(
                "history.preview_chars must be greater than 0".to_string(),
            ));
        }

        if self.sessions.max_sessions == 0 {
            return Err(AppError::Config(
                "sessions.max_sessions must be greater than 0".to_string(),
            ));
        }

        let level = self.observability.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(AppError::Config(format!(
                "observability.log_level '{}' is invalid. Valid levels: {}",
                self.observability.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        // Weights and custom patterns are checked by building the rule set
        RuleSet::from_config(&self.classifier)?;

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderId;

    const MINIMAL_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
"#;

    const FULL_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[routing]
max_query_chars = 5000

[classifier]
regex_weight = 2
keyword_weight = 4

[[classifier.rules]]
category = "math_logic"
pattern = "matrix"

[[classifier.rules]]
category = "programming"
pattern = "\\bkotlin\\b"
kind = "regex"
weight = 9

[subscriptions]
codex = false
gpai = false

[history]
max_entries = 25
preview_chars = 40

[sessions]
max_sessions = 500

[observability]
log_level = "debug"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_str(MINIMAL_CONFIG).expect("should parse config");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.routing.max_query_chars, 100_000);
        assert_eq!(config.classifier.regex_weight, 3);
        assert_eq!(config.classifier.keyword_weight, 5);
        assert!(config.classifier.rules.is_empty());
        assert_eq!(config.subscriptions, SubscriptionState::all_active());
        assert_eq!(config.history.max_entries, 10);
        assert_eq!(config.history.preview_chars, 60);
        assert_eq!(config.sessions.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_config_parses_every_section() {
        let config = Config::from_str(FULL_CONFIG).expect("should parse config");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.routing.max_query_chars, 5000);
        assert_eq!(config.classifier.regex_weight, 2);
        assert_eq!(config.classifier.keyword_weight, 4);

        let rules = &config.classifier.rules;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].category, IntentCategory::MathLogic);
        assert_eq!(rules[0].kind, PatternKind::Literal);
        assert_eq!(rules[0].weight, None);
        assert_eq!(rules[1].kind, PatternKind::Regex);
        assert_eq!(rules[1].weight, Some(9));

        assert!(!config.subscriptions.is_active(ProviderId::Codex));
        assert!(!config.subscriptions.is_active(ProviderId::Gpai));
        assert!(config.subscriptions.is_active(ProviderId::ChatGpt));

        assert_eq!(config.history.max_entries, 25);
        assert_eq!(config.history.preview_chars, 40);
        assert_eq!(config.sessions.max_sessions, 500);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_missing_server_section_fails() {
        let result = Config::from_str("[routing]\nmax_query_chars = 10\n");
        assert!(matches!(result, Err(AppError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_unknown_subscription_provider_fails() {
        let toml = format!("{}\n[subscriptions]\nclaude = true\n", MINIMAL_CONFIG);
        assert!(Config::from_str(&toml).is_err());
    }

    #[test]
    fn test_unknown_category_fails() {
        let toml = format!(
            "{}\n[[classifier.rules]]\ncategory = \"poetry\"\npattern = \"sonnet\"\n",
            MINIMAL_CONFIG
        );
        assert!(Config::from_str(&toml).is_err());
    }

    #[test]
    fn test_validation_zero_max_query_chars_fails() {
        let mut config = Config::default();
        config.routing.max_query_chars = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_query_chars"));
    }

    #[test]
    fn test_validation_zero_history_entries_fails() {
        let mut config = Config::default();
        config.history.max_entries = 0;
        assert!(config.validate().unwrap_err().to_string().contains("max_entries"));
    }

    #[test]
    fn test_validation_zero_preview_chars_fails() {
        let mut config = Config::default();
        config.history.preview_chars = 0;
        assert!(config.validate().unwrap_err().to_string().contains("preview_chars"));
    }

    #[test]
    fn test_validation_zero_max_sessions_fails() {
        let mut config = Config::default();
        config.sessions.max_sessions = 0;
        assert!(config.validate().unwrap_err().to_string().contains("max_sessions"));
    }

    #[test]
    fn test_validation_zero_weight_fails() {
        let mut config = Config::default();
        config.classifier.keyword_weight = 0;
        assert!(config.validate().unwrap_err().to_string().contains("weight 0"));
    }

    #[test]
    fn test_validation_invalid_custom_regex_fails() {
        let mut config = Config::default();
        config.classifier.rules.push(CustomRule {
            category: IntentCategory::General,
            pattern: "(unclosed".to_string(),
            kind: PatternKind::Regex,
            weight: None,
        });
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_validation_invalid_log_level_fails() {
        let mut config = Config::default();
        config.observability.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_validation_log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_host_fails() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }
}

//! Command-line interface for Engine Agent

use crate::providers::ProviderId;
use clap::{Parser, Subcommand};

/// Intent-based router for AI providers
#[derive(Parser)]
#[command(name = "engine-agent")]
#[command(version)]
#[command(about = "Intent-based router for AI providers")]
#[command(
    long_about = "Engine Agent classifies free-text prompts by intent and routes each one \
    to the AI provider best suited for it, falling back to another subscribed provider \
    when the preferred one is switched off."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Route a prompt and print the decision as JSON
    Route {
        /// Prompt text to classify
        prompt: String,

        /// Treat these providers as unsubscribed (comma separated)
        #[arg(long, value_delimiter = ',')]
        without: Vec<ProviderId>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Engine Agent Configuration
# ==========================
#
# Only [server] is required. Every other section shows its default values.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 3000

# ─────────────────────────────────────────────────────────────────────────────
# ROUTING
# ─────────────────────────────────────────────────────────────────────────────

[routing]
# Longest accepted prompt, in characters
max_query_chars = 100000

# ─────────────────────────────────────────────────────────────────────────────
# CLASSIFIER
# ─────────────────────────────────────────────────────────────────────────────
#
# Each matching rule adds its weight to its category. The highest total wins;
# ties go to programming, sources_and_links, math_logic, factual, long_form,
# general (in that order).

[classifier]
# Weight of a built-in regex rule match
regex_weight = 3

# Weight of a built-in keyword match
keyword_weight = 5

# Extra rules appended to the built-in table.
# category: programming, sources_and_links, factual, long_form, math_logic, general
# kind: "literal" (substring, default) or "regex"
# weight: optional, defaults to the weight for the kind
#
# [[classifier.rules]]
# category = "programming"
# pattern = "\\b(kotlin|swift)\\b"
# kind = "regex"

# ─────────────────────────────────────────────────────────────────────────────
# SUBSCRIPTIONS
# ─────────────────────────────────────────────────────────────────────────────
#
# Provider toggles every new session starts with. Omitted providers are on.

[subscriptions]
chatgpt = true
gemini = true
deepseek = true
perplexity = true
gpai = true
codex = true

# ─────────────────────────────────────────────────────────────────────────────
# HISTORY AND SESSIONS
# ─────────────────────────────────────────────────────────────────────────────

[history]
# Entries kept per session (newest first)
max_entries = 10

# Prompt characters shown per entry
preview_chars = 60

[sessions]
# Sessions kept in memory before the least recently used is dropped
max_sessions = 10000

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use clap::CommandFactory;
    use std::str::FromStr;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path() {
        let cli = Cli::parse_from(["engine-agent"]);
        assert_eq!(cli.config, "config.toml");
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["engine-agent", "--config", "custom.toml"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["engine-agent", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn route_subcommand_parses_prompt() {
        let cli = Cli::parse_from(["engine-agent", "route", "debug this code"]);
        match cli.command {
            Some(Command::Route { prompt, without }) => {
                assert_eq!(prompt, "debug this code");
                assert!(without.is_empty());
            }
            _ => panic!("expected route subcommand"),
        }
    }

    #[test]
    fn route_subcommand_parses_without_list() {
        let cli = Cli::parse_from([
            "engine-agent",
            "route",
            "hello",
            "--without",
            "codex,GPAI",
        ]);
        match cli.command {
            Some(Command::Route { without, .. }) => {
                assert_eq!(without, vec![ProviderId::Codex, ProviderId::Gpai]);
            }
            _ => panic!("expected route subcommand"),
        }
    }

    #[test]
    fn route_subcommand_rejects_unknown_provider() {
        let result = Cli::try_parse_from(["engine-agent", "route", "hi", "--without", "claude"]);
        assert!(result.is_err());
    }

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::from_str(generate_config_template())
            .expect("template should parse and validate");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.history.max_entries, 10);
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        for section in [
            "[server]",
            "[routing]",
            "[classifier]",
            "[subscriptions]",
            "[history]",
            "[sessions]",
            "[observability]",
        ] {
            assert!(template.contains(section), "missing {}", section);
        }
    }
}

//! Engine Agent - intent-based router for AI providers
//!
//! Classifies free-text prompts with weighted keyword and pattern rules,
//! resolves the winning intent category and routes the prompt to that
//! category's provider, substituting another provider when the preferred
//! one is unsubscribed for the session.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod providers;
pub mod router;
pub mod session;
pub mod shared;
pub mod telemetry;

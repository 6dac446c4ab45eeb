//! Penwright: resilient long-form article generation.
//!
//! Asks an OpenAI-compatible chat-completions service for a structured
//! article and always hands back a complete one. Malformed model output is
//! repaired where possible; anything unusable is replaced with a
//! deterministic article synthesized from per-style templates.
//!
//! See `DESIGN.md` for the module layout and recovery tiers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;
pub mod types;

pub mod coalesce;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod style;
pub mod synthesizer;

pub mod export;

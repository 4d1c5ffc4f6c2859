//! Saathi: a mood-aware supportive chat assistant.
//!
//! - [`assist`] classifies a message and composes a templated reply.
//! - [`web`] serves `POST /api/assist` and the mood dashboard over HTTP.
//! - [`client`] is the chat client with pluggable speech capabilities.
//! - [`dashboard`] keeps the date-keyed mood log, streaks and banner.

pub mod analytics;
pub mod assist;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod storage;
pub mod utils;
pub mod web;

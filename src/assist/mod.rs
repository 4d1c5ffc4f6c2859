//! Mood-aware reply generation.
//!
//! [`classifier`] maps text to a [`Category`], [`language`] picks the
//! template language, and [`composer`] joins the matching template block
//! into the final reply.

pub mod classifier;
pub mod composer;
pub mod language;

pub use classifier::{Category, classify};
pub use composer::{FALLBACK_REPLY, HELPLINE_NUMBER, Reply, compose, compose_reply};
pub use language::{Language, LanguageHint};

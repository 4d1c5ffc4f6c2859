//! Assist request analytics.
//!
//! - [`logger`] appends one JSONL line per handled `/api/assist` request
//! - [`reporter`] aggregates those lines for `saathi stats`

pub mod logger;
pub mod reporter;

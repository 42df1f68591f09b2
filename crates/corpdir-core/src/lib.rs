//! # corpdir-core
//!
//! Core types, traits, and language rules for the multilingual company
//! directory.
//!
//! Company identity is language-independent; names and tags are stored per
//! language and grouped with their translations. This crate holds the shared
//! models, the fallback rule used to render them in a requested language, and
//! the [`CompanyDirectory`] service trait implemented by `corpdir-db`.

pub mod error;
pub mod language;
pub mod localized;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use language::{normalize_language_code, normalize_language_map, LanguageMap};
pub use localized::{dedup_preserving_order, LocalizedText};
pub use models::*;
pub use traits::*;

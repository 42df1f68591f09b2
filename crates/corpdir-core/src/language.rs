//! Language code rules.
//!
//! Codes are compared after normalization (trimmed, ASCII lower-case), so
//! `"KO"`, `" ko "` and `"ko"` all name the same registry row.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Longest accepted language code (the BCP 47 recommended upper bound).
pub const MAX_LANGUAGE_CODE_LEN: usize = 35;

/// Localized strings keyed by language code.
///
/// A `BTreeMap` keeps iteration (and therefore storage) order deterministic.
pub type LanguageMap = BTreeMap<String, String>;

/// Normalize and validate a language code.
///
/// Rules:
/// - Length between 1-35 characters after trimming
/// - Allowed characters: ASCII alphanumerics and hyphens (-)
/// - Cannot start or end with a hyphen
pub fn normalize_language_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_ascii_lowercase();

    if code.is_empty() {
        return Err(Error::InvalidInput(
            "Language code cannot be empty".to_string(),
        ));
    }
    if code.len() > MAX_LANGUAGE_CODE_LEN {
        return Err(Error::InvalidInput(format!(
            "Language code must be {} characters or less",
            MAX_LANGUAGE_CODE_LEN
        )));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::InvalidInput(format!(
            "Language code '{}' contains invalid characters. Only ASCII letters, digits, and hyphens are allowed",
            raw.trim()
        )));
    }
    if code.starts_with('-') || code.ends_with('-') {
        return Err(Error::InvalidInput(format!(
            "Language code '{}' cannot start or end with a hyphen",
            raw.trim()
        )));
    }

    Ok(code)
}

/// Normalize every key of a language map and trim its values.
///
/// Fails when a value is blank or two keys normalize to the same code.
pub fn normalize_language_map(map: &LanguageMap) -> Result<LanguageMap> {
    let mut normalized = LanguageMap::new();
    for (raw_code, raw_text) in map {
        let code = normalize_language_code(raw_code)?;
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Text for language '{}' cannot be empty",
                code
            )));
        }
        if normalized.insert(code.clone(), text.to_string()).is_some() {
            return Err(Error::InvalidInput(format!(
                "Language '{}' is given more than once",
                code
            )));
        }
    }
    Ok(normalized)
}

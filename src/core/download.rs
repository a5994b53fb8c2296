//! Picks the name a downloaded deck is saved under.

use std::sync::OnceLock;

use regex::Regex;

use super::models::{
    DECK_EXTENSION,
    DEFAULT_DECK_TITLE,
};

fn extended_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)filename\*\s*=\s*UTF-8''([^;]+)").unwrap())
}

fn plain_filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#).unwrap())
}

fn strip_separators(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Filename from a `Content-Disposition` value. The RFC 5987 `filename*=` form wins over
/// a plain `filename=` when both are present.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let name = if let Some(caps) = extended_filename_re().captures(header) {
        let encoded = caps[1].trim();
        match urlencoding::decode(encoded) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => encoded.to_string(),
        }
    } else {
        let caps = plain_filename_re().captures(header)?;
        caps.get(1).or_else(|| caps.get(2))?.as_str().to_string()
    };

    let name = strip_separators(name.trim());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// `"Bio 101"` becomes `Bio_101.apkg`.
pub fn fallback_filename(title: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let title = title.trim();
    let title = if title.is_empty() { DEFAULT_DECK_TITLE } else { title };
    let stem = strip_separators(&re.replace_all(title, "_"));
    format!("{}.{}", stem, DECK_EXTENSION)
}

pub fn derive_filename(content_disposition: Option<&str>, title: &str) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| fallback_filename(title))
}

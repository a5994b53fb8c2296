//! Normalization of raw form input into request values.

use std::sync::OnceLock;

use regex::Regex;

use super::{
    errors::AnkifyError,
    models::{
        BuildRequest,
        DEFAULT_DECK_TITLE,
        DEFAULT_WORDS_PER_CHUNK,
        MIN_WORDS_PER_CHUNK,
    },
};
use crate::view::View;

pub const MISSING_EMAIL: &str = "Please enter your email first.";
pub const MISSING_TEXT: &str = "Please paste some study text.";
pub const MISSING_MODES: &str = "Select at least one card mode.";

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Leading integer of `raw`, the way a browser's `parseInt` reads it ("12abc" is 12,
/// "3.9" is 3). `None` when there are no leading digits.
fn leading_integer(raw: &str) -> Option<i64> {
    static LEADING_INT: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_INT.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

    let digits = re.captures(raw)?.get(1)?.as_str();
    match digits.parse::<i64>() {
        Ok(value) => Some(value),
        // Too many digits; saturate in the direction of the sign.
        Err(_) if digits.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Minimum card floor. Garbage becomes 0, negatives clamp to 0.
pub fn parse_min_cards(raw: &str) -> u32 {
    clamp_to_u32(leading_integer(raw).unwrap_or(0))
}

/// Words per chunk. Garbage becomes 700, anything below 300 is raised to 300.
pub fn parse_words_per_chunk(raw: &str) -> u32 {
    let value = leading_integer(raw).unwrap_or(DEFAULT_WORDS_PER_CHUNK as i64);
    clamp_to_u32(value).max(MIN_WORDS_PER_CHUNK)
}

pub fn yield_level(slider: u8) -> f64 {
    f64::from(slider.min(100)) / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldBand {
    Exhaustive,
    Broad,
    Balanced,
    HighYield,
    OnlyHighest,
}

impl YieldBand {
    pub fn from_slider(slider: u8) -> Self {
        match slider {
            0..=1 => YieldBand::Exhaustive,
            2..=25 => YieldBand::Broad,
            26..=60 => YieldBand::Balanced,
            61..=99 => YieldBand::HighYield,
            _ => YieldBand::OnlyHighest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            YieldBand::Exhaustive => "Exhaustive",
            YieldBand::Broad => "Broad coverage",
            YieldBand::Balanced => "Balanced coverage",
            YieldBand::HighYield => "High-yield focus",
            YieldBand::OnlyHighest => "Only highest-yield",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            YieldBand::Exhaustive => {
                "Every testable fact in the text becomes a card. Largest decks."
            }
            YieldBand::Broad => "Definitions, thresholds and lists are kept alongside key ideas.",
            YieldBand::Balanced => "A mix of coverage and the concepts that matter most.",
            YieldBand::HighYield => "Mostly mechanisms, diagnostics and first-line facts.",
            YieldBand::OnlyHighest => "Only the few facts most likely to be tested.",
        }
    }
}

/// Reads the deck fields from `view` once the email has been validated.
///
/// Fails with [`AnkifyError::Validation`] when the text is blank or no mode is checked;
/// nothing should be sent in that case.
pub fn collect_build_request(view: &dyn View, email: &str) -> Result<BuildRequest, AnkifyError> {
    let text = view.pasted_text().trim().to_string();
    if text.is_empty() {
        return Err(AnkifyError::Validation(MISSING_TEXT.to_string()));
    }

    let title = view.deck_title().trim().to_string();
    let deck_title = if title.is_empty() { DEFAULT_DECK_TITLE.to_string() } else { title };

    let approx_cards = parse_min_cards(&view.min_cards());

    let modes: Vec<String> =
        view.selected_modes().iter().map(|mode| mode.label().to_string()).collect();
    if modes.is_empty() {
        return Err(AnkifyError::Validation(MISSING_MODES.to_string()));
    }

    Ok(BuildRequest {
        email: email.to_string(),
        deck_title,
        text,
        yield_level: yield_level(view.yield_slider()),
        modes,
        approx_cards,
        words_per_chunk: parse_words_per_chunk(&view.words_per_chunk()),
    })
}

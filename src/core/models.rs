use serde::Serialize;

pub const DEFAULT_DECK_TITLE: &str = "AnkifyAI Deck";
pub const DEFAULT_WORDS_PER_CHUNK: u32 = 700;
pub const MIN_WORDS_PER_CHUNK: u32 = 300;
pub const DECK_EXTENSION: &str = "apkg";
pub const EMAIL_STORAGE_KEY: &str = "ankify_email";

/// Card categories the backend understands. Sent by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    BasicRecall,
    FillInTheBlank,
    Mechanism,
    Scenario,
}

impl Mode {
    pub const ALL: [Mode; 4] =
        [Mode::BasicRecall, Mode::FillInTheBlank, Mode::Mechanism, Mode::Scenario];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::BasicRecall => "Basic Recall (Q/A)",
            Mode::FillInTheBlank => "Fill in the Blank",
            Mode::Mechanism => "Mechanism (Why/How)",
            Mode::Scenario => "Scenario",
        }
    }
}

/// Body of `POST /build-apkg`. Built fresh for every build and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRequest {
    pub email: String,
    pub deck_title: String,
    pub text: String,
    pub yield_level: f64,
    pub modes: Vec<String>,
    pub approx_cards: u32,
    pub words_per_chunk: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    Ok,
    Err,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Ok }
    }

    pub fn err(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Err }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Neutral }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthState {
    #[default]
    Unknown,
    Ok,
    Unavailable,
}

impl HealthState {
    pub fn text(&self) -> &'static str {
        match self {
            HealthState::Unknown => "…",
            HealthState::Ok => "ok",
            HealthState::Unavailable => "unavailable",
        }
    }
}

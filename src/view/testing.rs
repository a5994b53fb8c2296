//! In-memory [`View`] that records every mutation, for tests and headless runs.

use super::View;
use crate::core::{
    form::YieldBand,
    models::{
        HealthState,
        Mode,
        StatusMessage,
    },
};

#[derive(Debug, Clone)]
pub struct FakeView {
    pub email: String,
    pub deck_title: String,
    pub pasted_text: String,
    pub min_cards: String,
    pub words_per_chunk: String,
    pub yield_slider: u8,
    pub modes: Vec<Mode>,

    pub health: HealthState,
    pub usage_text: String,
    pub status: Option<StatusMessage>,
    pub status_history: Vec<StatusMessage>,
    pub scrolled: bool,
    pub signed_in: Option<String>,
    pub subscribe_visible: bool,
    pub yield_band: Option<YieldBand>,
    pub opened_urls: Vec<String>,
    pub downloads: Vec<(String, Vec<u8>)>,
    pub return_params_cleared: bool,
}

impl FakeView {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            deck_title: String::new(),
            pasted_text: String::new(),
            min_cards: "0".to_string(),
            words_per_chunk: "700".to_string(),
            yield_slider: 60,
            modes: vec![Mode::BasicRecall],
            health: HealthState::Unknown,
            usage_text: String::new(),
            status: None,
            status_history: Vec::new(),
            scrolled: false,
            signed_in: None,
            subscribe_visible: true,
            yield_band: None,
            opened_urls: Vec::new(),
            downloads: Vec::new(),
            return_params_cleared: false,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.pasted_text = text.to_string();
        self
    }

    pub fn status_text(&self) -> &str {
        self.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }
}

impl Default for FakeView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for FakeView {
    fn email(&self) -> String {
        self.email.clone()
    }

    fn set_email(&mut self, email: &str) {
        self.email = email.to_string();
    }

    fn deck_title(&self) -> String {
        self.deck_title.clone()
    }

    fn pasted_text(&self) -> String {
        self.pasted_text.clone()
    }

    fn min_cards(&self) -> String {
        self.min_cards.clone()
    }

    fn words_per_chunk(&self) -> String {
        self.words_per_chunk.clone()
    }

    fn yield_slider(&self) -> u8 {
        self.yield_slider
    }

    fn selected_modes(&self) -> Vec<Mode> {
        self.modes.clone()
    }

    fn set_health(&mut self, health: HealthState) {
        self.health = health;
    }

    fn set_usage_text(&mut self, text: String) {
        self.usage_text = text;
    }

    fn set_status(&mut self, status: StatusMessage, scroll: bool) {
        self.scrolled |= scroll;
        self.status_history.push(status.clone());
        self.status = Some(status);
    }

    fn set_signed_in(&mut self, text: Option<String>) {
        self.signed_in = text;
    }

    fn set_subscribe_visible(&mut self, visible: bool) {
        self.subscribe_visible = visible;
    }

    fn set_yield_label(&mut self, band: YieldBand) {
        self.yield_band = Some(band);
    }

    fn open_external(&mut self, url: &str) {
        self.opened_urls.push(url.to_string());
    }

    fn offer_download(&mut self, filename: &str, bytes: Vec<u8>) {
        self.downloads.push((filename.to_string(), bytes));
    }

    fn clear_return_params(&mut self) {
        self.return_params_cleared = true;
    }
}

use crate::{
    core::{
        form::YieldBand,
        models::{
            HealthState,
            Mode,
            StatusMessage,
        },
        tasks::FormSnapshot,
    },
    view::View,
};

/// Everything the window shows. Widgets edit the input fields in place; the controller
/// writes the rest through [`View`].
pub struct FormState {
    pub email: String,
    pub deck_title: String,
    pub pasted_text: String,
    pub min_cards: String,
    pub words_per_chunk: String,
    pub yield_slider: u8,
    pub modes: Vec<(Mode, bool)>,
    pub reset_cap: String,

    pub health: HealthState,
    pub usage_text: String,
    pub status: Option<StatusMessage>,
    pub scroll_to_status: bool,
    pub signed_in: Option<String>,
    pub subscribe_visible: bool,
    pub yield_band: YieldBand,

    // Effects the window carries out on its next frame.
    pub pending_url: Option<String>,
    pub pending_downloads: Vec<(String, Vec<u8>)>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            deck_title: String::new(),
            pasted_text: String::new(),
            min_cards: "40".to_string(),
            words_per_chunk: "700".to_string(),
            yield_slider: 60,
            modes: Mode::ALL.iter().map(|mode| (*mode, *mode == Mode::BasicRecall)).collect(),
            reset_cap: String::new(),
            health: HealthState::Unknown,
            usage_text: "Usage: …".to_string(),
            status: None,
            scroll_to_status: false,
            signed_in: None,
            subscribe_visible: true,
            yield_band: YieldBand::from_slider(60),
            pending_url: None,
            pending_downloads: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            email: self.email.clone(),
            deck_title: self.deck_title.clone(),
            pasted_text: self.pasted_text.clone(),
            min_cards: self.min_cards.clone(),
            words_per_chunk: self.words_per_chunk.clone(),
            yield_slider: self.yield_slider,
            modes: self.selected_modes(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl View for FormState {
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
        self.modes.iter().filter(|(_, checked)| *checked).map(|(mode, _)| *mode).collect()
    }

    fn set_health(&mut self, health: HealthState) {
        self.health = health;
    }

    fn set_usage_text(&mut self, text: String) {
        self.usage_text = text;
    }

    fn set_status(&mut self, status: StatusMessage, scroll: bool) {
        self.status = Some(status);
        self.scroll_to_status |= scroll;
    }

    fn set_signed_in(&mut self, text: Option<String>) {
        self.signed_in = text;
    }

    fn set_subscribe_visible(&mut self, visible: bool) {
        self.subscribe_visible = visible;
    }

    fn set_yield_label(&mut self, band: YieldBand) {
        self.yield_band = band;
    }

    fn open_external(&mut self, url: &str) {
        self.pending_url = Some(url.to_string());
    }

    fn offer_download(&mut self, filename: &str, bytes: Vec<u8>) {
        self.pending_downloads.push((filename.to_string(), bytes));
    }

    /// The launch argument is read once in `main` and handed to `Action::Init`; the
    /// window keeps no copy, so there is nothing left to clear.
    fn clear_return_params(&mut self) {}
}

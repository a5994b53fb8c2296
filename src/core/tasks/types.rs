use std::sync::{
    mpsc,
    Arc,
};

use crate::{
    core::{
        form::YieldBand,
        models::{
            HealthState,
            Mode,
            StatusMessage,
        },
    },
    session::ReturnParams,
    view::View,
};

/// Wakes the UI after an update was queued.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// One user action, run start to finish on a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Init(ReturnParams),
    EmailCommitted,
    Subscribe,
    ManageBilling,
    BuildDeck,
    RefreshStatus,
    ResetUsage(Option<u32>),
}

impl Action {
    pub fn task_type(&self) -> &'static str {
        match self {
            Action::Init(_) => "init",
            Action::EmailCommitted => "email_committed",
            Action::Subscribe => "subscribe",
            Action::ManageBilling => "manage_billing",
            Action::BuildDeck => "build_deck",
            Action::RefreshStatus => "refresh_status",
            Action::ResetUsage(_) => "reset_usage",
        }
    }
}

/// Form contents at the moment an action was started.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub email: String,
    pub deck_title: String,
    pub pasted_text: String,
    pub min_cards: String,
    pub words_per_chunk: String,
    pub yield_slider: u8,
    pub modes: Vec<Mode>,
}

impl FormSnapshot {
    pub fn empty() -> Self {
        Self {
            email: String::new(),
            deck_title: String::new(),
            pasted_text: String::new(),
            min_cards: String::new(),
            words_per_chunk: String::new(),
            yield_slider: 0,
            modes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Email(String),
    Health(HealthState),
    Usage(String),
    Status { message: StatusMessage, scroll: bool },
    SignedIn(Option<String>),
    SubscribeVisible(bool),
    Yield(YieldBand),
    OpenExternal(String),
    Download { filename: String, bytes: Vec<u8> },
    ClearReturnParams,
}

/// Replays a queued write onto the real view.
pub fn apply_update(view: &mut dyn View, update: ViewUpdate) {
    match update {
        ViewUpdate::Email(email) => view.set_email(&email),
        ViewUpdate::Health(health) => view.set_health(health),
        ViewUpdate::Usage(text) => view.set_usage_text(text),
        ViewUpdate::Status { message, scroll } => view.set_status(message, scroll),
        ViewUpdate::SignedIn(text) => view.set_signed_in(text),
        ViewUpdate::SubscribeVisible(visible) => view.set_subscribe_visible(visible),
        ViewUpdate::Yield(band) => view.set_yield_label(band),
        ViewUpdate::OpenExternal(url) => view.open_external(&url),
        ViewUpdate::Download { filename, bytes } => view.offer_download(&filename, bytes),
        ViewUpdate::ClearReturnParams => view.clear_return_params(),
    }
}

/// A [`View`] for worker threads: reads come from a snapshot, writes are queued for the
/// UI thread, which applies them in the order they were sent.
pub struct ChannelView {
    form: FormSnapshot,
    sender: mpsc::Sender<ViewUpdate>,
    notify: Notifier,
}

impl ChannelView {
    pub fn new(form: FormSnapshot, sender: mpsc::Sender<ViewUpdate>, notify: Notifier) -> Self {
        Self { form, sender, notify }
    }

    fn send(&self, update: ViewUpdate) {
        // The window may already be gone; nothing left to update then.
        let _ = self.sender.send(update);
        (self.notify)();
    }
}

impl View for ChannelView {
    fn email(&self) -> String {
        self.form.email.clone()
    }

    fn set_email(&mut self, email: &str) {
        self.form.email = email.to_string();
        self.send(ViewUpdate::Email(email.to_string()));
    }

    fn deck_title(&self) -> String {
        self.form.deck_title.clone()
    }

    fn pasted_text(&self) -> String {
        self.form.pasted_text.clone()
    }

    fn min_cards(&self) -> String {
        self.form.min_cards.clone()
    }

    fn words_per_chunk(&self) -> String {
        self.form.words_per_chunk.clone()
    }

    fn yield_slider(&self) -> u8 {
        self.form.yield_slider
    }

    fn selected_modes(&self) -> Vec<Mode> {
        self.form.modes.clone()
    }

    fn set_health(&mut self, health: HealthState) {
        self.send(ViewUpdate::Health(health));
    }

    fn set_usage_text(&mut self, text: String) {
        self.send(ViewUpdate::Usage(text));
    }

    fn set_status(&mut self, status: StatusMessage, scroll: bool) {
        self.send(ViewUpdate::Status { message: status, scroll });
    }

    fn set_signed_in(&mut self, text: Option<String>) {
        self.send(ViewUpdate::SignedIn(text));
    }

    fn set_subscribe_visible(&mut self, visible: bool) {
        self.send(ViewUpdate::SubscribeVisible(visible));
    }

    fn set_yield_label(&mut self, band: YieldBand) {
        self.send(ViewUpdate::Yield(band));
    }

    fn open_external(&mut self, url: &str) {
        self.send(ViewUpdate::OpenExternal(url.to_string()));
    }

    fn offer_download(&mut self, filename: &str, bytes: Vec<u8>) {
        self.send(ViewUpdate::Download { filename: filename.to_string(), bytes });
    }

    fn clear_return_params(&mut self) {
        self.send(ViewUpdate::ClearReturnParams);
    }
}

use std::{
    fs,
    mem,
    path::PathBuf,
};

use eframe::egui::{
    self,
    RichText,
    TextEdit,
};

use super::{
    form::FormState,
    theme::{
        set_theme,
        Theme,
    },
};
use crate::{
    controller::Controller,
    core::{
        models::{
            StatusMessage,
            Tone,
        },
        tasks::{
            apply_update,
            Action,
            TaskManager,
        },
        AnkifyError,
    },
    session::ReturnParams,
    view::View,
};

pub struct AnkifyApp {
    form: FormState,
    theme: Theme,
    task_manager: TaskManager,
}

impl AnkifyApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: Controller,
        launch: ReturnParams,
    ) -> Result<Self, AnkifyError> {
        let ctx = cc.egui_ctx.clone();
        let task_manager =
            TaskManager::new(controller)?.with_notifier(move || ctx.request_repaint());

        let theme = Theme::dracula();
        set_theme(&cc.egui_ctx, &theme);

        let app = Self { form: FormState::new(), theme, task_manager };
        app.start(Action::Init(launch));
        Ok(app)
    }

    fn start(&self, action: Action) {
        // Detached; results arrive through poll_updates.
        let _ = self.task_manager.run(self.form.snapshot(), action);
    }

    fn flush_effects(&mut self, ctx: &egui::Context) {
        if let Some(url) = self.form.pending_url.take() {
            ctx.open_url(egui::OpenUrl::same_tab(url));
        }

        for (filename, bytes) in mem::take(&mut self.form.pending_downloads) {
            if let Some(status) = save_outcome_status(save_download(&filename, &bytes)) {
                let scroll = status.tone == Tone::Err;
                self.form.set_status(status, scroll);
            }
        }
    }

    fn service_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Ankify").strong().color(self.theme.purple()));
            ui.separator();
            ui.label("Service:");
            ui.label(
                RichText::new(self.form.health.text()).color(self.theme.health(self.form.health)),
            );
            ui.separator();
            ui.label(&self.form.usage_text);
            if ui.small_button("⟳").on_hover_text("Refresh status").clicked() {
                self.start(Action::RefreshStatus);
            }
        });
    }

    fn account_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Email");
            let response = ui.add(
                TextEdit::singleline(&mut self.form.email)
                    .hint_text("you@example.com")
                    .desired_width(260.0),
            );
            // Enter and focus loss both end up here.
            if response.lost_focus() {
                self.start(Action::EmailCommitted);
            }

            if let Some(pill) = &self.form.signed_in {
                ui.label(RichText::new(pill).color(self.theme.green()));
            }
        });

        ui.horizontal(|ui| {
            if self.form.subscribe_visible && ui.button("Subscribe").clicked() {
                self.start(Action::Subscribe);
            }
            if ui.button("Manage billing").clicked() {
                self.start(Action::ManageBilling);
            }
        });
    }

    fn deck_section(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("deck_fields").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label("Deck title");
            ui.add(
                TextEdit::singleline(&mut self.form.deck_title)
                    .hint_text(crate::core::models::DEFAULT_DECK_TITLE),
            );
            ui.end_row();

            ui.label("Minimum cards");
            ui.add(TextEdit::singleline(&mut self.form.min_cards).desired_width(80.0));
            ui.end_row();

            ui.label("Words per chunk");
            ui.add(TextEdit::singleline(&mut self.form.words_per_chunk).desired_width(80.0));
            ui.end_row();
        });

        ui.add_space(6.0);
        let slider = ui.add(egui::Slider::new(&mut self.form.yield_slider, 0..=100).text("Yield"));
        if slider.changed() {
            self.task_manager.controller().on_yield_input(&mut self.form);
        }
        ui.label(RichText::new(self.form.yield_band.label()).strong());
        ui.label(RichText::new(self.form.yield_band.description()).color(self.theme.comment()));

        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            ui.label("Modes:");
            for (mode, checked) in self.form.modes.iter_mut() {
                ui.checkbox(checked, mode.label());
            }
        });

        ui.add_space(6.0);
        ui.label("Study text");
        ui.add(
            TextEdit::multiline(&mut self.form.pasted_text)
                .hint_text("Paste your study text here…")
                .desired_rows(14)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(6.0);
        if ui.button(RichText::new("Build deck").strong()).clicked() {
            self.start(Action::BuildDeck);
        }
    }

    fn status_line(&mut self, ui: &mut egui::Ui) {
        if let Some(status) = &self.form.status {
            let response = ui.label(RichText::new(&status.text).color(self.theme.tone(status.tone)));
            if self.form.scroll_to_status {
                response.scroll_to_me(Some(egui::Align::Center));
            }
        }
        self.form.scroll_to_status = false;
    }

    fn admin_section(&mut self, ui: &mut egui::Ui) {
        ui.collapsing("Admin", |ui| {
            ui.horizontal(|ui| {
                ui.label("New monthly cap");
                ui.add(
                    TextEdit::singleline(&mut self.form.reset_cap)
                        .hint_text("keep")
                        .desired_width(80.0),
                );
                if ui.button("Reset usage").clicked() {
                    let cap = self.form.reset_cap.trim().parse::<u32>().ok();
                    self.start(Action::ResetUsage(cap));
                }
            });
        });
    }
}

pub const SAVE_CANCELED_MESSAGE: &str = "Save canceled.";

/// Asks where to put the deck. `None` means the dialog was dismissed.
fn save_download(filename: &str, bytes: &[u8]) -> Result<Option<PathBuf>, AnkifyError> {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(filename)
        .add_filter("Anki deck", &[crate::core::models::DECK_EXTENSION])
        .save_file()
    else {
        tracing::info!(filename, "deck save canceled");
        return Ok(None);
    };

    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "deck saved");
    Ok(Some(path))
}

/// What replaces "Downloaded …" once the save dialog closes. A completed save keeps it.
fn save_outcome_status(outcome: Result<Option<PathBuf>, AnkifyError>) -> Option<StatusMessage> {
    match outcome {
        Ok(Some(_)) => None,
        Ok(None) => Some(StatusMessage::info(SAVE_CANCELED_MESSAGE)),
        Err(e) => Some(StatusMessage::err(format!("Error: {e}"))),
    }
}

impl eframe::App for AnkifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for update in self.task_manager.poll_updates() {
            apply_update(&mut self.form, update);
        }
        self.flush_effects(ctx);

        egui::TopBottomPanel::top("service_bar").show(ctx, |ui| self.service_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.account_section(ui);
                ui.separator();
                self.deck_section(ui);
                ui.add_space(8.0);
                self.status_line(ui);
                ui.add_space(8.0);
                self.admin_section(ui);
            });
        });
    }
}

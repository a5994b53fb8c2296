//! The surface the controller talks to instead of reaching for widgets directly.
//!
//! Getters return the raw field contents exactly as typed; normalization happens in
//! [`crate::core::form`]. Setters overwrite whatever was shown before.

#[cfg(test)]
pub mod testing;

use crate::core::{
    form::YieldBand,
    models::{
        HealthState,
        Mode,
        StatusMessage,
    },
};

pub trait View {
    fn email(&self) -> String;
    fn set_email(&mut self, email: &str);

    fn deck_title(&self) -> String;
    fn pasted_text(&self) -> String;
    fn min_cards(&self) -> String;
    fn words_per_chunk(&self) -> String;
    /// Raw slider position, 0..=100.
    fn yield_slider(&self) -> u8;
    /// Checked modes in display order.
    fn selected_modes(&self) -> Vec<Mode>;

    fn set_health(&mut self, health: HealthState);
    fn set_usage_text(&mut self, text: String);
    /// `scroll` asks the view to bring the status line into sight.
    fn set_status(&mut self, status: StatusMessage, scroll: bool);
    /// `Some(text)` shows the signed-in pill, `None` clears it.
    fn set_signed_in(&mut self, text: Option<String>);
    fn set_subscribe_visible(&mut self, visible: bool);
    fn set_yield_label(&mut self, band: YieldBand);

    /// Leave for an external page (checkout, billing portal).
    fn open_external(&mut self, url: &str);
    /// Hand a downloaded file to the user. Fire and forget.
    fn offer_download(&mut self, filename: &str, bytes: Vec<u8>);
    /// Forget the `subscribed`/`canceled` markers the app was launched with.
    fn clear_return_params(&mut self);
}

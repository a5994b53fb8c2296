use std::sync::Arc;

use ankify::{
    api::HttpBackend,
    gui::AnkifyApp,
    persistence::JsonFileStore,
    report::{
        init_tracing,
        TracingSink,
    },
    session::ReturnParams,
    settings::SettingsData,
    Controller,
};
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = SettingsData::load();
    tracing::info!(base_url = %settings.base_url, "starting ankify");

    // The payment provider sends the user back to a URL like `/?subscribed=1`; the
    // launcher passes it along as the first argument.
    let launch = match std::env::args().nth(1) {
        Some(arg) => ReturnParams::from_launch_arg(&arg).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable launch argument");
            ReturnParams::default()
        }),
        None => ReturnParams::default(),
    };

    let backend = HttpBackend::new(&settings.base_url, settings.timeout())?;
    let controller = Controller::new(
        Arc::new(backend),
        Arc::new(JsonFileStore::in_app_data_dir()),
        Arc::new(TracingSink),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Ankify")
            .with_inner_size([760.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ankify",
        options,
        Box::new(move |cc| {
            let app = AnkifyApp::new(cc, controller, launch)?;
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}

//! Where the controller reports what happened, besides the status line.

pub trait ReportSink: Send + Sync {
    fn info(&self, event: &str, detail: &str);
    fn error(&self, event: &str, detail: &str);
}

/// Forwards to `tracing` under the `ankify::controller` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn info(&self, event: &str, detail: &str) {
        tracing::info!(target: "ankify::controller", event = event, "{}", detail);
    }

    fn error(&self, event: &str, detail: &str) {
        tracing::error!(target: "ankify::controller", event = event, "{}", detail);
    }
}

#[cfg(test)]
pub use recording::{
    Entry,
    Level,
    RecordingSink,
};


/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ankify=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

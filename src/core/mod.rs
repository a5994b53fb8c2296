pub mod download;
pub mod errors;
pub mod form;
pub mod models;
pub mod tasks;

pub use errors::AnkifyError;
pub use models::{
    BuildRequest,
    HealthState,
    Mode,
    StatusMessage,
    Tone,
};

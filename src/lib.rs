pub mod api;
pub mod controller;
pub mod core;
pub mod gui;
pub mod persistence;
pub mod report;
pub mod session;
pub mod settings;
pub mod view;

pub use controller::Controller;
pub use crate::core::AnkifyError;

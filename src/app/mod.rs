//! Application module
//!
//! This module contains the session state and preferences.

pub mod config;
mod state;

pub use config::{ServiceConfig, TextRegion};
pub use state::{AppState, TranslatorStatus};

mod adapters;
mod app;
mod capture;
mod ui;

use libadwaita as adw;
use log::info;

use adw::prelude::*;

use crate::app::ServiceConfig;

const APP_ID: &str = "io.github.snip2text.Snip2Text";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env();
    info!(
        "Starting snip2text (translation service: {}, OCR language: {})",
        config.translate_url, config.ocr_lang
    );

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| ui::build_ui(app, &config));
    app.run();
}

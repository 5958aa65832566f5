//! UI module
//!
//! The main window, its command bar and settings menu, the text panes and
//! the region selector overlay.

pub mod drawing;
pub mod handlers;
pub mod header;
pub mod menu;
pub mod panes;
pub mod selector;

use gtk4 as gtk;
use libadwaita as adw;
use log::{error, info};

use adw::prelude::*;
use gtk::Orientation;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::app::{AppState, ServiceConfig};

pub const ICON_NAME: &str = "snip2text";

/// Accelerators for the window commands
const ACCELERATORS: [(&str, &str); 3] = [
    ("win.new-snip", "<Control>n"),
    ("win.translate", "<Control>t"),
    ("window.close", "<Control>q"),
];

/// Directory holding the bundled icon, checked relative to the working
/// directory first and then to the source tree
fn icon_dir() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("res"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res"),
    ];
    candidates
        .into_iter()
        .find(|dir| dir.join(format!("{}.svg", ICON_NAME)).is_file())
}

/// Register the bundled icon with the theme so the window can use it by name
fn install_icon() -> bool {
    let Some(dir) = icon_dir() else {
        error!("Application icon '{}.svg' not found in res/", ICON_NAME);
        return false;
    };
    if let Some(display) = gtk::gdk::Display::default() {
        gtk::IconTheme::for_display(&display).add_search_path(&dir);
    }
    info!("Application icon loaded from {:?}", dir);
    true
}

pub fn build_ui(app: &adw::Application, config: &ServiceConfig) {
    if !install_icon() {
        app.quit();
        return;
    }

    let state = Rc::new(RefCell::new(AppState::new()));

    let header = header::create_header_bar();
    let panes = panes::create_panes(&state);

    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    content.append(&header.header_bar);
    content.append(&panes.content);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("snip2text")
        .icon_name(ICON_NAME)
        .content(&content)
        .default_width(350)
        .default_height(250)
        .build();

    for (action, accel) in ACCELERATORS {
        app.set_accels_for_action(action, &[accel]);
    }

    let (new_snip_action, translate_action) = handlers::create_command_actions();
    let components = Rc::new(handlers::UiComponents {
        window: window.clone(),
        header,
        panes,
        new_snip_action,
        translate_action,
        config: config.clone(),
        selector: RefCell::new(None),
    });

    handlers::connect_all_handlers(&state, &components);

    window.present();
}

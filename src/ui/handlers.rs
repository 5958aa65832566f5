use gtk4 as gtk;
use libadwaita as adw;
use log::{debug, error, info, warn};

use gtk::{gio, glib};
use gtk4::prelude::*;
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::adapters::{self, OcrError, TranslateError, Translator};
use crate::app::{AppState, ServiceConfig, TextRegion, TranslatorStatus};
use crate::capture::{self, CaptureError};
use crate::ui::header::HeaderComponents;
use crate::ui::menu::{
    ACTION_AUTO_TRANSLATE, ACTION_LANGUAGE, ACTION_NEW_SNIP, ACTION_SHOW_SNIP, ACTION_TRANSLATE,
};
use crate::ui::panes::PaneComponents;
use crate::ui::drawing::current_window_height;
use crate::ui::selector::{CaptureCallback, RegionSelector};

pub struct UiComponents {
    pub window: adw::ApplicationWindow,
    pub header: HeaderComponents,
    pub panes: PaneComponents,
    pub new_snip_action: gio::SimpleAction,
    pub translate_action: gio::SimpleAction,
    pub config: ServiceConfig,
    /// Kept alive until the capture callback tears it down
    pub selector: RefCell<Option<RegionSelector>>,
}

pub fn create_command_actions() -> (gio::SimpleAction, gio::SimpleAction) {
    (
        gio::SimpleAction::new(ACTION_NEW_SNIP, None),
        gio::SimpleAction::new(ACTION_TRANSLATE, None),
    )
}

/// Enable commands according to what is running
fn update_sensitivity(state: &Rc<RefCell<AppState>>, ui: &UiComponents) {
    let s = state.borrow();
    ui.new_snip_action.set_enabled(!s.is_busy());
    ui.translate_action.set_enabled(s.can_translate());
}

fn show_error(window: &adw::ApplicationWindow, message: &str, detail: &str) {
    let dialog = gtk::AlertDialog::builder()
        .modal(true)
        .message(message)
        .detail(detail)
        .build();
    dialog.show(Some(window));
}

fn window_height(window: &adw::ApplicationWindow) -> i32 {
    current_window_height(window.height(), window.default_height())
}

/// Re-render the thumbnail once the new window size has been allocated
fn schedule_thumbnail_render(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    let state = state.clone();
    let ui = Rc::downgrade(ui);
    glib::idle_add_local_once(move || {
        if let Some(ui) = ui.upgrade() {
            ui.panes
                .render_thumbnail(&state.borrow(), window_height(&ui.window));
        }
    });
}

/// Flush pending redraws so the window state is on screen
fn flush_pending_events() {
    let context = glib::MainContext::default();
    while context.pending() {
        context.iteration(false);
    }
}

pub fn new_snip(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    if !state.borrow_mut().begin_snip() {
        debug!("Snip requested while busy, ignoring");
        return;
    }
    update_sensitivity(state, ui);

    ui.window.set_visible(false);
    flush_pending_events();

    let on_capture: CaptureCallback = Rc::new({
        let state = state.clone();
        let ui = ui.clone();
        move |result| on_capture(&state, &ui, result)
    });
    let selector = match capture::Desktop::query()
        .and_then(|desktop| RegionSelector::new(desktop, on_capture))
    {
        Ok(selector) => selector,
        Err(e) => {
            error!("Cannot start selection: {}", e);
            state.borrow_mut().cancel_snip();
            ui.window.present();
            update_sensitivity(state, ui);
            show_error(&ui.window, "Cannot start a snip", &e.to_string());
            return;
        }
    };

    selector.start();
    *ui.selector.borrow_mut() = Some(selector);
}

fn on_capture(
    state: &Rc<RefCell<AppState>>,
    ui: &Rc<UiComponents>,
    result: Result<RgbaImage, CaptureError>,
) {
    if let Some(selector) = ui.selector.borrow_mut().take() {
        selector.close();
    }

    let image = match result {
        Ok(image) => image,
        Err(e) => {
            state.borrow_mut().cancel_snip();
            ui.window.present();
            update_sensitivity(state, ui);
            if !matches!(e, CaptureError::Cancelled) {
                show_error(&ui.window, "Capture failed", &e.to_string());
            }
            return;
        }
    };

    info!("Snip captured: {}x{}", image.width(), image.height());
    let thumbnail = capture::image_to_pixbuf(&image);

    let follow_up = {
        let mut s = state.borrow_mut();
        let follow_up = s.finish_snip(image);
        s.thumbnail = thumbnail;
        follow_up
    };

    ui.window.present();
    {
        let s = state.borrow();
        ui.panes.sync_from(&s, &TextRegion::ALL);
        ui.panes.render_thumbnail(&s, window_height(&ui.window));
    }
    update_sensitivity(state, ui);

    if follow_up.recognize {
        recognize(state, ui, follow_up.translate);
    }
}

/// Run OCR on the current image, then optionally translate the result
pub fn recognize(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>, then_translate: bool) {
    let Some(image) = state.borrow_mut().begin_recognition() else {
        return;
    };
    ui.panes
        .sync_from(&state.borrow(), &[TextRegion::Recognized]);
    update_sensitivity(state, ui);

    let lang = ui.config.ocr_lang.clone();
    let state = state.clone();
    let ui = ui.clone();
    glib::spawn_future_local(async move {
        let result = gio::spawn_blocking(move || adapters::recognize(&image, &lang))
            .await
            .unwrap_or(Err(OcrError::Worker));
        if let Err(ref e) = result {
            warn!("{}", e);
        }

        let translate_next = state.borrow_mut().finish_recognition(result, then_translate);
        ui.panes
            .sync_from(&state.borrow(), &TextRegion::ALL);
        update_sensitivity(&state, &ui);

        if translate_next {
            translate(&state, &ui);
        }
    });
}

/// Transliterate and translate whatever the recognized region holds now
pub fn translate(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    let text = ui.panes.text(TextRegion::Recognized);
    let (job, problem) = {
        let mut s = state.borrow_mut();
        let problem = s.translator_problem();
        let Some(job) = s.begin_translation(text) else {
            return;
        };
        (job, problem)
    };
    if let Some(ref e) = problem {
        warn!("{}", e);
    }

    ui.panes.sync_from(
        &state.borrow(),
        &[TextRegion::Spelling, TextRegion::Translation],
    );
    update_sensitivity(state, ui);

    let state = state.clone();
    let ui = ui.clone();
    glib::spawn_future_local(async move {
        let outcome = gio::spawn_blocking(move || {
            let spelling = adapters::to_pinyin(&job.text);
            let translation = match job.translator {
                Some(translator) => translator.translate(&job.text),
                None => Err(problem.unwrap_or(TranslateError::Worker)),
            };
            (spelling, translation)
        })
        .await;

        let (spelling, translation) = match outcome {
            Ok((spelling, translation)) => (Ok(spelling), translation),
            Err(_) => (Err(TranslateError::Worker), Err(TranslateError::Worker)),
        };
        if let Err(ref e) = translation {
            warn!("{}", e);
        }

        state.borrow_mut().finish_translation(spelling, translation);
        ui.panes.sync_from(
            &state.borrow(),
            &[TextRegion::Spelling, TextRegion::Translation],
        );
        update_sensitivity(&state, &ui);
    });
}

/// Probe the translation service once, off the UI thread
pub fn connect_translator(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    ui.header
        .translate_btn
        .set_tooltip_text(Some("Connecting to the translation service..."));

    let config = ui.config.clone();
    let state = state.clone();
    let ui = ui.clone();
    glib::spawn_future_local(async move {
        let result = gio::spawn_blocking(move || Translator::connect(&config))
            .await
            .unwrap_or(Err(TranslateError::Worker));

        let status = match result {
            Ok(translator) => {
                ui.header.translate_btn.set_tooltip_text(None);
                TranslatorStatus::Ready(Arc::new(translator))
            }
            Err(e) => {
                error!("Translation disabled: {}", e);
                ui.header
                    .translate_btn
                    .set_tooltip_text(Some(&e.to_string()));
                TranslatorStatus::Unavailable(e.to_string())
            }
        };
        state.borrow_mut().translator = status;
        update_sensitivity(&state, &ui);
    });
}

fn connect_command_actions(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    ui.new_snip_action.connect_activate({
        let state = state.clone();
        let ui = ui.clone();
        move |_, _| new_snip(&state, &ui)
    });
    ui.window.add_action(&ui.new_snip_action);

    ui.translate_action.connect_activate({
        let state = state.clone();
        let ui = ui.clone();
        move |_, _| translate(&state, &ui)
    });
    ui.window.add_action(&ui.translate_action);
}

fn connect_preference_actions(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    let prefs = state.borrow().prefs.clone();

    // Only one pair is offered; the entry is informational
    let language = gio::SimpleAction::new_stateful(ACTION_LANGUAGE, None, &true.to_variant());
    language.set_enabled(false);
    ui.window.add_action(&language);

    let auto_translate =
        gio::SimpleAction::new_stateful(ACTION_AUTO_TRANSLATE, None, &prefs.auto_translate.to_variant());
    auto_translate.connect_change_state({
        let state = state.clone();
        move |action, value| {
            if let Some(enabled) = value.and_then(|v| v.get::<bool>()) {
                debug!("Immediate translation: {}", enabled);
                state.borrow_mut().prefs.auto_translate = enabled;
                action.set_state(&enabled.to_variant());
            }
        }
    });
    ui.window.add_action(&auto_translate);

    let show_snip =
        gio::SimpleAction::new_stateful(ACTION_SHOW_SNIP, None, &prefs.show_snip.to_variant());
    show_snip.connect_change_state({
        let state = state.clone();
        let ui = ui.clone();
        move |action, value| {
            if let Some(visible) = value.and_then(|v| v.get::<bool>()) {
                state.borrow_mut().prefs.show_snip = visible;
                action.set_state(&visible.to_variant());
                ui.panes
                    .render_thumbnail(&state.borrow(), window_height(&ui.window));
            }
        }
    });
    ui.window.add_action(&show_snip);

    for region in TextRegion::ALL {
        let action = gio::SimpleAction::new_stateful(
            region.font_action(),
            Some(glib::VariantTy::UINT32),
            &prefs.font_size(region).to_variant(),
        );
        action.connect_change_state({
            let state = state.clone();
            let ui = ui.clone();
            move |action, value| {
                let Some(size) = value.and_then(|v| v.get::<u32>()) else {
                    return;
                };
                if state.borrow_mut().prefs.set_font_size(region, size) {
                    debug!("{} font size: {}pt", region.label(), size);
                    action.set_state(&size.to_variant());
                    ui.panes.apply_font_size(region, size);
                }
            }
        });
        ui.window.add_action(&action);
    }
}

fn connect_resize_handler(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    ui.window.connect_default_height_notify({
        let state = state.clone();
        let ui = Rc::downgrade(ui);
        move |_| {
            if let Some(ui) = ui.upgrade() {
                schedule_thumbnail_render(&state, &ui);
            }
        }
    });

    // Maximize and fullscreen change the allocation but not the default size
    ui.window.connect_maximized_notify({
        let state = state.clone();
        let ui = Rc::downgrade(ui);
        move |_| {
            if let Some(ui) = ui.upgrade() {
                schedule_thumbnail_render(&state, &ui);
            }
        }
    });
    ui.window.connect_fullscreened_notify({
        let state = state.clone();
        let ui = Rc::downgrade(ui);
        move |_| {
            if let Some(ui) = ui.upgrade() {
                schedule_thumbnail_render(&state, &ui);
            }
        }
    });
}

pub fn connect_all_handlers(state: &Rc<RefCell<AppState>>, ui: &Rc<UiComponents>) {
    debug!("Initializing UI handlers");
    connect_command_actions(state, ui);
    connect_preference_actions(state, ui);
    connect_resize_handler(state, ui);
    update_sensitivity(state, ui);
    connect_translator(state, ui);
}

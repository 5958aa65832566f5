use gtk4 as gtk;

use gtk::Orientation;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::config::font_css;
use crate::app::{AppState, TextRegion};
use crate::ui::drawing::{create_thumbnail_area, thumbnail_height};

struct TextPane {
    view: gtk::TextView,
    font: gtk::CssProvider,
}

/// Typed handles to the text regions and the snip thumbnail
pub struct PaneComponents {
    pub content: gtk::Box,
    recognized: TextPane,
    spelling: TextPane,
    translation: TextPane,
    pub thumbnail: gtk::DrawingArea,
}

pub fn create_panes(state: &Rc<RefCell<AppState>>) -> PaneComponents {
    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .margin_top(6)
        .margin_bottom(6)
        .margin_start(6)
        .margin_end(6)
        .build();

    let s = state.borrow();
    let make_pane = |region: TextRegion| {
        let view = gtk::TextView::builder()
            .wrap_mode(gtk::WrapMode::WordChar)
            .left_margin(6)
            .right_margin(6)
            .top_margin(6)
            .bottom_margin(6)
            .build();
        view.add_css_class(region.css_class());
        view.buffer().set_text(s.text(region));

        let font = gtk::CssProvider::new();
        font.load_from_string(&font_css(region, s.prefs.font_size(region)));
        gtk::style_context_add_provider_for_display(
            &view.display(),
            &font,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );

        let scrolled = gtk::ScrolledWindow::builder()
            .child(&view)
            .hexpand(true)
            .vexpand(true)
            .build();
        content.append(&scrolled);

        TextPane { view, font }
    };

    let recognized = make_pane(TextRegion::Recognized);
    let spelling = make_pane(TextRegion::Spelling);
    let translation = make_pane(TextRegion::Translation);
    drop(s);

    let thumbnail = create_thumbnail_area(state);
    content.append(&thumbnail);

    PaneComponents {
        content,
        recognized,
        spelling,
        translation,
        thumbnail,
    }
}

impl PaneComponents {
    fn pane(&self, region: TextRegion) -> &TextPane {
        match region {
            TextRegion::Recognized => &self.recognized,
            TextRegion::Spelling => &self.spelling,
            TextRegion::Translation => &self.translation,
        }
    }

    pub fn view(&self, region: TextRegion) -> &gtk::TextView {
        &self.pane(region).view
    }

    pub fn text(&self, region: TextRegion) -> String {
        let buffer = self.view(region).buffer();
        buffer
            .text(&buffer.start_iter(), &buffer.end_iter(), false)
            .to_string()
    }

    /// Copy the state's text for each region into its widget
    pub fn sync_from(&self, state: &AppState, regions: &[TextRegion]) {
        for region in regions {
            self.view(*region).buffer().set_text(state.text(*region));
        }
    }

    pub fn apply_font_size(&self, region: TextRegion, size: u32) {
        self.pane(region)
            .font
            .load_from_string(&font_css(region, size));
    }

    /// Resize and repaint the thumbnail for the current window height
    pub fn render_thumbnail(&self, state: &AppState, window_height: i32) {
        let Some(pixbuf) = state.thumbnail.as_ref() else {
            self.thumbnail.set_visible(false);
            return;
        };

        let height = thumbnail_height(window_height, pixbuf.height());
        self.thumbnail.set_content_height(height);
        self.thumbnail.set_visible(state.prefs.show_snip && height > 0);
        self.thumbnail.queue_draw();
    }
}

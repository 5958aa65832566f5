use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

use crate::ui::menu::{self, ACTION_NEW_SNIP, ACTION_TRANSLATE};

pub struct HeaderComponents {
    pub header_bar: adw::HeaderBar,
    pub translate_btn: gtk::Button,
}

pub fn create_header_bar() -> HeaderComponents {
    let new_snip_btn = gtk::Button::builder()
        .label("_New")
        .use_underline(true)
        .tooltip_text("Select a screen region")
        .action_name(menu::win(ACTION_NEW_SNIP))
        .build();
    new_snip_btn.add_css_class("suggested-action");

    let translate_btn = gtk::Button::builder()
        .label("_Translate")
        .use_underline(true)
        .action_name(menu::win(ACTION_TRANSLATE))
        .build();

    let settings_btn = gtk::MenuButton::builder()
        .label("_Settings")
        .use_underline(true)
        .menu_model(&menu::create_settings_menu())
        .build();

    let exit_btn = gtk::Button::builder()
        .label("_Exit")
        .use_underline(true)
        .action_name("window.close")
        .build();

    let header_bar = adw::HeaderBar::builder()
        .title_widget(&gtk::Label::new(Some("snip2text")))
        .build();
    header_bar.pack_start(&new_snip_btn);
    header_bar.pack_start(&translate_btn);
    header_bar.pack_start(&settings_btn);
    header_bar.pack_end(&exit_btn);

    HeaderComponents {
        header_bar,
        translate_btn,
    }
}

//! Settings menu model
//!
//! Items point at `win.*` actions registered by the handlers module.

use gtk4 as gtk;

use gtk::gio;
use gtk4::prelude::*;

use crate::app::config::FONT_SIZES;
use crate::app::TextRegion;

pub const ACTION_NEW_SNIP: &str = "new-snip";
pub const ACTION_TRANSLATE: &str = "translate";
pub const ACTION_LANGUAGE: &str = "language";
pub const ACTION_AUTO_TRANSLATE: &str = "auto-translate";
pub const ACTION_SHOW_SNIP: &str = "show-snip";

pub fn win(action: &str) -> String {
    format!("win.{}", action)
}

pub fn create_settings_menu() -> gio::Menu {
    let menu = gio::Menu::new();

    let languages = gio::Menu::new();
    languages.append(Some("Chinese and English"), Some(&win(ACTION_LANGUAGE)));
    menu.append_submenu(Some("_Language"), &languages);

    let translation = gio::Menu::new();
    translation.append(Some("Immediate _Translation"), Some(&win(ACTION_AUTO_TRANSLATE)));
    menu.append_section(None, &translation);

    let fonts = gio::Menu::new();
    for region in TextRegion::ALL {
        fonts.append_submenu(Some(&format!("_{}", region.label())), &font_size_menu(region));
    }
    let display = gio::Menu::new();
    display.append_submenu(Some("_Font Sizes"), &fonts);
    display.append(Some("_Show Snip"), Some(&win(ACTION_SHOW_SNIP)));
    menu.append_section(None, &display);

    menu
}

fn font_size_menu(region: TextRegion) -> gio::Menu {
    let sizes = gio::Menu::new();
    for size in FONT_SIZES {
        let item = gio::MenuItem::new(Some(&size.to_string()), None);
        item.set_action_and_target_value(
            Some(&win(region.font_action())),
            Some(&size.to_variant()),
        );
        sizes.append_item(&item);
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_action_names() {
        assert_eq!(win(ACTION_NEW_SNIP), "win.new-snip");
        assert_eq!(win(TextRegion::Spelling.font_action()), "win.font-spelling");
    }
}

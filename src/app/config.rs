//! Session preferences and service configuration
//!
//! Nothing here is persisted; every run starts from the defaults below.

use std::env;

pub const FONT_SIZES: [u32; 6] = [10, 12, 16, 24, 36, 48];
pub const MAIN_DEFAULT_FONT_SIZE: u32 = 24;
pub const SUBS_DEFAULT_FONT_SIZE: u32 = 12;

pub const DEFAULT_TRANSLATE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_OCR_LANG: &str = "chi_sim";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The three text regions of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRegion {
    Recognized,
    Spelling,
    Translation,
}

impl TextRegion {
    pub const ALL: [TextRegion; 3] = [
        TextRegion::Recognized,
        TextRegion::Spelling,
        TextRegion::Translation,
    ];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            TextRegion::Recognized => "Recognized Text",
            TextRegion::Spelling => "Spelling",
            TextRegion::Translation => "Translation",
        }
    }

    /// Window action changing this region's font size
    pub fn font_action(&self) -> &'static str {
        match self {
            TextRegion::Recognized => "font-recognized",
            TextRegion::Spelling => "font-spelling",
            TextRegion::Translation => "font-translation",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TextRegion::Recognized => "recognized-text",
            TextRegion::Spelling => "spelling-text",
            TextRegion::Translation => "translation-text",
        }
    }

    pub fn sample_text(&self) -> &'static str {
        match self {
            TextRegion::Recognized => "你好，世界！",
            TextRegion::Spelling => "Nǐ hǎo, shìjiè!",
            TextRegion::Translation => "Hello, World!",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            TextRegion::Recognized => 0,
            TextRegion::Spelling => 1,
            TextRegion::Translation => 2,
        }
    }
}

/// Display preferences, mutated only by menu actions
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    font_sizes: [u32; 3],
    pub auto_translate: bool,
    pub show_snip: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_sizes: [
                MAIN_DEFAULT_FONT_SIZE,
                SUBS_DEFAULT_FONT_SIZE,
                SUBS_DEFAULT_FONT_SIZE,
            ],
            auto_translate: true,
            show_snip: false,
        }
    }
}

impl Preferences {
    pub fn font_size(&self, region: TextRegion) -> u32 {
        self.font_sizes[region.index()]
    }

    /// Returns false for sizes outside `FONT_SIZES`
    pub fn set_font_size(&mut self, region: TextRegion, size: u32) -> bool {
        if !FONT_SIZES.contains(&size) {
            return false;
        }
        self.font_sizes[region.index()] = size;
        true
    }
}

/// CSS rule applying a font size to one region
pub fn font_css(region: TextRegion, size: u32) -> String {
    format!("textview.{} {{ font-size: {}pt; }}", region.css_class(), size)
}

/// External service settings, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub translate_url: String,
    pub api_key: Option<String>,
    pub ocr_lang: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            api_key: None,
            ocr_lang: DEFAULT_OCR_LANG.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            translate_url: non_empty("SNIP2TEXT_TRANSLATE_URL").unwrap_or(defaults.translate_url),
            api_key: non_empty("SNIP2TEXT_TRANSLATE_API_KEY"),
            ocr_lang: non_empty("SNIP2TEXT_OCR_LANG").unwrap_or(defaults.ocr_lang),
            timeout_secs: non_empty("SNIP2TEXT_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

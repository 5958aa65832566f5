//! Application state types
//!
//! This module contains the session state owned by the main window. The UI
//! thread is its only writer; workers receive owned copies of their inputs.

use gtk4 as gtk;
use image::RgbaImage;
use std::sync::Arc;

use super::config::{Preferences, TextRegion};
use crate::adapters::{join_fragments, Fragment, OcrError, TranslateError, Translator};

/// Placeholder shown while a blocking adapter call runs
pub const IN_PROGRESS: &str = "In progress...";

/// Readiness of the translation backend
pub enum TranslatorStatus {
    Connecting,
    Ready(Arc<Translator>),
    Unavailable(String),
}

impl TranslatorStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, TranslatorStatus::Ready(_))
    }
}

/// What the window must do after a snip lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnipFollowUp {
    pub recognize: bool,
    pub translate: bool,
}

/// Input for one translation run
pub struct TranslationJob {
    pub translator: Option<Arc<Translator>>,
    pub text: String,
}

/// Main application state
pub struct AppState {
    /// The most recent snip; replaced by the next one
    pub image: Option<Arc<RgbaImage>>,
    /// Display form of `image`, absent for empty captures
    pub thumbnail: Option<gtk::gdk_pixbuf::Pixbuf>,
    texts: [String; 3],
    pub prefs: Preferences,
    pub translator: TranslatorStatus,
    /// Whether a region selector is open
    pub snipping: bool,
    pub recognizing: bool,
    pub translating: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create a new application state with default values
    pub fn new() -> Self {
        Self {
            image: None,
            thumbnail: None,
            texts: TextRegion::ALL.map(|r| r.sample_text().to_string()),
            prefs: Preferences::default(),
            translator: TranslatorStatus::Connecting,
            snipping: false,
            recognizing: false,
            translating: false,
        }
    }

    pub fn text(&self, region: TextRegion) -> &str {
        &self.texts[region.index()]
    }

    pub fn set_text(&mut self, region: TextRegion, text: impl Into<String>) {
        self.texts[region.index()] = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.snipping || self.recognizing || self.translating
    }

    /// Translate is offered only with a ready backend and nothing in flight
    pub fn can_translate(&self) -> bool {
        self.translator.is_ready() && !self.is_busy()
    }

    /// Enter selection mode; refused while any step is running
    pub fn begin_snip(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.snipping = true;
        true
    }

    pub fn cancel_snip(&mut self) {
        self.snipping = false;
    }

    /// Store the new image and clear every text region
    pub fn finish_snip(&mut self, image: RgbaImage) -> SnipFollowUp {
        self.snipping = false;
        self.image = Some(Arc::new(image));
        for region in TextRegion::ALL {
            self.set_text(region, "");
        }
        SnipFollowUp {
            recognize: true,
            translate: self.prefs.auto_translate,
        }
    }

    /// Mark recognition as running and hand out the image to recognize
    pub fn begin_recognition(&mut self) -> Option<Arc<RgbaImage>> {
        if self.recognizing {
            return None;
        }
        let image = self.image.clone()?;
        self.recognizing = true;
        self.set_text(TextRegion::Recognized, IN_PROGRESS);
        Some(image)
    }

    /// Store the recognition result and report whether translation follows
    ///
    /// A failed recognition never feeds its error text to translation; the
    /// downstream regions are left empty instead.
    pub fn finish_recognition(
        &mut self,
        result: Result<Vec<Fragment>, OcrError>,
        then_translate: bool,
    ) -> bool {
        self.recognizing = false;
        match result {
            Ok(fragments) => {
                self.set_text(TextRegion::Recognized, join_fragments(&fragments));
                then_translate
            }
            Err(e) => {
                self.set_text(TextRegion::Recognized, format!("Error: {}", e));
                self.set_text(TextRegion::Spelling, "");
                self.set_text(TextRegion::Translation, "");
                false
            }
        }
    }

    /// Mark translation as running for the current recognized text
    ///
    /// Transliteration needs no backend, so a job is handed out even when
    /// the translator is unavailable.
    pub fn begin_translation(&mut self, recognized: String) -> Option<TranslationJob> {
        if self.translating {
            return None;
        }
        self.translating = true;
        self.set_text(TextRegion::Recognized, recognized.clone());
        self.set_text(TextRegion::Spelling, IN_PROGRESS);
        self.set_text(TextRegion::Translation, IN_PROGRESS);

        let translator = match &self.translator {
            TranslatorStatus::Ready(t) => Some(t.clone()),
            _ => None,
        };
        Some(TranslationJob {
            translator,
            text: recognized,
        })
    }

    pub fn finish_translation(
        &mut self,
        spelling: Result<String, TranslateError>,
        translation: Result<String, TranslateError>,
    ) {
        self.translating = false;
        for (region, result) in [
            (TextRegion::Spelling, spelling),
            (TextRegion::Translation, translation),
        ] {
            let text = match result {
                Ok(text) => text,
                Err(e) => format!("Error: {}", e),
            };
            self.set_text(region, text);
        }
    }

    /// Explain why no translation can happen right now
    pub fn translator_problem(&self) -> Option<TranslateError> {
        match &self.translator {
            TranslatorStatus::Ready(_) => None,
            TranslatorStatus::Connecting => Some(TranslateError::Unavailable(
                "still connecting to the translation service".to_string(),
            )),
            TranslatorStatus::Unavailable(reason) => {
                Some(TranslateError::Unavailable(reason.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(texts: &[&str]) -> Vec<Fragment> {
        texts
            .iter()
            .map(|t| Fragment {
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_new_state_shows_samples() {
        let state = AppState::new();
        assert_eq!(state.text(TextRegion::Recognized), "你好，世界！");
        assert_eq!(state.text(TextRegion::Spelling), "Nǐ hǎo, shìjiè!");
        assert_eq!(state.text(TextRegion::Translation), "Hello, World!");
        assert!(state.image.is_none());
        assert!(!state.can_translate());
    }

    #[test]
    fn test_finish_snip_clears_texts() {
        let mut state = AppState::new();
        assert!(state.begin_snip());
        let follow_up = state.finish_snip(RgbaImage::new(4, 4));

        assert!(!state.snipping);
        assert!(state.image.is_some());
        for region in TextRegion::ALL {
            assert_eq!(state.text(region), "");
        }
        assert_eq!(
            follow_up,
            SnipFollowUp {
                recognize: true,
                translate: true
            }
        );
    }

    #[test]
    fn test_snip_refused_while_busy() {
        let mut state = AppState::new();
        assert!(state.begin_snip());
        assert!(!state.begin_snip());
        state.cancel_snip();
        assert!(state.begin_snip());
    }

    #[test]
    fn test_recognition_joins_fragments() {
        let mut state = AppState::new();
        state.finish_snip(RgbaImage::new(4, 4));

        assert!(state.begin_recognition().is_some());
        assert_eq!(state.text(TextRegion::Recognized), IN_PROGRESS);
        assert!(state.begin_recognition().is_none());

        assert!(!state.finish_recognition(Ok(fragments(&["你好", "世界"])), false));
        assert_eq!(state.text(TextRegion::Recognized), "你好 世界");
        assert!(!state.recognizing);
    }

    #[test]
    fn test_recognition_without_image() {
        let mut state = AppState::new();
        assert!(state.begin_recognition().is_none());
        assert!(!state.recognizing);
    }

    #[test]
    fn test_recognition_failure_replaces_placeholder() {
        let mut state = AppState::new();
        state.finish_snip(RgbaImage::new(4, 4));
        state.begin_recognition();
        state.finish_recognition(
            Err(OcrError::Engine("tesseract not found".to_string())),
            false,
        );

        assert_eq!(
            state.text(TextRegion::Recognized),
            "Error: OCR failed: tesseract not found"
        );
    }

    #[test]
    fn test_empty_capture_recognizes_to_empty_text() {
        let mut state = AppState::new();
        state.finish_snip(RgbaImage::new(0, 0));
        state.begin_recognition();
        state.finish_recognition(Ok(Vec::new()), false);
        assert_eq!(state.text(TextRegion::Recognized), "");
    }

    #[test]
    fn test_auto_translate_off_leaves_translation_empty() {
        let mut state = AppState::new();
        state.prefs.auto_translate = false;

        let follow_up = state.finish_snip(RgbaImage::new(4, 4));
        assert!(!follow_up.translate);

        state.begin_recognition();
        let translate_next = state.finish_recognition(Ok(fragments(&["你好"])), follow_up.translate);
        assert!(!translate_next);
        assert_eq!(state.text(TextRegion::Recognized), "你好");
        assert_eq!(state.text(TextRegion::Translation), "");
        assert_eq!(state.text(TextRegion::Spelling), "");
    }

    #[test]
    fn test_auto_translate_on_follows_successful_recognition() {
        let mut state = AppState::new();
        let follow_up = state.finish_snip(RgbaImage::new(4, 4));
        assert!(follow_up.translate);

        state.begin_recognition();
        assert!(state.finish_recognition(Ok(fragments(&["你好"])), follow_up.translate));
    }

    #[test]
    fn test_failed_recognition_never_reaches_translation() {
        let mut state = AppState::new();
        let follow_up = state.finish_snip(RgbaImage::new(4, 4));
        assert!(follow_up.translate);

        state.begin_recognition();
        let translate_next = state.finish_recognition(
            Err(OcrError::Engine("x".to_string())),
            follow_up.translate,
        );

        assert!(!translate_next);
        assert_eq!(state.text(TextRegion::Recognized), "Error: OCR failed: x");
        assert_eq!(state.text(TextRegion::Spelling), "");
        assert_eq!(state.text(TextRegion::Translation), "");
        assert!(!state.is_busy());
    }

    #[test]
    fn test_toggle_has_no_retroactive_effect() {
        let mut state = AppState::new();
        state.finish_snip(RgbaImage::new(4, 4));
        state.set_text(TextRegion::Translation, "Hello");

        state.prefs.auto_translate = false;
        assert_eq!(state.text(TextRegion::Translation), "Hello");
    }

    #[test]
    fn test_translation_sets_placeholders_then_results() {
        let mut state = AppState::new();
        let job = state.begin_translation("你好".to_string()).unwrap();
        assert!(job.translator.is_none());
        assert_eq!(job.text, "你好");
        assert_eq!(state.text(TextRegion::Spelling), IN_PROGRESS);
        assert_eq!(state.text(TextRegion::Translation), IN_PROGRESS);
        assert!(state.begin_translation("x".to_string()).is_none());

        state.finish_translation(Ok("nǐ hǎo".to_string()), Ok("Hello".to_string()));
        assert_eq!(state.text(TextRegion::Spelling), "nǐ hǎo");
        assert_eq!(state.text(TextRegion::Translation), "Hello");
        assert!(!state.translating);
    }

    #[test]
    fn test_translation_failure_only_touches_its_region() {
        let mut state = AppState::new();
        state.begin_translation("你好".to_string());
        state.finish_translation(
            Ok("nǐ hǎo".to_string()),
            Err(TranslateError::Http("connection refused".to_string())),
        );

        assert_eq!(state.text(TextRegion::Spelling), "nǐ hǎo");
        assert_eq!(
            state.text(TextRegion::Translation),
            "Error: Translation request failed: connection refused"
        );
    }

    #[test]
    fn test_translator_problem() {
        let mut state = AppState::new();
        assert!(state.translator_problem().is_some());

        state.translator = TranslatorStatus::Unavailable("offline".to_string());
        assert_eq!(
            state.translator_problem().map(|e| e.to_string()).as_deref(),
            Some("Translation unavailable: offline")
        );
        assert!(!state.can_translate());
    }
}

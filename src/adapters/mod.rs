//! Recognition and translation adapters
//!
//! Thin wrappers forwarding an image or a string to an external engine and
//! returning plain text. All of them block, so callers run them off the UI
//! thread.

pub mod ocr;
pub mod translation;
pub mod transliteration;

pub use ocr::{join_fragments, recognize, Fragment};
pub use translation::Translator;
pub use transliteration::to_pinyin;

#[derive(Debug)]
pub enum OcrError {
    Engine(String),

    Worker,
}

impl std::fmt::Display for OcrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(msg) => write!(f, "OCR failed: {}", msg),
            Self::Worker => write!(f, "OCR worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for OcrError {}

#[derive(Debug)]
pub enum TranslateError {
    Http(String),

    Service(String),

    UnsupportedPair { source: String, target: String },

    Unavailable(String),

    Worker,
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "Translation request failed: {}", msg),
            Self::Service(msg) => write!(f, "Translation service error: {}", msg),
            Self::UnsupportedPair { source, target } => {
                write!(f, "No {} -> {} language pack installed", source, target)
            }
            Self::Unavailable(msg) => write!(f, "Translation unavailable: {}", msg),
            Self::Worker => write!(f, "Translation worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for TranslateError {}

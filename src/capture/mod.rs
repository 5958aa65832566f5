//! Capture module for region selection and screen grabbing
//!
//! This module provides the desktop geometry used by the region selector
//! and abstractions over the xcap library for grabbing pixels.

pub mod geometry;
pub mod screen;

pub use geometry::{DragGesture, Point, ScreenRect};
pub use screen::{image_to_pixbuf, Desktop};

#[derive(Debug)]
pub enum CaptureError {
    NoScreens,

    Enumeration(String),

    CaptureFailed(String),

    Cancelled,
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoScreens => write!(f, "No screens available for capture"),
            Self::Enumeration(msg) => write!(f, "Failed to enumerate monitors: {}", msg),
            Self::CaptureFailed(msg) => write!(f, "Failed to capture screen: {}", msg),
            Self::Cancelled => write!(f, "Selection cancelled"),
        }
    }
}

impl std::error::Error for CaptureError {}

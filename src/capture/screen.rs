//! Screen capture using the xcap library
//!
//! Every monitor overlapping the bounding box is grabbed separately and the
//! slices are composited onto one canvas.

use gtk4 as gtk;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, info, warn};
use xcap::Monitor;

use super::geometry::{BoundingBox, ScreenRect, ScreenTopology};
use super::CaptureError;

/// Information about a monitor
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub name: String,
    pub rect: ScreenRect,
    pub is_primary: bool,
    pub scale_factor: f32,
}

impl MonitorInfo {
    fn from_xcap(monitor: &Monitor) -> Result<Self, CaptureError> {
        Ok(Self {
            name: monitor.name().map_err(enumeration_error)?,
            rect: ScreenRect::new(
                monitor.x().map_err(enumeration_error)?,
                monitor.y().map_err(enumeration_error)?,
                monitor.width().map_err(enumeration_error)?,
                monitor.height().map_err(enumeration_error)?,
            ),
            is_primary: monitor.is_primary().map_err(enumeration_error)?,
            scale_factor: monitor.scale_factor().map_err(enumeration_error)?,
        })
    }
}

fn enumeration_error(e: impl std::fmt::Display) -> CaptureError {
    CaptureError::Enumeration(e.to_string())
}

/// A captured slice of one monitor, placed in desktop coordinates
pub struct Tile {
    pub area: BoundingBox,
    pub image: RgbaImage,
}

fn all_monitors() -> Result<Vec<(Monitor, MonitorInfo)>, CaptureError> {
    let monitors = Monitor::all().map_err(enumeration_error)?;

    let mut result = Vec::with_capacity(monitors.len());
    for monitor in monitors {
        match MonitorInfo::from_xcap(&monitor) {
            Ok(info) => result.push((monitor, info)),
            Err(e) => warn!("Skipping monitor: {}", e),
        }
    }
    Ok(result)
}

/// Monitors enumerated once when a snip starts
///
/// The overlays and the final grab both work from this snapshot, so a
/// monitor plugged in mid-selection is ignored until the next snip.
pub struct Desktop {
    monitors: Vec<(Monitor, MonitorInfo)>,
    topology: ScreenTopology,
}

impl Desktop {
    pub fn query() -> Result<Self, CaptureError> {
        let monitors = all_monitors()?;
        for (_, info) in &monitors {
            debug!(
                "Monitor: {} ({}x{}) at ({}, {}) scale {}{}",
                info.name,
                info.rect.width,
                info.rect.height,
                info.rect.x,
                info.rect.y,
                info.scale_factor,
                if info.is_primary { " [primary]" } else { "" }
            );
        }
        let topology = ScreenTopology::new(monitors.iter().map(|(_, info)| info.rect).collect())?;
        Ok(Self { monitors, topology })
    }

    pub fn topology(&self) -> &ScreenTopology {
        &self.topology
    }

    /// Capture the desktop pixels inside `bbox`
    ///
    /// A degenerate box yields a 0x0 image instead of an error.
    pub fn grab(&self, bbox: BoundingBox) -> Result<RgbaImage, CaptureError> {
        if bbox.is_empty() {
            info!("Zero-area selection, producing an empty image");
            return Ok(RgbaImage::new(0, 0));
        }

        if self.topology.is_single() {
            info!("Capturing {:?} from a single monitor", bbox);
        } else {
            info!(
                "Compositing {:?} across {} monitors",
                bbox,
                self.monitors.len()
            );
        }

        let mut tiles = Vec::new();
        for (monitor, info) in &self.monitors {
            if let Some(tile) = capture_tile(monitor, info, &bbox)? {
                tiles.push(tile);
            }
        }
        Ok(composite(&bbox, tiles))
    }
}

/// Grab the part of `bbox` lying on one monitor
fn capture_tile(
    monitor: &Monitor,
    info: &MonitorInfo,
    bbox: &BoundingBox,
) -> Result<Option<Tile>, CaptureError> {
    let Some(area) = info.rect.intersect(bbox) else {
        return Ok(None);
    };

    let local_x = (area.left - info.rect.x) as u32;
    let local_y = (area.top - info.rect.y) as u32;
    debug!(
        "Grabbing {}x{} at ({}, {}) on {}",
        area.width(),
        area.height(),
        local_x,
        local_y,
        info.name
    );

    let image = monitor
        .capture_region(local_x, local_y, area.width(), area.height())
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    Ok(Some(Tile { area, image }))
}

/// Place tiles onto a canvas covering `bbox`
///
/// Tiles from monitors with a different pixel density are resampled to the
/// logical size of their area first. Uncovered canvas stays transparent.
pub fn composite(bbox: &BoundingBox, tiles: Vec<Tile>) -> RgbaImage {
    let mut canvas = RgbaImage::new(bbox.width(), bbox.height());

    for tile in tiles {
        let (w, h) = (tile.area.width(), tile.area.height());
        let image = if tile.image.dimensions() != (w, h) {
            imageops::resize(&tile.image, w, h, FilterType::Triangle)
        } else {
            tile.image
        };

        let x = (tile.area.left - bbox.left) as i64;
        let y = (tile.area.top - bbox.top) as i64;
        imageops::replace(&mut canvas, &image, x, y);
    }

    canvas
}

/// Convert a captured image (RgbaImage) to a GDK Pixbuf for display
pub fn image_to_pixbuf(image: &RgbaImage) -> Option<gtk::gdk_pixbuf::Pixbuf> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = width * 4; // RGBA = 4 bytes per pixel
    let bytes = gtk::glib::Bytes::from(image.as_raw());

    Some(gtk::gdk_pixbuf::Pixbuf::from_bytes(
        &bytes,
        gtk::gdk_pixbuf::Colorspace::Rgb,
        true, // has_alpha
        8,    // bits_per_sample
        width,
        height,
        stride,
    ))
}

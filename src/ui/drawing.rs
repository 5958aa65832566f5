use gtk4 as gtk;

use gtk::DrawingArea;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::AppState;
use crate::capture::{DragGesture, Point};

/// Current window height; the default height stands in until the window is allocated
pub fn current_window_height(allocated: i32, default_height: i32) -> i32 {
    if allocated > 0 {
        allocated
    } else {
        default_height.max(0)
    }
}

/// Height of the thumbnail: a quarter of the window, never upscaled
pub fn thumbnail_height(window_height: i32, image_height: i32) -> i32 {
    (window_height / 4).min(image_height).max(0)
}

/// Scale and offset placing an image centered inside an area, aspect preserved
pub fn fit_transform(area: (f64, f64), image: (f64, f64)) -> (f64, f64, f64) {
    let (da_width, da_height) = area;
    let (img_width, img_height) = image;
    if img_width <= 0.0 || img_height <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let scale_x = da_width / img_width;
    let scale_y = da_height / img_height;
    let scale = scale_x.min(scale_y);

    let offset_x = (da_width - img_width * scale) / 2.0;
    let offset_y = (da_height - img_height * scale) / 2.0;
    (scale, offset_x, offset_y)
}

pub fn create_thumbnail_area(state: &Rc<RefCell<AppState>>) -> DrawingArea {
    let drawing_area = DrawingArea::builder()
        .hexpand(true)
        .visible(false)
        .build();

    drawing_area.set_draw_func({
        let state = state.clone();
        move |_, cr, width, height| {
            draw_thumbnail(&state, cr, width, height);
        }
    });

    drawing_area
}

fn draw_thumbnail(state: &Rc<RefCell<AppState>>, cr: &gtk::cairo::Context, width: i32, height: i32) {
    let state = state.borrow();
    let Some(pixbuf) = state.thumbnail.as_ref() else {
        return;
    };

    let (scale, offset_x, offset_y) = fit_transform(
        (width as f64, height as f64),
        (pixbuf.width() as f64, pixbuf.height() as f64),
    );
    if scale <= 0.0 {
        return;
    }

    if cr.save().is_err() {
        return;
    }
    cr.translate(offset_x, offset_y);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    let _ = cr.paint();
    let _ = cr.restore();
}

/// Selection outline as seen on the overlay whose top-left is `overlay_origin`
pub fn draw_selection_outline(
    gesture: &DragGesture,
    overlay_origin: Point,
    cr: &gtk::cairo::Context,
) {
    let Some((rx, ry, rw, rh)) = gesture.outline_on(overlay_origin) else {
        return;
    };

    cr.set_source_rgba(128.0 / 255.0, 128.0 / 255.0, 1.0, 100.0 / 255.0);
    cr.rectangle(rx, ry, rw, rh);
    let _ = cr.fill();

    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_line_width(3.0);
    cr.rectangle(rx, ry, rw, rh);
    let _ = cr.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_height_is_quarter_of_window() {
        assert_eq!(thumbnail_height(800, 1000), 200);
        assert_eq!(thumbnail_height(250, 1000), 62);
    }

    #[test]
    fn test_current_window_height_prefers_allocation() {
        // Maximized: allocation is larger than the unchanged default size
        assert_eq!(current_window_height(1400, 250), 1400);
        assert_eq!(thumbnail_height(current_window_height(1400, 250), 1000), 350);

        // Not yet mapped
        assert_eq!(current_window_height(0, 250), 250);
    }

    #[test]
    fn test_thumbnail_never_upscales() {
        assert_eq!(thumbnail_height(800, 50), 50);
        assert_eq!(thumbnail_height(800, 0), 0);
    }

    #[test]
    fn test_fit_transform_preserves_aspect() {
        // Wide image in a tall area: width-bound
        let (scale, ox, oy) = fit_transform((100.0, 100.0), (200.0, 50.0));
        assert_eq!(scale, 0.5);
        assert_eq!(ox, 0.0);
        assert_eq!(oy, 37.5);

        // Tall image: height-bound
        let (scale, ox, oy) = fit_transform((300.0, 60.0), (60.0, 120.0));
        assert_eq!(scale, 0.5);
        assert_eq!(ox, 135.0);
        assert_eq!(oy, 0.0);
    }

    #[test]
    fn test_fit_transform_empty_image() {
        assert_eq!(fit_transform((100.0, 100.0), (0.0, 0.0)), (0.0, 0.0, 0.0));
    }
}

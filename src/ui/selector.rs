//! Region selector overlays
//!
//! One translucent fullscreen window per monitor. A drag may start on one
//! monitor and end on another; every overlay paints its share of the
//! outline. Releasing hides the overlays, grabs the real desktop pixels
//! inside the absolute bounding box and hands them to the callback.
//! The receiver of the callback is responsible for calling `close`.

use gtk4 as gtk;
use log::{debug, info, warn};

use gtk::{gdk, glib, DrawingArea, EventControllerKey, GestureDrag};
use gtk4::prelude::*;
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::capture::{CaptureError, Desktop, DragGesture, Point, ScreenRect};
use crate::ui::drawing::draw_selection_outline;

const OVERLAY_OPACITY: f64 = 0.3;

/// Time for the compositor to take the hidden overlays off screen
const SETTLE_DELAY: Duration = Duration::from_millis(200);

pub type CaptureCallback = Rc<dyn Fn(Result<RgbaImage, CaptureError>)>;

struct SelectorState {
    gesture: DragGesture,
    snipping: bool,
}

/// Overlay window covering one monitor
struct Overlay {
    monitor: gdk::Monitor,
    origin: Point,
    window: gtk::Window,
    drawing_area: DrawingArea,
}

impl Overlay {
    fn new(monitor: gdk::Monitor, rect: ScreenRect, state: &Rc<RefCell<SelectorState>>) -> Self {
        let origin = Point::new(rect.x, rect.y);

        let drawing_area = DrawingArea::builder().hexpand(true).vexpand(true).build();
        drawing_area.set_draw_func({
            let state = state.clone();
            move |_, cr, _, _| {
                let s = state.borrow();
                if s.snipping {
                    draw_selection_outline(&s.gesture, origin, cr);
                }
            }
        });

        let window = gtk::Window::builder()
            .title("snip2text")
            .decorated(false)
            .resizable(false)
            .default_width(rect.width as i32)
            .default_height(rect.height as i32)
            .child(&drawing_area)
            .build();
        window.set_opacity(OVERLAY_OPACITY);

        Self {
            monitor,
            origin,
            window,
            drawing_area,
        }
    }
}

/// Monitors as GDK sees them, in logical desktop coordinates
fn display_monitors(display: &gdk::Display) -> Vec<(gdk::Monitor, ScreenRect)> {
    let model = display.monitors();
    (0..model.n_items())
        .filter_map(|i| model.item(i).and_downcast::<gdk::Monitor>())
        .map(|monitor| {
            let g = monitor.geometry();
            let rect = ScreenRect::new(
                g.x(),
                g.y(),
                g.width().max(0) as u32,
                g.height().max(0) as u32,
            );
            (monitor, rect)
        })
        .collect()
}

fn redraw_all(overlays: &[Overlay]) {
    for overlay in overlays {
        overlay.drawing_area.queue_draw();
    }
}

pub struct RegionSelector {
    overlays: Rc<Vec<Overlay>>,
    state: Rc<RefCell<SelectorState>>,
}

impl RegionSelector {
    pub fn new(desktop: Desktop, on_capture: CaptureCallback) -> Result<Self, CaptureError> {
        let display = gdk::Display::default().ok_or(CaptureError::NoScreens)?;
        let monitors = display_monitors(&display);

        let covered = monitors
            .iter()
            .map(|(_, rect)| *rect)
            .reduce(|acc, rect| acc.union(&rect))
            .ok_or(CaptureError::NoScreens)?;
        let expected = desktop.topology().overlay_geometry();
        if covered != expected {
            warn!(
                "Overlays cover {:?} but the capture backend reports {:?}",
                covered, expected
            );
        }
        debug!("Overlay geometry: {:?} over {} monitors", covered, monitors.len());

        let state = Rc::new(RefCell::new(SelectorState {
            gesture: DragGesture::default(),
            snipping: false,
        }));
        let overlays = Rc::new(
            monitors
                .into_iter()
                .map(|(monitor, rect)| Overlay::new(monitor, rect, &state))
                .collect::<Vec<_>>(),
        );

        let desktop = Rc::new(desktop);
        for overlay in overlays.iter() {
            connect_gesture(overlay, &overlays, &state, &desktop, &on_capture);
            connect_cancel(overlay, &overlays, &state, &on_capture);
            connect_close_request(overlay, &overlays, &state, &on_capture);
        }

        Ok(Self { overlays, state })
    }

    /// Show the overlays and enter selection mode
    pub fn start(&self) {
        self.state.borrow_mut().snipping = true;
        for overlay in self.overlays.iter() {
            overlay.window.set_cursor_from_name(Some("crosshair"));
            overlay.window.fullscreen_on_monitor(&overlay.monitor);
            overlay.window.present();
        }
        info!("Region selection started on {} monitors", self.overlays.len());
    }

    pub fn close(&self) {
        self.state.borrow_mut().snipping = false;
        for overlay in self.overlays.iter() {
            overlay.window.close();
        }
    }
}

fn connect_gesture(
    overlay: &Overlay,
    overlays: &Rc<Vec<Overlay>>,
    state: &Rc<RefCell<SelectorState>>,
    desktop: &Rc<Desktop>,
    on_capture: &CaptureCallback,
) {
    let drag = GestureDrag::new();
    let overlays = Rc::downgrade(overlays);

    drag.connect_drag_begin({
        let state = state.clone();
        let overlays = overlays.clone();
        let origin = overlay.origin;
        move |_, x, y| {
            let mut s = state.borrow_mut();
            if !s.snipping {
                return;
            }
            s.gesture.press(origin, Point::new(x as i32, y as i32));
            debug!("Selection anchored at {:?}", s.gesture.abs_anchor());
            drop(s);
            if let Some(overlays) = overlays.upgrade() {
                redraw_all(&overlays);
            }
        }
    });

    drag.connect_drag_update({
        let state = state.clone();
        let overlays = overlays.clone();
        move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            let current = Point::new((start_x + offset_x) as i32, (start_y + offset_y) as i32);
            if !state.borrow_mut().gesture.motion(current) {
                return;
            }
            if let Some(overlays) = overlays.upgrade() {
                redraw_all(&overlays);
            }
        }
    });

    drag.connect_drag_end({
        let state = state.clone();
        let desktop = desktop.clone();
        let on_capture = on_capture.clone();
        move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            let end = Point::new((start_x + offset_x) as i32, (start_y + offset_y) as i32);

            let mut s = state.borrow_mut();
            if !s.snipping {
                return;
            }
            let Some(bbox) = s.gesture.release(end) else {
                return;
            };
            s.snipping = false;
            drop(s);

            info!("Selection released, bounding box {:?}", bbox);
            if let Some(overlays) = overlays.upgrade() {
                dismiss_overlays(&overlays);
            }

            let result = desktop.grab(bbox);
            if let Err(ref e) = result {
                warn!("Capture failed: {}", e);
            }
            on_capture(result);
        }
    });

    overlay.drawing_area.add_controller(drag);
}

fn connect_cancel(
    overlay: &Overlay,
    overlays: &Rc<Vec<Overlay>>,
    state: &Rc<RefCell<SelectorState>>,
    on_capture: &CaptureCallback,
) {
    let keys = EventControllerKey::new();
    keys.connect_key_pressed({
        let state = state.clone();
        let overlays = Rc::downgrade(overlays);
        let on_capture = on_capture.clone();
        move |_, key, _, _| {
            if key != gdk::Key::Escape || !take_snipping(&state) {
                return glib::Propagation::Proceed;
            }

            info!("Region selection cancelled");
            if let Some(overlays) = overlays.upgrade() {
                dismiss_overlays(&overlays);
            }
            on_capture(Err(CaptureError::Cancelled));
            glib::Propagation::Stop
        }
    });
    overlay.window.add_controller(keys);
}

/// An overlay closed by the window manager cancels the selection
fn connect_close_request(
    overlay: &Overlay,
    overlays: &Rc<Vec<Overlay>>,
    state: &Rc<RefCell<SelectorState>>,
    on_capture: &CaptureCallback,
) {
    overlay.window.connect_close_request({
        let state = state.clone();
        let overlays = Rc::downgrade(overlays);
        let on_capture = on_capture.clone();
        move |_| {
            if take_snipping(&state) {
                info!("Overlay closed during selection, cancelling");
                if let Some(overlays) = overlays.upgrade() {
                    dismiss_overlays(&overlays);
                }
                // The callback closes every overlay, this one included
                let on_capture = on_capture.clone();
                glib::idle_add_local_once(move || on_capture(Err(CaptureError::Cancelled)));
            }
            glib::Propagation::Proceed
        }
    });
}

/// Leave selection mode, returning whether it was active
fn take_snipping(state: &Rc<RefCell<SelectorState>>) -> bool {
    std::mem::replace(&mut state.borrow_mut().snipping, false)
}

/// Restore the pointer and take the overlays off screen before grabbing
fn dismiss_overlays(overlays: &[Overlay]) {
    for overlay in overlays {
        overlay.window.set_cursor(None::<&gdk::Cursor>);
        overlay.window.set_visible(false);
    }

    let context = glib::MainContext::default();
    while context.pending() {
        context.iteration(false);
    }
    std::thread::sleep(SETTLE_DELAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_cancelled_only_once() {
        let state = Rc::new(RefCell::new(SelectorState {
            gesture: DragGesture::default(),
            snipping: true,
        }));

        // Escape followed by the window manager closing the overlay
        assert!(take_snipping(&state));
        assert!(!take_snipping(&state));
        assert!(!state.borrow().snipping);
    }

    #[test]
    fn test_closed_selector_ignores_close_request() {
        let state = Rc::new(RefCell::new(SelectorState {
            gesture: DragGesture::default(),
            snipping: false,
        }));
        assert!(!take_snipping(&state));
    }
}

//! Desktop geometry for region selection
//!
//! Screen rectangles, the topology they form, and the drag gesture that
//! turns two pointer positions into an absolute bounding box.

use super::CaptureError;

/// A point in desktop pixels
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A screen (or overlay) rectangle given by origin and size
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &ScreenRect) -> ScreenRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        ScreenRect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }

    /// Overlap with a bounding box, if any
    pub fn intersect(&self, bbox: &BoundingBox) -> Option<BoundingBox> {
        let left = self.x.max(bbox.left);
        let top = self.y.max(bbox.top);
        let right = self.right().min(bbox.right);
        let bottom = self.bottom().min(bbox.bottom);

        if left < right && top < bottom {
            Some(BoundingBox {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }
}

/// Absolute-desktop rectangle `(left, top, right, bottom)` enclosing a capture gesture
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    /// Normalizes two corners regardless of drag direction
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Self {
            left: p1.x.min(p2.x),
            top: p1.y.min(p2.y),
            right: p1.x.max(p2.x),
            bottom: p1.y.max(p2.y),
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// A click without drag, or a drag along a single axis
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Monitor layout queried when a selector is constructed
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenTopology {
    screens: Vec<ScreenRect>,
}

impl ScreenTopology {
    pub fn new(screens: Vec<ScreenRect>) -> Result<Self, CaptureError> {
        if screens.is_empty() {
            return Err(CaptureError::NoScreens);
        }
        Ok(Self { screens })
    }

    pub fn is_single(&self) -> bool {
        self.screens.len() == 1
    }

    /// Geometry the selector overlay must cover
    pub fn overlay_geometry(&self) -> ScreenRect {
        let first = self.screens[0];
        self.screens[1..]
            .iter()
            .fold(first, |acc, screen| acc.union(screen))
    }
}

/// Drag gesture over the overlays
///
/// Each monitor carries its own overlay. The press fixes which overlay owns
/// the gesture; its origin turns every later local point into an absolute
/// desktop point, even after the pointer leaves that monitor.
#[derive(Default, Clone, Copy, Debug)]
pub struct DragGesture {
    /// Absolute position of the pressed overlay's top-left corner
    pub origin: Point,
    pub anchor: Point,
    pub current: Point,
    pub active: bool,
}

impl DragGesture {
    fn to_absolute(&self, local: Point) -> Point {
        Point::new(self.origin.x + local.x, self.origin.y + local.y)
    }

    pub fn press(&mut self, origin: Point, local: Point) {
        self.origin = origin;
        self.anchor = local;
        self.current = local;
        self.active = true;
    }

    pub fn abs_anchor(&self) -> Point {
        self.to_absolute(self.anchor)
    }

    /// Returns true when the outline needs repainting
    pub fn motion(&mut self, local: Point) -> bool {
        if !self.active {
            return false;
        }
        self.current = local;
        true
    }

    /// Ends the gesture and yields the absolute bounding box
    pub fn release(&mut self, local: Point) -> Option<BoundingBox> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.current = local;
        Some(self.absolute_box())
    }

    fn absolute_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.to_absolute(self.anchor), self.to_absolute(self.current))
    }

    /// Outline `(x, y, width, height)` in the coordinates of the overlay at `overlay_origin`
    pub fn outline_on(&self, overlay_origin: Point) -> Option<(f64, f64, f64, f64)> {
        if !self.active {
            return None;
        }
        let bbox = self.absolute_box();
        Some((
            (bbox.left - overlay_origin.x) as f64,
            (bbox.top - overlay_origin.y) as f64,
            bbox.width() as f64,
            bbox.height() as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_is_direction_independent() {
        let corners = [
            (Point::new(10, 20), Point::new(110, 220)),
            (Point::new(110, 220), Point::new(10, 20)),
            (Point::new(110, 20), Point::new(10, 220)),
            (Point::new(10, 220), Point::new(110, 20)),
        ];

        for (p1, p2) in corners {
            let bbox = BoundingBox::from_points(p1, p2);
            assert_eq!(
                bbox,
                BoundingBox {
                    left: 10,
                    top: 20,
                    right: 110,
                    bottom: 220
                }
            );
            assert_eq!(bbox.width(), 100);
            assert_eq!(bbox.height(), 200);
        }
    }

    #[test]
    fn test_zero_area_box_is_empty() {
        let p = Point::new(42, 17);
        let bbox = BoundingBox::from_points(p, p);
        assert!(bbox.is_empty());
        assert_eq!(bbox.width(), 0);

        let line = BoundingBox::from_points(Point::new(0, 5), Point::new(30, 5));
        assert!(line.is_empty());
    }

    #[test]
    fn test_single_screen_overlay_geometry() {
        let topology = ScreenTopology::new(vec![ScreenRect::new(0, 0, 2560, 1440)]).unwrap();
        assert!(topology.is_single());
        assert_eq!(
            topology.overlay_geometry(),
            ScreenRect::new(0, 0, 2560, 1440)
        );
    }

    #[test]
    fn test_two_screens_overlay_is_union() {
        let topology = ScreenTopology::new(vec![
            ScreenRect::new(0, 0, 1920, 1080),
            ScreenRect::new(1920, 0, 1280, 1024),
        ])
        .unwrap();

        assert!(!topology.is_single());
        assert_eq!(
            topology.overlay_geometry(),
            ScreenRect::new(0, 0, 3200, 1080)
        );
    }

    #[test]
    fn test_union_with_negative_origin() {
        let topology = ScreenTopology::new(vec![
            ScreenRect::new(0, 0, 1920, 1080),
            ScreenRect::new(-1280, 200, 1280, 1024),
        ])
        .unwrap();

        assert_eq!(
            topology.overlay_geometry(),
            ScreenRect::new(-1280, 0, 3200, 1224)
        );
    }

    #[test]
    fn test_empty_topology_is_rejected() {
        assert!(matches!(
            ScreenTopology::new(Vec::new()),
            Err(CaptureError::NoScreens)
        ));
    }

    #[test]
    fn test_intersect() {
        let screen = ScreenRect::new(1920, 0, 1280, 1024);
        let bbox = BoundingBox {
            left: 1800,
            top: 100,
            right: 2000,
            bottom: 300,
        };
        assert_eq!(
            screen.intersect(&bbox),
            Some(BoundingBox {
                left: 1920,
                top: 100,
                right: 2000,
                bottom: 300
            })
        );

        let outside = BoundingBox {
            left: 0,
            top: 0,
            right: 100,
            bottom: 100,
        };
        assert_eq!(screen.intersect(&outside), None);
    }

    #[test]
    fn test_drag_gesture_resolves_absolute_points() {
        let mut gesture = DragGesture::default();
        gesture.press(Point::new(-1280, 0), Point::new(300, 400));
        assert_eq!(gesture.abs_anchor(), Point::new(-980, 400));
        assert_eq!(gesture.current, gesture.anchor);

        assert!(gesture.motion(Point::new(100, 150)));
        assert_eq!(
            gesture.outline_on(Point::new(-1280, 0)),
            Some((100.0, 150.0, 200.0, 250.0))
        );

        let bbox = gesture.release(Point::new(100, 150)).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                left: -1180,
                top: 150,
                right: -980,
                bottom: 400
            }
        );
        assert!(!gesture.active);
        assert_eq!(gesture.outline_on(Point::new(-1280, 0)), None);
    }

    #[test]
    fn test_drag_across_monitors_uses_pressed_overlay_origin() {
        // Screens (0,0,1920,1080) and (1920,0,1280,1024); press on the right one
        let right = Point::new(1920, 0);
        let mut gesture = DragGesture::default();
        gesture.press(right, Point::new(100, 100));
        assert_eq!(gesture.abs_anchor(), Point::new(2020, 100));

        // Pointer moves onto the left monitor, so local x goes negative
        gesture.motion(Point::new(-1860, 300));
        assert_eq!(
            gesture.outline_on(Point::new(0, 0)),
            Some((60.0, 100.0, 1960.0, 200.0))
        );
        assert_eq!(gesture.outline_on(right), Some((-1860.0, 100.0, 1960.0, 200.0)));

        let bbox = gesture.release(Point::new(-1860, 300)).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                left: 60,
                top: 100,
                right: 2020,
                bottom: 300
            }
        );
    }

    #[test]
    fn test_motion_without_press_is_ignored() {
        let mut gesture = DragGesture::default();
        assert!(!gesture.motion(Point::new(5, 5)));
        assert_eq!(gesture.release(Point::new(5, 5)), None);
    }

    #[test]
    fn test_click_without_drag_yields_empty_box() {
        let mut gesture = DragGesture::default();
        gesture.press(Point::new(0, 0), Point::new(50, 60));
        let bbox = gesture.release(Point::new(50, 60)).unwrap();
        assert!(bbox.is_empty());
    }
}

//! Viewport: pan/zoom transform between screen and document space.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom levels are kept to two decimals so repeated steps do not drift.
fn round_zoom(zoom: f64) -> f64 {
    (zoom * 100.0).round() / 100.0
}

/// The stage view transform.
///
/// Zoom is anchored at the stage origin: `screen = pan + document * zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Stage translation in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            ..Self::default()
        }
    }

    /// Document-to-screen transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Screen-to-document transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    pub fn screen_to_document(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn document_to_screen(&self, document_point: Point) -> Point {
        self.transform() * document_point
    }

    /// Convert a pointer movement in screen pixels to document pixels.
    pub fn screen_delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Where a document-space rectangle lands on screen.
    pub fn document_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.document_to_screen(rect.origin()),
            self.document_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Pan the stage by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom, clamped and rounded. Returns true if it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let zoom = round_zoom(zoom.clamp(self.min_zoom, self.max_zoom));
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    /// Zoom percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Back to 100% with no pan.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_default() {
        let viewport = Viewport::default();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.zoom_percent(), 100);
    }

    #[test]
    fn test_screen_to_document_identity() {
        let viewport = Viewport::default();
        let point = Point::new(100.0, 200.0);
        assert_eq!(viewport.screen_to_document(point), point);
    }

    #[test]
    fn test_round_trip_with_pan_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.pan_by(Vec2::new(50.0, -20.0));
        viewport.set_zoom(1.5);

        let document = Point::new(100.0, 100.0);
        let screen = viewport.document_to_screen(document);
        assert!((screen.x - 200.0).abs() < 1e-9);
        assert!((screen.y - 130.0).abs() < 1e-9);

        let back = viewport.screen_to_document(screen);
        assert!((back.x - document.x).abs() < 1e-9);
        assert!((back.y - document.y).abs() < 1e-9);
    }

    #[test]
    fn test_delta_scales_with_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        assert_eq!(
            viewport.screen_delta_to_document(Vec2::new(10.0, -4.0)),
            Vec2::new(5.0, -2.0)
        );
    }

    #[test]
    fn test_zoom_clamped_and_rounded() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_by(0.1);
        }
        assert!((viewport.zoom - 2.0).abs() < f64::EPSILON);
        assert!(!viewport.zoom_by(0.1));

        for _ in 0..50 {
            viewport.zoom_by(-0.05);
        }
        assert!((viewport.zoom - 0.5).abs() < f64::EPSILON);

        viewport.reset();
        for _ in 0..3 {
            viewport.zoom_by(0.1);
        }
        assert!((viewport.zoom - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_zoom_ignored() {
        let mut viewport = Viewport::default();
        assert!(!viewport.set_zoom(f64::NAN));
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_document_rect_to_screen() {
        let mut viewport = Viewport::default();
        viewport.pan_by(Vec2::new(10.0, 10.0));
        viewport.set_zoom(2.0);
        let rect = viewport.document_rect_to_screen(Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 110.0, 50.0));
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        viewport.pan_by(Vec2::new(100.0, 50.0));
        viewport.set_zoom(1.75);
        viewport.reset();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
    }
}

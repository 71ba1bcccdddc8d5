//! Snapping for node drags and resizes: neighbor guides first, grid second.
//!
//! All functions here are pure and work in document space. Callers convert
//! the screen-pixel guide tolerance by dividing it by the current zoom.

use kurbo::{Point, Rect, Size};

/// Grid size for snapping, in document pixels.
pub const GRID_SIZE: f64 = 8.0;

/// Guide snap distance in screen pixels.
pub const GUIDE_TOLERANCE: f64 = 6.0;

/// Which snapping passes are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Snap to grid lines only.
    Grid,
    /// Snap to neighbor edges only.
    Guides,
    /// Guides, falling back to the grid.
    #[default]
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Guides,
            SnapMode::Guides => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    pub fn snaps_to_guides(self) -> bool {
        matches!(self, SnapMode::Guides | SnapMode::All)
    }

    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Alignment lines to draw while a gesture is active.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Guides {
    /// X position of a vertical guide line.
    pub vertical: Option<f64>,
    /// Y position of a horizontal guide line.
    pub horizontal: Option<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Result of snapping a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSnap {
    pub origin: Point,
    pub guides: Guides,
}

/// Result of snapping a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSnap {
    pub size: Size,
    pub guides: Guides,
}

/// Round a coordinate to the nearest grid line.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

fn x_edges(rect: Rect) -> [f64; 3] {
    [rect.x0, rect.center().x, rect.x1]
}

fn y_edges(rect: Rect) -> [f64; 3] {
    [rect.y0, rect.center().y, rect.y1]
}

/// Closest match between corresponding edges (start/start, center/center,
/// end/end) within `tolerance`. Returns the offset to apply and the guide
/// line. Ties keep the first match found.
fn closest_alignment<const N: usize>(
    moving: [f64; N],
    others: impl Iterator<Item = [f64; N]>,
    tolerance: f64,
) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for edges in others {
        for (edge, target) in moving.iter().zip(edges.iter()) {
            let offset = target - edge;
            if offset.abs() > tolerance {
                continue;
            }
            if best.is_none_or(|(current, _)| offset.abs() < current.abs()) {
                best = Some((offset, *target));
            }
        }
    }
    best
}

/// Snap a dragged rectangle. Each axis independently snaps to the nearest
/// neighbor edge within `tolerance`, or else to the grid.
pub fn snap_move(candidate: Rect, others: &[Rect], tolerance: f64, grid: f64, mode: SnapMode) -> MoveSnap {
    let mut origin = candidate.origin();
    let mut guides = Guides::default();

    if mode.snaps_to_guides() {
        if let Some((offset, line)) =
            closest_alignment(x_edges(candidate), others.iter().map(|r| x_edges(*r)), tolerance)
        {
            origin.x += offset;
            guides.vertical = Some(line);
        }
        if let Some((offset, line)) =
            closest_alignment(y_edges(candidate), others.iter().map(|r| y_edges(*r)), tolerance)
        {
            origin.y += offset;
            guides.horizontal = Some(line);
        }
    }

    if mode.snaps_to_grid() {
        if guides.vertical.is_none() {
            origin.x = snap_to_grid(origin.x, grid);
        }
        if guides.horizontal.is_none() {
            origin.y = snap_to_grid(origin.y, grid);
        }
    }

    MoveSnap { origin, guides }
}

/// Snap a resize from the bottom-right corner. Only the trailing edges
/// move, so only they are matched against neighbors' trailing edges.
/// The result never goes below `min`.
pub fn snap_resize(
    origin: Point,
    size: Size,
    others: &[Rect],
    tolerance: f64,
    grid: f64,
    mode: SnapMode,
    min: Size,
) -> ResizeSnap {
    let mut width = size.width;
    let mut height = size.height;
    let mut guides = Guides::default();

    if mode.snaps_to_guides() {
        let right = origin.x + width;
        if let Some((offset, line)) =
            closest_alignment([right], others.iter().map(|r| [r.x1]), tolerance)
        {
            width += offset;
            guides.vertical = Some(line);
        }
        let bottom = origin.y + height;
        if let Some((offset, line)) =
            closest_alignment([bottom], others.iter().map(|r| [r.y1]), tolerance)
        {
            height += offset;
            guides.horizontal = Some(line);
        }
    }

    if mode.snaps_to_grid() {
        if guides.vertical.is_none() {
            width = snap_to_grid(width, grid);
        }
        if guides.horizontal.is_none() {
            height = snap_to_grid(height, grid);
        }
    }

    if width < min.width {
        width = min.width;
        guides.vertical = None;
    }
    if height < min.height {
        height = min.height;
        guides.horizontal = None;
    }

    ResizeSnap {
        size: Size::new(width, height),
        guides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min() -> Size {
        Size::new(40.0, 32.0)
    }

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(12.0, 8.0) - 16.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(11.9, 8.0) - 8.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(-3.0, 8.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(13.0, 0.0) - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::default(), SnapMode::All);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);
        assert!(!SnapMode::None.is_enabled());
        assert!(SnapMode::Guides.snaps_to_guides());
        assert!(!SnapMode::Guides.snaps_to_grid());
    }

    #[test]
    fn test_move_snaps_to_neighbor_edge_within_tolerance() {
        let neighbor = Rect::new(100.0, 300.0, 200.0, 340.0);
        for dx in [-5.0, -1.0, 3.0, 5.0] {
            let candidate = Rect::from_origin_size((100.0 + dx, 43.0), (60.0, 40.0));
            let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::All);
            assert!((snap.origin.x - 100.0).abs() < 1e-9, "dx = {dx}");
            assert_eq!(snap.guides.vertical, Some(100.0));
            // No neighbor lines up vertically, so y falls back to the grid.
            assert!((snap.origin.y - 40.0).abs() < 1e-9);
            assert_eq!(snap.guides.horizontal, None);
        }
    }

    #[test]
    fn test_move_outside_tolerance_snaps_to_grid() {
        let neighbor = Rect::new(100.0, 300.0, 200.0, 340.0);
        let candidate = Rect::from_origin_size((121.0, 40.0), (40.0, 40.0));
        let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::All);
        assert!((snap.origin.x - 120.0).abs() < 1e-9);
        assert!(snap.guides.is_empty());
    }

    #[test]
    fn test_move_picks_closest_edge() {
        let far = Rect::new(104.0, 300.0, 204.0, 340.0);
        let near = Rect::new(101.0, 400.0, 201.0, 440.0);
        let candidate = Rect::from_origin_size((100.0, 0.0), (30.0, 30.0));
        let snap = snap_move(candidate, &[far, near], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::All);
        assert!((snap.origin.x - 101.0).abs() < 1e-9);
        assert_eq!(snap.guides.vertical, Some(101.0));
    }

    #[test]
    fn test_move_matches_centers_and_trailing_edges() {
        let neighbor = Rect::new(0.0, 0.0, 200.0, 100.0);
        // Centered horizontally: candidate center 98 vs neighbor center 100.
        let candidate = Rect::from_origin_size((68.0, 500.0), (60.0, 20.0));
        let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::All);
        assert!((snap.origin.x - 70.0).abs() < 1e-9);
        assert_eq!(snap.guides.vertical, Some(100.0));

        // Bottom edges: candidate bottom 97 vs neighbor bottom 100.
        let candidate = Rect::from_origin_size((500.0, 77.0), (60.0, 20.0));
        let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::All);
        assert!((snap.origin.y - 80.0).abs() < 1e-9);
        assert_eq!(snap.guides.horizontal, Some(100.0));
    }

    #[test]
    fn test_tolerance_scales_with_zoom() {
        let neighbor = Rect::new(100.0, 300.0, 200.0, 340.0);
        let candidate = Rect::from_origin_size((104.0, 40.0), (60.0, 40.0));
        // At 200% the 6px screen tolerance is 3 document px.
        let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE / 2.0, GRID_SIZE, SnapMode::All);
        assert!(snap.guides.vertical.is_none());
        assert!((snap.origin.x - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_none_passes_through() {
        let neighbor = Rect::new(100.0, 300.0, 200.0, 340.0);
        let candidate = Rect::from_origin_size((101.5, 13.3), (60.0, 40.0));
        let snap = snap_move(candidate, &[neighbor], GUIDE_TOLERANCE, GRID_SIZE, SnapMode::None);
        assert_eq!(snap.origin, candidate.origin());
        assert!(snap.guides.is_empty());
    }

    #[test]
    fn test_resize_snaps_trailing_edge() {
        let neighbor = Rect::new(0.0, 0.0, 300.0, 200.0);
        let snap = snap_resize(
            Point::new(100.0, 100.0),
            Size::new(197.0, 61.0),
            &[neighbor],
            GUIDE_TOLERANCE,
            GRID_SIZE,
            SnapMode::All,
            min(),
        );
        assert!((snap.size.width - 200.0).abs() < 1e-9);
        assert_eq!(snap.guides.vertical, Some(300.0));
        assert!((snap.size.height - 64.0).abs() < 1e-9);
        assert_eq!(snap.guides.horizontal, None);
    }

    #[test]
    fn test_resize_never_below_floor() {
        let neighbor = Rect::new(0.0, 0.0, 138.0, 130.0);
        let snap = snap_resize(
            Point::new(100.0, 100.0),
            Size::new(43.0, 35.0),
            &[neighbor],
            GUIDE_TOLERANCE,
            GRID_SIZE,
            SnapMode::All,
            min(),
        );
        // Both trailing edges pull inwards past the floor.
        assert_eq!(snap.size, min());
        assert!(snap.guides.is_empty());
    }
}

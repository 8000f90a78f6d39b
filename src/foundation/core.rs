pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Clamp `v` into `[0, 1]`.
///
/// NaN maps to `0.0` so a split derived from a degenerate division can never
/// poison the state.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Pointer position relative to the top-left corner of the comparison container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the comparison container in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` when both dimensions are finite and strictly positive.
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Map a pointer position into unit-square coordinates.
    pub fn normalize(self, pos: PointerPos) -> Point {
        Point::new(pos.x / self.width, pos.y / self.height)
    }
}

impl From<ContainerSize> for Size {
    fn from(s: ContainerSize) -> Self {
        Size::new(s.width, s.height)
    }
}

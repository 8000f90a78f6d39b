//! Pure derivation of the visual layout from a [`ComparisonState`].
//!
//! All geometry is expressed in percent of the comparison container (0..100 on
//! both axes) so hosts can apply it directly as CSS; [`ClipRegion::to_path`] and
//! [`HandlePlacement::center`] convert into pixel space for raster consumers.

use kurbo::{BezPath, Point, Shape as _, Size, Vec2};

use crate::{
    opts::HandleStyle,
    state::{ComparisonMode, ComparisonState, SliderDirection},
};

pub const SIDE_BY_SIDE_LABEL: &str = "Side-by-side mode";
pub const WAITING_LABEL: &str = "Waiting for media";

/// Region of a layer that stays visible.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipRegion {
    /// Whole layer visible.
    None,
    /// Everything left of `pct` percent of the width is cut away.
    InsetLeft { pct: f64 },
    /// Everything above `pct` percent of the height is cut away.
    InsetTop { pct: f64 },
    /// Convex polygon in percent coordinates, clockwise.
    Polygon { points: Vec<Point> },
}

impl ClipRegion {
    /// CSS `clip-path` value.
    pub fn to_css(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::InsetLeft { pct } => format!("inset(0 0 0 {pct}%)"),
            Self::InsetTop { pct } => format!("inset({pct}% 0 0 0)"),
            Self::Polygon { points } => {
                let pts = points
                    .iter()
                    .map(|p| format!("{}% {}%", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("polygon({pts})")
            }
        }
    }

    /// Visible region as a closed path in pixel space, `None` when unclipped.
    pub fn to_path(&self, size: Size) -> Option<BezPath> {
        let sx = size.width / 100.0;
        let sy = size.height / 100.0;
        let corners: Vec<Point> = match self {
            Self::None => return None,
            Self::InsetLeft { pct } => vec![
                Point::new(*pct, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(*pct, 100.0),
            ],
            Self::InsetTop { pct } => vec![
                Point::new(0.0, *pct),
                Point::new(100.0, *pct),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
            Self::Polygon { points } => points.clone(),
        };

        let mut path = BezPath::new();
        for (i, p) in corners.iter().enumerate() {
            let p = Point::new(p.x * sx, p.y * sy);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        Some(path)
    }

    /// Whether a point in unit-square coordinates is visible.
    pub fn contains_unit(&self, p: Point) -> bool {
        match self {
            Self::None => true,
            Self::InsetLeft { pct } => p.x * 100.0 >= *pct,
            Self::InsetTop { pct } => p.y * 100.0 >= *pct,
            Self::Polygon { .. } => self
                .to_path(Size::new(1.0, 1.0))
                .is_some_and(|path| path.contains(p)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum CssLen {
    Percent(f64),
    Px(f64),
}

impl CssLen {
    pub fn to_css(self) -> String {
        match self {
            Self::Percent(v) if v == 0.0 => "0".to_string(),
            Self::Percent(v) => format!("{v}%"),
            Self::Px(v) => format!("{v}px"),
        }
    }

    /// Resolve against a container extent in pixels.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Percent(v) => v / 100.0 * extent,
            Self::Px(v) => v,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleOrientation {
    /// Upright bar on a horizontal split.
    Upright,
    /// Flat bar on a vertical split.
    Flat,
    /// Short bar rotated 45 degrees on the diagonal.
    Diagonal,
}

/// Placement of the split handle bar.
///
/// `left`/`top` locate the bar's anchor; the orientation decides which axes
/// the bar is centered on (see [`HandlePlacement::css_transform`]).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct HandlePlacement {
    pub left: CssLen,
    pub top: CssLen,
    pub width: CssLen,
    pub height: CssLen,
    pub orientation: HandleOrientation,
}

impl HandlePlacement {
    pub fn rotation_deg(&self) -> f64 {
        match self.orientation {
            HandleOrientation::Diagonal => 45.0,
            HandleOrientation::Upright | HandleOrientation::Flat => 0.0,
        }
    }

    pub fn css_transform(&self) -> &'static str {
        match self.orientation {
            HandleOrientation::Upright => "translateX(-50%)",
            HandleOrientation::Flat => "translateY(-50%)",
            HandleOrientation::Diagonal => "translate(-50%, -50%) rotate(45deg)",
        }
    }

    /// Bar dimensions in pixels before rotation.
    pub fn extent(&self, container: Size) -> Size {
        Size::new(
            self.width.resolve(container.width),
            self.height.resolve(container.height),
        )
    }

    /// Center of the bar in pixel space.
    pub fn center(&self, container: Size) -> Point {
        let anchor = Point::new(
            self.left.resolve(container.width),
            self.top.resolve(container.height),
        );
        let ext = self.extent(container);
        let offset = match self.orientation {
            HandleOrientation::Upright => Vec2::new(0.0, ext.height / 2.0),
            HandleOrientation::Flat => Vec2::new(ext.width / 2.0, 0.0),
            HandleOrientation::Diagonal => Vec2::ZERO,
        };
        anchor + offset
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorHint {
    Default,
    EwResize,
    NsResize,
    NwseResize,
    Grabbing,
}

impl CursorHint {
    pub fn to_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::EwResize => "ew-resize",
            Self::NsResize => "ns-resize",
            Self::NwseResize => "nwse-resize",
            Self::Grabbing => "grabbing",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerLayout {
    pub visible: bool,
    pub clip: ClipRegion,
}

impl LayerLayout {
    fn full_frame() -> Self {
        Self {
            visible: true,
            clip: ClipRegion::None,
        }
    }

    fn hidden() -> Self {
        Self {
            visible: false,
            clip: ClipRegion::None,
        }
    }
}

/// Everything a host needs to paint the comparison view.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutDescriptor {
    pub layer_a: LayerLayout,
    pub layer_b: LayerLayout,
    pub handle: Option<HandlePlacement>,
    pub cursor: CursorHint,
    pub indicator: String,
}

impl LayoutDescriptor {
    fn waiting() -> Self {
        Self {
            layer_a: LayerLayout::full_frame(),
            layer_b: LayerLayout::hidden(),
            handle: None,
            cursor: CursorHint::Default,
            indicator: WAITING_LABEL.to_string(),
        }
    }

    fn side_by_side() -> Self {
        Self {
            layer_a: LayerLayout::full_frame(),
            layer_b: LayerLayout::hidden(),
            handle: None,
            cursor: CursorHint::Default,
            indicator: SIDE_BY_SIDE_LABEL.to_string(),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.indicator == WAITING_LABEL
    }
}

/// Derive the layout with the default handle style.
pub fn derive_layout(state: &ComparisonState) -> LayoutDescriptor {
    derive_layout_with(state, &HandleStyle::default())
}

pub fn derive_layout_with(state: &ComparisonState, style: &HandleStyle) -> LayoutDescriptor {
    if !state.has_required_media() {
        return LayoutDescriptor::waiting();
    }
    match state.mode() {
        ComparisonMode::SideBySide => LayoutDescriptor::side_by_side(),
        ComparisonMode::Slider => slider_layout(state.direction(), state.split(), style),
    }
}

fn slider_layout(direction: SliderDirection, split: f64, style: &HandleStyle) -> LayoutDescriptor {
    let pct = split * 100.0;
    let (clip, handle, cursor) = match direction {
        SliderDirection::Horizontal => (
            ClipRegion::InsetLeft { pct },
            HandlePlacement {
                left: CssLen::Percent(pct),
                top: CssLen::Percent(0.0),
                width: CssLen::Px(style.bar_thickness_px),
                height: CssLen::Percent(100.0),
                orientation: HandleOrientation::Upright,
            },
            CursorHint::EwResize,
        ),
        SliderDirection::Vertical => (
            ClipRegion::InsetTop { pct },
            HandlePlacement {
                left: CssLen::Percent(0.0),
                top: CssLen::Percent(pct),
                width: CssLen::Percent(100.0),
                height: CssLen::Px(style.bar_thickness_px),
                orientation: HandleOrientation::Flat,
            },
            CursorHint::NsResize,
        ),
        SliderDirection::Diagonal => (
            ClipRegion::Polygon {
                points: diagonal_polygon(pct),
            },
            // (pct, pct) lies on the boundary x + y = 2 * pct.
            HandlePlacement {
                left: CssLen::Percent(pct),
                top: CssLen::Percent(pct),
                width: CssLen::Px(style.diagonal_length_px),
                height: CssLen::Px(style.diagonal_thickness_px),
                orientation: HandleOrientation::Diagonal,
            },
            CursorHint::NwseResize,
        ),
    };

    LayoutDescriptor {
        layer_a: LayerLayout::full_frame(),
        layer_b: LayerLayout {
            visible: true,
            clip,
        },
        handle: Some(handle),
        cursor,
        indicator: format!("Split: {}% ({direction})", pct.round()),
    }
}

/// Polygon covering `x + y >= 2 * pct` inside the 100x100 square.
fn diagonal_polygon(pct: f64) -> Vec<Point> {
    let line = pct * 2.0;
    if line <= 100.0 {
        vec![
            Point::new(0.0, line),
            Point::new(line, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    } else {
        let d = line - 100.0;
        vec![Point::new(d, 100.0), Point::new(100.0, d), Point::new(100.0, 100.0)]
    }
}

//! Interactive two-video comparison view for node-graph editors.
//!
//! A [`ComparisonView`] owns the comparison state (mode, split direction, split
//! position and the two sources), reacts to pointer, media and execution
//! events, and derives a [`LayoutDescriptor`] the host paints. Host elements are
//! reached only through [`ViewHandles`]; hosts register the view per node via
//! [`HookRegistry`] and [`CompareExtension`].
#![forbid(unsafe_code)]

mod foundation;

pub mod frames;
pub mod handles;
pub mod headless;
pub mod hooks;
pub mod layout;
pub mod media;
pub mod message;
pub mod opts;
pub mod state;
pub mod telemetry;
pub mod view;

pub use crate::foundation::core::{
    Affine, BezPath, ContainerSize, Point, PointerPos, Rect, Size, Vec2, clamp01,
};
pub use crate::foundation::error::{CompareError, CompareResult};

pub use crate::frames::{combine_side_by_side, composite_preview, match_dimensions, sync_lengths};
pub use crate::handles::{ViewHandles, ViewSurface};
pub use crate::headless::{HeadlessMedia, HeadlessRig, HeadlessSurface};
pub use crate::hooks::{CompareExtension, HandleFactory, HookRegistry, NodeId, NodeObserver, SubscriptionId};
pub use crate::layout::{
    ClipRegion, CssLen, CursorHint, HandleOrientation, HandlePlacement, LayerLayout,
    LayoutDescriptor, derive_layout, derive_layout_with,
};
pub use crate::media::{LoadTracker, MediaElement, MediaEvent, MediaLayer, PlaybackSync};
pub use crate::message::{ExecutionMessage, ParsedMessage, view_url};
pub use crate::opts::{HandleStyle, ViewOpts};
pub use crate::state::{
    ComparisonMode, ComparisonState, LoadRequest, MediaRef, SliderDirection, split_for_pointer,
};
pub use crate::telemetry::{Level, MemoryTelemetry, Telemetry, TracingTelemetry};
pub use crate::view::ComparisonView;

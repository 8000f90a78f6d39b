use std::{fmt, str::FromStr};

use serde::Deserialize as _;

use crate::foundation::{
    core::{ContainerSize, PointerPos, clamp01},
    error::CompareError,
};

/// Split used on creation and after every direction change.
pub const DEFAULT_SPLIT: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    Slider,
    SideBySide,
}

impl ComparisonMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::SideBySide => "side_by_side",
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slider" => Ok(Self::Slider),
            "side_by_side" | "sidebyside" | "side-by-side" => Ok(Self::SideBySide),
            _ => Err(CompareError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderDirection {
    #[default]
    Horizontal,
    Vertical,
    Diagonal,
}

impl SliderDirection {
    pub const ALL: [SliderDirection; 3] = [Self::Horizontal, Self::Vertical, Self::Diagonal];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for SliderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SliderDirection {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "diagonal" => Ok(Self::Diagonal),
            _ => Err(CompareError::UnknownDirection(s.to_string())),
        }
    }
}

/// Opaque reference to a playable media resource (a URL in practice).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a URL, treating blank strings as "no media".
    pub fn from_url(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            None
        } else {
            Some(Self(url))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MediaRef {
    type Error = CompareError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        Self::from_url(url).ok_or_else(|| CompareError::validation("blank media reference"))
    }
}

impl From<MediaRef> for String {
    fn from(m: MediaRef) -> Self {
        m.0
    }
}

/// Optional media field where a blank string means "no media".
fn blank_as_none<'de, D>(d: D) -> Result<Option<MediaRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.and_then(MediaRef::from_url))
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything `load_media` replaces in one step.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoadRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub source_a: Option<MediaRef>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub source_b: Option<MediaRef>,
    #[serde(default)]
    pub mode: ComparisonMode,
    #[serde(default)]
    pub direction: SliderDirection,
}

impl LoadRequest {
    /// Request with default mode and direction.
    pub fn new(source_a: Option<MediaRef>, source_b: Option<MediaRef>) -> Self {
        Self {
            source_a,
            source_b,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_direction(mut self, direction: SliderDirection) -> Self {
        self.direction = direction;
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "StateRepr")]
pub struct ComparisonState {
    source_a: Option<MediaRef>,
    source_b: Option<MediaRef>,
    mode: ComparisonMode,
    direction: SliderDirection,
    split: f64, // 0..1, fraction assigned to A
}

impl Default for ComparisonState {
    fn default() -> Self {
        Self {
            source_a: None,
            source_b: None,
            mode: ComparisonMode::Slider,
            direction: SliderDirection::Horizontal,
            split: DEFAULT_SPLIT,
        }
    }
}

/// Wire form of [`ComparisonState`]; validated on the way in.
#[derive(serde::Deserialize)]
struct StateRepr {
    #[serde(default, deserialize_with = "blank_as_none")]
    source_a: Option<MediaRef>,
    #[serde(default, deserialize_with = "blank_as_none")]
    source_b: Option<MediaRef>,
    #[serde(default)]
    mode: ComparisonMode,
    #[serde(default)]
    direction: SliderDirection,
    #[serde(default = "default_split")]
    split: f64,
}

fn default_split() -> f64 {
    DEFAULT_SPLIT
}

impl TryFrom<StateRepr> for ComparisonState {
    type Error = CompareError;

    fn try_from(r: StateRepr) -> Result<Self, Self::Error> {
        if !r.split.is_finite() {
            return Err(CompareError::validation(format!(
                "split must be finite, got {}",
                r.split
            )));
        }
        Ok(Self {
            source_a: r.source_a,
            source_b: r.source_b,
            mode: r.mode,
            direction: r.direction,
            split: clamp01(r.split),
        })
    }
}

impl ComparisonState {
    pub fn source_a(&self) -> Option<&MediaRef> {
        self.source_a.as_ref()
    }

    pub fn source_b(&self) -> Option<&MediaRef> {
        self.source_b.as_ref()
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn direction(&self) -> SliderDirection {
        self.direction
    }

    pub fn split(&self) -> f64 {
        self.split
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == ComparisonMode::Slider
    }

    /// `true` when the sources the current mode needs are present.
    pub fn has_required_media(&self) -> bool {
        match self.mode {
            ComparisonMode::Slider => self.source_a.is_some() && self.source_b.is_some(),
            ComparisonMode::SideBySide => self.source_a.is_some(),
        }
    }

    /// Replace sources, mode and direction together. The split is left alone.
    pub fn load_media(&mut self, req: LoadRequest) {
        self.source_a = req.source_a;
        self.source_b = req.source_b;
        self.mode = req.mode;
        self.direction = req.direction;
    }

    pub fn set_mode(&mut self, mode: ComparisonMode) {
        self.mode = mode;
    }

    /// Change direction and re-center the split.
    pub fn set_direction(&mut self, direction: SliderDirection) {
        self.direction = direction;
        self.split = DEFAULT_SPLIT;
    }

    /// Set the split directly; the value is clamped into `[0, 1]`.
    pub fn set_split(&mut self, split: f64) {
        self.split = clamp01(split);
    }

    /// Map a pointer position onto the split for the current direction.
    ///
    /// Returns `false` (state untouched) outside slider mode or when the
    /// container has no usable area.
    pub fn set_split_from_pointer(&mut self, pos: PointerPos, container: ContainerSize) -> bool {
        if !self.is_interactive() || !container.is_usable() {
            return false;
        }
        self.split = split_for_pointer(self.direction, pos, container);
        true
    }
}

/// Split value a pointer at `pos` selects for `direction`.
///
/// The diagonal mapping normalizes each axis independently, so the iso-split
/// lines are `x/w + y/h = const` rather than true perpendiculars on
/// non-square containers.
pub fn split_for_pointer(direction: SliderDirection, pos: PointerPos, container: ContainerSize) -> f64 {
    let n = container.normalize(pos);
    match direction {
        SliderDirection::Horizontal => clamp01(n.x),
        SliderDirection::Vertical => clamp01(n.y),
        SliderDirection::Diagonal => clamp01((n.x + n.y) / 2.0),
    }
}

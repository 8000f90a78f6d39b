use std::fmt;

use crate::foundation::error::CompareResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaLayer {
    A,
    B,
}

impl fmt::Display for MediaLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::A => "video A",
            Self::B => "video B",
        })
    }
}

/// Notifications a media element reports back to the view.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaEvent {
    LoadStart,
    Loaded,
    Error { detail: String },
    TimeUpdate,
}

/// A playable media element owned by the host (a `<video>` in a browser).
///
/// Decoding and transport stay on the host side; the view only drives sources,
/// playback and the current time.
pub trait MediaElement {
    fn set_source(&mut self, url: &str);
    fn load(&mut self);
    fn play(&mut self) -> CompareResult<()>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
}

/// Per-layer "has loaded data" flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadTracker {
    a: bool,
    b: bool,
}

impl LoadTracker {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, layer: MediaLayer, loaded: bool) {
        match layer {
            MediaLayer::A => self.a = loaded,
            MediaLayer::B => self.b = loaded,
        }
    }

    pub fn is_loaded(&self, layer: MediaLayer) -> bool {
        match layer {
            MediaLayer::A => self.a,
            MediaLayer::B => self.b,
        }
    }

    pub fn both(&self) -> bool {
        self.a && self.b
    }
}

/// Best-effort alignment of B's playback position to A's.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSync {
    tolerance_secs: f64,
}

impl PlaybackSync {
    pub fn new(tolerance_secs: f64) -> Self {
        Self {
            tolerance_secs: tolerance_secs.max(0.0),
        }
    }

    pub fn tolerance_secs(&self) -> f64 {
        self.tolerance_secs
    }

    /// Seek target for B, if the drift exceeds the tolerance.
    pub fn correction(&self, a_secs: f64, b_secs: f64) -> Option<f64> {
        if (a_secs - b_secs).abs() > self.tolerance_secs {
            Some(a_secs)
        } else {
            None
        }
    }

    /// Snap `b` to `a` when they drifted apart. Returns the applied drift.
    pub fn align(&self, a: &dyn MediaElement, b: &mut dyn MediaElement) -> Option<f64> {
        let (ta, tb) = (a.current_time(), b.current_time());
        let target = self.correction(ta, tb)?;
        b.set_current_time(target);
        Some(ta - tb)
    }
}

impl Default for PlaybackSync {
    fn default() -> Self {
        Self::new(0.1)
    }
}

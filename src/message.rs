//! Execution-result messages exchanged with the host.
//!
//! Every field is a single-element list on the wire, e.g.
//! `{"video_a_url": ["/view?..."], "comparison_mode": ["slider"]}`.

use crate::{
    foundation::error::{CompareError, CompareResult},
    state::{ComparisonMode, LoadRequest, MediaRef, SliderDirection},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_a_url: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_b_url: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_mode: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_direction: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<Vec<u32>>,
}

/// Result of interpreting a message. `warnings` holds recoverable problems
/// (unknown mode or direction strings) that were replaced by defaults.
#[derive(Debug)]
pub struct ParsedMessage {
    pub request: LoadRequest,
    pub warnings: Vec<CompareError>,
}

/// URL the host serves a temp file under.
pub fn view_url(filename: &str) -> String {
    format!("/view?filename={filename}&type=temp&subfolder=")
}

impl ExecutionMessage {
    pub fn from_json_str(s: &str) -> CompareResult<Self> {
        serde_json::from_str(s).map_err(|e| CompareError::serde(format!("execution message: {e}")))
    }

    pub fn from_json_value(v: serde_json::Value) -> CompareResult<Self> {
        serde_json::from_value(v)
            .map_err(|e| CompareError::serde(format!("execution message: {e}")))
    }

    /// Message for two separately encoded videos.
    pub fn for_slider(
        file_a: &str,
        file_b: &str,
        direction: SliderDirection,
        frame_count: u64,
        frame_rate: u32,
    ) -> Self {
        Self {
            video_a_url: Some(vec![view_url(file_a)]),
            video_b_url: Some(vec![view_url(file_b)]),
            comparison_mode: Some(vec![ComparisonMode::Slider.to_string()]),
            slider_direction: Some(vec![direction.to_string()]),
            frame_count: Some(vec![frame_count]),
            frame_rate: Some(vec![frame_rate]),
        }
    }

    /// Message for one pre-combined video; B is sent as an empty URL.
    pub fn for_side_by_side(
        combined_file: &str,
        direction: SliderDirection,
        frame_count: u64,
        frame_rate: u32,
    ) -> Self {
        Self {
            video_a_url: Some(vec![view_url(combined_file)]),
            video_b_url: Some(vec![String::new()]),
            comparison_mode: Some(vec![ComparisonMode::SideBySide.to_string()]),
            slider_direction: Some(vec![direction.to_string()]),
            frame_count: Some(vec![frame_count]),
            frame_rate: Some(vec![frame_rate]),
        }
    }

    /// Interpret the message as a load request.
    ///
    /// Returns `None` unless both URL fields are present; partial results
    /// during iterative execution are expected and are not errors.
    pub fn to_load_request(&self) -> Option<ParsedMessage> {
        let url_a = first(self.video_a_url.as_deref())?;
        let url_b = first(self.video_b_url.as_deref())?;

        let mut warnings = Vec::new();
        let mode = match first(self.comparison_mode.as_deref()) {
            None => ComparisonMode::Slider,
            Some(s) => s.parse().unwrap_or_else(|e| {
                warnings.push(e);
                ComparisonMode::Slider
            }),
        };
        let direction = match first(self.slider_direction.as_deref()) {
            None => SliderDirection::Horizontal,
            Some(s) => s.parse().unwrap_or_else(|e| {
                warnings.push(e);
                SliderDirection::Horizontal
            }),
        };

        let request = LoadRequest::new(MediaRef::from_url(url_a), MediaRef::from_url(url_b))
            .with_mode(mode)
            .with_direction(direction);
        Some(ParsedMessage { request, warnings })
    }
}

fn first(list: Option<&[String]>) -> Option<&str> {
    list.and_then(|l| l.first()).map(String::as_str)
}

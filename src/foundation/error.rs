use crate::media::MediaLayer;

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("missing media elements: {0}")]
    MissingMediaElements(String),

    #[error("media load failure on {layer}: {detail}")]
    MediaLoad { layer: MediaLayer, detail: String },

    #[error("playback error: {0}")]
    Playback(String),

    #[error("unknown slider direction '{0}'")]
    UnknownDirection(String),

    #[error("unknown comparison mode '{0}'")]
    UnknownMode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("frame error: {0}")]
    Frame(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompareError {
    pub fn missing_elements(msg: impl Into<String>) -> Self {
        Self::MissingMediaElements(msg.into())
    }

    pub fn media_load(layer: MediaLayer, detail: impl Into<String>) -> Self {
        Self::MediaLoad {
            layer,
            detail: detail.into(),
        }
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

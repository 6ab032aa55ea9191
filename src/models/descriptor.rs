use serde::{Deserialize, Serialize};

/// PyTK sidecar (`<image>.pytk.json`) describing how a portrait is scaled and animated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyDescriptor {
    #[serde(rename = "Scale")]
    pub scale: f64,

    #[serde(rename = "Animation", default)]
    pub animation: Option<LegacyAnimation>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LegacyAnimation {
    #[serde(rename = "FrameWidth", default)]
    pub frame_width: Option<f64>,

    #[serde(rename = "FrameHeight", default)]
    pub frame_height: Option<f64>,

    #[serde(rename = "FPS", default)]
    pub fps: Option<f64>,
}

/// HD Portraits sidecar (`<image>.json`) derived from a [`LegacyDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetadata {
    #[serde(rename = "Size")]
    pub size: i64,

    #[serde(rename = "Portrait")]
    pub portrait: String,

    #[serde(rename = "Animation", skip_serializing_if = "Option::is_none", default)]
    pub animation: Option<DerivedAnimation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAnimation {
    #[serde(rename = "HFrames")]
    pub h_frames: i64,

    #[serde(rename = "VFrames")]
    pub v_frames: i64,

    /// Milliseconds per frame
    #[serde(rename = "Speed")]
    pub speed: i64,
}

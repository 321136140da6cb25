use serde::{Deserialize, Serialize};

use crate::protocol::PredictResponse;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[derive(Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(RequestGeneration);
id_newtype!(ImageId);

impl RequestGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl ImageId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

pub const IMAGE_MEDIA_TYPE_PREFIX: &str = "image/";

/// True when `media_type` belongs to the `image/*` family.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .starts_with(IMAGE_MEDIA_TYPE_PREFIX)
}

/// An image picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub filename: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessed_image: Option<String>,
}

impl PredictionResult {
    /// Confidence line as shown on the prediction card, e.g. `Confidence: 97%`.
    pub fn confidence_text(&self) -> String {
        format_confidence(self.confidence)
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("Confidence: {confidence}%")
}

impl From<PredictResponse> for PredictionResult {
    fn from(value: PredictResponse) -> Self {
        Self {
            prediction: value.prediction,
            confidence: value.confidence,
            preprocessed_image: value
                .preprocessed_image
                .filter(|reference| !reference.trim().is_empty()),
        }
    }
}

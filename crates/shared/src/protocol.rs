use serde::{Deserialize, Serialize};

/// Body of `POST /api/segment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRequest {
    pub image_name: String,
}

/// Only the `success` flag of a segmentation response. A body without the
/// flag counts as unsuccessful.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SegmentEnvelope {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean_area: f64,
    pub median_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub std_area: f64,
    pub mean_diameter: f64,
    pub mean_solidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    pub nuclei_count: u32,
    pub image_name: String,
    pub statistics: Statistics,
    /// Path relative to the service base URL.
    pub result_image_url: String,
    /// Path relative to the service base URL.
    pub histogram_url: String,
}

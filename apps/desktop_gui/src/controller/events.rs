//! Events sent from the backend worker back to the UI thread.

use client_core::RequestError;
use shared::protocol::SegmentationResult;

use crate::{backend_bridge::commands::ResultImageKind, media::DecodedImage};

pub enum UiEvent {
    Info(String),
    SegmentCompleted {
        seq: u64,
        outcome: Result<SegmentationResult, RequestError>,
    },
    ResultImageLoaded {
        seq: u64,
        kind: ResultImageKind,
        image: DecodedImage,
    },
    ResultImageFailed {
        seq: u64,
        kind: ResultImageKind,
        reason: String,
    },
}

//! Backend commands queued from UI to backend worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultImageKind {
    Segmented,
    Histogram,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Segment {
        seq: u64,
        image_name: String,
    },
    /// Abort the in-flight segmentation task, if any.
    CancelSegment,
    FetchResultImage {
        seq: u64,
        kind: ResultImageKind,
        url: String,
    },
}

//! UI layer for desktop GUI: the single-window segmentation app.

pub mod app;

pub use app::SegmentationApp;

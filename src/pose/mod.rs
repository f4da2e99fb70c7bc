pub mod constraint;
#[cfg(feature = "desktop")]
pub mod detector;
pub mod heatmap;
pub mod keypoint;
#[cfg(feature = "desktop")]
pub mod preprocess;

pub use constraint::AnatomicalFilter;
#[cfg(feature = "desktop")]
pub use detector::HeatmapDetector;
pub use heatmap::{decode_heatmap, Surface, CONFIDENCE_THRESHOLD, NUM_KEYPOINTS};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_for_posenet, MODEL_HEIGHT, MODEL_WIDTH};

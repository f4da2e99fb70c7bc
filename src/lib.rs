pub mod camera;
pub mod config;
pub mod pipeline;
pub mod pose;
pub mod render;
pub mod tracker;

pub use pipeline::{FrameOutcome, OverlaySink, PosePipeline};

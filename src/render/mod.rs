pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

pub use skeleton::{EdgeIndexing, OverlayFrame, Segment, SKELETON_CONNECTIONS};
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;

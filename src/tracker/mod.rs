pub mod smooth;

pub use smooth::{Smoother, SmoothingState, SMOOTHING_FACTOR};

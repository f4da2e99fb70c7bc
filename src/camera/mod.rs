#[cfg(feature = "desktop")]
pub mod capture;
pub mod latest;

#[cfg(feature = "desktop")]
pub use capture::{OpenCvCamera, ThreadedCamera};
pub use latest::{LatestFrame, Sequenced};

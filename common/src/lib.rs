pub mod buffer3;
pub mod log_setup;

pub use buffer3::{AxisOrder, Buffer3};

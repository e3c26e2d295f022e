//! Platform abstraction layer
//!
//! Input devices and scripted drivers feed the register bus from here.

pub mod input;

pub use input::{Autopilot, EdgeDetector, InputSample, InputSource};

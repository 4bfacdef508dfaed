//! Foundation utilities shared by the whole engine

pub mod logging;
pub mod math;
pub mod time;

pub mod collector;
pub mod counters;
pub mod delta;
pub mod error;
pub mod pause;
pub mod platform;
pub mod process;
pub mod reader;
pub mod snapshot;

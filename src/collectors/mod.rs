mod collector;

pub mod brightness;
pub mod cpu;
pub mod disk;
pub mod display;
pub mod memory;
pub mod network;

pub use collector::{from_config, Collector};

//! Threshold evaluation and alert delivery.

pub mod sink;
pub mod threshold;

pub use sink::{AlertLog, AlertSink, Notifier};
pub use threshold::{ThresholdPolicy, Thresholds};

mod recorder;
mod snapshot;

pub use recorder::MetricsRecorder;
pub use snapshot::{MetricsSnapshot, PatternsReturnedStats};

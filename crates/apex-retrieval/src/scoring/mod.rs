mod engine;
mod signals;
mod text;

pub use engine::{score_pattern, ScoreBreakdown};
pub use signals::SignalBoosts;
pub use text::tokenize_task;

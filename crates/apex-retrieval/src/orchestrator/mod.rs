mod engine;
mod index_snapshot;
mod request;
mod response;
mod token;

pub use engine::LookupOrchestrator;
pub use request::{LookupRequest, SignalSet};
pub use response::{LookupResponse, RankedPattern};
pub use token::CancellationToken;

mod apex_error;
mod schema_error;

pub use apex_error::{ApexError, ApexResult};
pub use schema_error::{SchemaError, SchemaIssue};

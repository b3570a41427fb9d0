pub mod enums;
pub mod error;
pub mod record;

// Re-export the core types to provide a clean public API.
pub use enums::OutputFormat;
pub use error::CoreError;
pub use record::{Record, column_names, parse_query_number, value_to_text};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unsupported output format '{0}' (expected 'json' or 'xml')")]
    UnsupportedFormat(String),

    #[error("Invalid query selection '{input}': expected a number from 1 to {max}")]
    InvalidQuerySelection { input: String, max: usize },
}

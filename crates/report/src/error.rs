use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read input file '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file '{}' is not a JSON array of objects: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot write report '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report as JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build XML document: {0}")]
    Xml(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Column '{0}' cannot be used as an XML element name.")]
    InvalidElementName(String),
}

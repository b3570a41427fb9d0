use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The serialization format of a report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    /// The file extension used for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Case-insensitive, surrounding whitespace ignored.
impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(CoreError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" XML\n".parse::<OutputFormat>(), Ok(OutputFormat::Xml));
        assert_eq!("Json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    }

    #[test]
    fn rejects_unknown_formats() {
        assert_eq!(
            "csv".parse::<OutputFormat>(),
            Err(CoreError::UnsupportedFormat("csv".to_string()))
        );
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn extension_matches_display() {
        assert_eq!(OutputFormat::Xml.extension(), "xml");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}

use crate::error::ReportError;
use chrono::NaiveDateTime;
use core_types::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Second-granularity stamp used in report file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `query_<n>_<YYYY-MM-DD_HH-MM-SS>.<ext>`
pub fn output_file_name(query: usize, format: OutputFormat, timestamp: NaiveDateTime) -> String {
    format!(
        "query_{}_{}.{}",
        query,
        timestamp.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

pub fn output_path(
    dir: &Path,
    query: usize,
    format: OutputFormat,
    timestamp: NaiveDateTime,
) -> PathBuf {
    dir.join(output_file_name(query, format, timestamp))
}

/// Creates the output directory (and its parents) if it does not exist yet.
pub fn prepare_output_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn matches_pattern(name: &str, query: usize, ext: &str) -> bool {
        let Some(rest) = name.strip_prefix(&format!("query_{query}_")) else {
            return false;
        };
        let Some(stamp) = rest.strip_suffix(&format!(".{ext}")) else {
            return false;
        };
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok()
    }

    #[test]
    fn file_name_combines_query_timestamp_and_extension() {
        assert_eq!(
            output_file_name(2, OutputFormat::Json, at(14, 5, 9)),
            "query_2_2024-03-09_14-05-09.json"
        );
        assert_eq!(
            output_file_name(4, OutputFormat::Xml, at(0, 0, 0)),
            "query_4_2024-03-09_00-00-00.xml"
        );
    }

    #[test]
    fn runs_one_second_apart_get_distinct_names() {
        let first = at(23, 59, 59);
        let second = first + Duration::seconds(1);

        let a = output_file_name(1, OutputFormat::Xml, first);
        let b = output_file_name(1, OutputFormat::Xml, second);

        assert_ne!(a, b);
        assert!(matches_pattern(&a, 1, "xml"), "{a}");
        assert!(matches_pattern(&b, 1, "xml"), "{b}");
    }

    #[test]
    fn output_path_lives_in_the_output_dir() {
        let path = output_path(Path::new("queries"), 3, OutputFormat::Json, at(8, 30, 0));
        assert_eq!(path, Path::new("queries").join("query_3_2024-03-09_08-30-00.json"));
    }

    #[test]
    fn output_dir_is_created_on_demand() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("queries");

        prepare_output_dir(&dir).unwrap();
        prepare_output_dir(&dir).unwrap();

        assert!(dir.is_dir());
    }
}

use crate::error::CoreError;
use serde_json::{Map, Value};

/// One row of data: column name to scalar value, in column order.
///
/// Used for both sides of the pipeline: objects read from the input JSON files
/// and rows returned by the report queries.
pub type Record = Map<String, Value>;

/// Returns the column names of a record in order.
pub fn column_names(record: &Record) -> Vec<&str> {
    record.keys().map(String::as_str).collect()
}

/// Renders a scalar value as plain text.
///
/// Strings are returned without quotes and `null` becomes an empty string.
/// Nested arrays and objects fall back to their compact JSON form.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Parses a 1-based query selection, rejecting anything outside `1..=max`.
pub fn parse_query_number(input: &str, max: usize) -> Result<usize, CoreError> {
    let invalid = || CoreError::InvalidQuerySelection {
        input: input.trim().to_string(),
        max,
    };
    let number: usize = input.trim().parse().map_err(|_| invalid())?;
    if (1..=max).contains(&number) {
        Ok(number)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn column_names_follow_insertion_order() {
        let record: Record = serde_json::from_str(r#"{"name": "Room #1", "id": 1}"#).unwrap();
        assert_eq!(column_names(&record), vec!["name", "id"]);
    }

    #[test]
    fn renders_values_as_text() {
        assert_eq!(value_to_text(&json!("Room #7")), "Room #7");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(1.5)), "1.5");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&Value::Null), "");
    }

    #[test]
    fn accepts_query_numbers_in_range() {
        assert_eq!(parse_query_number("1", 4), Ok(1));
        assert_eq!(parse_query_number(" 4\n", 4), Ok(4));
    }

    #[test]
    fn rejects_query_numbers_out_of_range() {
        for input in ["0", "5", "-1", "two", ""] {
            assert!(
                matches!(
                    parse_query_number(input, 4),
                    Err(CoreError::InvalidQuerySelection { max: 4, .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }
}

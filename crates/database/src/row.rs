use crate::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use core_types::Record;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Converts a result row into a `Record`, keyed by the query's column names in column order.
///
/// Temporal values are rendered as their canonical text so the record can be
/// written out as-is.
pub fn row_to_record(row: &PgRow) -> Result<Record, DbError> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.name(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, index: usize, column: &str, type_name: &str) -> Result<Value, DbError> {
    let value = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(Value::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        // Kept as text: averages produce more digits than an f64 holds.
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)?
            .map(|d| Value::String(d.normalize().to_string())),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(index)?.map(Value::from)
        }
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        "INTERVAL" => row
            .try_get::<Option<PgInterval>, _>(index)?
            .map(|i| Value::String(format_interval(&i))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        other => {
            return Err(DbError::UnsupportedColumnType {
                column: column.to_string(),
                type_name: other.to_string(),
            });
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Renders an interval the way PostgreSQL does with its default `postgres` interval style,
/// e.g. `1 year 2 mons 3 days 04:05:06.5` or `5830 days 12:00:00`.
pub fn format_interval(interval: &PgInterval) -> String {
    let years = interval.months / 12;
    let months = interval.months % 12;

    let mut parts: Vec<String> = Vec::new();
    // Once a negative field is printed, later positive fields carry an explicit '+'.
    let mut seen_negative = false;

    for (value, unit) in [(years, "year"), (months, "mon"), (interval.days, "day")] {
        if value == 0 {
            continue;
        }
        let sign = if seen_negative && value > 0 { "+" } else { "" };
        let plural = if value == 1 { "" } else { "s" };
        parts.push(format!("{sign}{value} {unit}{plural}"));
        seen_negative |= value < 0;
    }

    if parts.is_empty() || interval.microseconds != 0 {
        let micros = interval.microseconds;
        let sign = if micros < 0 {
            "-"
        } else if seen_negative {
            "+"
        } else {
            ""
        };
        let abs = micros.unsigned_abs();
        let hours = abs / 3_600_000_000;
        let minutes = abs / 60_000_000 % 60;
        let seconds = abs / 1_000_000 % 60;
        let fraction = abs % 1_000_000;

        let mut time = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
        if fraction != 0 {
            let digits = format!("{fraction:06}");
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(months: i32, days: i32, microseconds: i64) -> PgInterval {
        PgInterval {
            months,
            days,
            microseconds,
        }
    }

    const HOUR: i64 = 3_600_000_000;

    #[test]
    fn zero_interval_is_all_zero_time() {
        assert_eq!(format_interval(&interval(0, 0, 0)), "00:00:00");
    }

    #[test]
    fn day_only_intervals_have_no_time_part() {
        assert_eq!(format_interval(&interval(0, 1, 0)), "1 day");
        assert_eq!(format_interval(&interval(0, 730, 0)), "730 days");
    }

    #[test]
    fn averaged_ages_keep_the_fractional_day_as_time() {
        assert_eq!(format_interval(&interval(0, 5830, 12 * HOUR)), "5830 days 12:00:00");
    }

    #[test]
    fn months_split_into_years() {
        assert_eq!(
            format_interval(&interval(14, 3, 4 * HOUR + 5 * 60_000_000 + 6_500_000)),
            "1 year 2 mons 3 days 04:05:06.5"
        );
        assert_eq!(format_interval(&interval(24, 0, 0)), "2 years");
    }

    #[test]
    fn negative_fields_follow_postgres_signs() {
        assert_eq!(format_interval(&interval(0, -1, 2 * HOUR)), "-1 days +02:00:00");
        assert_eq!(format_interval(&interval(0, 0, -90 * 60_000_000)), "-01:30:00");
    }

    #[test]
    fn hours_are_not_wrapped_into_days() {
        assert_eq!(format_interval(&interval(0, 0, 30 * HOUR)), "30:00:00");
    }
}

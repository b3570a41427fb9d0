use crate::catalog::{Catalog, ReportQuery};
use crate::connection::connect;
use crate::error::DbError;
use crate::row::row_to_record;
use core_types::{Record, column_names};
use serde_json::Value;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection};
use sqlx::query::Query;
use sqlx::{Connection, Postgres};

/// Owns the one database connection of a run and performs every statement on it.
///
/// The manager starts disconnected. `connect` and `disconnect` move it between
/// the two states; every other operation requires an open connection and fails
/// with [`DbError::NotConnected`] otherwise. Dropping a connected manager closes
/// the socket without the graceful shutdown `disconnect` performs.
pub struct DatabaseManager {
    options: PgConnectOptions,
    catalog: Catalog,
    connection: Option<PgConnection>,
}

impl DatabaseManager {
    /// Creates a disconnected manager.
    pub fn new(options: PgConnectOptions, catalog: Catalog) -> Self {
        Self {
            options,
            catalog,
            connection: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Opens the connection. Unreachable servers and rejected credentials surface
    /// as [`DbError::ConnectionError`]; there is no retry.
    pub async fn connect(&mut self) -> Result<(), DbError> {
        if self.connection.is_some() {
            return Err(DbError::AlreadyConnected);
        }
        let connection = connect(&self.options).await?;
        tracing::info!(
            host = %self.options.get_host(),
            port = self.options.get_port(),
            database = ?self.options.get_database(),
            "Connected to the database."
        );
        self.connection = Some(connection);
        Ok(())
    }

    /// Closes the connection. Calling this while disconnected is an error.
    pub async fn disconnect(&mut self) -> Result<(), DbError> {
        let connection = self.connection.take().ok_or(DbError::NotConnected)?;
        connection.close().await?;
        tracing::info!("Disconnected from the database.");
        Ok(())
    }

    /// Creates `table` if it does not exist, dropping it (with dependents) first when `drop` is set.
    ///
    /// Each statement commits on its own.
    pub async fn create_table(&mut self, table: &str, drop: bool) -> Result<(), DbError> {
        let connection = self.connection.as_mut().ok_or(DbError::NotConnected)?;
        let schema = self.catalog.table(table)?;

        if drop {
            let drop_sql = schema.drop_sql();
            tracing::debug!(sql = %drop_sql, "Dropping table.");
            sqlx::query(&drop_sql)
                .execute(&mut *connection)
                .await
                .map_err(|source| DbError::SchemaError {
                    action: "drop",
                    table: table.to_string(),
                    source,
                })?;
            tracing::info!("dropped {}", table);
        }

        tracing::debug!(sql = %schema.create_sql, "Creating table.");
        sqlx::query(schema.create_sql)
            .execute(&mut *connection)
            .await
            .map_err(|source| DbError::SchemaError {
                action: "create",
                table: table.to_string(),
                source,
            })?;

        Ok(())
    }

    /// Inserts every record into `table` and returns the number of rows written.
    ///
    /// The column list comes from the first record and every other record must
    /// have exactly the same columns. Values are bound as parameters, one
    /// `INSERT` per record, all inside one transaction: the batch is committed
    /// once at the end, and any failing row rolls back the whole batch.
    pub async fn insert_values(&mut self, records: &[Record], table: &str) -> Result<usize, DbError> {
        let connection = self.connection.as_mut().ok_or(DbError::NotConnected)?;
        let schema = self.catalog.table(table)?;

        let first = records
            .first()
            .ok_or_else(|| DbError::EmptyBatch(table.to_string()))?;
        let columns = column_names(first);
        let sql = schema.insert_sql(&columns)?;

        for (row, record) in records.iter().enumerate() {
            let same_columns =
                record.len() == columns.len() && columns.iter().all(|c| record.contains_key(*c));
            if !same_columns {
                return Err(DbError::ColumnMismatch {
                    table: table.to_string(),
                    row,
                    expected: columns.join(", "),
                    found: column_names(record).join(", "),
                });
            }
        }

        tracing::debug!(%sql, rows = records.len(), "Inserting batch.");

        let mut tx = connection.begin().await?;
        for (row, record) in records.iter().enumerate() {
            let mut query = sqlx::query(&sql);
            for column in &columns {
                query = bind_value(query, &record[*column]);
            }
            // An early return drops `tx`, which rolls the batch back.
            query
                .execute(&mut *tx)
                .await
                .map_err(|source| classify_insert_error(source, table, row))?;
        }
        tx.commit().await?;

        tracing::info!(table, rows = records.len(), "Inserted records.");
        Ok(records.len())
    }

    /// Runs a read-only statement and returns every row, in order.
    pub async fn run_query(&mut self, sql: &str) -> Result<Vec<Record>, DbError> {
        let connection = self.connection.as_mut().ok_or(DbError::NotConnected)?;
        tracing::debug!(%sql, "Running query.");
        let rows = sqlx::query(sql).fetch_all(&mut *connection).await?;
        rows.iter().map(row_to_record).collect()
    }

    /// Runs the catalog report with the given 1-based number.
    pub async fn run_report(&mut self, number: usize) -> Result<(ReportQuery, Vec<Record>), DbError> {
        let report = self.catalog.query(number)?.clone();
        tracing::info!(number, title = report.title, "Running report.");
        let records = self.run_query(report.sql).await?;
        Ok((report, records))
    }
}

/// Binds a JSON scalar with its natural SQL type; the statement casts it to the column type.
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        nested => query.bind(nested.to_string()),
    }
}

fn classify_insert_error(source: sqlx::Error, table: &str, row: usize) -> DbError {
    let is_constraint = match &source {
        sqlx::Error::Database(err) => matches!(
            err.kind(),
            ErrorKind::ForeignKeyViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ),
        _ => false,
    };

    if is_constraint {
        DbError::ConstraintViolation {
            table: table.to_string(),
            row,
            source,
        }
    } else {
        DbError::QueryError(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> DatabaseManager {
        DatabaseManager::new(PgConnectOptions::new(), Catalog::standard())
    }

    #[tokio::test]
    async fn starts_disconnected() {
        assert!(!manager().is_connected());
    }

    #[tokio::test]
    async fn disconnect_without_connection_is_an_error() {
        let mut manager = manager();
        assert!(matches!(manager.disconnect().await, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn operations_require_a_connection() {
        let mut manager = manager();

        assert!(matches!(
            manager.create_table("rooms", true).await,
            Err(DbError::NotConnected)
        ));
        assert!(matches!(
            manager.insert_values(&[Record::new()], "rooms").await,
            Err(DbError::NotConnected)
        ));
        assert!(matches!(
            manager.run_query("SELECT 1").await,
            Err(DbError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn report_selection_is_checked_before_touching_the_connection() {
        let mut manager = manager();
        assert!(matches!(
            manager.run_report(5).await,
            Err(DbError::QuerySelection { selected: 5, available: 4 })
        ));
    }

    #[test]
    fn non_database_errors_are_not_constraint_violations() {
        let err = classify_insert_error(sqlx::Error::RowNotFound, "students", 3);
        assert!(matches!(err, DbError::QueryError(_)));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("The database manager is already connected.")]
    AlreadyConnected,

    #[error("The database manager is not connected.")]
    NotConnected,

    #[error("Failed to {action} table '{table}': {source}")]
    SchemaError {
        action: &'static str,
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Constraint violation while inserting row {row} into '{table}': {source}")]
    ConstraintViolation {
        table: String,
        row: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Refusing to insert an empty batch into '{0}'.")]
    EmptyBatch(String),

    #[error("Row {row} for '{table}' has columns [{found}], expected [{expected}].")]
    ColumnMismatch {
        table: String,
        row: usize,
        expected: String,
        found: String,
    },

    #[error("Table '{table}' has no column named '{column}'.")]
    UnknownColumn { table: String, column: String },

    #[error("Unknown table '{0}'.")]
    UnknownTable(String),

    #[error("Invalid query selection {selected}: expected a number from 1 to {available}.")]
    QuerySelection { selected: usize, available: usize },

    #[error("Column '{column}' has a type this tool cannot export: {type_name}.")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),
}

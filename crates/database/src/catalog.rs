use crate::error::DbError;

pub const ROOMS: &str = "rooms";
pub const STUDENTS: &str = "students";

/// A column of a managed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    /// The type bound values are cast to on insert. Length limits are left out so
    /// that oversized values are rejected by the column instead of truncated.
    pub cast_type: &'static str,
}

/// The static definition of one table managed by this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: Vec<ColumnDef>,
    /// `CREATE TABLE IF NOT EXISTS ...`, safe to run repeatedly.
    pub create_sql: &'static str,
}

/// One of the fixed, read-only reporting queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    /// 1-based position in the catalog, also used in output file names.
    pub number: usize,
    pub title: &'static str,
    pub sql: &'static str,
}

/// The immutable set of table definitions and report queries.
///
/// Built once at start-up with [`Catalog::standard`] and handed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tables: Vec<TableSchema>,
    queries: Vec<ReportQuery>,
}

impl TableSchema {
    /// `DROP TABLE IF EXISTS ... CASCADE`, safe to run whether or not the table exists.
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Builds a parameterized insert for the given columns, in the given order.
    ///
    /// Every placeholder is cast to the column's declared type, so values can be
    /// bound with whatever JSON type they arrived in. Column names are taken from
    /// the schema, never from the caller's text.
    pub fn insert_sql(&self, columns: &[&str]) -> Result<String, DbError> {
        let defs = columns
            .iter()
            .map(|name| {
                self.column(name).ok_or_else(|| DbError::UnknownColumn {
                    table: self.name.to_string(),
                    column: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let names = defs.iter().map(|c| c.name).collect::<Vec<_>>().join(", ");
        let placeholders = defs
            .iter()
            .enumerate()
            .map(|(i, c)| format!("${}::{}", i + 1, c.cast_type))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name, names, placeholders
        ))
    }
}

impl Catalog {
    /// The `rooms`/`students` schema and the four dormitory reports.
    pub fn standard() -> Self {
        let rooms = TableSchema {
            name: ROOMS,
            columns: vec![
                ColumnDef { name: "id", cast_type: "INT" },
                ColumnDef { name: "name", cast_type: "VARCHAR" },
            ],
            create_sql: "CREATE TABLE IF NOT EXISTS rooms (id INT PRIMARY KEY, name VARCHAR(9))",
        };

        let students = TableSchema {
            name: STUDENTS,
            columns: vec![
                ColumnDef { name: "birthday", cast_type: "TIMESTAMP" },
                ColumnDef { name: "id", cast_type: "INT" },
                ColumnDef { name: "name", cast_type: "VARCHAR" },
                ColumnDef { name: "room", cast_type: "INT" },
                ColumnDef { name: "sex", cast_type: "VARCHAR" },
            ],
            create_sql: r#"
            CREATE TABLE IF NOT EXISTS students (
                birthday TIMESTAMP,
                id INT PRIMARY KEY,
                name VARCHAR(30),
                room INT NOT NULL,
                sex VARCHAR(1),
                FOREIGN KEY (room) REFERENCES rooms (id)
            )
            "#,
        };

        let queries = vec![
            ReportQuery {
                number: 1,
                title: "Number of students per room",
                sql: r#"
                SELECT r.name AS room_name, COUNT(s.id) AS students_count
                FROM rooms AS r
                JOIN students AS s ON s.room = r.id
                GROUP BY r.id, r.name
                ORDER BY r.id ASC
                "#,
            },
            ReportQuery {
                number: 2,
                title: "Top 5 rooms with the lowest average student age",
                sql: r#"
                SELECT r.name AS room_name, AVG(CURRENT_DATE - s.birthday) AS average_age
                FROM rooms AS r
                JOIN students AS s ON s.room = r.id
                GROUP BY r.id, r.name
                ORDER BY average_age ASC, r.id ASC
                LIMIT 5
                "#,
            },
            ReportQuery {
                number: 3,
                title: "Top 5 rooms with the largest age difference",
                sql: r#"
                SELECT r.name AS room_name,
                       MAX(CURRENT_DATE - s.birthday) - MIN(CURRENT_DATE - s.birthday) AS age_range
                FROM rooms AS r
                JOIN students AS s ON s.room = r.id
                GROUP BY r.id, r.name
                ORDER BY age_range DESC, r.id ASC
                LIMIT 5
                "#,
            },
            ReportQuery {
                number: 4,
                title: "Rooms shared by students of both sexes",
                sql: r#"
                SELECT r.name AS room_name
                FROM rooms AS r
                JOIN students AS s ON s.room = r.id
                GROUP BY r.id, r.name
                HAVING COUNT(DISTINCT s.sex) = 2
                ORDER BY r.id ASC
                "#,
            },
        ];

        Self {
            tables: vec![rooms, students],
            queries,
        }
    }

    /// Tables in dependency order: referenced tables come first.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Result<&TableSchema, DbError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))
    }

    pub fn queries(&self) -> &[ReportQuery] {
        &self.queries
    }

    /// Looks up a report by its 1-based number.
    pub fn query(&self, number: usize) -> Result<&ReportQuery, DbError> {
        number
            .checked_sub(1)
            .and_then(|index| self.queries.get(index))
            .ok_or(DbError::QuerySelection {
                selected: number,
                available: self.queries.len(),
            })
    }
}

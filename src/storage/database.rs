//! SQLite Database
//!
//! Product table storage using rusqlite with r2d2 connection pooling.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter};
use serde_json::{Map, Value};

use crate::models::product::{FieldKind, ProductRecord, PRODUCT_FIELDS};
use crate::utils::error::{AppError, AppResult};

/// Name of the product table
pub const TABLE_NAME: &str = "DatabaseItem";

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Rows returned by a raw query, keyed by column name
pub type QueryRows = Vec<Map<String, Value>>;

/// DDL of the product table.
///
/// The agent's system prompt embeds this exact text, so the model sees the
/// same schema the database enforces.
pub fn create_table_sql() -> String {
    let mut columns: Vec<String> = PRODUCT_FIELDS
        .iter()
        .map(|f| format!("{} {} NOT NULL", f.name, f.kind.sql_type()))
        .collect();
    columns.push("filename VARCHAR(60) NOT NULL".to_string());
    columns.push("created_at VARCHAR(60)".to_string());
    columns.push("PRIMARY KEY (filename)".to_string());

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n    {}\n)",
        TABLE_NAME,
        columns.join(",\n    ")
    )
}

fn insert_sql() -> String {
    let names: Vec<&str> = PRODUCT_FIELDS
        .iter()
        .map(|f| f.name)
        .chain(["filename", "created_at"])
        .collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        TABLE_NAME,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Bind values for one record, in `insert_sql` column order.
fn record_values(record: &ProductRecord) -> AppResult<Vec<SqlValue>> {
    let item = match serde_json::to_value(&record.item)? {
        Value::Object(map) => map,
        _ => return Err(AppError::internal("product item did not serialize to an object")),
    };

    let mut values = Vec::with_capacity(PRODUCT_FIELDS.len() + 2);
    for field in PRODUCT_FIELDS {
        let raw = item.get(field.name).ok_or_else(|| {
            AppError::validation(format!("product item is missing field {}", field.name))
        })?;
        let value = match field.kind {
            FieldKind::Text => raw.as_str().map(|s| SqlValue::Text(s.to_string())),
            FieldKind::Real => raw.as_f64().map(SqlValue::Real),
            FieldKind::Integer => raw.as_i64().map(SqlValue::Integer),
        };
        values.push(value.ok_or_else(|| {
            AppError::validation(format!(
                "field {} has a value of the wrong type: {}",
                field.name, raw
            ))
        })?);
    }
    values.push(SqlValue::Text(record.filename.clone()));
    values.push(match &record.created_at {
        Some(ts) => SqlValue::Text(ts.clone()),
        None => SqlValue::Null,
    });
    Ok(values)
}

/// Convert one SQLite cell to JSON
fn value_ref_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<{} bytes>", bytes.len())),
    }
}

/// Database service for the product table
#[derive(Clone)]
pub struct ProductDatabase {
    pool: DbPool,
}

impl ProductDatabase {
    /// Create an in-memory database for testing.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Open (or create) the database file with connection pooling
    pub fn open(db_path: &Path) -> AppResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        tracing::debug!(path = %db_path.display(), "Opened product database");

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(&create_table_sql(), [])?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Number of stored products
    pub fn count_items(&self) -> AppResult<usize> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Insert records in a single transaction.
    ///
    /// A duplicate filename fails the whole batch.
    pub fn insert_many(&self, records: &[ProductRecord]) -> AppResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql())?;
            for record in records {
                stmt.execute(params_from_iter(record_values(record)?))?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Whether a record with this filename exists
    pub fn contains(&self, filename: &str) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let exists: bool = conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE filename = ?1)",
                TABLE_NAME
            ),
            params![filename],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Get a single record by filename
    pub fn get_item(&self, filename: &str) -> AppResult<Option<ProductRecord>> {
        let rows = self.query(
            &format!("SELECT * FROM \"{}\" WHERE filename = ?1", TABLE_NAME),
            params![filename],
        )?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(Value::Object(row))?)),
            None => Ok(None),
        }
    }

    /// Execute raw SQL and return the rows as JSON objects.
    ///
    /// The statement is forwarded verbatim; engine errors are returned as is.
    pub fn execute_sql(&self, sql: &str) -> AppResult<QueryRows> {
        self.query(sql, [])
    }

    fn query<P: rusqlite::Params>(&self, sql: &str, params: P) -> AppResult<QueryRows> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = Map::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                map.insert(name.clone(), value_ref_to_json(row.get_ref(i)?));
            }
            out.push(map);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for ProductDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductDatabase")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}

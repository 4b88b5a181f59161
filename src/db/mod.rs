mod schema;

use sqlx::postgres::{PgArguments, PgConnectOptions, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{Connection, FromRow, PgConnection, Postgres};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ContactError, Result};

pub use schema::{CREATE_CLIENTS_TABLE, CREATE_PHONES_TABLE};

/// A positional statement parameter, bound to `$1..$n` in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlParam<'a> {
    Int(i32),
    Text(&'a str),
}

impl From<i32> for SqlParam<'_> {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl<'a> From<&'a str> for SqlParam<'a> {
    fn from(value: &'a str) -> Self {
        SqlParam::Text(value)
    }
}

fn bind_query<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlParam<'q>],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match *param {
            SqlParam::Int(value) => query.bind(value),
            SqlParam::Text(value) => query.bind(value),
        };
    }
    query
}

fn bind_query_as<'q, T>(
    mut query: QueryAs<'q, Postgres, T, PgArguments>,
    params: &[SqlParam<'q>],
) -> QueryAs<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match *param {
            SqlParam::Int(value) => query.bind(value),
            SqlParam::Text(value) => query.bind(value),
        };
    }
    query
}

/// Single database connection shared by every entity operation
///
/// The connection is passed explicitly (`&mut Database`) to each operation, so only
/// one statement can be in flight at a time. Every statement runs in autocommit mode.
pub struct Database {
    options: PgConnectOptions,
    conn: Option<PgConnection>,
}

impl Database {
    /// Create a Database for the given options without connecting
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            conn: None,
        }
    }

    /// Open the connection. Does nothing if it is already open.
    pub async fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(ContactError::Connection)?;
        info!(
            host = self.options.get_host(),
            database = ?self.options.get_database(),
            "database connection established"
        );
        self.conn = Some(conn);

        Ok(())
    }

    /// Close the connection if it is open
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(ContactError::Connection)?;
            info!("database connection closed");
        }

        Ok(())
    }

    /// Whether `connect` succeeded and `close` has not been called since
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&mut self) -> Result<&mut PgConnection> {
        self.conn.as_mut().ok_or(ContactError::NotConnected)
    }

    /// Run a mutating statement and return the number of affected rows
    pub async fn execute<'q>(&mut self, sql: &'q str, params: &[SqlParam<'q>]) -> Result<u64> {
        let conn = self.conn()?;
        debug!(sql, params = params.len(), "execute");

        let result = bind_query(sqlx::query(sql), params).execute(conn).await?;

        Ok(result.rows_affected())
    }

    /// Run a query and decode its first row, if any
    pub async fn fetch_one<'q, T>(&mut self, sql: &'q str, params: &[SqlParam<'q>]) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let conn = self.conn()?;
        debug!(sql, params = params.len(), "fetch_one");

        let row = bind_query_as(sqlx::query_as::<_, T>(sql), params)
            .fetch_optional(conn)
            .await?;

        Ok(row)
    }

    /// Run a query and decode every row, in the order the store returns them
    pub async fn fetch_all<'q, T>(&mut self, sql: &'q str, params: &[SqlParam<'q>]) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let conn = self.conn()?;
        debug!(sql, params = params.len(), "fetch_all");

        let rows = bind_query_as(sqlx::query_as::<_, T>(sql), params)
            .fetch_all(conn)
            .await?;

        Ok(rows)
    }

    /// Create the clients and phones tables if they do not exist yet
    pub async fn create_schema(&mut self) -> Result<()> {
        self.execute(CREATE_CLIENTS_TABLE, &[]).await?;
        self.execute(CREATE_PHONES_TABLE, &[]).await?;
        info!("schema ready");

        Ok(())
    }
}

/// Build a Database from configuration and connect it
pub async fn init(config: &Config) -> Result<Database> {
    let mut db = Database::new(config.connect_options());
    db.connect().await?;

    Ok(db)
}

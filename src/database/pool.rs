// pool.rs

use async_trait::async_trait;
use deadpool_postgres::{Object, Pool, Transaction};
use tokio_postgres::Row;

use crate::{context::Context, database::statement::Statement, errors::StoreError};

/// Capability shared by every repository: run statements on pooled
/// connections. Implementations must be safe to share across tasks.
#[async_trait]
pub trait PgHandle: Send + Sync {
    /// Runs a statement and returns the number of affected rows
    async fn execute(&self, ctx: &Context, stmt: &Statement) -> Result<u64, StoreError>;

    async fn query(&self, ctx: &Context, stmt: &Statement) -> Result<Vec<Row>, StoreError>;

    /// Fails unless exactly one row comes back
    async fn query_one(&self, ctx: &Context, stmt: &Statement) -> Result<Row, StoreError>;

    /// Checks out a connection for the caller's exclusive use
    async fn acquire(&self, ctx: &Context) -> Result<PgConn, StoreError>;

    /// Round-trips `SELECT 1` on a pooled connection
    async fn ping(&self, ctx: &Context) -> Result<(), StoreError>;
}

/// deadpool-backed handle. Clones share the same pool.
#[derive(Clone)]
pub struct PgPool {
    pool: Pool,
}

impl PgPool {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Closes the pool; later checkouts fail and idle connections are dropped
    pub fn close(&self) {
        self.pool.close();
    }

    async fn checkout(&self) -> Result<Object, StoreError> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl PgHandle for PgPool {
    async fn execute(&self, ctx: &Context, stmt: &Statement) -> Result<u64, StoreError> {
        ctx.run(async {
            let client = self.checkout().await?;
            Ok::<_, StoreError>(client.execute(stmt.sql.as_str(), &stmt.params()).await?)
        })
        .await?
    }

    async fn query(&self, ctx: &Context, stmt: &Statement) -> Result<Vec<Row>, StoreError> {
        ctx.run(async {
            let client = self.checkout().await?;
            Ok::<_, StoreError>(client.query(stmt.sql.as_str(), &stmt.params()).await?)
        })
        .await?
    }

    async fn query_one(&self, ctx: &Context, stmt: &Statement) -> Result<Row, StoreError> {
        ctx.run(async {
            let client = self.checkout().await?;
            Ok::<_, StoreError>(client.query_one(stmt.sql.as_str(), &stmt.params()).await?)
        })
        .await?
    }

    async fn acquire(&self, ctx: &Context) -> Result<PgConn, StoreError> {
        let client = ctx.run(self.checkout()).await??;
        Ok(PgConn { client })
    }

    async fn ping(&self, ctx: &Context) -> Result<(), StoreError> {
        ctx.run(async {
            let client = self.checkout().await?;
            client.simple_query("SELECT 1").await?;
            Ok::<_, StoreError>(())
        })
        .await?
    }
}

/// A connection held outside the pool until dropped
pub struct PgConn {
    client: Object,
}

impl PgConn {
    /// Starts a transaction, giving up when `ctx` fires
    pub async fn begin(&mut self, ctx: &Context) -> Result<Transaction<'_>, StoreError> {
        Ok(ctx.run(self.client.transaction()).await??)
    }
}

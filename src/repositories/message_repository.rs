// repositories/message_repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::{
    context::Context,
    database::{pool::PgHandle, statement::StatementBuilder},
    errors::{RepoError, StoreError},
    models::message::Message,
};

const TABLE: &str = "messages";

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Inserts a message made only of column defaults and returns its id
    async fn create_message(&self, ctx: &Context) -> Result<i32, RepoError>;

    async fn get_message_by_id(&self, ctx: &Context, id: i32) -> Result<Message, RepoError>;
}

/// PostgreSQL-backed message repository. The handle is injected so several
/// repositories can share one pool.
pub struct PgMessageRepository {
    db: Arc<dyn PgHandle>,
    builder: StatementBuilder,
}

impl PgMessageRepository {
    pub fn new(db: Arc<dyn PgHandle>) -> Self {
        Self {
            db,
            builder: StatementBuilder::default(),
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create_message(&self, ctx: &Context) -> Result<i32, RepoError> {
        const OP: &str = "MessageRepository::create_message";

        let stmt = self.builder.insert_defaults(TABLE, "id");
        let row = self
            .db
            .query_one(ctx, &stmt)
            .await
            .map_err(|e| classify_insert_error(OP, e))?;

        row.try_get::<_, i32>("id")
            .map_err(|e| RepoError::unknown(OP, StoreError::from(e)))
    }

    async fn get_message_by_id(&self, ctx: &Context, id: i32) -> Result<Message, RepoError> {
        const OP: &str = "MessageRepository::get_message_by_id";

        let stmt = self.builder.select_all(TABLE).where_eq("id", id).build();
        let rows = self.db.query(ctx, &stmt).await.map_err(|e| {
            debug!("{} failed: {}", OP, e);
            RepoError::unknown(OP, e)
        })?;

        let row = at_most_one(rows, id).ok_or_else(|| RepoError::not_found(OP))?;

        let decode = || -> Result<Message, tokio_postgres::Error> {
            Ok(Message {
                id,
                uid: row.try_get("uid")?,
                prompt: row.try_get("prompt")?,
            })
        };
        decode().map_err(|e| RepoError::unknown(OP, StoreError::from(e)))
    }
}

/// Uniqueness violations become `AlreadyExists`; everything else is opaque.
fn classify_insert_error(op: &'static str, e: StoreError) -> RepoError {
    debug!("{} failed: {}", op, e);
    if e.is_unique_violation() {
        RepoError::already_exists(op, e)
    } else {
        RepoError::unknown(op, e)
    }
}

/// `id` is the primary key, so a second row means the table is corrupt.
fn at_most_one<T>(rows: Vec<T>, id: i32) -> Option<T> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    let first = rows.next();
    if count > 1 {
        panic!("messages.id is the primary key but id {} matched {} rows", id, count);
    }
    first
}

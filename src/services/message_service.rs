use std::sync::Arc;

use tracing::warn;

use crate::{
    context::Context,
    errors::{RepoError, RepoErrorKind, ServiceError},
    models::message::Message,
    repositories::message_repository::MessageRepository,
};

#[derive(Clone)]
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    /// Creates an empty message. Store details are logged and dropped here.
    pub async fn create_message(&self, ctx: &Context) -> Result<i32, ServiceError> {
        self.repo.create_message(ctx).await.map_err(|e| {
            warn!(op = e.op(), cause = ?e.store_error(), "create_message failed");
            match e.kind() {
                RepoErrorKind::AlreadyExists => ServiceError::MessageAlreadyExists,
                RepoErrorKind::NotFound | RepoErrorKind::Unknown => ServiceError::CannotCreateMessage,
            }
        })
    }

    /// Returns the repository result as is; read errors are not remapped.
    // TODO: confirm with product whether reads should map to MessageNotFound / CannotGetMessage like creates do.
    pub async fn get_message_by_id(&self, ctx: &Context, id: i32) -> Result<Message, RepoError> {
        self.repo.get_message_by_id(ctx, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum CreateOutcome {
        Ok,
        Conflict,
        Broken,
    }

    /// In-memory stand-in for the messages table
    struct FakeRepo {
        rows: Mutex<HashMap<i32, Message>>,
        create: CreateOutcome,
    }

    impl FakeRepo {
        fn new(create: CreateOutcome) -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                create,
            }
        }
    }

    #[async_trait]
    impl MessageRepository for FakeRepo {
        async fn create_message(&self, _ctx: &Context) -> Result<i32, RepoError> {
            match self.create {
                CreateOutcome::Ok => {
                    let mut rows = self.rows.lock().unwrap();
                    let id = rows.len() as i32 + 1;
                    rows.insert(id, Message { id, ..Message::default() });
                    Ok(id)
                }
                CreateOutcome::Conflict => Err(RepoError::already_exists(
                    "fake",
                    StoreError::Db { code: "23505".into(), message: "duplicate key".into() },
                )),
                CreateOutcome::Broken => Err(RepoError::unknown(
                    "fake",
                    StoreError::Driver("connection reset by peer".into()),
                )),
            }
        }

        async fn get_message_by_id(&self, _ctx: &Context, id: i32) -> Result<Message, RepoError> {
            match self.create {
                CreateOutcome::Broken => Err(RepoError::unknown("fake", StoreError::Pool("timed out".into()))),
                _ => self
                    .rows
                    .lock()
                    .unwrap()
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| RepoError::not_found("fake")),
            }
        }
    }

    fn service(create: CreateOutcome) -> MessageService {
        MessageService::new(Arc::new(FakeRepo::new(create)))
    }

    #[tokio::test]
    async fn create_returns_repository_id() {
        let svc = service(CreateOutcome::Ok);
        let ctx = Context::background();
        assert_eq!(svc.create_message(&ctx).await, Ok(1));
        assert_eq!(svc.create_message(&ctx).await, Ok(2));
    }

    #[tokio::test]
    async fn conflict_becomes_message_already_exists() {
        let err = service(CreateOutcome::Conflict)
            .create_message(&Context::background())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::MessageAlreadyExists);
    }

    #[tokio::test]
    async fn other_failures_become_cannot_create() {
        let err = service(CreateOutcome::Broken)
            .create_message(&Context::background())
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::CannotCreateMessage);
        assert!(!err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn read_after_create_returns_defaults() {
        let svc = service(CreateOutcome::Ok);
        let ctx = Context::background();
        let id = svc.create_message(&ctx).await.unwrap();

        let message = svc.get_message_by_id(&ctx, id).await.unwrap();
        assert_eq!(message, Message { id, uid: 0, prompt: String::new() });
    }

    // Reads pass repository errors through untranslated.
    #[tokio::test]
    async fn read_errors_pass_through_unchanged() {
        let ctx = Context::background();

        let err = service(CreateOutcome::Ok).get_message_by_id(&ctx, 404).await.unwrap_err();
        assert_eq!(err.kind(), RepoErrorKind::NotFound);
        assert_eq!(err.op(), "fake");

        let err = service(CreateOutcome::Broken).get_message_by_id(&ctx, 1).await.unwrap_err();
        assert_eq!(err.kind(), RepoErrorKind::Unknown);
        assert!(matches!(err.store_error(), Some(StoreError::Pool(_))));
    }
}

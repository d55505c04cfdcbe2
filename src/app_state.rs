// app_state.rs

use std::sync::Arc;
use std::time::Duration;

use crate::{context::Context, database::pool::PgHandle, services::message_service::MessageService};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Message operations
    pub messages: MessageService,
    /// Shared pooled handle, used directly for health checks
    pub db: Arc<dyn PgHandle>,
    /// Deadline applied to every request's store calls
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(messages: MessageService, db: Arc<dyn PgHandle>, request_timeout: Duration) -> Self {
        Self {
            messages,
            db,
            request_timeout,
        }
    }

    /// A fresh context bounded by the request timeout
    pub fn request_context(&self) -> Context {
        Context::with_timeout(self.request_timeout)
    }
}

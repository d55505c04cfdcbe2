pub mod error;
pub mod health_handlers;
pub mod message_handlers;

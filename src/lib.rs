pub mod app_state;
pub mod config;
pub mod context;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

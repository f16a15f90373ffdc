pub mod api;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod integrations;
pub mod lifecycle;
pub mod models;
pub mod server;
pub mod validate;

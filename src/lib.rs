pub mod api;
pub mod app_state;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod services;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod domain;
pub mod notification;
pub mod state;
pub mod telemetry;

//! # Corpsite Library
//!
//! Core of the corporate site service: localized public pages, the admin
//! content API, configuration, persistence and server setup.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod history;
pub mod locale;
pub mod models;
pub mod repositories;
pub mod sanitize;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub use migration;

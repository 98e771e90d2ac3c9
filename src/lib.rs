// src/lib.rs

pub mod api;
pub mod app;
pub mod composer;
pub mod config;
pub mod courses;
pub mod errors;
pub mod files;
pub mod history;
pub mod key_handlers;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod session;
pub mod status_indicator;
pub mod ui;

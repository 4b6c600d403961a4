//! ETA service: HTML form, JSON actions, health and metrics endpoints

pub mod api;
pub mod config;
pub mod ui;

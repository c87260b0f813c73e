//! Data models and configuration.

pub mod activity;
pub mod config;

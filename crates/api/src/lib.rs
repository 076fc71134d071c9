//! HTTP API: server composition, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;

//! HTTP API: routing, request/response mapping and middleware.

pub mod app;
pub mod context;
pub mod middleware;

//! HTTP API: router, middleware (auth gateway + request audit), handlers,
//! service wiring, and configuration.

pub mod app;
pub mod audit;
pub mod config;
pub mod context;
pub mod middleware;

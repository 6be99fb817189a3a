//! HTTP API: session endpoints, bearer-token middleware and role gates.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod directory;
pub mod middleware;

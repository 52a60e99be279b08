//! HTTP edge service: session verification, role-gated routes and RBAC
//! introspection on top of `rolegate-auth`.

pub mod app;
pub mod config;
pub mod context;
pub mod guard;
pub mod jwt;
pub mod middleware;

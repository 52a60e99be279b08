//! `rolegate-core`: shared foundation types.
//!
//! This crate holds identifiers and the configuration error model used by the
//! RBAC engine and the edge service. It has no knowledge of roles or policies.

pub mod error;
pub mod id;

pub use error::{ConfigError, ConfigResult};
pub use id::{RequestId, SubjectId};

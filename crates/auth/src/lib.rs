//! `rolegate-auth`: role-based access control engine.
//!
//! Pure and synchronous: a role registry with data-driven inheritance, a
//! cycle-safe hierarchy resolver, permission aggregation, an ordered policy
//! evaluator and the [`AccessControl`] façade that composes them. Every access
//! decision fails closed.
//!
//! This crate is intentionally decoupled from HTTP and token cryptography.

pub mod aggregate;
pub mod authorize;
pub mod claims;
pub mod config;
pub mod context;
pub mod hierarchy;
pub mod mapping;
pub mod permissions;
pub mod policy;
pub mod registry;
pub mod roles;
pub mod user;

pub use aggregate::user_permissions;
pub use authorize::{
    AccessControl, AccessExplanation, DecisionSource, ResolvedRole, SubjectState,
    default_access_control,
};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use config::{HierarchyValidation, RbacConfig};
pub use context::AccessContext;
pub use hierarchy::{highest_role, role_hierarchy, role_inherits_from};
pub use mapping::ResourcePermissionMap;
pub use permissions::Permission;
pub use policy::{
    Effect, PolicyDecision, PolicyEvaluator, PolicyRule, RuleConditions, WILDCARD,
    builtin_policies,
};
pub use registry::{RoleRegistry, builtin_roles};
pub use roles::{Role, RoleDefinition};
pub use user::{AccountMetadata, AccountStatus, Subject};

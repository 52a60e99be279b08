//! Route-level role requirements.
//!
//! Each guarded path prefix names the minimum role required to reach it. A
//! subject passes when any role it holds inherits from that minimum; the
//! normalized highest role is carried along for display.

use rolegate_auth::{AccessControl, Role, Subject};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub required: Role,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    rules: Vec<RouteRule>,
}

/// Why the guard turned a subject away (always rendered as 403).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    Suspended,
    NoRoles,
    InsufficientRole { required: Role, highest: Role },
}

impl GuardRejection {
    pub fn message(&self) -> String {
        match self {
            GuardRejection::Suspended => "Account is suspended".to_string(),
            GuardRejection::NoRoles => "No roles assigned".to_string(),
            GuardRejection::InsufficientRole { required, highest } => {
                format!("Role '{highest}' does not satisfy required role '{required}'")
            }
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protect(mut self, prefix: impl Into<String>, required: Role) -> Self {
        self.rules.push(RouteRule {
            prefix: prefix.into(),
            required,
        });
        self
    }

    pub fn builtin() -> Self {
        Self::new()
            .protect("/admin", Role::ADMIN)
            .protect("/moderation", Role::MODERATOR)
            .protect("/profile", Role::USER)
            .protect("/dashboard", Role::VIEWER)
            .protect("/rbac", Role::VIEWER)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Minimum role for `path`; the longest matching prefix wins.
    pub fn required_role(&self, path: &str) -> Option<&Role> {
        self.rules
            .iter()
            .filter(|rule| prefix_matches(&rule.prefix, path))
            .max_by_key(|rule| rule.prefix.len())
            .map(|rule| &rule.required)
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Decide whether `subject` may reach a route requiring `required`.
///
/// Returns the subject's normalized highest role on success, falling back to
/// the first listed role when none of them is registered.
pub fn check_subject(
    access: &AccessControl,
    subject: &Subject,
    required: &Role,
) -> Result<Role, GuardRejection> {
    if subject.is_suspended() {
        return Err(GuardRejection::Suspended);
    }
    let highest = access
        .highest_role(&subject.roles)
        .or_else(|| subject.roles.first().cloned())
        .ok_or(GuardRejection::NoRoles)?;

    let qualifies = subject
        .roles
        .iter()
        .any(|role| access.role_inherits_from(role, required));
    if qualifies {
        Ok(highest)
    } else {
        Err(GuardRejection::InsufficientRole {
            required: required.clone(),
            highest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_auth::{
        AccountStatus, PolicyEvaluator, ResourcePermissionMap, RoleDefinition, RoleRegistry,
        default_access_control,
    };

    fn subject(roles: &[Role]) -> Subject {
        Subject::new("u-1", "u@example.com").with_roles(roles.iter().cloned())
    }

    #[test]
    fn longest_prefix_wins() {
        let guard = RouteGuard::builtin().protect("/admin/public", Role::VIEWER);
        assert_eq!(guard.required_role("/admin/overview"), Some(&Role::ADMIN));
        assert_eq!(guard.required_role("/admin/public/docs"), Some(&Role::VIEWER));
    }

    #[test]
    fn prefixes_match_on_segment_boundaries() {
        let guard = RouteGuard::builtin();
        assert_eq!(guard.required_role("/admin"), Some(&Role::ADMIN));
        assert_eq!(guard.required_role("/administrator"), None);
        assert_eq!(guard.required_role("/health"), None);
    }

    #[test]
    fn higher_roles_pass_lower_requirements() {
        let access = default_access_control();
        assert_eq!(
            check_subject(&access, &subject(&[Role::ADMIN]), &Role::VIEWER),
            Ok(Role::ADMIN)
        );
        assert_eq!(
            check_subject(&access, &subject(&[Role::VIEWER, Role::MODERATOR]), &Role::USER),
            Ok(Role::MODERATOR)
        );
    }

    #[test]
    fn lower_roles_are_rejected() {
        let access = default_access_control();
        assert_eq!(
            check_subject(&access, &subject(&[Role::USER]), &Role::ADMIN),
            Err(GuardRejection::InsufficientRole {
                required: Role::ADMIN,
                highest: Role::USER,
            })
        );
        assert_eq!(
            check_subject(&access, &subject(&[]), &Role::VIEWER),
            Err(GuardRejection::NoRoles)
        );
    }

    #[test]
    fn suspended_subjects_are_rejected() {
        let access = default_access_control();
        let s = subject(&[Role::ADMIN]).with_status(AccountStatus::Suspended);
        assert_eq!(
            check_subject(&access, &s, &Role::VIEWER),
            Err(GuardRejection::Suspended)
        );
    }

    #[test]
    fn unknown_roles_only_satisfy_themselves() {
        let access = default_access_control();
        let s = subject(&[Role::new("ghost")]);
        assert!(check_subject(&access, &s, &Role::VIEWER).is_err());
        assert!(check_subject(&access, &s, &Role::new("ghost")).is_ok());
    }

    #[test]
    fn unregistered_roles_do_not_mask_held_roles() {
        let access = default_access_control();
        let s = subject(&[Role::new("customer"), Role::VIEWER]);
        assert_eq!(check_subject(&access, &s, &Role::VIEWER), Ok(Role::VIEWER));
        assert!(check_subject(&access, &s, &Role::USER).is_err());
    }

    #[test]
    fn any_qualifying_role_passes_in_unrelated_registries() {
        let registry = RoleRegistry::from_definitions([
            RoleDefinition::new(Role::new("base"), "Base"),
            RoleDefinition::new(Role::new("auditor"), "Auditor"),
            RoleDefinition::new(Role::new("wide"), "Wide")
                .inheriting([Role::new("base"), Role::new("auditor")]),
            RoleDefinition::new(Role::new("billing"), "Billing"),
        ]);
        let access = AccessControl::new(
            registry,
            PolicyEvaluator::default(),
            ResourcePermissionMap::default(),
        );
        let s = subject(&[Role::new("wide"), Role::new("billing")]);
        assert_eq!(
            check_subject(&access, &s, &Role::new("billing")),
            Ok(Role::new("wide"))
        );
    }
}

use std::collections::HashSet;

use serde::Serialize;

use rolegate_core::{ConfigResult, SubjectId};

use crate::{
    AccessContext, AccountStatus, Effect, HierarchyValidation, Permission, PolicyEvaluator,
    RbacConfig, ResourcePermissionMap, Role, RoleDefinition, RoleRegistry, Subject, highest_role,
    role_hierarchy, role_inherits_from, user_permissions,
};

/// Access decision façade.
///
/// Composes the role registry, the policy evaluator and the resource
/// permission map. Built once at startup and shared read-only; every method
/// is a pure function of that configuration and its arguments.
///
/// - No IO
/// - No panics
/// - Fail-closed: absent subjects, unknown roles and unmapped resources deny
#[derive(Debug, Clone)]
pub struct AccessControl {
    registry: RoleRegistry,
    policies: PolicyEvaluator,
    resource_permissions: ResourcePermissionMap,
}

/// Build the façade from the built-in configuration.
///
/// Call once during process init and pass the result down.
pub fn default_access_control() -> AccessControl {
    AccessControl::new(
        RoleRegistry::builtin(),
        PolicyEvaluator::builtin(),
        ResourcePermissionMap::builtin(),
    )
}

impl AccessControl {
    pub fn new(
        registry: RoleRegistry,
        policies: PolicyEvaluator,
        resource_permissions: ResourcePermissionMap,
    ) -> Self {
        Self {
            registry,
            policies,
            resource_permissions,
        }
    }

    /// Build from configuration, validating roles and rules.
    ///
    /// Policy problems are always errors. Hierarchy problems are errors only
    /// under [`HierarchyValidation::Strict`]; otherwise they are logged.
    pub fn from_config(config: RbacConfig) -> ConfigResult<Self> {
        let registry = RoleRegistry::from_definitions(config.roles);
        let policies = PolicyEvaluator::new(config.policies);
        policies.validate()?;

        if let Err(err) = registry.validate() {
            match config.hierarchy_validation {
                HierarchyValidation::Strict => return Err(err),
                HierarchyValidation::Lenient => {
                    tracing::warn!(error = %err, "role hierarchy is inconsistent; continuing")
                }
            }
        }

        Ok(Self::new(registry, policies, config.resource_permissions))
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn policies(&self) -> &PolicyEvaluator {
        &self.policies
    }

    pub fn resource_permissions(&self) -> &ResourcePermissionMap {
        &self.resource_permissions
    }

    /// Direct role membership. Inheritance is deliberately not expanded.
    pub fn has_role(&self, subject: Option<&Subject>, role: &Role) -> bool {
        subject.is_some_and(|s| !s.roles.is_empty() && s.holds(role))
    }

    pub fn has_permission(&self, subject: Option<&Subject>, permission: &Permission) -> bool {
        let Some(subject) = subject else {
            return false;
        };
        if subject.roles.is_empty() || subject.is_suspended() {
            return false;
        }
        self.user_permissions(&subject.roles).contains(permission)
    }

    pub fn can_access_resource(&self, subject: Option<&Subject>, context: &AccessContext) -> bool {
        let source = self.decide(subject, context);
        let granted = source.granted();
        if !granted {
            tracing::debug!(
                resource = %context.resource,
                action = %context.action,
                subject = ?subject.map(|s| &s.id),
                source = ?source,
                "access denied"
            );
        }
        granted
    }

    pub fn validate_access(&self, subject: Option<&Subject>, resource: &str, action: &str) -> bool {
        let mut context = AccessContext::new(resource, action);
        context.subject_id = subject.map(|s| s.id.clone());
        self.can_access_resource(subject, &context)
    }

    pub fn user_permissions(&self, roles: &[Role]) -> HashSet<Permission> {
        user_permissions(&self.registry, roles)
    }

    pub fn role_hierarchy(&self, role: &Role) -> Vec<Role> {
        role_hierarchy(&self.registry, role)
    }

    pub fn role_inherits_from(&self, role: &Role, target: &Role) -> bool {
        role_inherits_from(&self.registry, role, target)
    }

    pub fn highest_role(&self, roles: &[Role]) -> Option<Role> {
        highest_role(&self.registry, roles)
    }

    /// Static definition plus its fully computed permission list.
    pub fn role_definition(&self, role: &Role) -> Option<ResolvedRole> {
        let definition = self.registry.get(role)?.clone();
        let mut computed_permissions: Vec<Permission> =
            self.user_permissions(std::slice::from_ref(role)).into_iter().collect();
        computed_permissions.sort();

        Some(ResolvedRole {
            hierarchy: self.role_hierarchy(role),
            definition,
            computed_permissions,
        })
    }

    /// Every registered role, resolved, in registration order.
    pub fn role_definitions(&self) -> Vec<ResolvedRole> {
        self.registry
            .roles()
            .filter_map(|definition| self.role_definition(&definition.id))
            .collect()
    }

    fn decide(&self, subject: Option<&Subject>, context: &AccessContext) -> DecisionSource {
        let Some(subject) = subject else {
            return DecisionSource::NoSubject;
        };
        if subject.is_suspended() {
            return DecisionSource::Suspended;
        }

        if let Some(decision) = self.policies.evaluate(&self.registry, subject, context) {
            return DecisionSource::Policy {
                rule_id: decision.rule_id,
                effect: decision.effect,
            };
        }

        match self
            .resource_permissions
            .permission_for(&context.resource, &context.action)
        {
            Some(permission) => DecisionSource::Permission {
                permission: permission.clone(),
                held: self.has_permission(Some(subject), permission),
            },
            None => DecisionSource::Unmapped,
        }
    }

    /// Explain why an access decision was made (or would be made).
    ///
    /// Reaches exactly the same verdict as [`AccessControl::can_access_resource`]
    /// and adds the deciding source plus the subject's effective permissions.
    pub fn explain(&self, subject: Option<&Subject>, context: &AccessContext) -> AccessExplanation {
        let source = self.decide(subject, context);

        let reason = match &source {
            DecisionSource::NoSubject => "No authenticated subject".to_string(),
            DecisionSource::Suspended => "Subject account is suspended".to_string(),
            DecisionSource::Policy { rule_id, effect } => {
                format!("Policy rule '{rule_id}' matched with effect '{effect}'")
            }
            DecisionSource::Permission { permission, held: true } => {
                format!("Subject holds required permission '{permission}'")
            }
            DecisionSource::Permission { permission, held: false } => {
                format!("Subject lacks required permission '{permission}'")
            }
            DecisionSource::Unmapped => format!(
                "No policy rule matched and '{}:{}' maps to no permission",
                context.resource, context.action
            ),
        };

        let subject = subject.map(|s| {
            let mut effective_permissions: Vec<String> = self
                .user_permissions(&s.roles)
                .into_iter()
                .map(|p| p.as_str().to_string())
                .collect();
            effective_permissions.sort();
            SubjectState {
                id: s.id.clone(),
                roles: s.roles.clone(),
                status: s.metadata.status,
                effective_permissions,
            }
        });

        AccessExplanation {
            resource: context.resource.clone(),
            action: context.action.clone(),
            granted: source.granted(),
            reason,
            source,
            subject,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Introspection / Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// A role definition with its inherited-inclusive permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRole {
    #[serde(flatten)]
    pub definition: RoleDefinition,
    /// The role and every role it inherits from, in traversal order.
    pub hierarchy: Vec<Role>,
    /// Sorted, deduplicated.
    pub computed_permissions: Vec<Permission>,
}

/// What decided an access question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    NoSubject,
    Suspended,
    Policy { rule_id: String, effect: Effect },
    Permission { permission: Permission, held: bool },
    Unmapped,
}

impl DecisionSource {
    pub fn granted(&self) -> bool {
        match self {
            DecisionSource::Policy { effect, .. } => effect.is_allow(),
            DecisionSource::Permission { held, .. } => *held,
            DecisionSource::NoSubject | DecisionSource::Suspended | DecisionSource::Unmapped => {
                false
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectState {
    pub id: SubjectId,
    pub roles: Vec<Role>,
    pub status: AccountStatus,
    pub effective_permissions: Vec<String>,
}

/// Detailed explanation of an access decision.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub resource: String,
    pub action: String,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub source: DecisionSource,
    pub subject: Option<SubjectState>,
}

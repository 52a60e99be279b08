//! Ordered policy rules evaluated ahead of the permission mapping.
//!
//! Rules are tried in configured order and the first matching rule decides.
//! When no rule matches the evaluator returns `None` ("no decision"), which is
//! distinct from a deny: the caller falls back to permission mapping.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use rolegate_core::{ConfigError, ConfigResult};

use crate::{AccessContext, Permission, Role, RoleRegistry, Subject, user_permissions};

/// Wildcard accepted in a rule's resource and action list.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn is_allow(self) -> bool {
        self == Effect::Allow
    }
}

impl core::fmt::Display for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Effect::Allow => f.write_str("allow"),
            Effect::Deny => f.write_str("deny"),
        }
    }
}

/// Extra requirements a subject must meet for a rule to match.
///
/// Each list means "at least one of"; when both are present both must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<Vec<Role>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permissions: Option<Vec<Permission>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Literal resource name or `*`.
    pub resource: String,
    /// Literal action names; a `*` entry matches every action.
    pub actions: Vec<String>,
    pub effect: Effect,
    #[serde(default)]
    pub conditions: Option<RuleConditions>,
}

impl PolicyRule {
    pub fn new<I, S>(id: impl Into<String>, resource: impl Into<String>, actions: I, effect: Effect) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            resource: resource.into(),
            actions: actions.into_iter().map(Into::into).collect(),
            effect,
            conditions: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    pub fn requiring_roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.conditions.get_or_insert_with(RuleConditions::default).required_roles =
            Some(roles.into_iter().collect());
        self
    }

    pub fn requiring_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.conditions.get_or_insert_with(RuleConditions::default).required_permissions =
            Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    fn targets(&self, context: &AccessContext) -> bool {
        let resource_ok = self.resource == WILDCARD || self.resource == context.resource;
        let action_ok = self
            .actions
            .iter()
            .any(|a| a == WILDCARD || *a == context.action);
        resource_ok && action_ok
    }
}

/// Outcome of a matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    pub rule_id: String,
    pub effect: Effect,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyEvaluator {
    rules: Vec<PolicyRule>,
}

impl PolicyEvaluator {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_policies())
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Reject duplicate rule ids and rules that can never match.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::DuplicateRule(rule.id.clone()));
            }
            if rule.resource.is_empty() {
                return Err(ConfigError::invalid_rule(&rule.id, "empty resource"));
            }
            if rule.actions.is_empty() {
                return Err(ConfigError::invalid_rule(&rule.id, "no actions"));
            }
        }
        Ok(())
    }

    /// Effect of the first rule matching `(subject, context)`, if any.
    pub fn evaluate(
        &self,
        registry: &RoleRegistry,
        subject: &Subject,
        context: &AccessContext,
    ) -> Option<PolicyDecision> {
        // Computed on first need; most rules carry no permission condition.
        let mut permissions: Option<HashSet<Permission>> = None;

        self.rules
            .iter()
            .find(|rule| {
                rule.targets(context)
                    && conditions_hold(rule.conditions.as_ref(), registry, subject, &mut permissions)
            })
            .map(|rule| PolicyDecision {
                rule_id: rule.id.clone(),
                effect: rule.effect,
            })
    }
}

fn conditions_hold(
    conditions: Option<&RuleConditions>,
    registry: &RoleRegistry,
    subject: &Subject,
    permissions: &mut Option<HashSet<Permission>>,
) -> bool {
    let Some(conditions) = conditions else {
        return true;
    };

    if let Some(required) = &conditions.required_roles {
        if !required.iter().any(|role| subject.holds(role)) {
            return false;
        }
    }

    if let Some(required) = &conditions.required_permissions {
        let held = permissions.get_or_insert_with(|| user_permissions(registry, &subject.roles));
        if !required.iter().any(|p| held.contains(p)) {
            return false;
        }
    }

    true
}

/// Built-in rule list. Order matters: the first match wins.
pub fn builtin_policies() -> Vec<PolicyRule> {
    vec![
        PolicyRule::new("admin-full-access", WILDCARD, [WILDCARD], Effect::Allow)
            .named("Admin full access", "Administrators may perform any action")
            .requiring_roles([Role::ADMIN]),
        PolicyRule::new("moderators-manage-content", "content", ["read", "moderate"], Effect::Allow)
            .named("Moderator content access", "Moderators may read and moderate content")
            .requiring_roles([Role::MODERATOR]),
        PolicyRule::new("system-configure-locked", "system", ["configure"], Effect::Deny)
            .named(
                "System configuration locked",
                "Only rules listed earlier may allow system configuration",
            ),
    ]
}

use serde::Deserialize;

use crate::authz::matcher::PathPattern;
use crate::authz::model::{AuthState, Requirement, Role, Verdict};
use crate::error::ConfigError;

/// PathRule
///
/// One pattern-to-requirement mapping. Rules are consulted in the order they were
/// configured and the first match decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

/// RuleEntry
///
/// The unvalidated form of a rule, as read from a rules file:
/// `{ "pattern": "/admin/*", "access": { "role": "ADMIN" } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub pattern: String,
    pub access: Requirement,
}

/// Decision
///
/// A verdict together with the rule that produced it, so callers can report which
/// requirement was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    pub verdict: Verdict,
    pub rule: &'a PathRule,
}

impl Decision<'_> {
    /// The role the caller was missing, if the matched rule named one.
    pub fn required_role(&self) -> Option<Role> {
        self.rule.requirement.required_role()
    }
}

/// RuleSet
///
/// An immutable, validated rule table. The last rule is always the implicit
/// catch-all (`any path → authenticated`), so every path matches something.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PathRule>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Builds a rule set from `(pattern, requirement)` pairs in priority order.
    pub fn from_entries<I, P>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, Requirement)>,
        P: Into<String>,
    {
        entries
            .into_iter()
            .fold(RuleSetBuilder::default(), |builder, (pattern, requirement)| {
                builder.rule(pattern, requirement)
            })
            .build()
    }

    /// All rules in evaluation order, catch-all included.
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// Finds the first rule matching `path` and applies it to `auth`.
    pub fn decide(&self, path: &str, auth: &AuthState) -> Decision<'_> {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .unwrap_or(&CATCH_ALL);

        Decision {
            verdict: rule.requirement.verdict_for(auth),
            rule,
        }
    }

    pub fn evaluate(&self, path: &str, auth: &AuthState) -> Verdict {
        self.decide(path, auth).verdict
    }
}

// Only reachable if the table were somehow built without its catch-all.
static CATCH_ALL: PathRule = PathRule {
    pattern: PathPattern::Any,
    requirement: Requirement::Authenticated,
};

/// Decides whether a request for `path` by `auth` may proceed.
pub fn evaluate(rule_set: &RuleSet, path: &str, auth: &AuthState) -> Verdict {
    rule_set.evaluate(path, auth)
}

/// RuleSetBuilder
///
/// Collects rules in priority order and validates them all in `build`.
///
/// ```
/// use session_security::authz::{RuleSet, Role};
///
/// let rules = RuleSet::builder()
///     .permit_all(["/auth/login", "/"])
///     .has_role("/admin/*", Role::Admin)
///     .build()
///     .unwrap();
/// assert_eq!(rules.rules().len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    entries: Vec<(String, Requirement)>,
}

impl RuleSetBuilder {
    pub fn rule(mut self, pattern: impl Into<String>, requirement: Requirement) -> Self {
        self.entries.push((pattern.into(), requirement));
        self
    }

    pub fn permit_all<I, P>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        patterns
            .into_iter()
            .fold(self, |builder, pattern| builder.rule(pattern, Requirement::Public))
    }

    pub fn has_role(self, pattern: impl Into<String>, role: Role) -> Self {
        self.rule(pattern, Requirement::Role(role))
    }

    pub fn authenticated(self, pattern: impl Into<String>) -> Self {
        self.rule(pattern, Requirement::Authenticated)
    }

    /// Validates every pattern and appends the catch-all.
    ///
    /// A pattern repeated with the same requirement is redundant and only the first
    /// copy is kept; repeated with a different requirement it is a `ConflictingRule`.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        let mut rules: Vec<PathRule> = Vec::with_capacity(self.entries.len() + 1);

        for (raw, requirement) in self.entries {
            let pattern = PathPattern::parse(&raw)?;

            match rules.iter().find(|existing| existing.pattern == pattern) {
                Some(existing) if existing.requirement == requirement => {
                    tracing::debug!(pattern = %raw, "dropping duplicate access rule");
                }
                Some(_) => return Err(ConfigError::ConflictingRule { pattern: raw }),
                None => rules.push(PathRule {
                    pattern,
                    requirement,
                }),
            }
        }

        rules.push(CATCH_ALL.clone());
        Ok(RuleSet { rules })
    }
}

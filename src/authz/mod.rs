//! Path-based authorization rules.
//!
//! A [`RuleSet`] is an ordered table of path patterns and the access each one
//! requires. It is built and validated once at startup, then shared read-only by
//! every request. [`evaluate`] scans it top to bottom and the first matching rule
//! decides; anything no configured rule covers requires an authenticated caller.

pub mod engine;
pub mod matcher;
pub mod model;

pub use engine::{Decision, PathRule, RuleEntry, RuleSet, RuleSetBuilder, evaluate};
pub use matcher::PathPattern;
pub use model::{AuthState, Requirement, Role, Verdict};

use std::fmt;

use crate::error::ConfigError;

/// PathPattern
///
/// A validated rule pattern. Only two shapes are accepted from configuration:
/// an exact path (`/auth/login`) and a trailing single wildcard (`/admin/*`).
/// `Any` is reserved for the catch-all rule appended by the rule set builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix {
        pattern: String,
        /// Segments of the pattern before the `/*`, including the leading empty one.
        segments: Vec<String>,
    },
    Any,
}

impl PathPattern {
    /// Validates a configured pattern.
    ///
    /// Rejects empty patterns, patterns not rooted at `/`, more than one `*`, and
    /// any `*` that is not the whole final segment (`/admin*`, `/a/*/b`).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if !raw.starts_with('/') {
            return Err(ConfigError::NotAbsolute(raw.to_string()));
        }

        match raw.matches('*').count() {
            0 => Ok(PathPattern::Exact(raw.to_string())),
            1 => {
                let prefix = raw
                    .strip_suffix("/*")
                    .ok_or_else(|| ConfigError::MisplacedWildcard(raw.to_string()))?;
                Ok(PathPattern::Prefix {
                    pattern: raw.to_string(),
                    segments: prefix.split('/').map(str::to_string).collect(),
                })
            }
            _ => Err(ConfigError::MultipleWildcards(raw.to_string())),
        }
    }

    /// Returns true when `path` falls under this pattern.
    ///
    /// A wildcard pattern needs at least one segment past its prefix, so `/admin/*`
    /// matches `/admin/users` and `/admin/` but neither `/admin` nor `/adminx`.
    /// The empty path matches nothing except the catch-all.
    pub fn matches(&self, path: &str) -> bool {
        if path.is_empty() {
            return matches!(self, PathPattern::Any);
        }

        match self {
            PathPattern::Exact(exact) => exact == path,
            PathPattern::Prefix { segments, .. } => {
                let mut parts = path.split('/');
                segments
                    .iter()
                    .all(|expected| parts.next() == Some(expected.as_str()))
                    && parts.next().is_some()
            }
            PathPattern::Any => true,
        }
    }

    /// The pattern as it was written in configuration.
    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Exact(pattern) | PathPattern::Prefix { pattern, .. } => pattern,
            PathPattern::Any => "**",
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::{
    AppConfig, AppState,
    auth::{AuthUser, Authenticator, Credentials},
    authz::{AuthState, Role, RuleEntry, RuleSet, Verdict},
    error::ConfigError,
};

// --- Rule Table ---

/// The built-in access rules, in priority order. `/user/signup` must stay above
/// `/user/*` or signup would require the USER role.
pub fn default_rules() -> Result<RuleSet, ConfigError> {
    RuleSet::builder()
        .permit_all(["/auth/login", "/user/signup", "/auth/fail", "/", "/main"])
        .permit_all(["/health", "/api-docs/*"])
        .has_role("/admin/*", Role::Admin)
        .has_role("/user/*", Role::User)
        .build()
}

/// Parses a JSON array of `{ "pattern": ..., "access": ... }` entries.
pub fn rules_from_json(raw: &str) -> Result<RuleSet, ConfigError> {
    let entries: Vec<RuleEntry> = serde_json::from_str(raw)?;
    RuleSet::from_entries(entries.into_iter().map(|entry| (entry.pattern, entry.access)))
}

/// load_rules
///
/// Builds the rule table for this process: the configured rules file if there is
/// one, otherwise [`default_rules`].
pub fn load_rules(config: &AppConfig) -> Result<RuleSet, ConfigError> {
    let rules = match &config.rules_file {
        None => default_rules()?,
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
                path: path.clone(),
                source,
            })?;
            rules_from_json(&raw)?
        }
    };

    let source = config
        .rules_file
        .as_ref()
        .map_or("built-in".to_string(), |p| p.display().to_string());
    tracing::info!(rules = rules.rules().len(), %source, "Access rules loaded");
    Ok(rules)
}

// --- Static Resources ---

/// StaticLocation
///
/// The common places static assets are served from. Requests under these never
/// reach the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticLocation {
    /// `/css/**`
    Css,
    /// `/js/**`
    JavaScript,
    /// `/images/**`
    Images,
    /// `/webjars/**`
    WebJars,
    /// `/favicon.*`
    Favicon,
    /// `/*/icon-*`
    Icons,
}

impl StaticLocation {
    pub const ALL: [StaticLocation; 6] = [
        StaticLocation::Css,
        StaticLocation::JavaScript,
        StaticLocation::Images,
        StaticLocation::WebJars,
        StaticLocation::Favicon,
        StaticLocation::Icons,
    ];

    pub fn matches(&self, path: &str) -> bool {
        match self {
            StaticLocation::Css => path.starts_with("/css/"),
            StaticLocation::JavaScript => path.starts_with("/js/"),
            StaticLocation::Images => path.starts_with("/images/"),
            StaticLocation::WebJars => path.starts_with("/webjars/"),
            StaticLocation::Favicon => path
                .strip_prefix("/favicon.")
                .is_some_and(|ext| !ext.is_empty() && !ext.contains('/')),
            StaticLocation::Icons => {
                let segments: Vec<&str> = path.split('/').collect();
                matches!(segments.as_slice(), ["", dir, file] if !dir.is_empty() && file.starts_with("icon-"))
            }
        }
    }
}

/// StaticResources
///
/// The pre-filter applied before authorization.
#[derive(Debug, Clone)]
pub struct StaticResources {
    locations: Vec<StaticLocation>,
}

impl StaticResources {
    pub fn common_locations() -> Self {
        Self {
            locations: StaticLocation::ALL.to_vec(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.locations.iter().any(|location| location.matches(path))
    }
}

// --- Denial Responses ---

/// Denial
///
/// The HTTP rendering of a non-`Allow` verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated { login_redirect: Option<String> },
    Forbidden { required_role: Option<Role> },
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        match self {
            Denial::Unauthenticated {
                login_redirect: Some(login),
            } => Redirect::to(&login).into_response(),
            Denial::Unauthenticated {
                login_redirect: None,
            } => {
                let body = json!({
                    "error": "unauthenticated",
                    "message": "Authentication is required to access this resource",
                });
                let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(r#"Basic realm="session-security", Bearer"#),
                );
                response
            }
            Denial::Forbidden { required_role } => {
                let body = json!({
                    "error": "forbidden",
                    "message": "You do not have permission to access this resource",
                    "required_role": required_role,
                });
                (StatusCode::FORBIDDEN, Json(body)).into_response()
            }
        }
    }
}

// --- Middleware ---

/// authorize
///
/// Runs in front of every route:
/// 1. Static assets pass straight through.
/// 2. Credentials in the `Authorization` header are resolved to an identity.
///    Credentials that fail to resolve are logged and the caller is treated as
///    anonymous, so the verdict can only get stricter.
/// 3. The rule engine decides. On `Allow` the resolved `AuthUser` is attached to
///    the request for handlers to extract.
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if state.static_resources.matches(&path) {
        tracing::trace!(%path, "Static resource, authorization skipped");
        return next.run(request).await;
    }

    let user = resolve_caller(&state, request.headers()).await;
    let auth_state = AuthState::from(user.as_ref());
    let decision = state.rules.decide(&path, &auth_state);

    tracing::debug!(
        %path,
        rule = %decision.rule.pattern,
        requirement = %decision.rule.requirement,
        verdict = ?decision.verdict,
        "Authorization decided"
    );

    match decision.verdict {
        Verdict::Allow => {
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        Verdict::DenyUnauthenticated => {
            tracing::info!(%path, "Request denied: authentication required");
            Denial::Unauthenticated {
                login_redirect: state.config.login_redirect.clone(),
            }
            .into_response()
        }
        Verdict::DenyForbidden => {
            tracing::info!(
                %path,
                user = user.as_ref().map(|u| u.username.as_str()).unwrap_or("unknown"),
                "Request denied: missing role"
            );
            Denial::Forbidden {
                required_role: decision.required_role(),
            }
            .into_response()
        }
    }
}

async fn resolve_caller(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let credentials = match Credentials::from_headers(headers) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::warn!("Rejected authorization header: {}", e);
            return None;
        }
    };

    match state.authenticator.resolve(credentials).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Authentication failed: {}", e);
            None
        }
    }
}

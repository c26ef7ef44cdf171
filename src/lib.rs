use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// The rule engine: path patterns, rule table, evaluation.
pub mod authz;

// Collaborators of the engine: identity resolution, accounts, password hashing.
pub mod auth;
pub mod directory;
pub mod password;

// HTTP front end: the authorization middleware and the demo application.
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;

pub mod config;
pub mod error;

use directory::UserDirectory;
use password::PasswordEncoder;
use routes::{admin, authenticated, public, user};

// --- Public Re-exports ---

pub use auth::{AuthenticatorState, DirectoryAuthenticator};
pub use authz::{AuthState, Requirement, Role, RuleSet, Verdict, evaluate};
pub use config::AppConfig;
pub use directory::{DirectoryState, InMemoryUserDirectory};
pub use error::{AuthError, ConfigError};
pub use password::{Argon2PasswordEncoder, PasswordEncoderState};
pub use security::StaticResources;

/// ApiDoc
///
/// OpenAPI document for the application routes, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index, handlers::main_page, handlers::login_page, handlers::login_failed,
        handlers::signup, handlers::me, handlers::user_profile, handlers::admin_dashboard
    ),
    components(
        schemas(
            models::PageMessage, models::SignupRequest, models::UserProfile,
            models::AdminDashboard, authz::Role,
        )
    ),
    tags(
        (name = "session-security", description = "Role-based request authorization")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Everything a request needs, shared by all of them. The rule table is immutable
/// after startup; the directory is the only component with interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleSet>,
    pub authenticator: AuthenticatorState,
    pub directory: DirectoryState,
    pub passwords: PasswordEncoderState,
    pub static_resources: StaticResources,
    pub config: AppConfig,
}

impl AppState {
    /// Wires a `DirectoryAuthenticator` over the given directory and encoder.
    pub fn new(
        config: AppConfig,
        rules: RuleSet,
        directory: DirectoryState,
        passwords: PasswordEncoderState,
    ) -> Self {
        let authenticator = Arc::new(DirectoryAuthenticator::new(
            directory.clone(),
            passwords.clone(),
            &config.jwt_secret,
        )) as AuthenticatorState;

        Self {
            rules: Arc::new(rules),
            authenticator,
            directory,
            passwords,
            static_resources: StaticResources::common_locations(),
            config,
        }
    }

    /// Creates the configured administrator account, if any and if absent.
    pub async fn seed_admin(&self) -> Result<(), AuthError> {
        let Some(admin) = &self.config.bootstrap_admin else {
            return Ok(());
        };

        if self.directory.find_by_username(&admin.username).await.is_some() {
            return Ok(());
        }

        let hash = self.passwords.encode(&admin.password)?;
        self.directory
            .create_user(models::User::new(&admin.username, hash, [Role::Admin]))
            .await;
        tracing::info!(user = %admin.username, "Bootstrap administrator created");
        Ok(())
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for DirectoryState {
    fn from_ref(app_state: &AppState) -> DirectoryState {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for PasswordEncoderState {
    fn from_ref(app_state: &AppState) -> PasswordEncoderState {
        app_state.passwords.clone()
    }
}

impl FromRef<AppState> for Arc<RuleSet> {
    fn from_ref(app_state: &AppState) -> Arc<RuleSet> {
        app_state.rules.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routes, puts the authorization middleware in front of all of
/// them (unmatched paths included), and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(user::user_routes())
        .nest("/admin", admin::admin_routes())
        // `layer` rather than `route_layer`: the fallback is guarded too, so an
        // unknown path is a 401 for anonymous callers, not a 404.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::authorize,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request, carrying the `x-request-id` so every log line of one
/// request (verdicts included) can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints the default rules mark as public. They stay reachable for anonymous
/// callers only while the rule table keeps them above the `/user/*` and catch-all
/// rules.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::index))
        .route("/main", get(handlers::main_page))
        // GET /auth/login, GET /auth/fail
        // Informational pages for the login flow.
        .route("/auth/login", get(handlers::login_page))
        .route("/auth/fail", get(handlers::login_failed))
        // POST /user/signup
        // Lives under /user/ but is public: its rule precedes `/user/*`.
        .route("/user/signup", post(handlers::signup))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
}

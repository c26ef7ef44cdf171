use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes no explicit rule covers. They fall to the catch-all rule, so any
/// signed-in caller may use them and anonymous callers get a challenge.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The caller's own profile, whatever their roles.
        .route("/me", get(handlers::me))
}

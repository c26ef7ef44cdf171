use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Member routes. The `/user/*` rule requires the USER role.
///
/// Merged with full paths rather than nested, since `/user/signup` (public)
/// shares the prefix.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // GET /user/profile
        .route("/user/profile", get(handlers::user_profile))
}

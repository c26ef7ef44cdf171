use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Routes mounted under `/admin`. The `/admin/*` rule requires the ADMIN role, so
/// handlers here do no role checks of their own.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        // Account totals broken down by role.
        .route("/dashboard", get(handlers::admin_dashboard))
}

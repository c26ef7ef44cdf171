use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use utoipa::OpenApi;

use crate::{
    ApiDoc,
    auth::AuthUser,
    authz::Role,
    directory::{DirectoryState, UserDirectory},
    models::{AdminDashboard, PageMessage, SignupRequest, User, UserProfile},
    password::{PasswordEncoder, PasswordEncoderState},
};

// --- Public Pages ---

/// index
///
/// [Public Route] Landing page.
#[utoipa::path(get, path = "/", responses((status = 200, body = PageMessage)))]
pub async fn index() -> Json<PageMessage> {
    Json(PageMessage::new("index", "Welcome"))
}

/// main_page
///
/// [Public Route]
#[utoipa::path(get, path = "/main", responses((status = 200, body = PageMessage)))]
pub async fn main_page() -> Json<PageMessage> {
    Json(PageMessage::new("main", "Main page"))
}

/// login_page
///
/// [Public Route] Tells the client how to authenticate. Sessions and tokens are
/// issued elsewhere; this service accepts HTTP Basic or a bearer token.
#[utoipa::path(get, path = "/auth/login", responses((status = 200, body = PageMessage)))]
pub async fn login_page() -> Json<PageMessage> {
    Json(PageMessage::new(
        "login",
        "Authenticate with HTTP Basic credentials or a bearer token",
    ))
}

/// login_failed
///
/// [Public Route]
#[utoipa::path(get, path = "/auth/fail", responses((status = 200, body = PageMessage)))]
pub async fn login_failed() -> Json<PageMessage> {
    Json(PageMessage::new("fail", "Login failed"))
}

/// openapi_json
///
/// [Public Route] Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// signup
///
/// [Public Route] Registers a new account with the `USER` role. The password is
/// hashed before it reaches the directory.
#[utoipa::path(
    post,
    path = "/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Created", body = UserProfile),
        (status = 400, description = "Blank username or password"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn signup(
    State(directory): State<DirectoryState>,
    State(passwords): State<PasswordEncoderState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserProfile>), StatusCode> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let hash = passwords.encode(&payload.password).map_err(|e| {
        tracing::error!("Failed to hash password during signup: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let created = directory
        .create_user(User::new(username, hash, [Role::User]))
        .await
        .ok_or(StatusCode::CONFLICT)?;

    tracing::info!(user = %created.username, "Account created");
    Ok((StatusCode::CREATED, Json(UserProfile::from(created))))
}

// --- Authenticated Pages ---

/// me
///
/// [Authenticated Route] The caller's own profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    user: AuthUser,
    State(directory): State<DirectoryState>,
) -> Result<Json<UserProfile>, StatusCode> {
    profile_of(user, directory).await
}

/// user_profile
///
/// [USER Route] Member page, reachable only with the `USER` role.
#[utoipa::path(
    get,
    path = "/user/profile",
    responses(
        (status = 200, body = UserProfile),
        (status = 403, description = "Missing USER role")
    )
)]
pub async fn user_profile(
    user: AuthUser,
    State(directory): State<DirectoryState>,
) -> Result<Json<UserProfile>, StatusCode> {
    profile_of(user, directory).await
}

/// admin_dashboard
///
/// [ADMIN Route] Account statistics.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, body = AdminDashboard),
        (status = 403, description = "Missing ADMIN role")
    )
)]
pub async fn admin_dashboard(State(directory): State<DirectoryState>) -> Json<AdminDashboard> {
    Json(directory.get_stats().await)
}

async fn profile_of(
    user: AuthUser,
    directory: DirectoryState,
) -> Result<Json<UserProfile>, StatusCode> {
    // The identity was resolved moments ago, but the account may have been removed since.
    directory
        .get_user(user.id)
        .await
        .map(|u| Json(UserProfile::from(u)))
        .ok_or(StatusCode::NOT_FOUND)
}

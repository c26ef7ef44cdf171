use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    authz::{AuthState, Role},
    directory::{DirectoryState, UserDirectory},
    error::AuthError,
    models::User,
    password::{PasswordEncoder, PasswordEncoderState},
};

/// Claims
///
/// The payload expected inside bearer tokens. Tokens are minted by an external
/// identity provider that shares the signing secret; this service only verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the directory id of the user.
    pub sub: Uuid,
    /// Expiration Time (exp): always validated.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// Credentials
///
/// What the caller presented in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// Parses the `Authorization` header. A missing header is `Credentials::None`;
    /// a present but unreadable one is an error.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(Credentials::None);
        };

        let value = value
            .to_str()
            .map_err(|_| AuthError::MalformedCredentials("header is not visible ASCII".into()))?;

        let (scheme, payload) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| AuthError::MalformedCredentials("missing credentials".into()))?;
        let payload = payload.trim();

        if scheme.eq_ignore_ascii_case("bearer") {
            if payload.is_empty() {
                return Err(AuthError::MalformedCredentials("empty bearer token".into()));
            }
            Ok(Credentials::Bearer(payload.to_string()))
        } else if scheme.eq_ignore_ascii_case("basic") {
            let decoded = STANDARD
                .decode(payload)
                .map_err(|e| AuthError::MalformedCredentials(e.to_string()))?;
            let decoded = String::from_utf8(decoded)
                .map_err(|_| AuthError::MalformedCredentials("basic credentials are not UTF-8".into()))?;
            let (username, password) = decoded
                .split_once(':')
                .ok_or_else(|| AuthError::MalformedCredentials("basic credentials lack `:`".into()))?;

            Ok(Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            })
        } else {
            Err(AuthError::UnsupportedScheme(scheme.to_string()))
        }
    }
}

/// AuthUser
///
/// The resolved identity of a caller. The authorization middleware places it in
/// the request extensions once a request is allowed, and handlers receive it
/// through the extractor below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl AuthUser {
    pub fn auth_state(&self) -> AuthState {
        AuthState::Authenticated(self.roles.clone())
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
        }
    }
}

impl From<Option<&AuthUser>> for AuthState {
    fn from(user: Option<&AuthUser>) -> Self {
        user.map_or(AuthState::Anonymous, AuthUser::auth_state)
    }
}

/// AuthUser Extractor Implementation
///
/// Reads the identity stored by the authorization middleware. A handler that
/// takes `AuthUser` on a path the rules leave public will reject anonymous
/// callers with 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Authenticator Trait
///
/// Turns presented credentials into an identity. `Ok(None)` means the caller
/// presented nothing and is anonymous; any credential that was presented but does
/// not check out is an error.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, credentials: Credentials) -> Result<Option<AuthUser>, AuthError>;
}

/// AuthenticatorState
///
/// The concrete type used to share the authenticator across the application state.
pub type AuthenticatorState = Arc<dyn Authenticator>;

/// DirectoryAuthenticator
///
/// Accepts bearer JWTs whose subject exists in the directory, and HTTP Basic
/// credentials checked against the stored password hash.
pub struct DirectoryAuthenticator {
    directory: DirectoryState,
    passwords: PasswordEncoderState,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl DirectoryAuthenticator {
    pub fn new(directory: DirectoryState, passwords: PasswordEncoderState, jwt_secret: &str) -> Self {
        let mut validation = Validation::default();
        // Ensure expiration time validation is always active.
        validation.validate_exp = true;

        Self {
            directory,
            passwords,
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    async fn resolve_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let user_id = token_data.claims.sub;

        // A valid token for a user that no longer exists grants nothing.
        self.directory
            .get_user(user_id)
            .await
            .map(AuthUser::from)
            .ok_or(AuthError::UnknownSubject(user_id))
    }

    async fn resolve_password(&self, username: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self
            .directory
            .find_by_username(username)
            .await
            .ok_or(AuthError::BadCredentials)?;

        if !self.passwords.matches(password, &user.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        Ok(AuthUser::from(user))
    }
}

#[async_trait]
impl Authenticator for DirectoryAuthenticator {
    async fn resolve(&self, credentials: Credentials) -> Result<Option<AuthUser>, AuthError> {
        match credentials {
            Credentials::None => Ok(None),
            Credentials::Bearer(token) => self.resolve_token(&token).await.map(Some),
            Credentials::Basic { username, password } => {
                self.resolve_password(&username, &password).await.map(Some)
            }
        }
    }
}

use axum::http::{HeaderMap, HeaderValue, header};
use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{EncodingKey, Header, encode};
use session_security::{
    AuthError, AuthState, DirectoryAuthenticator, Role,
    auth::{AuthUser, Authenticator, Claims, Credentials},
    directory::{DirectoryState, InMemoryUserDirectory, UserDirectory},
    models::User,
    password::{Argon2PasswordEncoder, PasswordEncoder, PasswordEncoderState},
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn create_token(user_id: Uuid, issued_at: u64, expires_at: u64, secret: &str) -> String {
    let claims = Claims {
        sub: user_id,
        iat: issued_at as usize,
        exp: expires_at as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// A directory holding one USER account `alice` / `wonderland`.
async fn setup() -> (DirectoryAuthenticator, User) {
    let directory = Arc::new(InMemoryUserDirectory::new()) as DirectoryState;
    let passwords = Arc::new(Argon2PasswordEncoder::new()) as PasswordEncoderState;

    let hash = passwords.encode("wonderland").unwrap();
    let alice = directory
        .create_user(User::new("alice", hash, [Role::User]))
        .await
        .unwrap();

    (
        DirectoryAuthenticator::new(directory, passwords, TEST_JWT_SECRET),
        alice,
    )
}

// --- Credential Parsing ---

#[test]
fn test_missing_header_is_no_credentials() {
    assert_eq!(
        Credentials::from_headers(&HeaderMap::new()).unwrap(),
        Credentials::None
    );
}

#[test]
fn test_parse_bearer_and_basic() {
    assert_eq!(
        Credentials::from_headers(&headers_with("Bearer abc.def.ghi")).unwrap(),
        Credentials::Bearer("abc.def.ghi".to_string())
    );
    assert_eq!(
        Credentials::from_headers(&headers_with(&basic("bob", "pa:ss"))).unwrap(),
        Credentials::Basic {
            username: "bob".to_string(),
            password: "pa:ss".to_string(),
        }
    );
    // Scheme names are case-insensitive.
    assert!(matches!(
        Credentials::from_headers(&headers_with("bearer token")).unwrap(),
        Credentials::Bearer(_)
    ));
}

#[test]
fn test_malformed_headers_are_errors() {
    assert!(matches!(
        Credentials::from_headers(&headers_with("Bearer")),
        Err(AuthError::MalformedCredentials(_))
    ));
    assert!(matches!(
        Credentials::from_headers(&headers_with("Basic !!!not-base64")),
        Err(AuthError::MalformedCredentials(_))
    ));
    let no_colon = format!("Basic {}", STANDARD.encode("nocolon"));
    assert!(matches!(
        Credentials::from_headers(&headers_with(&no_colon)),
        Err(AuthError::MalformedCredentials(_))
    ));
    assert!(matches!(
        Credentials::from_headers(&headers_with("Digest username=x")),
        Err(AuthError::UnsupportedScheme(_))
    ));
}

// --- Authenticator ---

#[tokio::test]
async fn test_no_credentials_is_anonymous() {
    let (authenticator, _) = setup().await;

    let resolved = authenticator.resolve(Credentials::None).await.unwrap();

    assert!(resolved.is_none());
    assert_eq!(AuthState::from(resolved.as_ref()), AuthState::Anonymous);
}

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let (authenticator, alice) = setup().await;
    let token = create_token(alice.id, now(), now() + 3600, TEST_JWT_SECRET);

    let user = authenticator
        .resolve(Credentials::Bearer(token))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, alice.id);
    assert_eq!(user.username, "alice");
    assert_eq!(user.auth_state(), AuthState::authenticated([Role::User]));
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let (authenticator, alice) = setup().await;
    // Well past the default 60s leeway.
    let token = create_token(alice.id, now() - 7200, now() - 3600, TEST_JWT_SECRET);

    let result = authenticator.resolve(Credentials::Bearer(token)).await;

    assert!(matches!(result, Err(AuthError::ExpiredToken)));
}

#[tokio::test]
async fn test_auth_failure_with_wrong_secret() {
    let (authenticator, alice) = setup().await;
    let token = create_token(alice.id, now(), now() + 3600, "some-other-secret");

    let result = authenticator.resolve(Credentials::Bearer(token)).await;

    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_auth_failure_with_unknown_subject() {
    let (authenticator, _) = setup().await;
    let ghost = Uuid::new_v4();
    let token = create_token(ghost, now(), now() + 3600, TEST_JWT_SECRET);

    let result = authenticator.resolve(Credentials::Bearer(token)).await;

    assert!(matches!(result, Err(AuthError::UnknownSubject(id)) if id == ghost));
}

#[tokio::test]
async fn test_basic_auth_success() {
    let (authenticator, alice) = setup().await;

    let user = authenticator
        .resolve(Credentials::Basic {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        user,
        AuthUser {
            id: alice.id,
            username: "alice".to_string(),
            roles: [Role::User].into_iter().collect(),
        }
    );
}

#[tokio::test]
async fn test_basic_auth_failures() {
    let (authenticator, _) = setup().await;

    let wrong_password = authenticator
        .resolve(Credentials::Basic {
            username: "alice".to_string(),
            password: "looking-glass".to_string(),
        })
        .await;
    let unknown_user = authenticator
        .resolve(Credentials::Basic {
            username: "mallory".to_string(),
            password: "wonderland".to_string(),
        })
        .await;

    assert!(matches!(wrong_password, Err(AuthError::BadCredentials)));
    assert!(matches!(unknown_user, Err(AuthError::BadCredentials)));
}

// --- Directory ---

#[tokio::test]
async fn test_directory_rejects_duplicate_username() {
    let directory = InMemoryUserDirectory::new();

    assert!(directory.create_user(User::new("carol", "h", [Role::User])).await.is_some());
    assert!(directory.create_user(User::new("carol", "h2", [Role::Admin])).await.is_none());

    let stats = directory.get_stats().await;
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.members, 1);
    assert_eq!(stats.admins, 0);
}

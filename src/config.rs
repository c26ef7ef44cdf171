use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::ConfigError;

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const LOCAL_ADMIN_PASSWORD: &str = "local-admin-password";

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and shared with
/// handlers and middleware through `FromRef`.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which secrets are mandatory.
    pub env: Env,
    // Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    // Shared secret used to validate bearer tokens from the identity provider.
    pub jwt_secret: String,
    // Optional JSON rule table replacing the built-in access rules.
    pub rules_file: Option<PathBuf>,
    // When set, unauthenticated callers are redirected here instead of getting a 401.
    pub login_redirect: Option<String>,
    // Account created at startup so the admin routes are reachable.
    pub bootstrap_admin: Option<AdminAccount>,
}

/// Env
///
/// The runtime context: `Local` relaxes secret requirements and pretty-prints logs,
/// `Production` demands explicit secrets and logs JSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// AdminAccount
///
/// Credentials for the administrator seeded into the user directory at startup.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl Default for AppConfig {
    /// Safe values for test setup, no environment access.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            rules_file: None,
            login_redirect: None,
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in production, or if `BIND_ADDR` does not
    /// parse. The caller is expected to abort startup on error.
    pub fn load() -> Result<Self, ConfigError> {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "BIND_ADDR",
                value,
            })?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        // Production only seeds an admin when a password is given explicitly.
        let bootstrap_admin = match (env::var("ADMIN_PASSWORD"), &env) {
            (Ok(password), _) => Some(password),
            (Err(_), Env::Local) => Some(LOCAL_ADMIN_PASSWORD.to_string()),
            (Err(_), Env::Production) => None,
        }
        .map(|password| AdminAccount {
            username: admin_username,
            password,
        });

        Ok(Self {
            env,
            bind_addr,
            jwt_secret,
            rules_file: env::var("ACCESS_RULES_FILE").ok().map(PathBuf::from),
            login_redirect: env::var("LOGIN_REDIRECT").ok().filter(|s| !s.is_empty()),
            bootstrap_admin,
        })
    }
}

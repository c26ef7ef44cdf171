use session_security::{
    AppState, Argon2PasswordEncoder, InMemoryUserDirectory,
    config::{AppConfig, Env},
    create_router,
    directory::DirectoryState,
    password::PasswordEncoderState,
    security,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the rule table (fail-fast on any
/// invalid rule), seeds the admin account and serves HTTP.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise verdict-level detail for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "session_security=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Access Rules
    // An invalid rule aborts startup; there is no partially applied rule table.
    let rules = match security::load_rules(&config) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!("FATAL: invalid access rules: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Collaborators
    let directory = Arc::new(InMemoryUserDirectory::new()) as DirectoryState;
    let passwords = Arc::new(Argon2PasswordEncoder::new()) as PasswordEncoderState;

    let app_state = AppState::new(config, rules, directory, passwords);

    if let Err(e) = app_state.seed_admin().await {
        tracing::error!("FATAL: could not create bootstrap administrator: {}", e);
        std::process::exit(1);
    }

    // 6. Router and Server Startup
    let bind_addr = app_state.config.bind_addr;
    let app = create_router(app_state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}

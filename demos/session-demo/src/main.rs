use std::sync::Arc;

use authora::{
    AuthConfig, DatabaseUser, JwtConfig, ManualClock, SessionManager, spawn_cleanup_scheduler,
};
use authora_memory::MemoryAdapter;
use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct LoginInfo {
    ip_address: String,
}

#[derive(Clone)]
struct Account {
    username: String,
}

#[derive(Serialize)]
struct TokenPayload<'a> {
    user_id: u64,
    username: &'a str,
}

type Store = MemoryAdapter<u64, LoginInfo, Account>;

// ---------------------------------------------------------------------------
// Request handling
// ---------------------------------------------------------------------------

/// What a host server would do with an incoming `Cookie` header.
async fn authenticate(
    auth: &SessionManager<Arc<Store>, String, String>,
    cookie_header: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(session_id) = auth.read_session_cookie(cookie_header) else {
        return Ok(None);
    };
    let Some((session, user)) = auth.validate_session(&session_id).await? else {
        warn!("stale session cookie, clearing it");
        info!(set_cookie = %auth.create_blank_session_cookie(), "response");
        return Ok(None);
    };
    if session.fresh {
        info!(set_cookie = %auth.create_session_cookie(&session.id), "session renewed");
    }
    Ok(Some(format!("{} from {}", user.attributes, session.attributes)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store: Arc<Store> = Arc::new(MemoryAdapter::with_clock(clock.clone()));
    store
        .insert_user(DatabaseUser {
            id: 1,
            attributes: Account {
                username: "alice".into(),
            },
        })
        .await;

    let config = AuthConfig {
        session_expires_in: Duration::hours(1),
        jwt: JwtConfig::with_secret("demo-secret"),
        ..AuthConfig::default()
    };
    let auth = SessionManager::new(store.clone(), config)
        .with_clock(clock.clone())
        .with_session_attributes(|db: &LoginInfo| db.ip_address.clone())
        .with_user_attributes(|db: &Account| db.username.clone());

    // Login.
    let session = auth
        .create_session(
            1,
            LoginInfo {
                ip_address: "203.0.113.7".into(),
            },
            None,
        )
        .await?;
    let set_cookie = auth.create_session_cookie(&session.id);
    info!(%set_cookie, "logged in");
    let cookie_header = format!("{}={}", set_cookie.name, set_cookie.value);

    // A request shortly after login passes straight through.
    clock.advance(Duration::minutes(10));
    info!(who = ?authenticate(&auth, &cookie_header).await?, "request at +10m");

    // Past the half-life the session is renewed.
    clock.advance(Duration::minutes(25));
    info!(who = ?authenticate(&auth, &cookie_header).await?, "request at +35m");

    // Bearer tokens for API clients.
    let created = auth.create_token(
        &TokenPayload {
            user_id: 1,
            username: "alice",
        },
        None,
    );
    let token = created.into_result()?;
    let authorization = format!("Bearer {token}");
    if let Some(bearer) = auth.read_bearer_token(&authorization) {
        let claims = auth.verify_token(bearer, None).into_result()?;
        info!(claims = %json!(claims), "bearer token verified");
    }

    // Background sweeping, then logout.
    let auth = Arc::new(auth);
    let sweeper = spawn_cleanup_scheduler(auth.clone(), std::time::Duration::from_secs(60));

    auth.invalidate_session(&session.id).await?;
    info!(set_cookie = %auth.create_blank_session_cookie(), "logged out");
    info!(who = ?authenticate(&auth, &cookie_header).await?, "request after logout");

    sweeper.abort();
    info!(remaining = store.session_count().await, "done");
    Ok(())
}

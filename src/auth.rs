//! Spotify authorization and token persistence

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::{extract::Query, http::StatusCode, response::Html, routing::get, Extension, Router};
use chrono::{DateTime, Utc};
use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, OAuth, Token};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

use crate::config::Credentials;

pub const REDIRECT_URI: &str = "http://localhost:8888/callback";
const CALLBACK_ADDR: &str = "127.0.0.1:8888";
const TOKEN_FILE: &str = ".spotify_token.json";
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);
const SERVER_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const FAILURE_RESPONSE: &str = "<h4>Authorization failed: missing code or state mismatch.</h4>";

const SUCCESS_RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authorization Successful!</h1><p>You can close this window and return to the terminal.</p><script>window.close();</script></body>
</html>
"#;

/// Token as stored on disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expiry: DateTime<Utc>,
}

impl TokenRecord {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expired a minute early so a request never goes out with a dying token.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now + chrono::Duration::seconds(60)
    }

    pub fn from_token(token: &Token) -> Self {
        Self {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_type: "Bearer".to_string(),
            expiry: token.expires_at.unwrap_or_else(|| Utc::now() + token.expires_in),
        }
    }

    pub fn into_token(self) -> Token {
        let expires_in = (self.expiry - Utc::now()).max(chrono::Duration::zero());
        Token {
            access_token: self.access_token,
            expires_in,
            expires_at: Some(self.expiry),
            refresh_token: self.refresh_token,
            scopes: playback_scopes(),
        }
    }
}

fn playback_scopes() -> HashSet<String> {
    scopes!("user-read-playback-state", "user-modify-playback-state")
}

pub fn token_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(TOKEN_FILE))
}

/// `Ok(None)` when no token file exists yet.
pub fn load_token(path: &Path) -> Result<Option<TokenRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let record = serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(record))
}

/// Writes the token readable by the owner only.
pub fn save_token(path: &Path, record: &TokenRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    tracing::debug!(path = %path.display(), "Saved token");
    Ok(())
}

fn build_client(credentials: &Credentials) -> AuthCodeSpotify {
    let creds = rspotify::Credentials::new(&credentials.client_id, &credentials.client_secret);
    let oauth = OAuth {
        redirect_uri: REDIRECT_URI.to_string(),
        scopes: playback_scopes(),
        ..Default::default()
    };
    let config = Config {
        token_cached: false,
        token_refreshing: true,
        ..Default::default()
    };
    AuthCodeSpotify::with_config(creds, oauth, config)
}

async fn set_token(spotify: &AuthCodeSpotify, token: Token) -> Result<()> {
    *spotify
        .token
        .lock()
        .await
        .map_err(|_| anyhow!("Spotify token lock poisoned"))? = Some(token);
    Ok(())
}

async fn current_token(spotify: &AuthCodeSpotify) -> Result<Option<Token>> {
    let guard = spotify
        .token
        .lock()
        .await
        .map_err(|_| anyhow!("Spotify token lock poisoned"))?;
    Ok(guard.clone())
}

async fn persist_current_token(spotify: &AuthCodeSpotify, path: &Path) {
    match current_token(spotify).await {
        Ok(Some(token)) => {
            if let Err(e) = save_token(path, &TokenRecord::from_token(&token)) {
                tracing::warn!(error = %e, "Failed to save token");
                println!("Warning: Failed to save token: {}", e);
            }
        }
        Ok(None) => tracing::warn!("No token to save"),
        Err(e) => tracing::warn!(error = %e, "Could not read token"),
    }
}

/// Returns a client with a usable token: stored, refreshed or freshly authorized.
pub async fn authenticate(credentials: &Credentials) -> Result<AuthCodeSpotify> {
    let spotify = build_client(credentials);
    let path = token_path()?;

    let stored = match load_token(&path) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable token file");
            None
        }
    };

    match stored {
        Some(record) if !record.is_expired() => {
            tracing::info!("Using stored token");
            set_token(&spotify, record.into_token()).await?;
            return Ok(spotify);
        }
        Some(record) if record.refresh_token.is_some() => {
            tracing::info!("Stored token expired, refreshing");
            set_token(&spotify, record.into_token()).await?;
            match spotify.refresh_token().await {
                Ok(()) => {
                    persist_current_token(&spotify, &path).await;
                    return Ok(spotify);
                }
                Err(e) => tracing::warn!(error = %e, "Token refresh failed, re-authorizing"),
            }
        }
        Some(_) => tracing::info!("Stored token expired without a refresh token"),
        None => tracing::info!("No stored token found"),
    }

    browser_login(&spotify).await?;
    persist_current_token(&spotify, &path).await;
    println!("Token successfully saved to {}", path.display());
    Ok(spotify)
}

async fn browser_login(spotify: &AuthCodeSpotify) -> Result<()> {
    tracing::info!("Starting browser-based OAuth flow");
    println!("You need to authorize this application to control Spotify.");
    println!("This is a one-time process. After authorization, you won't need to do this again.");

    let listener = TcpListener::bind(CALLBACK_ADDR)
        .await
        .with_context(|| format!("listening for the login callback on {}", CALLBACK_ADDR))?;

    let (code_tx, code_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = callback_router(CallbackState::new(&spotify.oauth.state, code_tx));
    let server = tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
            tracing::error!(error = %e, "Login callback server failed");
        }
    });

    let url = spotify.get_authorize_url(false)?;
    println!("Opening the authorization page in your default browser...");
    if let Err(e) = webbrowser::open(&url) {
        tracing::warn!(error = %e, "Could not open browser");
        println!("Could not open browser automatically. Please visit this URL manually: {}", url);
    } else {
        println!("Browser opened. Please complete the authorization in your browser.");
        println!("Waiting for callback from Spotify...");
    }

    let received = tokio::time::timeout(LOGIN_TIMEOUT, code_rx).await;
    let _ = shutdown_tx.send(());
    if tokio::time::timeout(SERVER_SHUTDOWN_GRACE, server).await.is_err() {
        tracing::warn!("Login callback server did not shut down in time");
    }

    let code = match received {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => return Err(anyhow!("Login callback server stopped before authorization finished")),
        Err(_) => return Err(anyhow!("Timed out waiting for Spotify authorization")),
    };

    spotify.request_token(&code).await.context("exchanging authorization code")?;
    tracing::info!("Browser authentication completed successfully");
    println!("Authorization successful!");
    Ok(())
}

/// Shared by the callback handler: the expected OAuth state and where to send the code.
struct CallbackState {
    expected_state: String,
    code_tx: Mutex<Option<oneshot::Sender<String>>>,
}

impl CallbackState {
    fn new(expected_state: &str, code_tx: oneshot::Sender<String>) -> Arc<Self> {
        Arc::new(Self {
            expected_state: expected_state.to_string(),
            code_tx: Mutex::new(Some(code_tx)),
        })
    }
}

fn callback_router(state: Arc<CallbackState>) -> Router {
    Router::new().route("/callback", get(callback).layer(Extension(state)))
}

async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> (StatusCode, Html<&'static str>) {
    let Some(code) = code_from_params(&params, &state.expected_state) else {
        tracing::warn!(error = ?params.get("error"), "Ignoring callback without a valid code");
        return (StatusCode::BAD_REQUEST, Html(FAILURE_RESPONSE));
    };

    match state.code_tx.lock().await.take() {
        Some(tx) => {
            let _ = tx.send(code);
        }
        None => tracing::debug!("Authorization code already received"),
    }
    (StatusCode::OK, Html(SUCCESS_RESPONSE))
}

/// The `code` parameter, provided `state` matches the one sent with the authorize URL.
fn code_from_params(params: &HashMap<String, String>, expected_state: &str) -> Option<String> {
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return None;
    }
    params.get("code").filter(|c| !c.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expiry: DateTime<Utc>) -> TokenRecord {
        TokenRecord {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            token_type: "Bearer".into(),
            expiry,
        }
    }

    #[test]
    fn token_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(TOKEN_FILE);
        assert_eq!(load_token(&path).expect("missing file is fine"), None);

        let saved = record(Utc::now() + chrono::Duration::hours(1));
        save_token(&path, &saved).expect("save");
        assert_eq!(load_token(&path).expect("load"), Some(saved));
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(TOKEN_FILE);
        save_token(&path, &record(Utc::now())).expect("save");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(TOKEN_FILE);
        fs::write(&path, "{not json").expect("write");
        assert!(load_token(&path).is_err());
    }

    #[test]
    fn expiry_has_a_safety_margin() {
        let now = Utc::now();
        assert!(record(now + chrono::Duration::seconds(30)).is_expired_at(now));
        assert!(!record(now + chrono::Duration::minutes(10)).is_expired_at(now));
    }

    #[test]
    fn record_converts_to_rspotify_token() {
        let expiry = Utc::now() + chrono::Duration::minutes(30);
        let token = record(expiry).into_token();
        assert_eq!(token.expires_at, Some(expiry));
        assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
        assert!(token.scopes.contains("user-modify-playback-state"));

        let back = TokenRecord::from_token(&token);
        assert_eq!(back.expiry, expiry);
        assert_eq!(back.token_type, "Bearer");
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn callback_code_requires_matching_state() {
        assert_eq!(
            code_from_params(&params(&[("code", "abc"), ("state", "xyz")]), "xyz"),
            Some("abc".to_string())
        );
        assert_eq!(code_from_params(&params(&[("code", "abc"), ("state", "other")]), "xyz"), None);
        assert_eq!(code_from_params(&params(&[("code", "abc")]), "xyz"), None);
        assert_eq!(code_from_params(&params(&[("error", "access_denied"), ("state", "xyz")]), "xyz"), None);
    }

    async fn get_callback(router: Router, uri: &str) -> StatusCode {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
        router.oneshot(request).await.expect("infallible").status()
    }

    #[tokio::test]
    async fn callback_route_delivers_the_code_once() {
        let (tx, mut rx) = oneshot::channel();
        let state = CallbackState::new("xyz", tx);

        let status = get_callback(callback_router(state.clone()), "/callback?state=bad&code=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_err(), "a rejected callback sends nothing");

        let status = get_callback(callback_router(state.clone()), "/callback?code=abc&state=xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.await.expect("code sent"), "abc");

        // A repeated callback still gets a page, the code was already taken
        let status = get_callback(callback_router(state), "/callback?code=def&state=xyz").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let (tx, _rx) = oneshot::channel();
        let status = get_callback(callback_router(CallbackState::new("xyz", tx)), "/favicon.ico").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

//! Loopback redirect listener for interactive sign-in.
//!
//! Serves the redirect target of the loopback client identity until one
//! authorization callback has been processed, then shuts down.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use url::Url;

use crate::config::{BootstrapConfig, ConfigV1};
use crate::oauth::CallbackQuery;
use crate::state::AppState;

#[derive(Clone)]
struct CallbackContext {
    app: AppState,
    done: mpsc::Sender<Result<(), String>>,
}

/// Derive the listener bind address from the loopback origin.
fn callback_bind_address(config: &ConfigV1) -> Result<String, String> {
    let origin = match &config.bootstrap {
        BootstrapConfig::Loopback(cfg) => &cfg.origin,
        BootstrapConfig::Metadata(_) => {
            return Err(
                "the interactive sign-in listener requires the loopback bootstrap".to_string(),
            )
        }
    };
    let url = Url::parse(origin).map_err(|e| format!("loopback origin is not a URL: {e}"))?;
    let host = url
        .host_str()
        .ok_or_else(|| "loopback origin has no host".to_string())?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| "loopback origin has no port".to_string())?;
    Ok(format!("{host}:{port}"))
}

/// Serve the redirect target until one callback arrives, complete the
/// sign-in through the session manager, and report the outcome.
pub async fn wait_for_callback(app: AppState) -> Result<(), String> {
    let bind = callback_bind_address(&app.config)?;
    let (done, mut outcome) = mpsc::channel(1);
    let router = Router::new()
        .route("/", get(handle_callback))
        .route("/callback", get(handle_callback))
        .with_state(CallbackContext { app, done });

    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("could not bind callback listener on {bind}: {e}"))?;
    info!("Waiting for the authorization redirect on http://{}", bind);

    let server = tokio::spawn(async move { axum::serve(listener, router).await });
    let result = outcome
        .recv()
        .await
        .unwrap_or_else(|| Err("callback listener stopped unexpectedly".to_string()));
    server.abort();
    result
}

async fn handle_callback(
    State(ctx): State<CallbackContext>,
    Query(query): Query<CallbackQuery>,
) -> &'static str {
    let result = ctx.app.sessions.complete_sign_in(query).await.map(|_| ());
    let body = match &result {
        Ok(()) => "Signed in. You can close this tab.",
        Err(_) => "Sign-in failed. Check the application logs.",
    };
    let _ = ctx.done.send(result).await;
    body
}

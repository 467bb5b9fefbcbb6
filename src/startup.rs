//! Application bootstrap.
//!
//! Builds the client loader, the public agent and the session manager from
//! configuration, runs the initial client-load/resume cycle, and returns the
//! state handle the embedding application threads through its UI layer.

use std::sync::Arc;

use tracing::{info, warn};

use crate::agents::PublicAgent;
use crate::bootstrap::create_client_loader;
use crate::config::ConfigV1;
use crate::session::SessionManager;
use crate::state::AppState;

/// Construct the session layer and attempt the initial sign-in resumption.
///
/// A failed client load is logged and leaves the manager not-ready (sign-in
/// URL generation reports absent); the application still starts, signed out.
pub async fn run(config: Arc<ConfigV1>) -> AppState {
    let loader = create_client_loader(&config);
    let public_agent = Arc::new(PublicAgent::new(&config.public_api));
    let sessions = Arc::new(SessionManager::new(loader, public_agent));

    if let Err(e) = sessions.initialize().await {
        warn!("OAuth client initialization failed: {}", e);
    } else if sessions.is_signed_in().await {
        info!("Session resumed; starting signed in");
    } else {
        info!("No prior session; starting signed out");
    }

    AppState { config, sessions }
}

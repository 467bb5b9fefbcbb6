//! Session lifecycle management.
//!
//! Owns the OAuth client handle, the current session and the agent derived
//! from it. Everything else in the application sees read-only projections
//! and the two mutating operations: sign-in URL generation and sign-out.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::agents::{AuthenticatedAgent, PublicAgent};
use crate::bootstrap::ClientLoader;
use crate::oauth::{CallbackQuery, OAuthHandle, OAuthSessionHandle};

/// Canonical session state. The agent is derived from the session and the
/// two are always set or cleared together.
#[derive(Default)]
struct SessionState {
    client: Option<Arc<dyn OAuthHandle>>,
    session: Option<Arc<dyn OAuthSessionHandle>>,
    agent: Option<Arc<AuthenticatedAgent>>,
}

/// Mediates all OAuth/session state for the application.
///
/// There is at most one OAuth client handle alive at a time; sign-out
/// discards it and loads a fresh one through the configured loader, so a
/// subsequent sign-in starts from reloaded client configuration.
pub struct SessionManager {
    loader: Box<dyn ClientLoader>,
    public_agent: Arc<PublicAgent>,
    inner: RwLock<SessionState>,
    // Serializes initialize/sign-out cycles; overlapping calls would
    // otherwise interleave their client reloads.
    lifecycle: Mutex<()>,
    signed_in_tx: watch::Sender<bool>,
}

impl SessionManager {
    pub fn new(loader: Box<dyn ClientLoader>, public_agent: Arc<PublicAgent>) -> Self {
        let (signed_in_tx, _) = watch::channel(false);
        Self {
            loader,
            public_agent,
            inner: RwLock::new(SessionState::default()),
            lifecycle: Mutex::new(()),
            signed_in_tx,
        }
    }

    /// Load the OAuth client and resume any previously established session.
    ///
    /// A loader failure propagates and leaves the client absent: sign-in is
    /// then reported as not-ready until the application restarts. There is
    /// no automatic retry.
    pub async fn initialize(&self) -> Result<(), String> {
        let _guard = self.lifecycle.lock().await;
        self.initialize_locked().await
    }

    async fn initialize_locked(&self) -> Result<(), String> {
        {
            let mut state = self.inner.write().await;
            state.client = None;
            state.session = None;
            state.agent = None;
        }
        self.notify().await;

        info!(
            "Loading OAuth client via {} ({} mode)",
            self.loader.get_name(),
            self.loader.get_mode()
        );
        let client = self.loader.load().await?;
        {
            let mut state = self.inner.write().await;
            state.client = Some(client.clone());
        }

        match client.resume().await? {
            Some(session) => {
                info!("Resumed session for {}", session.did().as_str());
                self.install_session(session).await;
            }
            None => {
                debug!("No session to resume; starting signed out");
            }
        }
        Ok(())
    }

    /// Build the authorization URL for the given account handle.
    ///
    /// Returns `Ok(None)` while no client is loaded — the caller must treat
    /// that as "not ready", not as "sign-in unavailable". Handle format is
    /// not validated here.
    pub async fn generate_sign_in_url(&self, handle: &str) -> Result<Option<Url>, String> {
        let client = self.inner.read().await.client.clone();
        let Some(client) = client else {
            debug!("Sign-in URL requested before the OAuth client was loaded");
            return Ok(None);
        };
        let url = client.authorize(handle).await?;
        Ok(Some(url))
    }

    /// Finish the redirect leg of an interactive sign-in and install the
    /// resulting session.
    pub async fn complete_sign_in(
        &self,
        query: CallbackQuery,
    ) -> Result<Arc<AuthenticatedAgent>, String> {
        let _guard = self.lifecycle.lock().await;
        let client = self
            .inner
            .read()
            .await
            .client
            .clone()
            .ok_or_else(|| "OAuth client is not loaded".to_string())?;
        let session = client.complete(query).await?;
        info!("Signed in as {}", session.did().as_str());
        Ok(self.install_session(session).await)
    }

    /// Invalidate the current session and reload the OAuth client.
    ///
    /// A no-op when no client or no session is present. Local state is
    /// cleared and the client reloaded even when remote revocation fails;
    /// the revocation error is reported once local state has settled.
    pub async fn sign_out(&self) -> Result<(), String> {
        let _guard = self.lifecycle.lock().await;
        let session = {
            let state = self.inner.read().await;
            match (&state.client, &state.session) {
                (Some(_), Some(session)) => session.clone(),
                _ => {
                    debug!("Sign-out requested with no active session; nothing to do");
                    return Ok(());
                }
            }
        };

        let revocation = session.sign_out().await;
        if let Err(e) = &revocation {
            warn!("Remote session revocation failed: {}", e);
        }
        let reinit = self.initialize_locked().await;
        revocation.and(reinit)
    }

    /// The agent for the signed-in session, when one exists.
    pub async fn agent(&self) -> Option<Arc<AuthenticatedAgent>> {
        self.inner.read().await.agent.clone()
    }

    /// The public, unauthenticated agent singleton.
    pub fn public_agent(&self) -> Arc<PublicAgent> {
        self.public_agent.clone()
    }

    /// Derived projection: true iff a session is present.
    pub async fn is_signed_in(&self) -> bool {
        self.inner.read().await.session.is_some()
    }

    /// Observe signed-in transitions. The receiver carries the current
    /// value immediately and updates on every state change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signed_in_tx.subscribe()
    }

    async fn install_session(
        &self,
        session: Arc<dyn OAuthSessionHandle>,
    ) -> Arc<AuthenticatedAgent> {
        let agent = Arc::new(AuthenticatedAgent::new(session.clone()));
        {
            let mut state = self.inner.write().await;
            state.session = Some(session);
            state.agent = Some(agent.clone());
        }
        self.notify().await;
        agent
    }

    async fn notify(&self) {
        let signed_in = self.inner.read().await.session.is_some();
        self.signed_in_tx.send_if_modified(|current| {
            if *current != signed_in {
                *current = signed_in;
                true
            } else {
                false
            }
        });
    }
}

use std::sync::Arc;

use atrium_api::types::string::Did;

use crate::oauth::OAuthSessionHandle;

/// API agent bound to the signed-in session.
///
/// Derived deterministically from the current session: one exists if and
/// only if a session exists, and it is rebuilt whenever the session changes.
pub struct AuthenticatedAgent {
    session: Arc<dyn OAuthSessionHandle>,
}

impl AuthenticatedAgent {
    pub fn new(session: Arc<dyn OAuthSessionHandle>) -> Self {
        Self { session }
    }

    /// Identity of the account this agent acts as.
    pub fn did(&self) -> &Did {
        self.session.did()
    }

    /// The session this agent wraps.
    pub fn session(&self) -> &Arc<dyn OAuthSessionHandle> {
        &self.session
    }
}

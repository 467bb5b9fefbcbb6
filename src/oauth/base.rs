use std::sync::Arc;

use async_trait::async_trait;
use atrium_api::types::string::Did;
use serde::{Deserialize, Serialize};
use url::Url;

/// Redirect parameters the authorization server appends when it sends the
/// user back to the application after an interactive sign-in.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CallbackQuery {
    pub code: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
}

/// A loaded OAuth client. At most one handle is alive at a time; the session
/// manager replaces it wholesale after every sign-out cycle.
///
/// The authorization-code/PKCE exchange itself lives behind this seam, so
/// the session manager can be exercised with fakes in tests.
#[async_trait]
pub trait OAuthHandle: Send + Sync {
    /// Restore a previously established session, if the client has one.
    /// `Ok(None)` means a clean signed-out start, not a failure.
    async fn resume(&self) -> Result<Option<Arc<dyn OAuthSessionHandle>>, String>;

    /// Finish the redirect leg of an interactive sign-in.
    async fn complete(&self, query: CallbackQuery) -> Result<Arc<dyn OAuthSessionHandle>, String>;

    /// Build the authorization URL for the given account handle. The handle
    /// format is not validated here; resolution happens downstream.
    async fn authorize(&self, handle: &str) -> Result<Url, String>;
}

/// An established session: the credential material stays opaque, we only
/// need its identity and the ability to invalidate it remotely.
#[async_trait]
pub trait OAuthSessionHandle: Send + Sync {
    fn did(&self) -> &Did;

    /// Revoke the session at the identity provider.
    async fn sign_out(&self) -> Result<(), String>;
}

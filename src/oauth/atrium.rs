use std::sync::Arc;

use async_trait::async_trait;
use atrium_api::agent::SessionManager as _;
use atrium_api::types::string::Did;
use atrium_identity::did::{CommonDidResolver, CommonDidResolverConfig};
use atrium_identity::handle::{AtprotoHandleResolver, AtprotoHandleResolverConfig, DnsTxtResolver};
use atrium_oauth::store::session::MemorySessionStore;
use atrium_oauth::store::state::MemoryStateStore;
use atrium_oauth::{
    AtprotoClientMetadata, AtprotoLocalhostClientMetadata, AuthorizeOptions, CallbackParams,
    DefaultHttpClient, KnownScope, OAuthClient, OAuthClientConfig, OAuthResolverConfig, Scope,
};
use hickory_resolver::TokioAsyncResolver;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::base::{CallbackQuery, OAuthHandle, OAuthSessionHandle};

/// DNS TXT lookups for handle resolution (`_atproto.<handle>` records).
pub struct HickoryDnsTxtResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsTxtResolver {
    pub fn new() -> Result<Self, String> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| format!("failed to create DNS resolver: {e}"))?;
        Ok(Self { resolver })
    }
}

impl DnsTxtResolver for HickoryDnsTxtResolver {
    async fn resolve(
        &self,
        query: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(self
            .resolver
            .txt_lookup(query)
            .await?
            .iter()
            .map(|txt| txt.to_string())
            .collect())
    }
}

type DidResolver = CommonDidResolver<DefaultHttpClient>;
type HandleResolver = AtprotoHandleResolver<HickoryDnsTxtResolver, DefaultHttpClient>;

/// The fully-typed atrium OAuth client this crate instantiates. State and
/// session stores are in-memory; nothing outlives the process.
pub type AtprotoClient =
    OAuthClient<MemoryStateStore, MemorySessionStore, DidResolver, HandleResolver>;

/// Production [`OAuthHandle`] backed by `atrium-oauth`.
///
/// Remembers the DID of the session most recently established through this
/// client so `resume` can restore it from the client's session store.
pub struct AtriumOAuthHandle {
    client: Arc<AtprotoClient>,
    scopes: Vec<Scope>,
    current: RwLock<Option<Did>>,
}

macro_rules! build_oauth_client {
    ($metadata:expr, $directory:expr) => {{
        let http_client = Arc::new(DefaultHttpClient::default());
        let config = OAuthClientConfig {
            client_metadata: $metadata,
            keys: None,
            resolver: OAuthResolverConfig {
                did_resolver: CommonDidResolver::new(CommonDidResolverConfig {
                    plc_directory_url: $directory.to_string(),
                    http_client: http_client.clone(),
                }),
                handle_resolver: AtprotoHandleResolver::new(AtprotoHandleResolverConfig {
                    dns_txt_resolver: HickoryDnsTxtResolver::new()?,
                    http_client: http_client.clone(),
                }),
                authorization_server_metadata: Default::default(),
                protected_resource_metadata: Default::default(),
            },
            state_store: MemoryStateStore::default(),
            session_store: MemorySessionStore::default(),
        };
        OAuthClient::new(config).map_err(|e| format!("failed to build OAuth client: {e}"))
    }};
}

impl AtriumOAuthHandle {
    /// Build a client around the synthesized loopback identity.
    pub fn from_loopback(
        metadata: AtprotoLocalhostClientMetadata,
        directory: &str,
        scopes: Vec<Scope>,
    ) -> Result<Self, String> {
        let client = build_oauth_client!(metadata, directory)?;
        Ok(Self::wrap(client, scopes))
    }

    /// Build a client from a published client-metadata document.
    pub fn from_client_metadata(
        metadata: AtprotoClientMetadata,
        directory: &str,
        scopes: Vec<Scope>,
    ) -> Result<Self, String> {
        let client = build_oauth_client!(metadata, directory)?;
        Ok(Self::wrap(client, scopes))
    }

    fn wrap(client: AtprotoClient, scopes: Vec<Scope>) -> Self {
        Self {
            client: Arc::new(client),
            scopes,
            current: RwLock::new(None),
        }
    }
}

#[async_trait]
impl OAuthHandle for AtriumOAuthHandle {
    async fn resume(&self) -> Result<Option<Arc<dyn OAuthSessionHandle>>, String> {
        let Some(did) = self.current.read().await.clone() else {
            debug!("No stored session to resume");
            return Ok(None);
        };
        self.client
            .restore(&did)
            .await
            .map_err(|e| format!("failed to restore session for {}: {e}", did.as_str()))?;
        Ok(Some(Arc::new(AtriumSession {
            client: self.client.clone(),
            did,
        })))
    }

    async fn complete(&self, query: CallbackQuery) -> Result<Arc<dyn OAuthSessionHandle>, String> {
        let params = CallbackParams {
            code: query.code,
            state: query.state,
            iss: query.iss,
        };
        let (session, _) = self
            .client
            .callback(params)
            .await
            .map_err(|e| format!("authorization callback failed: {e}"))?;
        let did = session
            .did()
            .await
            .ok_or_else(|| "callback produced a session without a DID".to_string())?;
        *self.current.write().await = Some(did.clone());
        Ok(Arc::new(AtriumSession {
            client: self.client.clone(),
            did,
        }))
    }

    async fn authorize(&self, handle: &str) -> Result<Url, String> {
        let url = self
            .client
            .authorize(
                handle,
                AuthorizeOptions {
                    scopes: self.scopes.clone(),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| format!("authorization request for '{handle}' failed: {e}"))?;
        Url::parse(&url).map_err(|e| format!("authorization URL is invalid: {e}"))
    }
}

/// A session restorable from the client's store; holds the client and the
/// DID rather than the session object itself.
struct AtriumSession {
    client: Arc<AtprotoClient>,
    did: Did,
}

#[async_trait]
impl OAuthSessionHandle for AtriumSession {
    fn did(&self) -> &Did {
        &self.did
    }

    async fn sign_out(&self) -> Result<(), String> {
        self.client
            .revoke(&self.did)
            .await
            .map_err(|e| format!("token revocation for {} failed: {e}", self.did.as_str()))
    }
}

/// Map configured scope strings onto atrium scope values.
pub fn parse_scopes(scopes: &[String]) -> Vec<Scope> {
    scopes
        .iter()
        .map(|s| match s.as_str() {
            "atproto" => Scope::Known(KnownScope::Atproto),
            "transition:generic" => Scope::Known(KnownScope::TransitionGeneric),
            "transition:chat.bsky" => Scope::Known(KnownScope::TransitionChatBsky),
            other => Scope::Unknown(other.to_string()),
        })
        .collect()
}

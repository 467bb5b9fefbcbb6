use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Selects how the OAuth client identity is obtained at startup.
///
/// Exactly one strategy is chosen per deployment: the loopback client
/// identity for local development, or a published `client_metadata.json`
/// document for deployed environments.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
#[serde(tag = "mode")]
pub enum BootstrapConfig {
    #[serde(rename = "loopback")]
    Loopback(LoopbackConfig),
    #[serde(rename = "metadata")]
    Metadata(MetadataConfig),
}

/// Development bootstrap: the special `http://localhost` client identity,
/// with the redirect target pointing back at the running application.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct LoopbackConfig {
    /// Redirect target the authorization server sends the browser back to.
    /// Loopback redirects must use 127.0.0.1 or [::1], not localhost.
    pub origin: String,
}

/// Deployed bootstrap: the client identity is the metadata document the
/// application publishes at `<origin>/client_metadata.json`.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct MetadataConfig {
    /// Application origin the metadata document is fetched from.
    pub origin: String,
}

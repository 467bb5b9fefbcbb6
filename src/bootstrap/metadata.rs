use std::sync::Arc;

use async_trait::async_trait;
use atrium_oauth::{AtprotoClientMetadata, AuthMethod, GrantType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bootstrap::ClientLoader;
use crate::config::MetadataConfig;
use crate::oauth::atrium::{parse_scopes, AtriumOAuthHandle};
use crate::oauth::OAuthHandle;

/// The subset of the published client-metadata document this loader reads.
/// The full schema belongs to the OAuth client library's contract.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClientMetadataDoc {
    pub client_id: String,
    #[serde(default)]
    pub client_uri: Option<String>,
    pub redirect_uris: Vec<String>,
    /// Space-separated scope string, as published in the document.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub grant_types: Vec<String>,
    #[serde(default = "default_auth_method")]
    pub token_endpoint_auth_method: String,
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

fn default_auth_method() -> String {
    "none".to_string()
}

/// Deployed-mode loader: fetches `client_metadata.json` from the application
/// origin and builds the OAuth client from it. A fetch or parse failure
/// propagates; there is no retry, the application stays not-ready.
pub struct MetadataLoader {
    config: MetadataConfig,
    resolver: String,
    scopes: Vec<String>,
    http: reqwest::Client,
}

impl MetadataLoader {
    pub fn new(config: &MetadataConfig, resolver: &str, scopes: Vec<String>) -> Self {
        Self {
            config: config.clone(),
            resolver: resolver.to_string(),
            scopes,
            http: reqwest::Client::new(),
        }
    }

    fn metadata_url(&self) -> String {
        format!(
            "{}/client_metadata.json",
            self.config.origin.trim_end_matches('/')
        )
    }

    async fn fetch(&self) -> Result<ClientMetadataDoc, String> {
        let url = self.metadata_url();
        debug!("Fetching client metadata from {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("client metadata fetch failed: {e}"))?;
        if !response.status().is_success() {
            return Err(format!(
                "client metadata fetch returned {}",
                response.status()
            ));
        }
        response
            .json::<ClientMetadataDoc>()
            .await
            .map_err(|e| format!("client metadata document is malformed: {e}"))
    }

    /// Map the published document onto the client library's metadata type.
    fn to_client_metadata(&self, doc: &ClientMetadataDoc) -> Result<AtprotoClientMetadata, String> {
        let scope_strings: Vec<String> = match &doc.scope {
            Some(s) => s.split_whitespace().map(str::to_string).collect(),
            None => self.scopes.clone(),
        };
        let token_endpoint_auth_method = match doc.token_endpoint_auth_method.as_str() {
            "none" => AuthMethod::None,
            "private_key_jwt" => AuthMethod::PrivateKeyJwt,
            other => {
                return Err(format!(
                    "unsupported token_endpoint_auth_method '{}'",
                    other
                ))
            }
        };
        let mut grant_types = Vec::new();
        for grant in &doc.grant_types {
            match grant.as_str() {
                "authorization_code" => grant_types.push(GrantType::AuthorizationCode),
                "refresh_token" => grant_types.push(GrantType::RefreshToken),
                other => return Err(format!("unsupported grant_type '{}'", other)),
            }
        }
        if grant_types.is_empty() {
            grant_types = vec![GrantType::AuthorizationCode, GrantType::RefreshToken];
        }
        Ok(AtprotoClientMetadata {
            client_id: doc.client_id.clone(),
            client_uri: Some(
                doc.client_uri
                    .clone()
                    .unwrap_or_else(|| self.config.origin.clone()),
            ),
            redirect_uris: doc.redirect_uris.clone(),
            token_endpoint_auth_method,
            grant_types,
            scopes: parse_scopes(&scope_strings),
            jwks_uri: doc.jwks_uri.clone(),
            token_endpoint_auth_signing_alg: None,
        })
    }
}

#[async_trait]
impl ClientLoader for MetadataLoader {
    fn get_name(&self) -> &str {
        "client-metadata loader"
    }

    fn get_mode(&self) -> &str {
        "metadata"
    }

    async fn load(&self) -> Result<Arc<dyn OAuthHandle>, String> {
        let doc = match self.fetch().await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Client metadata bootstrap failed: {}", e);
                return Err(e);
            }
        };
        let metadata = self.to_client_metadata(&doc)?;
        let handle = AtriumOAuthHandle::from_client_metadata(
            metadata,
            &self.resolver,
            parse_scopes(&self.scopes),
        )?;
        Ok(Arc::new(handle))
    }
}

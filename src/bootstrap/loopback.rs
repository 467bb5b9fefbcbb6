use std::sync::Arc;

use async_trait::async_trait;
use atrium_oauth::AtprotoLocalhostClientMetadata;
use tracing::debug;

use crate::bootstrap::ClientLoader;
use crate::config::LoopbackConfig;
use crate::oauth::atrium::{parse_scopes, AtriumOAuthHandle};
use crate::oauth::OAuthHandle;

/// Development-mode loader. Authorization servers treat `http://localhost`
/// client identities specially: the metadata is synthesized from the query
/// string instead of being fetched, so no document needs to be published.
pub struct LoopbackLoader {
    config: LoopbackConfig,
    resolver: String,
    scopes: Vec<String>,
}

impl LoopbackLoader {
    pub fn new(config: &LoopbackConfig, resolver: &str, scopes: Vec<String>) -> Self {
        Self {
            config: config.clone(),
            resolver: resolver.to_string(),
            scopes,
        }
    }

    /// The client identity this strategy synthesizes: scopes and the
    /// redirect target are carried as query parameters.
    pub fn client_id(&self) -> String {
        format!(
            "http://localhost?scope={}&redirect_uri={}",
            self.scopes.join("%20"),
            self.config.origin
        )
    }
}

#[async_trait]
impl ClientLoader for LoopbackLoader {
    fn get_name(&self) -> &str {
        "loopback client loader"
    }

    fn get_mode(&self) -> &str {
        "loopback"
    }

    async fn load(&self) -> Result<Arc<dyn OAuthHandle>, String> {
        debug!("Building loopback OAuth client '{}'", self.client_id());
        let metadata = AtprotoLocalhostClientMetadata {
            redirect_uris: Some(vec![self.config.origin.clone()]),
            scopes: Some(parse_scopes(&self.scopes)),
        };
        let handle =
            AtriumOAuthHandle::from_loopback(metadata, &self.resolver, parse_scopes(&self.scopes))?;
        Ok(Arc::new(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> LoopbackLoader {
        LoopbackLoader::new(
            &LoopbackConfig {
                origin: "http://127.0.0.1:8080/callback".to_string(),
            },
            "https://plc.directory",
            vec!["atproto".to_string(), "transition:generic".to_string()],
        )
    }

    /// The synthesized identity carries the scope list and the redirect
    /// target pointing back at the application's own origin.
    #[test]
    fn test_client_id_embeds_scopes_and_redirect() {
        let id = loader().client_id();
        assert!(id.starts_with("http://localhost?"), "got '{}'", id);
        assert!(id.contains("scope=atproto%20transition:generic"), "got '{}'", id);
        assert!(
            id.contains("redirect_uri=http://127.0.0.1:8080/callback"),
            "got '{}'",
            id
        );
    }

    #[test]
    fn test_loader_metadata() {
        let loader = loader();
        assert_eq!(loader.get_mode(), "loopback");
        assert_eq!(loader.get_name(), "loopback client loader");
    }

    /// Client construction is local; no network is needed to load.
    #[tokio::test]
    async fn test_load_builds_client() {
        let result = loader().load().await;
        assert!(result.is_ok(), "expected loopback load to succeed");
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use super::loopback::LoopbackLoader;
use super::metadata::MetadataLoader;
use crate::config::{BootstrapConfig, ConfigV1};
use crate::oauth::OAuthHandle;

/// A client loader turns deployment configuration into a ready OAuth client.
/// Loading runs once at startup and again after every sign-out.
#[async_trait]
pub trait ClientLoader: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_mode(&self) -> &str;
    async fn load(&self) -> Result<Arc<dyn OAuthHandle>, String>;
}

/// Create the client loader selected by the bootstrap config.
pub fn create_client_loader(config: &ConfigV1) -> Box<dyn ClientLoader> {
    match &config.bootstrap {
        BootstrapConfig::Loopback(cfg) => Box::new(LoopbackLoader::new(
            cfg,
            &config.resolver,
            config.scopes.clone(),
        )),
        BootstrapConfig::Metadata(cfg) => Box::new(MetadataLoader::new(
            cfg,
            &config.resolver,
            config.scopes.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use figment::providers::{Format, Yaml};
    use figment::Figment;

    use super::*;
    use crate::config::Config;

    fn config_for(yaml: &str) -> ConfigV1 {
        let config: Config = Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .expect("config YAML should parse");
        match config {
            Config::ConfigV1(c) => c,
        }
    }

    /// The factory picks the loader matching the configured mode.
    #[test]
    fn test_factory_selects_loopback() {
        let config = config_for(
            r#"
version: "1.0.0"
bootstrap:
  mode: loopback
  origin: http://127.0.0.1:8080/callback
logging:
  level: info
  format: console
"#,
        );
        let loader = create_client_loader(&config);
        assert_eq!(loader.get_mode(), "loopback");
    }

    #[test]
    fn test_factory_selects_metadata() {
        let config = config_for(
            r#"
version: "1.0.0"
bootstrap:
  mode: metadata
  origin: https://app.example.com
logging:
  level: info
  format: console
"#,
        );
        let loader = create_client_loader(&config);
        assert_eq!(loader.get_mode(), "metadata");
    }
}

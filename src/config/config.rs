use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::bootstrap::BootstrapConfig;
use super::logging::LoggingConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: bootstrap strategy, endpoints, scopes and logging.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    /// How the OAuth client identity is obtained (loopback vs. metadata).
    pub bootstrap: BootstrapConfig,
    /// Identity directory origin used to resolve accounts to DID documents.
    #[serde(default = "default_resolver")]
    pub resolver: String,
    /// Origin of the public, unauthenticated AppView API.
    #[serde(default = "default_public_api")]
    pub public_api: String,
    /// OAuth scopes requested at sign-in.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    pub logging: LoggingConfig,
}

fn default_resolver() -> String {
    "https://plc.directory".to_string()
}

fn default_public_api() -> String {
    "https://public.api.bsky.app".to_string()
}

fn default_scopes() -> Vec<String> {
    // atproto and transition:generic cover the basics.
    vec!["atproto".to_string(), "transition:generic".to_string()]
}

/// Load config from a YAML file named "config.yaml" in the current directory.
/// Values can be overridden through BSKY_SESSION_* environment variables.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("BSKY_SESSION_"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ConfigV1 {
        let config: Config = Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .expect("config YAML should parse");
        match config {
            Config::ConfigV1(c) => c,
        }
    }

    /// Minimal loopback config relies on the documented defaults.
    #[test]
    fn test_loopback_config_defaults() {
        let config = parse(
            r#"
version: "1.0.0"
bootstrap:
  mode: loopback
  origin: http://127.0.0.1:8080/callback
logging:
  level: debug
  format: console
"#,
        );

        assert_eq!(config.resolver, "https://plc.directory");
        assert_eq!(config.public_api, "https://public.api.bsky.app");
        assert_eq!(config.scopes, vec!["atproto", "transition:generic"]);
        match config.bootstrap {
            BootstrapConfig::Loopback(cfg) => {
                assert_eq!(cfg.origin, "http://127.0.0.1:8080/callback");
            }
            other => panic!("expected loopback bootstrap, got {:?}", other),
        }
    }

    /// Metadata mode with every field spelled out.
    #[test]
    fn test_metadata_config_explicit_values() {
        let config = parse(
            r#"
version: "1.0.0"
bootstrap:
  mode: metadata
  origin: https://app.example.com
resolver: https://directory.example.com
public_api: https://appview.example.com
scopes:
  - atproto
logging:
  level: info
  format: json
"#,
        );

        assert_eq!(config.resolver, "https://directory.example.com");
        assert_eq!(config.public_api, "https://appview.example.com");
        assert_eq!(config.scopes, vec!["atproto"]);
        match config.bootstrap {
            BootstrapConfig::Metadata(cfg) => {
                assert_eq!(cfg.origin, "https://app.example.com");
            }
            other => panic!("expected metadata bootstrap, got {:?}", other),
        }
    }

    /// An unknown bootstrap mode is rejected at parse time.
    #[test]
    fn test_unknown_bootstrap_mode_fails() {
        let result: Result<Config, _> = Figment::new()
            .merge(Yaml::string(
                r#"
version: "1.0.0"
bootstrap:
  mode: carrier-pigeon
  origin: http://127.0.0.1:8080
logging:
  level: info
  format: console
"#,
            ))
            .extract();
        assert!(result.is_err());
    }
}

use bsky_session::config::{Config, ConfigV1};
use figment::providers::{Format, Yaml};
use figment::Figment;

/// Parse a YAML config string the same way the application does.
pub fn load_config_from(yaml: &str) -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(yaml))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

/// A metadata-mode config pointing at the given application origin.
pub fn metadata_mode_config(origin: &str) -> ConfigV1 {
    load_config_from(&format!(
        r#"
version: "1.0.0"
bootstrap:
  mode: metadata
  origin: {origin}
logging:
  level: debug
  format: console
"#
    ))
}

/// A client-metadata document as a deployed application would publish it.
pub fn client_metadata_body() -> String {
    serde_json::json!({
        "client_id": "https://app.example.com/client_metadata.json",
        "client_name": "Example app",
        "client_uri": "https://app.example.com",
        "redirect_uris": ["https://app.example.com/callback"],
        "scope": "atproto transition:generic",
        "grant_types": ["authorization_code", "refresh_token"],
        "response_types": ["code"],
        "token_endpoint_auth_method": "none",
        "application_type": "web",
        "dpop_bound_access_tokens": true
    })
    .to_string()
}

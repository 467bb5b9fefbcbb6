use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How tracing output is initialized at startup.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error.
    pub level: String,
    /// Output format: "console" or "json".
    pub format: String,
}

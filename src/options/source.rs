use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// REST endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Source", inline)]
#[serde(default)]
pub struct SourceOptions {
    /// Base URL the `json/{id}` and `alignment/{id}` paths are appended to.
    #[schemars(title = "Base URL")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[schemars(title = "Timeout (s)", range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/chains/".to_owned(),
            timeout_secs: 30,
        }
    }
}

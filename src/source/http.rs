//! Blocking HTTP implementation of [`StructureSource`] over `ureq`.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{
    AlignmentPayload, ChainListKind, ChainModel, FetchError, StructureSource,
};
use crate::options::SourceOptions;

/// REST client for the chain endpoints (`{base}json/{id}`,
/// `{base}alignment/{id}`, `{base}all` and `{base}reps`).
pub struct HttpSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpSource {
    /// Build a client from source options.
    #[must_use]
    pub fn new(options: &SourceOptions) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(options.timeout_secs)))
            .build();
        let mut base_url = options.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url,
        }
    }

    /// Base URL every endpoint path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url}");

        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(map_ureq_error)?
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            FetchError::transport(format!("malformed response from {url}: {e}"))
        })
    }
}

impl StructureSource for HttpSource {
    fn fetch_chain_model(
        &self,
        chain_id: &str,
    ) -> Result<ChainModel, FetchError> {
        self.get_json(&format!("json/{chain_id}"))
    }

    fn fetch_alignment(
        &self,
        reference_chain_id: &str,
    ) -> Result<AlignmentPayload, FetchError> {
        self.get_json(&format!("alignment/{reference_chain_id}"))
    }

    fn fetch_chain_ids(
        &self,
        kind: ChainListKind,
    ) -> Result<Vec<String>, FetchError> {
        self.get_json(kind.path())
    }
}

fn map_ureq_error(e: ureq::Error) -> FetchError {
    match e {
        ureq::Error::StatusCode(code) => {
            let reason = ureq::http::StatusCode::from_u16(code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown Status");
            FetchError::new(code, reason)
        }
        other => FetchError::transport(other.to_string()),
    }
}

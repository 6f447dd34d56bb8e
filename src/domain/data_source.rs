// ============================================================
// Layer 3: Training Data Sources
// ============================================================
// A run names its training data in one of two ways:
//   - a local path (file or directory)
//   - a remote endpoint the data is fetched from over HTTP
//
// DataSources holds what the caller supplied; the selector turns
// it into exactly one TrainingDataSource. When both are present
// the endpoint wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

fn default_token_name() -> String {
    "token".to_string()
}

/// Where and how to fetch training data from a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,

    /// Extra query parameters
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Sent as the `token_name` query parameter when set
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_token_name")]
    pub token_name: String,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url:        url.into(),
            params:     BTreeMap::new(),
            headers:    BTreeMap::new(),
            token:      None,
            token_name: default_token_name(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Full request URL with params and token appended as query pairs.
    pub fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)
            .with_context(|| format!("Invalid endpoint URL '{}'", self.url))?;
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in &self.params {
                query.append_pair(k, v);
            }
            if let Some(token) = &self.token {
                query.append_pair(&self.token_name, token);
            }
        }
        // query_pairs_mut leaves a bare '?' behind when nothing was added
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

/// The single data source a run acquires its corpus from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingDataSource {
    Local(PathBuf),
    RemoteEndpoint(EndpointConfig),
}

impl fmt::Display for TrainingDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingDataSource::Local(path) => write!(f, "{}", path.display()),
            TrainingDataSource::RemoteEndpoint(endpoint) => write!(f, "{}", endpoint.url),
        }
    }
}

/// Data sources as supplied by the caller; either, both or none may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSources {
    pub local:    Option<PathBuf>,
    pub endpoint: Option<EndpointConfig>,
}

impl DataSources {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local:    Some(path.into()),
            endpoint: None,
        }
    }

    pub fn endpoint(endpoint: EndpointConfig) -> Self {
        Self {
            local:    None,
            endpoint: Some(endpoint),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Use `fallback` as the local path when no source was given at all.
    pub fn or_local(self, fallback: Option<&str>) -> Self {
        if self.local.is_some() || self.endpoint.is_some() {
            return self;
        }
        Self {
            local:    fallback.map(PathBuf::from),
            endpoint: None,
        }
    }
}

/// Identifier used when logging a run: the local path, or `<none>`.
///
/// Failures are reported against the local data argument the caller
/// passed, even when an endpoint took precedence.
impl fmt::Display for DataSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.local, &self.endpoint) {
            (Some(path), _) => write!(f, "{}", path.display()),
            (None, Some(endpoint)) => write!(f, "{}", endpoint.url),
            (None, None) => write!(f, "<none>"),
        }
    }
}

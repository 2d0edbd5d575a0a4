//! Configuration for hub client construction.

use std::collections::BTreeMap;
use std::time::Duration;

/// Production hub API, used when nothing else is configured.
pub const DEFAULT_HUB_URL: &str = "https://api.rastion.dev";

/// Where a locally running backend listens during development.
pub const LOCAL_DEV_URL: &str = "http://localhost:8000";

/// Bound on each request, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(25_000);

/// Configuration for hub client construction.
///
/// The base URL and timeout are explicit here rather than read from the
/// environment so tests and alternate deployments can construct clients
/// against arbitrary endpoints.
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// Explicit base URL for the catalog API. Takes precedence over
    /// everything else; a trailing slash is stripped.
    pub catalog_url: Option<String>,
    /// Target a locally running backend instead of the production hub
    /// when no explicit URL is configured.
    pub dev_mode: bool,
    /// Optional bearer token, sent on every request when present.
    pub access_token: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Bound on each request.
    pub timeout: Duration,
    /// Optional user agent override.
    pub user_agent: Option<String>,
}

impl Default for HubClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: None,
            dev_mode: false,
            access_token: None,
            extra_headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl HubClientConfig {
    /// Resolve the base URL this client should talk to.
    ///
    /// An explicit `catalog_url` wins; otherwise dev mode selects the local
    /// backend and production is the fallback.
    pub fn resolved_base_url(&self) -> String {
        if let Some(url) = self
            .catalog_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            return url.trim_end_matches('/').to_string();
        }

        if self.dev_mode {
            LOCAL_DEV_URL.to_string()
        } else {
            DEFAULT_HUB_URL.to_string()
        }
    }
}

//! Hub client wrapper around the catalog REST API.

use std::fmt::Debug;
use std::str::FromStr;

use reqwest::header::{self, HeaderMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::HubClientConfig;
use crate::error::{HubClientError, error_from_response};
use crate::types::{
    CatalogItem, DEFAULT_PAGE, ItemKind, ListPayload, ListQuery, MAX_PAGE_SIZE, Page,
    RatingSummary,
};

const RATE_FALLBACK: &str = "Unable to submit rating.";

/// A client for the Rastion Hub catalog service.
///
/// Stateless between calls and cheap to clone; every operation is one
/// bounded request, and a failed call leaves the client fully usable.
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
    config: HubClientConfig,
}

impl Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HubClient {
    /// Create a new hub client from configuration.
    pub fn new(config: HubClientConfig) -> Result<Self, HubClientError> {
        let resolved = config.resolved_base_url();
        let base_url = Url::parse(&resolved)
            .map_err(|err| HubClientError::Other(format!("invalid hub URL '{resolved}': {err}")))?;
        let http = build_http_client(&config)?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// The resolved base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// List one page of catalog items.
    ///
    /// Blank filters are omitted from the request; `page`/`page_size` are
    /// clamped to the range the service accepts. Both historical response
    /// shapes are resolved into [`Page`] here.
    #[instrument(skip_all, fields(kind = %kind, page = query.page, page_size = query.page_size))]
    pub async fn list(
        &self,
        kind: ItemKind,
        query: &ListQuery,
    ) -> Result<Page<CatalogItem>, HubClientError> {
        let (url, page, page_size) = self.list_url(kind, query);
        debug!(%url, "listing catalog items");
        let response = self.get_response(url).await?;
        let payload: ListPayload = self.decode(response, kind.list_fallback()).await?;
        let resolved = Page::from_payload(payload, page, page_size);
        debug!(
            items = resolved.items.len(),
            total = resolved.total,
            has_more = resolved.has_more,
            "received catalog page"
        );
        Ok(resolved)
    }

    /// List up to [`MAX_PAGE_SIZE`] items in one request, for callers that
    /// do not need pagination controls.
    pub async fn list_all(
        &self,
        kind: ItemKind,
        query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, HubClientError> {
        let query = ListQuery {
            query: query.map(str::to_string),
            category: category.map(str::to_string),
            page: DEFAULT_PAGE,
            page_size: MAX_PAGE_SIZE,
        };
        Ok(self.list(kind, &query).await?.items)
    }

    /// Fetch a single catalog item.
    #[instrument(skip_all, fields(kind = %kind, id))]
    pub async fn get(&self, kind: ItemKind, id: i64) -> Result<CatalogItem, HubClientError> {
        let id_segment = id.to_string();
        let url = self.endpoint([kind.path(), id_segment.as_str()]);
        let response = self.get_response(url).await?;
        self.decode(response, kind.fetch_fallback()).await
    }

    /// Download an item's archive as raw bytes.
    ///
    /// Non-2xx responses fail with a fixed message naming the kind; no
    /// partial content is ever returned.
    #[instrument(skip_all, fields(kind = %kind, id))]
    pub async fn download(&self, kind: ItemKind, id: i64) -> Result<Vec<u8>, HubClientError> {
        let id_segment = id.to_string();
        let url = self.endpoint([kind.path(), id_segment.as_str(), "download"]);
        let response = self.get_response(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HubClientError::Status {
                status,
                message: kind.download_fallback().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        debug!(bytes = body.len(), "downloaded archive");
        Ok(body.to_vec())
    }

    /// Submit a rating between 0 and 5 for an item. Requires a configured
    /// access token.
    #[instrument(skip_all, fields(kind = %kind, id, rating))]
    pub async fn rate(
        &self,
        kind: ItemKind,
        id: i64,
        rating: f64,
    ) -> Result<RatingSummary, HubClientError> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(HubClientError::InvalidRequest(format!(
                "Rating must be between 0 and 5, got {rating}."
            )));
        }

        let id_segment = id.to_string();
        let url = self.endpoint([kind.path(), id_segment.as_str(), "rate"]);
        let response = self
            .http
            .post(url)
            .json(&RatePayload { rating })
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        self.decode(response, RATE_FALLBACK).await
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    /// Base URL with the given path segments appended.
    pub(crate) fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn list_url(&self, kind: ItemKind, query: &ListQuery) -> (Url, u32, u32) {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);

        let mut url = self.endpoint([kind.path()]);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = trimmed(query.query.as_deref()) {
                pairs.append_pair("q", q);
            }
            if let Some(category) = trimmed(query.category.as_deref()) {
                pairs.append_pair("category", category);
            }
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("page_size", &page_size.to_string());
        }
        (url, page, page_size)
    }

    pub(crate) async fn get_response(&self, url: Url) -> Result<reqwest::Response, HubClientError> {
        self.http
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_error(err))
    }

    /// Decode a JSON response, funnelling every failure into the uniform
    /// error shape: non-2xx through the detail/fallback policy, transport
    /// failures through [`Self::transport_error`], and an unparsable 2xx
    /// body into [`HubClientError::Malformed`] with `fallback`.
    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, HubClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response, fallback).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        serde_json::from_slice(&body).map_err(|_| HubClientError::Malformed {
            message: fallback.to_string(),
        })
    }

    pub(crate) fn transport_error(&self, err: reqwest::Error) -> HubClientError {
        if err.is_timeout() {
            HubClientError::Timeout {
                bound: self.config.timeout,
            }
        } else {
            HubClientError::Unreachable {
                base_url: self.base_url.as_str().trim_end_matches('/').to_string(),
            }
        }
    }
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
struct RatePayload {
    rating: f64,
}

/// Build the HTTP client: timeout bound, bearer token and extra headers as
/// defaults on every request.
fn build_http_client(config: &HubClientConfig) -> Result<reqwest::Client, HubClientError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = &config.access_token {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("bearer {token}"))
                .map_err(|err| HubClientError::Other(err.to_string()))?,
        );
    }

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key)
                .map_err(|err: header::InvalidHeaderName| HubClientError::Other(err.to_string()))?,
            header::HeaderValue::from_str(value)
                .map_err(|err: header::InvalidHeaderValue| HubClientError::Other(err.to_string()))?,
        );
    }

    debug!(
        has_token = config.access_token.is_some(),
        extra_headers = config.extra_headers.len(),
        timeout = ?config.timeout,
        "building hub HTTP client"
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout);
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|err| HubClientError::Other(err.to_string()))
}

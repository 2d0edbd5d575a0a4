//! Catalog interaction types.
//!
//! Wire payloads from the hub come in two historical shapes; they are
//! resolved into the canonical [`Page`] once, at the response boundary,
//! and nothing downstream branches on the shape again.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page requested when the caller does not say otherwise.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size requested when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page the service will serve.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The two kinds of catalog entries the hub serves.
///
/// `decision-plugins` is the canonical name for what earlier revisions of
/// the service called `problems` or `benchmarks`; those names are accepted
/// as deprecated aliases when parsing, but requests always use the
/// canonical paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Solver,
    DecisionPlugin,
}

impl ItemKind {
    /// URL path segment for list and download endpoints.
    pub fn path(&self) -> &'static str {
        match self {
            ItemKind::Solver => "solvers",
            ItemKind::DecisionPlugin => "decision-plugins",
        }
    }

    /// Human-readable singular name.
    pub fn singular(&self) -> &'static str {
        match self {
            ItemKind::Solver => "solver",
            ItemKind::DecisionPlugin => "decision plugin",
        }
    }

    /// Human-readable plural name.
    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Solver => "solvers",
            ItemKind::DecisionPlugin => "decision plugins",
        }
    }

    pub(crate) fn list_fallback(&self) -> &'static str {
        match self {
            ItemKind::Solver => "Unable to load solvers.",
            ItemKind::DecisionPlugin => "Unable to load decision plugins.",
        }
    }

    pub(crate) fn fetch_fallback(&self) -> &'static str {
        match self {
            ItemKind::Solver => "Unable to load solver details.",
            ItemKind::DecisionPlugin => "Unable to load decision plugin details.",
        }
    }

    pub(crate) fn download_fallback(&self) -> &'static str {
        match self {
            ItemKind::Solver => "Unable to download solver.",
            ItemKind::DecisionPlugin => "Unable to download decision plugin.",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}

#[derive(Debug, Error)]
#[error("unknown item kind '{0}', expected 'solver' or 'decision-plugin'")]
pub struct UnknownItemKind(String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "solver" | "solvers" => Ok(ItemKind::Solver),
            "decision-plugin" | "decision-plugins" | "plugin" | "plugins" => {
                Ok(ItemKind::DecisionPlugin)
            },
            // Names used by earlier service revisions.
            "problem" | "problems" | "benchmark" | "benchmarks" => Ok(ItemKind::DecisionPlugin),
            other => Err(UnknownItemKind(other.to_string())),
        }
    }
}

/// A hub user, as embedded in catalog items and returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
}

/// One published catalog entry, solver or decision plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub download_count: i64,
    pub rating: f64,
    pub owner: User,
}

/// Filters and pagination controls for a list request.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Free-text filter over name and description. Trimmed; omitted when
    /// blank.
    pub query: Option<String>,
    /// Exact category filter. Trimmed; omitted when blank.
    pub category: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

/// Outcome of rating an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub id: i64,
    pub item_type: String,
    pub rating: f64,
    pub rating_count: i64,
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// List responses as actually served: either the paginated envelope or the
/// legacy bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload {
    Envelope(ListEnvelope),
    Bare(Vec<CatalogItem>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    pub items: Vec<CatalogItem>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub page_size: Option<u64>,
}

/// Accept a numeric field or fall back to `None` on any other type rather
/// than failing the whole payload.
fn numeric_or_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_u64()))
}

impl Page<CatalogItem> {
    /// Resolve a wire payload into the canonical page shape.
    ///
    /// Bare arrays carry no pagination metadata, so the full set is assumed
    /// returned: `total` is the item count and `has_more` is false. Envelope
    /// fields are used when numeric and fall back to the requested values
    /// otherwise; `has_more` holds exactly when `page * page_size < total`.
    pub(crate) fn from_payload(
        payload: ListPayload,
        requested_page: u32,
        requested_page_size: u32,
    ) -> Self {
        match payload {
            ListPayload::Bare(items) => Page {
                total: items.len() as u64,
                page: requested_page,
                page_size: requested_page_size,
                has_more: false,
                items,
            },
            ListPayload::Envelope(envelope) => {
                let total = envelope.total.unwrap_or(envelope.items.len() as u64);
                let page = envelope
                    .page
                    .and_then(|page| u32::try_from(page).ok())
                    .unwrap_or(requested_page);
                let page_size = envelope
                    .page_size
                    .and_then(|size| u32::try_from(size).ok())
                    .unwrap_or(requested_page_size);
                Page {
                    items: envelope.items,
                    total,
                    page,
                    page_size,
                    has_more: u64::from(page) * u64::from(page_size) < total,
                }
            },
        }
    }
}

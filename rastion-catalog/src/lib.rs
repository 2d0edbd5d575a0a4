//! HTTP client for the Rastion Hub catalog API.
//!
//! This crate provides:
//! - HTTP client construction with bearer token authentication and a
//!   per-request time bound
//! - Paginated listing of solvers and decision plugins, with both
//!   historical response shapes normalized into one [`Page`]
//! - Archive downloads, ratings, and the `/auth` handshake
//! - Keyword-based category inference for items published without one
//!
//! ## Usage
//!
//! ```ignore
//! use rastion_catalog::{HubClient, HubClientConfig, ItemKind, ListQuery};
//!
//! let client = HubClient::new(HubClientConfig::default())?;
//! let page = client.list(ItemKind::Solver, &ListQuery::default()).await?;
//! ```

mod auth;
mod category;
mod client;
mod config;
mod error;
mod types;

pub use auth::{Session, TokenVerification};
pub use category::{GENERAL_CATEGORY, infer_category, resolve_category};
pub use client::HubClient;
pub use config::{DEFAULT_HUB_URL, DEFAULT_TIMEOUT, HubClientConfig, LOCAL_DEV_URL};
pub use error::HubClientError;
pub use types::{
    CatalogItem, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ItemKind, ListQuery, MAX_PAGE_SIZE, Page,
    RatingSummary, UnknownItemKind, User,
};

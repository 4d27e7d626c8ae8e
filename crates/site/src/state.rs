//! Application state shared across handlers.

use std::sync::Arc;

use folio_client::{ApiClient, ApiError};
use moka::future::Cache;

use crate::config::SiteConfig;

/// Pages kept in the render cache.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum PageKey {
    Home,
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend client, the page cache, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    api: ApiClient,
    pages: Cache<PageKey, Arc<str>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        let pages = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.page_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, pages }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Look up a rendered page.
    pub async fn cached_page(&self, key: PageKey) -> Option<Arc<str>> {
        self.inner.pages.get(&key).await
    }

    /// Store a rendered page until its TTL passes or the cache is revalidated.
    pub async fn cache_page(&self, key: PageKey, html: Arc<str>) {
        self.inner.pages.insert(key, html).await;
    }

    /// Drop every rendered page so the next request fetches fresh content.
    pub async fn invalidate_pages(&self) {
        self.inner.pages.invalidate_all();
        self.inner.pages.run_pending_tasks().await;
    }
}

//! Release feed trait definition
//!
//! The orchestrator reads pages through this trait so tests can script a
//! feed without an HTTP server.

use crate::domain::{FeedError, ReleasePackage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Paginated source of release packages
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// Fetch one page
    ///
    /// With `next_page = None` this builds the first-page request, applying
    /// `updated_since` as the incremental filter when given. Otherwise the
    /// server-provided link is requested verbatim and `updated_since` is
    /// ignored.
    ///
    /// Rate limiting is absorbed here; only fatal conditions are returned.
    async fn fetch_page(
        &self,
        next_page: Option<&str>,
        updated_since: Option<DateTime<Utc>>,
    ) -> Result<ReleasePackage, FeedError>;

    /// Where pages come from, for logs
    fn endpoint(&self) -> &str;
}

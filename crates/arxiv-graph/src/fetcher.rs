//! Paginated retrieval of one (category, year) slice.
//!
//! A one-record count request learns the declared total, page offsets are laid out at
//! `0, page_size, 2 * page_size, ...` below that total, and each page is
//! requested in turn. Every page request is followed by a [`Pacer::pause`];
//! the count request is not.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;

use crate::client::ArxivClient;
use crate::error::ClientResult;
use crate::models::{Page, SearchQuery};

/// Rate-limit policy applied after every page request.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait before the next request may be issued.
    async fn pause(&self);
}

/// Sleeps for a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Create a pacer sleeping `delay` after each page.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Start offsets for `total` results in pages of `page_size`.
#[must_use]
pub fn page_offsets(total: u64, page_size: NonZeroU32) -> Vec<u64> {
    (0..total).step_by(page_size.get() as usize).collect()
}

/// Streams pages of records from the arXiv API.
#[derive(Clone)]
pub struct Fetcher {
    client: ArxivClient,
    page_size: NonZeroU32,
    pacer: Arc<dyn Pacer>,
}

impl Fetcher {
    /// Create a fetcher requesting `page_size` records per page.
    #[must_use]
    pub fn new(client: ArxivClient, page_size: NonZeroU32, pacer: Arc<dyn Pacer>) -> Self {
        Self { client, page_size, pacer }
    }

    /// Records requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    /// Declared total result count for `query`, from a one-record request.
    pub async fn total_results(&self, query: &SearchQuery) -> ClientResult<u64> {
        let feed = self.client.search(query, 0, 1).await?;
        tracing::debug!(%query, total = feed.total_results, "Counted results");
        Ok(feed.total_results)
    }

    /// Lazily fetch every page of `query` up to `total` results.
    ///
    /// Records without authors are dropped here and counted in [`Page::skipped`].
    /// The stream ends after the first error.
    pub fn pages<'a>(
        &'a self,
        query: &'a SearchQuery,
        total: u64,
    ) -> impl Stream<Item = ClientResult<Page>> + 'a {
        async_stream::try_stream! {
            for offset in page_offsets(total, self.page_size) {
                let feed = self.client.search(query, offset, self.page_size.get()).await?;
                self.pacer.pause().await;

                let received = feed.records.len();
                let records: Vec<_> =
                    feed.records.into_iter().filter(|r| r.has_authors()).collect();
                let skipped = received - records.len();

                tracing::debug!(%query, offset, received, skipped, "Fetched page");
                yield Page { offset, records, skipped };
            }
        }
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("client", &self.client)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

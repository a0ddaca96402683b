//! arXiv API client.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Request logging middleware
//! - Atom feed decoding and status-code mapping
//!
//! There is deliberately no retry layer: a failed request fails the year.

mod middleware;

pub use middleware::RequestLogger;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::feed::parse_feed;
use crate::models::{Feed, SearchQuery};

/// arXiv export API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query endpoint.
    api_url: String,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client
    /// initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let client = ClientBuilder::new(client).with(RequestLogger).build();

        Ok(Self { client, api_url: config.api_url.clone() })
    }

    /// Fetch up to `max_results` entries of `query` starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, an undecodable
    /// body, or an arXiv error entry.
    pub async fn search(
        &self,
        query: &SearchQuery,
        start: u64,
        max_results: u32,
    ) -> ClientResult<Feed> {
        let params = vec![
            ("search_query".to_string(), query.search_query()),
            ("start".to_string(), start.to_string()),
            ("max_results".to_string(), max_results.to_string()),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let response = self.handle_response(response).await?;
        let body = response.text().await?;

        let feed = parse_feed(&body)?;

        // arXiv reports malformed queries as a single error entry in a 200 response
        if let Some(error) = feed.records.iter().find(|r| r.id.contains("arxiv.org/api/errors")) {
            return Err(ClientError::api(error.summary.clone()));
        }

        Ok(feed)
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            400 => Err(ClientError::bad_request(text)),
            500..=599 => Err(ClientError::server(status.as_u16(), text)),
            _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text }),
        }
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}

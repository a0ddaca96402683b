//! Configuration for the arXiv graph harvester.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::error::ValidationError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// arXiv export API query endpoint.
    pub const ARXIV_API: &str = "http://export.arxiv.org/api/query";

    /// User agent sent with every request.
    pub const USER_AGENT: &str = concat!("arxiv-graph/", env!("CARGO_PKG_VERSION"));

    /// Request timeout (large pages of 200 entries can be slow to render).
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum papers per page request.
    pub const PAGE_SIZE: u32 = 200;

    /// Delay after each page request (arXiv asks for 3 seconds between calls).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(3);

    /// Minimum similarity for two author names to be merged.
    pub const SIMILARITY_CUTOFF: f64 = 0.6;

    /// Root directory for node and edge tables.
    pub const OUTPUT_DIR: &str = "datasets";
}

/// Harvester configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// arXiv query endpoint (overridable for mock servers).
    pub api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Records requested per page.
    pub page_size: u32,

    /// Pause after every page request.
    pub rate_limit_delay: Duration,

    /// Similarity cutoff for author-name merging, in `[0, 1]`.
    pub similarity_cutoff: f64,

    /// Root directory for exported tables.
    pub output_dir: PathBuf,
}

impl Config {
    /// Create a configuration with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_url: api::ARXIV_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            page_size: api::PAGE_SIZE,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            similarity_cutoff: api::SIMILARITY_CUTOFF,
            output_dir: PathBuf::from(api::OUTPUT_DIR),
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_url: format!("{}/api/query", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            ..Self::new()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Recognised variables: `ARXIV_API_URL`, `ARXIV_PAGE_SIZE`,
    /// `ARXIV_RATE_LIMIT_DELAY_SECS`, `ARXIV_SIMILARITY_CUTOFF`, `ARXIV_OUTPUT_DIR`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var("ARXIV_API_URL") {
            config.api_url = url;
        }
        if let Ok(raw) = std::env::var("ARXIV_PAGE_SIZE") {
            config.page_size = raw.parse().context("ARXIV_PAGE_SIZE must be an integer")?;
        }
        if let Ok(raw) = std::env::var("ARXIV_RATE_LIMIT_DELAY_SECS") {
            let secs: f64 =
                raw.parse().context("ARXIV_RATE_LIMIT_DELAY_SECS must be a number")?;
            config.rate_limit_delay = Duration::try_from_secs_f64(secs)
                .context("ARXIV_RATE_LIMIT_DELAY_SECS must be non-negative")?;
        }
        if let Ok(raw) = std::env::var("ARXIV_SIMILARITY_CUTOFF") {
            config.similarity_cutoff =
                raw.parse().context("ARXIV_SIMILARITY_CUTOFF must be a number")?;
        }
        if let Ok(dir) = std::env::var("ARXIV_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Page size as the non-zero value the fetcher requires.
    ///
    /// # Errors
    ///
    /// Returns error if the page size is zero.
    pub fn checked_page_size(&self) -> Result<NonZeroU32, ValidationError> {
        NonZeroU32::new(self.page_size)
            .ok_or_else(|| ValidationError::new("page_size", "must be greater than zero"))
    }

    /// Check invariants the rest of the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checked_page_size()?;
        if !(0.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(ValidationError::new(
                "similarity_cutoff",
                format!("{} is outside [0, 1]", self.similarity_cutoff),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(ValidationError::new("api_url", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for the arXiv graph harvester.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every layer has its own enum; the binary wraps them with `anyhow` at the edge.

/// Errors raised while decoding an Atom/OpenSearch feed document.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// Malformed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The feed carried no `opensearch:totalResults` element
    #[error("feed is missing opensearch:totalResults")]
    MissingTotal,

    /// A numeric feed field could not be parsed
    #[error("invalid {field}: {value:?}")]
    InvalidNumber {
        /// Element name
        field: &'static str,
        /// Raw text content
        value: String,
    },

    /// An entry's publication timestamp is not RFC 3339
    #[error("invalid publish date {value:?}: {source}")]
    InvalidDate {
        /// Raw text content
        value: String,
        /// Underlying chrono error
        source: chrono::ParseError,
    },
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Response body was not a valid feed
    #[error("Failed to parse feed: {0}")]
    Feed(#[from] FeedError),

    /// The client was built from an invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    /// arXiv reported a query error inside an otherwise successful response
    #[error("arXiv API error: {message}")]
    Api {
        /// Error summary from the error entry
        message: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create an API error from an arXiv error entry.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api { message: message.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Whether the failure looks transient (worth re-running the year later).
    ///
    /// Nothing in this crate retries automatically; this only feeds log output.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Middleware(_) | Self::Server { .. } => true,
            Self::UnexpectedStatus { status, .. } => *status == 429,
            Self::Feed(_) | Self::Config(_) | Self::Api { .. } | Self::BadRequest { .. } => false,
        }
    }
}

/// Errors from writing node and edge tables.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Filesystem error (directory creation, file open)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A failed (category, year) run.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    /// Retrieval failed before the graph was complete
    #[error("fetching year {year} failed: {source}")]
    Fetch {
        /// Year being harvested
        year: i32,
        /// Underlying client error
        source: ClientError,
    },

    /// The graph was built but could not be written out
    #[error("exporting year {year} failed: {source}")]
    Export {
        /// Year being harvested
        year: i32,
        /// Underlying export error
        source: ExportError,
    },
}

impl HarvestError {
    /// The year whose run failed.
    #[must_use]
    pub const fn year(&self) -> i32 {
        match self {
            Self::Fetch { year, .. } | Self::Export { year, .. } => *year,
        }
    }
}

/// Invalid configuration or command-line input.
#[derive(thiserror::Error, Debug)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Validation error message
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type alias for harvest operations.
pub type HarvestResult<T> = Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_transient() {
        assert!(ClientError::server(503, "Service Unavailable").is_transient());
        assert!(
            ClientError::UnexpectedStatus { status: 429, message: String::new() }.is_transient()
        );

        assert!(!ClientError::api("malformed id").is_transient());
        assert!(!ClientError::bad_request("bad query").is_transient());
        assert!(!ClientError::Feed(FeedError::MissingTotal).is_transient());
        assert!(!ClientError::from(ValidationError::new("page_size", "zero")).is_transient());
    }

    #[test]
    fn test_harvest_error_reports_year() {
        let err = HarvestError::Fetch { year: 2019, source: ClientError::server(500, "boom") };
        assert_eq!(err.year(), 2019);
        assert!(err.to_string().contains("2019"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError::new("page_size", "must be greater than zero");
        let msg = err.to_string();
        assert!(msg.contains("page_size"));
        assert!(msg.contains("greater than zero"));
    }
}

//! Paper records and pages as decoded from an Atom feed.

use chrono::{DateTime, FixedOffset};

/// One fetched paper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// arXiv identifier (the part of the entry URI after `/abs/`), e.g. `1901.00001v2`.
    pub id: String,

    /// Paper title.
    pub title: String,

    /// Abstract.
    pub summary: String,

    /// First-version publication timestamp.
    pub published: Option<DateTime<FixedOffset>>,

    /// Author display names in feed order.
    pub authors: Vec<String>,
}

impl Record {
    /// Whether the record lists at least one author.
    ///
    /// Authorless entries are placeholder data and never reach the graph.
    #[must_use]
    pub fn has_authors(&self) -> bool {
        !self.authors.is_empty()
    }

    /// Extract the paper identifier from an entry URI.
    ///
    /// `http://arxiv.org/abs/hep-th/9901001v1` becomes `hep-th/9901001v1`; URIs
    /// without `/abs/` are returned unchanged.
    #[must_use]
    pub fn id_from_uri(uri: &str) -> &str {
        uri.rsplit("/abs/").next().unwrap_or(uri)
    }
}

/// A decoded feed document.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    /// Total results the source reports for the whole query.
    pub total_results: u64,

    /// Entries in document order.
    pub records: Vec<Record>,
}

/// One page handed from the fetcher to the builder.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Offset requested for this page.
    pub offset: u64,

    /// Records with at least one author.
    pub records: Vec<Record>,

    /// Entries dropped because they listed no authors.
    pub skipped: usize,
}

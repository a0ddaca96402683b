//! Category/year search query.

use std::fmt;

/// One (category, year) slice of the arXiv listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// arXiv category code, e.g. `cs.AI` or `physics.soc-ph`.
    pub category: String,

    /// Calendar year of submission.
    pub year: i32,
}

impl SearchQuery {
    /// Create a query for one category and year.
    #[must_use]
    pub fn new(category: impl Into<String>, year: i32) -> Self {
        Self { category: category.into(), year }
    }

    /// The `search_query` parameter value.
    ///
    /// Bounded by submission date from January 1st 00:00 to December 31st 23:59.
    #[must_use]
    pub fn search_query(&self) -> String {
        format!(
            "submittedDate:[{year}01010000 TO {year}12312359] AND cat:{category}",
            year = self.year,
            category = self.category
        )
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.year)
    }
}

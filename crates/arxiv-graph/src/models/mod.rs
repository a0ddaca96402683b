//! Data models for arXiv feed entities.
//!
//! Records are transient: they live for the duration of one page and are
//! folded into the year's graph by the builder.

mod query;
mod record;

pub use query::SearchQuery;
pub use record::{Feed, Page, Record};

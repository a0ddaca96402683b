//! Atom feed decoding.
//!
//! The arXiv API answers every query with an Atom document extended with
//! OpenSearch elements. Only the pieces the graph needs are kept: the
//! declared result count and, per entry, id, title, summary, publication date
//! and author names. Namespace prefixes are ignored (`opensearch:totalResults`
//! is matched by its local name).

use chrono::DateTime;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::FeedError;
use crate::models::{Feed, Record};

/// Element whose text is currently being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
    TotalResults,
}

impl Field {
    fn element_name(self) -> &'static [u8] {
        match self {
            Self::Id => b"id",
            Self::Title => b"title",
            Self::Summary => b"summary",
            Self::Published => b"published",
            Self::AuthorName => b"name",
            Self::TotalResults => b"totalResults",
        }
    }
}

/// Decode one feed document.
///
/// # Errors
///
/// Fails on malformed XML, a missing `totalResults`, non-numeric OpenSearch
/// values or a publication date that is not RFC 3339.
pub fn parse_feed(xml: &str) -> Result<Feed, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut feed = Feed::default();
    let mut total_results = None;

    let mut in_entry = false;
    let mut in_author = false;
    let mut current = Record::default();
    let mut reading: Option<Field> = None;
    let mut text_buf = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if reading.is_some() {
                    continue;
                }
                let field = match e.local_name().as_ref() {
                    b"entry" => {
                        in_entry = true;
                        current = Record::default();
                        None
                    }
                    b"author" if in_entry => {
                        in_author = true;
                        None
                    }
                    b"name" if in_author => Some(Field::AuthorName),
                    b"id" if in_entry => Some(Field::Id),
                    b"title" if in_entry => Some(Field::Title),
                    b"summary" if in_entry => Some(Field::Summary),
                    b"published" if in_entry => Some(Field::Published),
                    b"totalResults" if !in_entry => Some(Field::TotalResults),
                    _ => None,
                };
                if field.is_some() {
                    reading = field;
                    text_buf.clear();
                }
            }

            Event::Text(e) => {
                if reading.is_some() {
                    text_buf.push_str(&e.unescape()?);
                }
            }

            Event::CData(e) => {
                if reading.is_some() {
                    text_buf.push_str(&String::from_utf8_lossy(&e));
                }
            }

            Event::End(e) => {
                let name = e.local_name();
                let name = name.as_ref();

                if let Some(field) = reading {
                    if name == field.element_name() {
                        reading = None;
                        let text = text_buf.trim();
                        match field {
                            Field::Id => current.id = Record::id_from_uri(text).to_string(),
                            Field::Title => current.title = text.to_string(),
                            Field::Summary => current.summary = text.to_string(),
                            Field::Published => {
                                current.published = Some(
                                    DateTime::parse_from_rfc3339(text).map_err(|source| {
                                        FeedError::InvalidDate { value: text.to_string(), source }
                                    })?,
                                );
                            }
                            Field::AuthorName => {
                                if !text.is_empty() {
                                    current.authors.push(text.to_string());
                                }
                            }
                            Field::TotalResults => {
                                total_results = Some(parse_count("totalResults", text)?);
                            }
                        }
                    }
                } else if name == b"author" {
                    in_author = false;
                } else if name == b"entry" && in_entry {
                    in_entry = false;
                    feed.records.push(std::mem::take(&mut current));
                }
            }

            Event::Eof => break,
            _ => {}
        }
    }

    feed.total_results = total_results.ok_or(FeedError::MissingTotal)?;
    Ok(feed)
}

fn parse_count(field: &'static str, text: &str) -> Result<u64, FeedError> {
    text.parse().map_err(|_| FeedError::InvalidNumber { field, value: text.to_string() })
}

//! arXiv co-authorship graph harvester
//!
//! Retrieves paper metadata for one arXiv category, year by year, and turns
//! each year into a bipartite paper/author graph exported as two CSV tables
//! (a node list and an edge list).
//!
//! # Features
//!
//! - **Paginated retrieval**: a one-record request sizes the year, then pages of
//!   up to 200 entries are streamed in order
//! - **Rate-limited**: a fixed pause follows every page request
//! - **Fuzzy author identity**: NFKD-normalised names are merged with the
//!   closest existing key above a Ratcliff/Obershelp similarity cutoff
//! - **Fail-fast**: nothing is retried; a failed year can abort the run or be skipped
//!
//! # Example
//!
//! ```no_run
//! use arxiv_graph::{Config, FailurePolicy, Harvester};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let harvester = Harvester::from_config(&config)?;
//!
//!     let reports = harvester.run("cs.DL", 2018..=2019, FailurePolicy::Abort).await;
//!     let completed = reports.iter().filter(|r| r.is_completed()).count();
//!     println!("{completed} of {} years harvested", reports.len());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod fetcher;
pub mod graph;
pub mod harvest;
pub mod models;
pub mod similarity;

pub use builder::GraphBuilder;
pub use client::ArxivClient;
pub use config::Config;
pub use error::{ClientError, ExportError, FeedError, HarvestError, ValidationError};
pub use export::Exporter;
pub use fetcher::{Fetcher, FixedDelay, Pacer};
pub use graph::{BipartiteGraph, Partition};
pub use harvest::{FailurePolicy, Harvester, YearReport, YearSummary};

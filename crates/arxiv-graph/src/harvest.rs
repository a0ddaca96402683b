//! Per-year orchestration: count, fetch pages, build the graph, export.
//!
//! Years run strictly one after another. Each year starts from an empty graph
//! which is dropped once its tables are written, so author identities never
//! carry over between years.

use std::ops::RangeInclusive;
use std::sync::Arc;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::builder::GraphBuilder;
use crate::client::ArxivClient;
use crate::config::Config;
use crate::error::{ClientResult, HarvestError, HarvestResult};
use crate::export::{ExportPaths, Exporter};
use crate::fetcher::{Fetcher, FixedDelay, Pacer};
use crate::graph::{BipartiteGraph, Partition};
use crate::models::SearchQuery;

/// What to do when a year fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failed year.
    #[default]
    Abort,
    /// Record the failure and continue with the next year.
    Skip,
}

/// Counters gathered while building one year's graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Declared total from the count request.
    pub total_results: u64,
    /// Pages fetched.
    pub pages: usize,
    /// Records ingested.
    pub records: usize,
    /// Records dropped for listing no authors.
    pub skipped_records: usize,
    /// Author names folded into an existing key.
    pub merged_names: usize,
    /// Records whose paper id was already in the graph.
    pub duplicate_papers: usize,
}

/// Result of one completed year.
#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    /// arXiv category.
    pub category: String,
    /// Harvested year.
    pub year: i32,
    /// Retrieval counters.
    pub stats: BuildStats,
    /// Paper nodes.
    pub papers: usize,
    /// Author nodes.
    pub authors: usize,
    /// Edges.
    pub edges: usize,
    /// Written tables.
    pub paths: ExportPaths,
}

/// Outcome of one year within [`Harvester::run`].
#[derive(Debug)]
pub enum YearReport {
    /// Tables written.
    Completed(YearSummary),
    /// Failed under [`FailurePolicy::Skip`]; the run went on.
    Skipped(HarvestError),
    /// Failed under [`FailurePolicy::Abort`]; always the last report of a run.
    Aborted(HarvestError),
}

impl YearReport {
    /// Year this report is about.
    #[must_use]
    pub const fn year(&self) -> i32 {
        match self {
            Self::Completed(summary) => summary.year,
            Self::Skipped(error) | Self::Aborted(error) => error.year(),
        }
    }

    /// The failure, if the year did not complete.
    #[must_use]
    pub const fn error(&self) -> Option<&HarvestError> {
        match self {
            Self::Completed(_) => None,
            Self::Skipped(error) | Self::Aborted(error) => Some(error),
        }
    }

    /// Whether the year's tables were written.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Drives fetch, build and export for a range of years.
#[derive(Debug, Clone)]
pub struct Harvester {
    fetcher: Fetcher,
    builder: GraphBuilder,
    exporter: Exporter,
    show_progress: bool,
}

impl Harvester {
    /// Assemble a harvester from its parts.
    #[must_use]
    pub fn new(fetcher: Fetcher, builder: GraphBuilder, exporter: Exporter) -> Self {
        Self { fetcher, builder, exporter, show_progress: false }
    }

    /// Build the whole pipeline from configuration, pacing with a fixed delay.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let pacer: Arc<dyn Pacer> = Arc::new(FixedDelay::new(config.rate_limit_delay));
        Self::with_pacer(config, pacer)
    }

    /// Build the whole pipeline from configuration with a custom pacer.
    ///
    /// The configuration is validated first; an invalid one is rejected
    /// before any request is made.
    pub fn with_pacer(config: &Config, pacer: Arc<dyn Pacer>) -> ClientResult<Self> {
        let client = ArxivClient::new(config)?;
        let page_size = config.checked_page_size()?;
        Ok(Self::new(
            Fetcher::new(client, page_size, pacer),
            GraphBuilder::new(config.similarity_cutoff),
            Exporter::new(&config.output_dir),
        ))
    }

    /// Show a progress bar per year.
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fetch every page of `query` into a fresh graph.
    pub async fn build_graph(
        &self,
        query: &SearchQuery,
    ) -> ClientResult<(BipartiteGraph, BuildStats)> {
        let total = self.fetcher.total_results(query).await?;
        tracing::info!(%query, total, "Retrieving papers");

        let mut graph = BipartiteGraph::new();
        let mut stats = BuildStats { total_results: total, ..BuildStats::default() };

        let page_count = total.div_ceil(u64::from(self.fetcher.page_size()));
        let bar = self.page_bar(page_count);

        let pages = self.fetcher.pages(query, total);
        futures::pin_mut!(pages);
        while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    bar.abandon();
                    return Err(e);
                }
            };

            stats.pages += 1;
            stats.skipped_records += page.skipped;
            let (mut new_authors, mut new_edges) = (0, 0);
            for record in &page.records {
                let outcome = self.builder.ingest(record, &mut graph);
                stats.merged_names += outcome.authors_merged;
                stats.duplicate_papers += usize::from(!outcome.paper_added);
                new_authors += outcome.authors_added;
                new_edges += outcome.edges_added;
            }
            stats.records += page.records.len();
            tracing::debug!(%query, offset = page.offset, new_authors, new_edges, "Ingested page");
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok((graph, stats))
    }

    /// Harvest one year and write its tables.
    pub async fn harvest_year(&self, category: &str, year: i32) -> HarvestResult<YearSummary> {
        let query = SearchQuery::new(category, year);

        let (graph, stats) = self
            .build_graph(&query)
            .await
            .map_err(|source| HarvestError::Fetch { year, source })?;

        if graph.is_empty() {
            tracing::warn!(%query, "No papers with authors, writing empty tables");
        }
        tracing::info!(
            %query,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Saving graph"
        );
        let paths = self
            .exporter
            .export(&graph, category, year)
            .map_err(|source| HarvestError::Export { year, source })?;

        let summary = YearSummary {
            category: category.to_string(),
            year,
            stats,
            papers: graph.count(Partition::Paper),
            authors: graph.count(Partition::Author),
            edges: graph.edge_count(),
            paths,
        };

        tracing::info!(
            %query,
            papers = summary.papers,
            authors = summary.authors,
            edges = summary.edges,
            merged_names = stats.merged_names,
            skipped_records = stats.skipped_records,
            duplicate_papers = stats.duplicate_papers,
            "Year complete"
        );

        Ok(summary)
    }

    /// Harvest every year in `years`, in order, reporting on each attempted year.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure ends the run with a
    /// [`YearReport::Aborted`] entry and later years are not attempted. Reports
    /// and tables of earlier years are kept either way.
    pub async fn run(
        &self,
        category: &str,
        years: RangeInclusive<i32>,
        policy: FailurePolicy,
    ) -> Vec<YearReport> {
        tracing::info!(
            category,
            from = years.start(),
            to = years.end(),
            output_dir = %self.exporter.output_dir().display(),
            "Searching arXiv papers"
        );

        let mut reports = Vec::new();
        for year in years {
            let error = match self.harvest_year(category, year).await {
                Ok(summary) => {
                    reports.push(YearReport::Completed(summary));
                    continue;
                }
                Err(error) => error,
            };

            let transient = match &error {
                HarvestError::Fetch { source, .. } => source.is_transient(),
                HarvestError::Export { .. } => false,
            };
            match policy {
                FailurePolicy::Abort => {
                    tracing::error!(category, year, transient, %error, "Aborting run");
                    reports.push(YearReport::Aborted(error));
                    break;
                }
                FailurePolicy::Skip => {
                    tracing::warn!(category, year, transient, %error, "Skipping year");
                    reports.push(YearReport::Skipped(error));
                }
            }
        }

        reports
    }

    fn page_bar(&self, pages: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(pages);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/dim}] {percent}% ({pos}/{len} pages)")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        bar.set_message("Pulling data");
        bar
    }
}

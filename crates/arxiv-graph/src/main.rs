//! arXiv graph harvester - Entry Point
//!
//! One-shot batch job: harvests a category over an inclusive year range and
//! writes a node list and an edge list per year.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_graph::{Config, FailurePolicy, Harvester, ValidationError, YearReport};

#[derive(Parser, Debug)]
#[command(name = "arxiv-graph")]
#[command(about = "Harvest arXiv papers into per-year bipartite author/paper graphs")]
#[command(version)]
struct Cli {
    /// arXiv category code (e.g. cs.DL, physics.soc-ph)
    category: String,

    /// First year to harvest
    #[arg(long)]
    from: i32,

    /// Last year to harvest, inclusive (defaults to --from)
    #[arg(long)]
    to: Option<i32>,

    /// Records per page request (default 200)
    #[arg(long)]
    page_size: Option<u32>,

    /// Seconds to wait after each page request (default 3)
    #[arg(long)]
    delay: Option<f64>,

    /// Similarity cutoff for merging author names, 0 to 1 (default 0.6)
    #[arg(long)]
    cutoff: Option<f64>,

    /// Root directory for node and edge tables (default ./datasets)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// arXiv query endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// What to do when a year fails
    #[arg(long, value_enum, default_value = "abort")]
    on_error: OnError,

    /// Hide the per-year progress bar
    #[arg(long)]
    no_progress: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs and year summaries as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OnError {
    /// Stop at the first failed year
    #[default]
    Abort,
    /// Log the failure and continue with the next year
    Skip,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => Self::Abort,
            OnError::Skip => Self::Skip,
        }
    }
}

impl Cli {
    /// Defaults, overridden by environment, overridden by flags.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env()?;

        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(delay) = self.delay {
            config.rate_limit_delay = Duration::try_from_secs_f64(delay)
                .map_err(|e| ValidationError::new("delay", e.to_string()))?;
        }
        if let Some(cutoff) = self.cutoff {
            config.similarity_cutoff = cutoff;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(url) = &self.api_url {
            config.api_url.clone_from(url);
        }

        config.validate()?;
        Ok(config)
    }

    fn years(&self) -> Result<std::ops::RangeInclusive<i32>, ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::new("category", "cannot be empty"));
        }
        let to = self.to.unwrap_or(self.from);
        if to < self.from {
            return Err(ValidationError::new(
                "to",
                format!("{to} is before the first year {}", self.from),
            ));
        }
        Ok(self.from..=to)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

fn print_report(report: &YearReport, json: bool) -> anyhow::Result<()> {
    match report {
        YearReport::Completed(summary) if json => {
            println!("{}", serde_json::to_string(summary)?);
        }
        YearReport::Completed(summary) => {
            println!(
                "{}: {} papers, {} authors, {} edges -> {}, {}",
                summary.year,
                summary.papers,
                summary.authors,
                summary.edges,
                summary.paths.nodes.display(),
                summary.paths.edges.display()
            );
        }
        YearReport::Skipped(error) | YearReport::Aborted(error) if json => {
            let line = serde_json::json!({
                "year": error.year(),
                "error": error.to_string(),
                "aborted": matches!(report, YearReport::Aborted(_)),
            });
            println!("{line}");
        }
        YearReport::Skipped(error) => println!("{}: skipped ({error})", error.year()),
        YearReport::Aborted(error) => println!("{}: failed, run aborted ({error})", error.year()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let years = cli.years()?;
    let config = cli.config()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        category = %cli.category,
        from = years.start(),
        to = years.end(),
        page_size = config.page_size,
        delay_secs = config.rate_limit_delay.as_secs_f64(),
        "Starting arXiv graph harvest"
    );

    let harvester = Harvester::from_config(&config)?.show_progress(!cli.no_progress);
    let reports = harvester.run(&cli.category, years, cli.on_error.into()).await;

    for report in &reports {
        print_report(report, cli.json_logs)?;
    }

    if let Some(YearReport::Aborted(error)) = reports.last() {
        anyhow::bail!("harvest of {} aborted at {}: {error}", cli.category, error.year());
    }
    let failed = reports.iter().filter(|r| !r.is_completed()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} years failed", reports.len());
    }

    Ok(())
}

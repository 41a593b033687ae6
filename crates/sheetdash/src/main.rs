//! sheetdash - command line entry point

use anyhow::{bail, Context, Result};
use clap::Parser;
use sheetdash::{write_view, ChartPeriods, Dashboard, OutputTarget};
use sheetdash_common::{init_logging, CsvFileSource, DashError, RecordSource};
use sheetdash_config::{Config, ConfigLoader, OutputFormat};
use sheetdash_graphs::{BitmapRenderer, Granularity};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    /// E-mail address of the signed-in client
    #[arg(short, long)]
    email: Option<String>,

    /// Read responses from a local CSV export instead of the client's sheet
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Period of the active customers chart (daily, weekly, monthly)
    #[arg(long)]
    customers_period: Option<Granularity>,

    /// Period of the total sales chart (daily, weekly, monthly)
    #[arg(long)]
    sales_period: Option<Granularity>,

    /// Output directory; JSON goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (json, png, both)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Show empty periods as zero-height bars
    #[arg(long)]
    fill_gaps: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
    .context("Failed to load configuration")?;

    let mut logging = config.logging.to_logging_config();
    if let Some(level) = &args.log_level {
        logging.level.clone_from(level);
    }
    init_logging(logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting sheetdash v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args, config).await {
        match e.downcast_ref::<DashError>() {
            Some(err) if err.is_caller_error() => warn!("Dashboard request rejected: {e:#}"),
            _ => error!("Dashboard failed: {e:#}"),
        }
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args, config: Config) -> Result<()> {
    let periods = ChartPeriods {
        customers: match args.customers_period {
            Some(period) => period,
            None => config.charts.customers_granularity()?,
        },
        sales: match args.sales_period {
            Some(period) => period,
            None => config.charts.sales_granularity()?,
        },
    };

    let dashboard =
        Dashboard::from_config(&config)?.with_fill_gaps(args.fill_gaps || config.charts.fill_gaps);

    let view = match (&args.csv, &args.email) {
        (Some(path), email) => {
            let client = match email {
                Some(email) => Some(dashboard.client(email).await?),
                None => None,
            };
            let source = CsvFileSource::new(path);
            info!("Reading responses from {}", source.describe());
            dashboard.view_from_source(&source, client, periods).await?
        }
        (None, Some(email)) => dashboard.view_for(email, periods).await?,
        (None, None) => bail!("Either --email or --csv is required"),
    };

    let format = args.format.unwrap_or(config.output.format);
    let target = OutputTarget::from_option(
        args.output
            .or_else(|| config.output.directory.as_ref().map(PathBuf::from)),
    );
    let renderer = BitmapRenderer::new(config.graph.to_graph_config());

    for path in write_view(&view, format, &target, &renderer)? {
        info!("Wrote {}", path.display());
    }
    Ok(())
}

// ==========================================
// 路线客户对账工具 - 命令行入口
// ==========================================
// 子命令: route-changes / cross-reference / compare-snapshots
// 退出码: 正常完成与交叉比对中止均为 0；硬错误非 0
// ==========================================

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use route_reconcile::config::ReconcileConfig;
use route_reconcile::domain::RouteNumber;
use route_reconcile::report;
use route_reconcile::{logging, CrossReferenceApi, RouteChangesApi, SnapshotCompareApi};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "route-reconcile",
    author,
    version,
    about = "Reconcile route-optimization customers against the customer database."
)]
struct Cli {
    /// Config file (TOML). Defaults to <config_dir>/route-reconcile/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-route NEW / REMOVED customers between the route CSV and the database.
    RouteChanges(SourceArgs),

    /// Split NEW customers by whether the inventory extract knows them.
    CrossReference(CrossReferenceArgs),

    /// Compare customers between a backup database and the current one.
    CompareSnapshots(CompareSnapshotsArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Route-optimization CSV export.
    #[arg(long)]
    route_csv: Option<PathBuf>,

    /// Customer database (opened read-only).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Route allow-list, comma separated (e.g. 5,9,11).
    #[arg(long, value_delimiter = ',')]
    routes: Option<Vec<RouteNumber>>,
}

#[derive(Args)]
struct CrossReferenceArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// CustomerMaster inventory extract (.csv or .xlsx).
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Sample items shown per customer with inventory.
    #[arg(long)]
    sample_items: Option<usize>,
}

#[derive(Args)]
struct CompareSnapshotsArgs {
    /// Backup database.
    #[arg(long)]
    backup: PathBuf,

    /// Current database. Defaults to the configured database.
    #[arg(long)]
    current: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl SourceArgs {
    fn apply(self, config: &mut ReconcileConfig) {
        if let Some(path) = self.route_csv {
            config.route_csv_path = path;
        }
        if let Some(path) = self.database {
            config.database_path = path;
        }
        if let Some(routes) = self.routes {
            config.routes = routes;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    tracing::debug!(version = route_reconcile::VERSION, "启动");

    let mut config = ReconcileConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::RouteChanges(args) => {
            args.apply(&mut config);
            let changes = RouteChangesApi::new(config).analyze()?;
            match cli.format {
                OutputFormat::Text => report::write_route_changes(&mut out, &changes)?,
                OutputFormat::Json => report::write_json(&mut out, &changes)?,
            }
        }
        Command::CrossReference(args) => {
            args.sources.apply(&mut config);
            if let Some(path) = args.inventory {
                config.inventory_path = path;
            }
            if let Some(sample_items) = args.sample_items {
                config.sample_items = sample_items;
            }

            let outcome = CrossReferenceApi::new(config).run()?;
            match cli.format {
                OutputFormat::Text => report::write_cross_reference(&mut out, &outcome)?,
                OutputFormat::Json => report::write_json(&mut out, &outcome)?,
            }
        }
        Command::CompareSnapshots(args) => {
            let current = args.current.unwrap_or_else(|| config.database_path.clone());
            let comparison = SnapshotCompareApi::new().compare(&args.backup, &current)?;
            match cli.format {
                OutputFormat::Text => report::write_snapshot_comparison(&mut out, &comparison)?,
                OutputFormat::Json => report::write_json(&mut out, &comparison)?,
            }
        }
    }

    out.flush()?;
    Ok(())
}

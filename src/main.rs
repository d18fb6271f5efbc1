//! txreview main entry point

use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use tokio::runtime::Builder;
use txreview_config::Config;
use txreview_core::{CoreError, ViewController, ViewSnapshot};
use txreview_data::MockBackend;
use txreview_utils::{approval_mark, fit, format_money};

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "txreview")]
#[command(version = "0.1.0")]
#[command(about = "Review transactions, filter by employee and record approvals", long_about = None)]
struct Args {
    /// Configuration file path; without it `config.yaml` is used if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show a single employee's transactions; an empty id shows everyone
    #[arg(short, long)]
    employee: Option<String>,

    /// Load this many additional pages
    #[arg(short, long, default_value_t = 0)]
    more: usize,

    /// Approve a transaction (repeatable)
    #[arg(long = "approve", value_name = "TRANSACTION_ID")]
    approve: Vec<String>,

    /// Reject a transaction (repeatable)
    #[arg(long = "reject", value_name = "TRANSACTION_ID")]
    reject: Vec<String>,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG),
    };
    let config = loaded.map_err(|e| anyhow::anyhow!("{}", e.to_details()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    log::info!(
        target: "txreview",
        "Config loaded: data path={}, page size={}",
        config.data.path.display(),
        config.feed.page_size
    );

    let rt = Builder::new_current_thread().enable_all().build()?;
    rt.block_on(run(args, config))
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let backend = MockBackend::load(&config.data.path, config.feed.clone())
        .await
        .map_err(report)?;

    let controller =
        ViewController::new(backend.collaborators()).with_auto_load(config.view.auto_load);

    if let Err(e) = controller.load_employees().await {
        eprintln!("{}", e.to_details());
    }

    if !config.view.auto_load && args.employee.is_none() {
        controller.select_all().await.map_err(report)?;
    }

    if args.employee.is_some() {
        controller
            .apply_filter(args.employee.as_deref())
            .await
            .map_err(report)?;
    }

    for _ in 0..args.more {
        if !controller.more_available() {
            break;
        }
        controller.view_more().await.map_err(report)?;
    }

    let toggles = args
        .approve
        .iter()
        .map(|id| (id, true))
        .chain(args.reject.iter().map(|id| (id, false)));
    for (id, value) in toggles {
        if let Err(e) = controller.toggle_approval(id, value).await {
            eprintln!("{}", e.to_details());
        }
    }

    let snapshot = controller.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        render(&snapshot, &config.view.currency);
    }

    Ok(())
}

/// Surface a core failure with its hints
fn report(error: CoreError) -> anyhow::Error {
    anyhow::anyhow!("{}", error.to_details())
}

fn render(snapshot: &ViewSnapshot, currency: &str) {
    match &snapshot.active_feed {
        Some(feed) => println!("Transactions: {}", feed),
        None => println!("Transactions: none selected"),
    }

    let Some(rows) = &snapshot.transactions else {
        println!("  (not loaded)");
        return;
    };

    if rows.is_empty() {
        println!("  (no transactions)");
    }

    for row in rows {
        let tx = &row.transaction;
        println!(
            "  {} {:<8} {} {} {} {:>14}",
            approval_mark(row.approved),
            fit(&tx.id, 8),
            tx.date,
            fit(&tx.merchant, 20),
            fit(&tx.employee.full_name(), 18),
            format_money(tx.amount, currency)
        );
    }

    if snapshot.can_view_more() {
        println!("  ... more available (use --more)");
    }
}

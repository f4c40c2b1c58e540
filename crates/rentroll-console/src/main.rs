/*
[INPUT]:  CLI arguments, YAML configuration file, RENTROLL__* environment
[OUTPUT]: Expense/report commands or the interactive console
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or logging setup
*/

mod cli;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use rentroll_console::ReportViewer;
use rentroll_console::config::DEFAULT_CONFIG_FILE;

use cli::AppContext;
use cli::expenses::ExpenseCommand;
use cli::report::ReportCommand;
use tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

#[derive(Parser, Debug)]
#[command(name = "rentroll-console", version, about = "RentRoll expense and report console")]
struct Cli {
    /// YAML config; `rentroll.yaml` in the working directory when omitted
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Business unit designation (BUD) to work on
    #[arg(long = "business", value_name = "BUD", global = true)]
    business: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter configuration file
    Init {
        #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
    /// List, show, add, edit and reverse expenses
    #[command(subcommand)]
    Expenses(ExpenseCommand),
    /// View and export reports
    #[command(subcommand)]
    Report(ReportCommand),
    /// Interactive expense grid, form and report viewer
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Command::Init { path, force } => {
            init_tracing(&args.log_level)?;
            cli::init::run_init(path, force)
        }
        Command::Expenses(command) => {
            init_tracing(&args.log_level)?;
            let ctx = AppContext::load(args.config_path.as_deref(), args.business.as_deref())?;
            cli::expenses::run_expenses(ctx, command).await
        }
        Command::Report(command) => {
            init_tracing(&args.log_level)?;
            let ctx = AppContext::load(args.config_path.as_deref(), args.business.as_deref())?;
            cli::report::run_report(ctx, command).await
        }
        Command::Tui => {
            let log_buffer = LogBuffer::handle(LOG_BUFFER_CAPACITY);
            let _guard = init_tui_tracing(&args.log_level, log_buffer.clone())?;
            let ctx = AppContext::load(args.config_path.as_deref(), args.business.as_deref())?;
            info!(
                bid = ctx.business.bid,
                bud = %ctx.business.bud,
                server = %ctx.config.server.base_url,
                "starting rentroll-console"
            );

            let range = cli::current_month()?;
            let workspace = ctx.workspace(range);
            let mut viewer = ReportViewer::new(ctx.client.clone(), ctx.business.bid, range);
            viewer.select(&ctx.config.report.default_report);
            tui::run_tui(workspace, viewer, ctx.config.report.page, log_buffer).await
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// The terminal belongs to the UI: logs go to the Logs tab and a daily file
fn init_tui_tracing(log_level: &str, log_buffer: LogBufferHandle) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let log_dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("rentroll-console");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "rentroll-console.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(LogWriterFactory::new(log_buffer).and(file_writer))
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

/*
[INPUT]:  `report` subcommand arguments, AppContext
[OUTPUT]: Report URL and content on stdout, CSV/PDF files on disk
[POS]:    CLI layer - report viewer and export triggers
[UPDATE]: When page options or export formats change
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use console::style;
use rust_decimal::Decimal;

use rentroll_console::report::{Orientation, PageSize};
use rentroll_console::{PageSetup, ReportViewer};

use super::{AppContext, parse_date_arg, range_from_args};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Csv,
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    Landscape,
    Portrait,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::Portrait => Orientation::Portrait,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Print a report for a date range
    View {
        /// Report name; configured default when omitted
        name: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        stop: Option<NaiveDate>,
        /// Only print the report URL
        #[arg(long)]
        url: bool,
    },
    /// Download a report as CSV or PDF
    Export {
        name: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        stop: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = ExportKind::Pdf)]
        format: ExportKind,
        /// USLetter, Legal, Ledger or Custom
        #[arg(long)]
        page_size: Option<String>,
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,
        /// Custom page width in inches
        #[arg(long)]
        width: Option<Decimal>,
        /// Custom page height in inches
        #[arg(long)]
        height: Option<Decimal>,
        /// Directory to write the file to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn viewer(
    ctx: &AppContext,
    name: Option<String>,
    start: Option<NaiveDate>,
    stop: Option<NaiveDate>,
) -> Result<ReportViewer> {
    let mut viewer = ReportViewer::new(
        ctx.client.clone(),
        ctx.business.bid,
        range_from_args(start, stop)?,
    );
    let name = name.unwrap_or_else(|| ctx.config.report.default_report.clone());
    if !viewer.select(&name) {
        bail!("no report name given");
    }
    Ok(viewer)
}

/// Configured page setup with command-line overrides applied
pub fn page_setup(
    base: PageSetup,
    size: Option<&str>,
    orientation: Option<OrientationArg>,
    width: Option<Decimal>,
    height: Option<Decimal>,
) -> Result<PageSetup> {
    let mut setup = base;
    if let Some(name) = size {
        setup.size = PageSize::from_name(name, width, height)
            .with_context(|| format!("unknown page size {name} (Custom needs --width and --height)"))?;
    }
    if let Some(orientation) = orientation {
        setup.orientation = orientation.into();
    }
    setup.pdf_page()?;
    Ok(setup)
}

pub async fn run_report(ctx: AppContext, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::View {
            name,
            start,
            stop,
            url,
        } => {
            let mut viewer = viewer(&ctx, name, start, stop)?;
            if url {
                println!("{}", viewer.url()?);
                return Ok(());
            }
            let content = viewer.load().await?;
            println!("{content}");
        }
        ReportCommand::Export {
            name,
            start,
            stop,
            format,
            page_size,
            orientation,
            width,
            height,
            out,
        } => {
            let viewer = viewer(&ctx, name, start, stop)?;
            let exported = match format {
                ExportKind::Csv => viewer.export_csv().await?,
                ExportKind::Pdf => {
                    let setup = page_setup(
                        ctx.config.report.page,
                        page_size.as_deref(),
                        orientation,
                        width,
                        height,
                    )?;
                    println!("{} {}", style("Page:").dim(), setup.size);
                    viewer.export_pdf(&setup).await?
                }
            };
            let path = exported.write_to(&out)?;
            println!(
                "{} {}",
                style("Exported").green(),
                style(path.display()).cyan()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_config() {
        let setup = page_setup(
            PageSetup::default(),
            Some("legal"),
            Some(OrientationArg::Portrait),
            None,
            None,
        )
        .expect("setup");
        assert_eq!(setup.size, PageSize::Legal);
        assert_eq!(setup.orientation, Orientation::Portrait);
    }

    #[test]
    fn custom_size_needs_dimensions() {
        assert!(page_setup(PageSetup::default(), Some("Custom"), None, None, None).is_err());
        let setup = page_setup(
            PageSetup::default(),
            Some("Custom"),
            None,
            Some(Decimal::new(7, 0)),
            Some(Decimal::new(9, 0)),
        )
        .expect("custom");
        assert_eq!(
            setup.size,
            PageSize::Custom {
                width: Decimal::new(7, 0),
                height: Decimal::new(9, 0),
            }
        );
    }
}

/*
[INPUT]:  Report name, business, date range, PDF page settings
[OUTPUT]: Report URLs, loaded report content, CSV/PDF export files
[POS]:    Report viewer - date-range navigation and export triggers
[UPDATE]: When page sizes, export naming or navigation rules change
*/

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rentroll_adapter::{
    ExportFormat, PdfPage, RentrollClient, RentrollError, ReportExport, ReportRequest,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::dates::{DateRange, DateRangeError};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no report selected")]
    NoReport,
    #[error("custom page size needs a positive width and height")]
    InvalidPage,
    #[error(transparent)]
    Range(#[from] DateRangeError),
    #[error(transparent)]
    Api(#[from] RentrollError),
    #[error("write export: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF paper size, dimensions in inches (portrait)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    #[serde(rename = "USLetter", alias = "Letter")]
    UsLetter,
    Legal,
    Ledger,
    #[serde(alias = "custom")]
    Custom { width: Decimal, height: Decimal },
}

impl PageSize {
    /// Width and height in portrait orientation
    pub fn dimensions(&self) -> (Decimal, Decimal) {
        match self {
            PageSize::UsLetter => (Decimal::new(85, 1), Decimal::new(11, 0)),
            PageSize::Legal => (Decimal::new(85, 1), Decimal::new(14, 0)),
            PageSize::Ledger => (Decimal::new(11, 0), Decimal::new(17, 0)),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Look up a named size; `Custom` takes the supplied dimensions
    pub fn from_name(
        name: &str,
        width: Option<Decimal>,
        height: Option<Decimal>,
    ) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "usletter" | "letter" => Some(PageSize::UsLetter),
            "legal" => Some(PageSize::Legal),
            "ledger" => Some(PageSize::Ledger),
            "custom" => Some(PageSize::Custom {
                width: width?,
                height: height?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::UsLetter => f.write_str("US Letter (8.5 x 11 in)"),
            PageSize::Legal => f.write_str("Legal (8.5 x 14 in)"),
            PageSize::Ledger => f.write_str("Ledger (11 x 17 in)"),
            PageSize::Custom { width, height } => write!(f, "Custom ({width} x {height} in)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "LandScape", alias = "Landscape")]
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSetup {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
}

impl PageSetup {
    /// Page dimensions sent with a PDF export; landscape swaps width and height
    pub fn pdf_page(&self) -> Result<PdfPage, ReportError> {
        let (width, height) = self.size.dimensions();
        if width <= Decimal::ZERO || height <= Decimal::ZERO {
            return Err(ReportError::InvalidPage);
        }
        Ok(match self.orientation {
            Orientation::Portrait => PdfPage { width, height },
            Orientation::Landscape => PdfPage {
                width: height,
                height: width,
            },
        })
    }
}

/// Downloaded export ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedReport {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `{report}-{start}-{stop}.{ext}` with ISO dates
///
/// Anything but ASCII letters, digits, `-` and `_` in the report name becomes
/// `_`, so the file always lands directly in the export directory.
pub fn export_file_name(request: &ReportRequest, format: ExportFormat) -> String {
    let report: String = request
        .report
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}-{}-{}.{}",
        report,
        request.start.format("%Y-%m-%d"),
        request.stop.format("%Y-%m-%d"),
        format.extension()
    )
}

pub struct ReportViewer {
    client: RentrollClient,
    bid: i64,
    range: DateRange,
    report: Option<String>,
    content: Option<String>,
}

impl ReportViewer {
    pub fn new(client: RentrollClient, bid: i64, range: DateRange) -> Self {
        Self {
            client,
            bid,
            range,
            report: None,
            content: None,
        }
    }

    /// Remember the report to show; a blank name is ignored
    pub fn select(&mut self, report: &str) -> bool {
        let report = report.trim();
        if report.is_empty() {
            return false;
        }
        if self.report.as_deref() != Some(report) {
            self.content = None;
        }
        self.report = Some(report.to_string());
        true
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn set_range(&mut self, range: DateRange) {
        if range != self.range {
            self.content = None;
        }
        self.range = range;
    }

    pub fn month_back(&mut self) -> Result<(), ReportError> {
        let range = self.range.month_back()?;
        self.set_range(range);
        Ok(())
    }

    pub fn month_forward(&mut self) -> Result<(), ReportError> {
        let range = self.range.month_forward()?;
        self.set_range(range);
        Ok(())
    }

    /// Jump back to the month containing `today`
    pub fn today(&mut self, today: NaiveDate) -> Result<(), ReportError> {
        let range = DateRange::month_of(today)?;
        self.set_range(range);
        Ok(())
    }

    pub fn set_start(&mut self, raw: &str) -> Result<(), ReportError> {
        let range = self.range.parse_start(raw)?;
        self.set_range(range);
        Ok(())
    }

    pub fn set_stop(&mut self, raw: &str) -> Result<(), ReportError> {
        let range = self.range.parse_stop(raw)?;
        self.set_range(range);
        Ok(())
    }

    pub fn request(&self) -> Result<ReportRequest, ReportError> {
        let report = self.report.clone().ok_or(ReportError::NoReport)?;
        Ok(ReportRequest {
            bid: self.bid,
            report,
            start: self.range.start(),
            stop: self.range.stop(),
        })
    }

    pub fn url(&self) -> Result<Url, ReportError> {
        Ok(self.client.report_url(&self.request()?)?)
    }

    /// Fetch the report for the current range
    pub async fn load(&mut self) -> Result<&str, ReportError> {
        let request = self.request()?;
        let content = self.client.fetch_report(&request).await?;
        info!(
            report = %request.report,
            range = %self.range.label(),
            size = content.len(),
            "report loaded"
        );
        Ok(self.content.insert(content).as_str())
    }

    pub async fn export_csv(&self) -> Result<ExportedReport, ReportError> {
        self.export(ReportExport::Csv).await
    }

    pub async fn export_pdf(&self, setup: &PageSetup) -> Result<ExportedReport, ReportError> {
        self.export(ReportExport::Pdf(setup.pdf_page()?)).await
    }

    async fn export(&self, export: ReportExport) -> Result<ExportedReport, ReportError> {
        let request = self.request()?;
        let bytes = self.client.export_report(&request, &export).await?;
        Ok(ExportedReport {
            file_name: export_file_name(&request, export.format()),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentroll_adapter::ClientConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn viewer() -> ReportViewer {
        let client =
            RentrollClient::with_config_and_base_url(ClientConfig::default(), "http://rr.test")
                .expect("client");
        ReportViewer::new(client, 2, DateRange::month_of(date(2024, 3, 1)).expect("range"))
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let setup = PageSetup::default();
        assert_eq!(
            setup.pdf_page().expect("page"),
            PdfPage {
                width: Decimal::new(11, 0),
                height: Decimal::new(85, 1),
            }
        );

        let portrait = PageSetup {
            size: PageSize::Legal,
            orientation: Orientation::Portrait,
        };
        assert_eq!(
            portrait.pdf_page().expect("page"),
            PdfPage {
                width: Decimal::new(85, 1),
                height: Decimal::new(14, 0),
            }
        );
    }

    #[test]
    fn custom_page_needs_positive_size() {
        let setup = PageSetup {
            size: PageSize::Custom {
                width: Decimal::ZERO,
                height: Decimal::new(5, 0),
            },
            orientation: Orientation::Portrait,
        };
        assert!(matches!(setup.pdf_page(), Err(ReportError::InvalidPage)));
        assert_eq!(PageSize::from_name("custom", None, None), None);
        assert_eq!(PageSize::from_name("Ledger", None, None), Some(PageSize::Ledger));
    }

    #[test]
    fn blank_report_name_is_ignored() {
        let mut viewer = viewer();
        assert!(!viewer.select("  "));
        assert!(matches!(viewer.url(), Err(ReportError::NoReport)));

        assert!(viewer.select("RPTrr"));
        let url = viewer.url().expect("url");
        assert_eq!(url.path(), "/wsvc/2");
        assert!(url.query().expect("query").contains("dtstart=3%2F1%2F2024"));
    }

    #[test]
    fn navigation_moves_range() {
        let mut viewer = viewer();
        viewer.month_back().expect("back");
        assert_eq!(viewer.range().start(), date(2024, 2, 1));

        viewer.set_stop("1/15/2024").expect("stop");
        assert_eq!(viewer.range().stop(), date(2024, 2, 2));

        viewer.today(date(2024, 7, 19)).expect("today");
        assert_eq!(viewer.range().start(), date(2024, 7, 1));
        assert!(matches!(
            viewer.set_start("12/1/1999"),
            Err(ReportError::Range(DateRangeError::TooEarly(_)))
        ));
    }

    #[test]
    fn export_names_use_iso_dates() {
        let request = ReportRequest {
            bid: 1,
            report: "RPTrr".to_string(),
            start: date(2024, 3, 1),
            stop: date(2024, 4, 1),
        };
        assert_eq!(
            export_file_name(&request, ExportFormat::Pdf),
            "RPTrr-2024-03-01-2024-04-01.pdf"
        );
    }

    #[test]
    fn export_names_cannot_leave_the_directory() {
        let request = ReportRequest {
            bid: 1,
            report: "../../etc/RPT rr".to_string(),
            start: date(2024, 3, 1),
            stop: date(2024, 4, 1),
        };
        let name = export_file_name(&request, ExportFormat::Csv);
        assert_eq!(name, "______etc_RPT_rr-2024-03-01-2024-04-01.csv");

        let dir = std::path::Path::new("/tmp/exports");
        assert_eq!(dir.join(&name).parent(), Some(dir));
    }
}

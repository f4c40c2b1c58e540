/*
[INPUT]:  Records edited on the client
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{ExportFormat, FormCommand};
use super::models::{ExpenseFlags, ExpenseRecord, serde_helpers};

/// Form name the expense services expect in submissions
pub const EXPENSE_FORM_NAME: &str = "expenseForm";

/// Client-editable view of an [`ExpenseRecord`]
///
/// The audit columns (`LastModTime`, `LastModBy`, `CreateTS`, `CreateBy`) are
/// owned by the server and have no field here, so they can never be submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    pub recid: i64,
    #[serde(rename = "EXPID")]
    pub expid: i64,
    #[serde(rename = "PREXPID")]
    pub prexpid: i64,
    #[serde(rename = "ARID")]
    pub arid: i64,
    #[serde(rename = "BID")]
    pub bid: i64,
    #[serde(rename = "BUD")]
    pub bud: String,
    #[serde(rename = "RID")]
    pub rid: i64,
    #[serde(rename = "RAID")]
    pub raid: i64,
    #[serde(rename = "RName")]
    pub rname: String,
    #[serde(
        rename = "Amount",
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal_number"
    )]
    pub amount: Decimal,
    #[serde(rename = "Dt", with = "serde_helpers::wire_date")]
    pub dt: NaiveDate,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "FLAGS")]
    pub flags: ExpenseFlags,
    #[serde(rename = "Mode")]
    pub mode: i64,
}

impl From<&ExpenseRecord> for ExpensePayload {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            recid: record.recid,
            expid: record.expid,
            prexpid: record.prexpid,
            arid: record.arid,
            bid: record.bid,
            bud: record.bud.clone(),
            rid: record.rid,
            raid: record.raid,
            rname: record.rname.clone(),
            amount: record.amount,
            dt: record.dt,
            comment: record.comment.clone(),
            flags: record.flags,
            mode: record.mode,
        }
    }
}

/// Body of `POST /v1/expense/{BID}/{EXPID}` for a save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveExpenseRequest {
    pub cmd: FormCommand,
    pub recid: i64,
    pub formname: String,
    pub record: ExpensePayload,
}

impl SaveExpenseRequest {
    pub fn new(record: ExpensePayload) -> Self {
        Self {
            cmd: FormCommand::Save,
            recid: record.recid,
            formname: EXPENSE_FORM_NAME.to_string(),
            record,
        }
    }
}

/// Body of the reversal request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseExpenseRequest {
    pub cmd: FormCommand,
    pub formname: String,
    #[serde(rename = "ID")]
    pub id: i64,
}

impl ReverseExpenseRequest {
    pub fn new(expid: i64) -> Self {
        Self {
            cmd: FormCommand::Delete,
            formname: EXPENSE_FORM_NAME.to_string(),
            id: expid,
        }
    }
}

/// A report of one business over a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub bid: i64,
    /// Report name as known to `/wsvc`, e.g. `RPTrr`
    pub report: String,
    pub start: NaiveDate,
    pub stop: NaiveDate,
}

/// Page dimensions of a PDF export, in inches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfPage {
    pub width: Decimal,
    pub height: Decimal,
}

/// Downloadable variant of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportExport {
    Csv,
    Pdf(PdfPage),
}

impl ReportExport {
    pub fn format(&self) -> ExportFormat {
        match self {
            ReportExport::Csv => ExportFormat::Csv,
            ReportExport::Pdf(_) => ExportFormat::Pdf,
        }
    }
}

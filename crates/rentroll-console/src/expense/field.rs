/*
[INPUT]:  Raw user input for one expense form field
[OUTPUT]: Typed field identifiers and edits applied to an ExpenseRecord
[POS]:    Expense domain - form field catalogue
[UPDATE]: When form inputs are added or their parsing changes
*/

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rentroll_adapter::{ExpenseRecord, format_wire_date, parse_wire_date};
use rust_decimal::Decimal;

/// Inputs of the expense form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseField {
    AccountRule,
    Amount,
    Date,
    RentalAgreement,
    Rentable,
    Comment,
}

impl ExpenseField {
    /// Form inputs in display order
    pub const ALL: [ExpenseField; 6] = [
        ExpenseField::AccountRule,
        ExpenseField::Amount,
        ExpenseField::Date,
        ExpenseField::RentalAgreement,
        ExpenseField::Rentable,
        ExpenseField::Comment,
    ];

    /// Column name on the wire
    pub fn wire_name(self) -> &'static str {
        match self {
            ExpenseField::AccountRule => "ARID",
            ExpenseField::Amount => "Amount",
            ExpenseField::Date => "Dt",
            ExpenseField::RentalAgreement => "RAID",
            ExpenseField::Rentable => "RName",
            ExpenseField::Comment => "Comment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpenseField::AccountRule => "Account Rule",
            ExpenseField::Amount => "Amount",
            ExpenseField::Date => "Date",
            ExpenseField::RentalAgreement => "Rental Agreement",
            ExpenseField::Rentable => "Rentable",
            ExpenseField::Comment => "Comment",
        }
    }

    /// Current value rendered for an input box
    pub fn display_value(self, record: &ExpenseRecord) -> String {
        match self {
            ExpenseField::AccountRule => {
                if record.arid == 0 {
                    String::new()
                } else if record.acct_rule.is_empty() {
                    record.arid.to_string()
                } else {
                    format!("{} ({})", record.acct_rule, record.arid)
                }
            }
            ExpenseField::Amount => record.amount.round_dp(2).to_string(),
            ExpenseField::Date => format_wire_date(record.dt),
            ExpenseField::RentalAgreement => id_or_blank(record.raid),
            ExpenseField::Rentable => record.rname.clone(),
            ExpenseField::Comment => record.comment.clone(),
        }
    }
}

impl fmt::Display for ExpenseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Rental agreement chosen from a picker; sets RAID, RID and RName together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalPick {
    pub raid: i64,
    pub rid: i64,
    pub rname: String,
}

/// A single change to the open record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    AccountRule(i64),
    Amount(Decimal),
    Date(NaiveDate),
    RentalAgreement(i64),
    Rental(RentalPick),
    Rentable(String),
    Comment(String),
}

impl FieldEdit {
    /// Parse text typed into `field`
    ///
    /// Blank ids mean "unset" (0); amounts accept a leading `$` and
    /// thousands separators.
    pub fn parse(field: ExpenseField, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        match field {
            ExpenseField::AccountRule => parse_id(raw).map(FieldEdit::AccountRule),
            ExpenseField::RentalAgreement => parse_id(raw).map(FieldEdit::RentalAgreement),
            ExpenseField::Amount => parse_amount(raw).map(FieldEdit::Amount),
            ExpenseField::Date => parse_wire_date(raw)
                .map(FieldEdit::Date)
                .ok_or_else(|| format!("'{raw}' is not a date (M/D/YYYY)")),
            ExpenseField::Rentable => Ok(FieldEdit::Rentable(raw.to_string())),
            ExpenseField::Comment => Ok(FieldEdit::Comment(raw.to_string())),
        }
    }

    pub fn field(&self) -> ExpenseField {
        match self {
            FieldEdit::AccountRule(_) => ExpenseField::AccountRule,
            FieldEdit::Amount(_) => ExpenseField::Amount,
            FieldEdit::Date(_) => ExpenseField::Date,
            FieldEdit::RentalAgreement(_) | FieldEdit::Rental(_) => ExpenseField::RentalAgreement,
            FieldEdit::Rentable(_) => ExpenseField::Rentable,
            FieldEdit::Comment(_) => ExpenseField::Comment,
        }
    }

    pub(crate) fn apply(self, record: &mut ExpenseRecord) {
        match self {
            FieldEdit::AccountRule(arid) => record.arid = arid,
            FieldEdit::Amount(amount) => record.amount = amount,
            FieldEdit::Date(dt) => record.dt = dt,
            FieldEdit::RentalAgreement(raid) => record.raid = raid,
            FieldEdit::Rental(pick) => {
                record.raid = pick.raid;
                record.rid = pick.rid;
                record.rname = pick.rname;
            }
            FieldEdit::Rentable(rname) => record.rname = rname,
            FieldEdit::Comment(comment) => record.comment = comment,
        }
    }
}

fn id_or_blank(id: i64) -> String {
    if id == 0 { String::new() } else { id.to_string() }
}

fn parse_id(raw: &str) -> Result<i64, String> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| format!("'{raw}' is not a valid id"))
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let cleaned: String = raw
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| format!("'{raw}' is not an amount"))
}

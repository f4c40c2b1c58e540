/*
[INPUT]:  Expense list responses, row selection requests
[OUTPUT]: Grid rows view-model and the highlighted row
[POS]:    Expense presentation - list side of the grid/form pair
[UPDATE]: When grid columns or selection rules change
*/

use rentroll_adapter::{ExpenseRecord, format_wire_date};

use super::view::format_money;

/// Marker shown in the first column of reversed rows
pub const REVERSED_MARKER: &str = "R";

/// One rendered grid line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub recid: i64,
    pub expid: i64,
    pub reversed: bool,
    pub marker: &'static str,
    pub date: String,
    pub account_rule: String,
    pub amount: String,
    pub rental_agreement: String,
    pub rentable: String,
    pub comment: String,
}

impl GridRow {
    fn from_record(record: &ExpenseRecord) -> Self {
        let reversed = record.is_reversed();
        let account_rule = if record.acct_rule.is_empty() {
            record.arid.to_string()
        } else {
            record.acct_rule.clone()
        };
        Self {
            recid: record.recid,
            expid: record.expid,
            reversed,
            marker: if reversed { REVERSED_MARKER } else { "" },
            date: format_wire_date(record.dt),
            account_rule,
            amount: format_money(record.amount),
            rental_agreement: if record.raid == 0 {
                String::new()
            } else {
                format!("RA{}", record.raid)
            },
            rentable: record.rname.clone(),
            comment: record.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseGrid {
    records: Vec<ExpenseRecord>,
    total: i64,
    selected: Option<i64>,
    message: Option<String>,
}

impl ExpenseGrid {
    /// Swap in a freshly loaded page; the highlight is kept if its row survived
    pub fn replace(&mut self, records: Vec<ExpenseRecord>, total: i64) {
        self.records = records;
        self.total = total;
        self.message = None;
        if let Some(recid) = self.selected {
            if self.get(recid).is_none() {
                self.selected = None;
            }
        }
    }

    pub fn rows(&self) -> Vec<GridRow> {
        self.records.iter().map(GridRow::from_record).collect()
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, recid: i64) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| record.recid == recid)
    }

    pub fn index_of(&self, recid: i64) -> Option<usize> {
        self.records.iter().position(|record| record.recid == recid)
    }

    pub fn recid_at(&self, index: usize) -> Option<i64> {
        self.records.get(index).map(|record| record.recid)
    }

    /// Highlight a row; false when no such row is loaded
    pub fn select(&mut self, recid: i64) -> bool {
        if self.get(recid).is_some() {
            self.selected = Some(recid);
            true
        } else {
            false
        }
    }

    pub fn select_none(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|recid| self.index_of(recid))
    }

    /// Server-reported row count, may exceed the loaded rows
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentroll_adapter::ExpenseFlags;
    use rust_decimal::Decimal;

    fn record(expid: i64, reversed: bool) -> ExpenseRecord {
        let mut record = ExpenseRecord::new_template(
            1,
            "REX",
            NaiveDate::from_ymd_opt(2024, 3, 9).expect("date"),
        );
        record.recid = expid;
        record.expid = expid;
        record.arid = 3;
        record.acct_rule = "Repairs".to_string();
        record.amount = Decimal::new(125000, 2);
        if reversed {
            record.flags.insert(ExpenseFlags::REVERSED);
        }
        record
    }

    #[test]
    fn rows_mark_reversals() {
        let mut grid = ExpenseGrid::default();
        grid.replace(vec![record(5, false), record(7, true)], 2);

        let rows = grid.rows();
        assert_eq!(rows[0].marker, "");
        assert_eq!(rows[1].marker, REVERSED_MARKER);
        assert_eq!(rows[0].amount, "$1,250.00");
        assert_eq!(rows[0].date, "3/9/2024");
        assert_eq!(rows[0].account_rule, "Repairs");
    }

    #[test]
    fn selection_survives_refresh_only_if_row_does() {
        let mut grid = ExpenseGrid::default();
        grid.replace(vec![record(5, false), record(7, false)], 2);
        assert!(grid.select(7));
        assert!(!grid.select(99));
        assert_eq!(grid.selected_index(), Some(1));

        grid.replace(vec![record(7, true)], 1);
        assert_eq!(grid.selected(), Some(7));

        grid.replace(vec![record(5, false)], 1);
        assert_eq!(grid.selected(), None);
    }
}

/*
[INPUT]:  Record snapshot taken at load/save, current form record
[OUTPUT]: Per-column differences and the dirty flag
[POS]:    Expense domain - unsaved change tracking
[UPDATE]: When the snapshot policy or compared columns change
*/

use std::collections::BTreeMap;

use rentroll_adapter::ExpenseRecord;
use serde_json::{Map, Value};

use super::field::ExpenseField;

/// One column that differs from the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub before: Value,
    pub after: Value,
}

/// Differences keyed by wire column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDiff(BTreeMap<String, FieldChange>);

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, column: &str) -> Option<&FieldChange> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Compare two records column by column as they would go on the wire
pub fn diff_records(current: &ExpenseRecord, original: &ExpenseRecord) -> RecordDiff {
    let current = columns(current);
    let original = columns(original);

    let mut changes = BTreeMap::new();
    for (column, after) in &current {
        let before = original.get(column).cloned().unwrap_or(Value::Null);
        if &before != after {
            changes.insert(
                column.clone(),
                FieldChange {
                    before,
                    after: after.clone(),
                },
            );
        }
    }
    RecordDiff(changes)
}

/// Wire columns, except Amount, which is compared as an exact decimal string
/// because the wire number is an f64
fn columns(record: &ExpenseRecord) -> Map<String, Value> {
    let mut map = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert(
        ExpenseField::Amount.wire_name().to_string(),
        Value::String(record.amount.normalize().to_string()),
    );
    map
}

/// Snapshot plus the current dirty flag of the open form
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    snapshot: Option<ExpenseRecord>,
    dirty: bool,
}

impl DirtyTracker {
    /// Take a fresh snapshot; the form is clean afterwards
    pub fn reset(&mut self, record: &ExpenseRecord) {
        self.snapshot = Some(record.clone());
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.dirty = false;
    }

    /// Recompute the flag after a change; returns the new flag
    pub fn update(&mut self, current: &ExpenseRecord) -> bool {
        self.dirty = !self.diff(current).is_empty();
        self.dirty
    }

    pub fn diff(&self, current: &ExpenseRecord) -> RecordDiff {
        match &self.snapshot {
            Some(snapshot) => diff_records(current, snapshot),
            None => RecordDiff::default(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn record() -> ExpenseRecord {
        let mut record = ExpenseRecord::new_template(
            1,
            "REX",
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        );
        record.expid = 5;
        record.arid = 3;
        record.amount = Decimal::new(10000, 2);
        record
    }

    #[test]
    fn unchanged_record_has_empty_diff() {
        let original = record();
        assert!(diff_records(&original, &original.clone()).is_empty());
        assert!(diff_records(&original, &original).is_empty());
    }

    #[test]
    fn amount_change_is_reported() {
        let original = record();
        let mut current = original.clone();
        current.amount = Decimal::ZERO;

        let diff = diff_records(&current, &original);
        assert_eq!(diff.len(), 1);
        let change = diff.get("Amount").expect("amount change");
        assert_eq!(change.before, json!("100"));
        assert_eq!(change.after, json!("0"));
    }

    #[test]
    fn cent_change_on_a_large_amount_is_reported() {
        let mut original = record();
        original.amount = Decimal::new(123_456_789_012_345_678, 2);
        let mut current = original.clone();
        current.amount = Decimal::new(123_456_789_012_345_679, 2);

        let diff = diff_records(&current, &original);
        assert_eq!(diff.columns().collect::<Vec<_>>(), vec!["Amount"]);
    }

    #[test]
    fn trailing_zeros_do_not_count_as_a_change() {
        let original = record();
        let mut current = original.clone();
        current.amount = Decimal::new(100, 0);
        assert!(diff_records(&current, &original).is_empty());
    }

    #[test]
    fn tracker_goes_clean_when_change_is_undone() {
        let original = record();
        let mut tracker = DirtyTracker::default();
        tracker.reset(&original);

        let mut current = original.clone();
        current.comment = "roof".to_string();
        assert!(tracker.update(&current));
        assert!(tracker.is_dirty());

        current.comment.clear();
        assert!(!tracker.update(&current));
        assert!(!tracker.update(&current));
    }
}

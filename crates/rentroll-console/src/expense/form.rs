/*
[INPUT]:  Loaded records, field edits, account rule options
[OUTPUT]: Open form state, submission payloads, FormView snapshots
[POS]:    Expense domain - single-record editor behind the grid
[UPDATE]: When edit, load or submission rules change
*/

use rentroll_adapter::{AccountRuleOption, ExpensePayload, ExpenseRecord};
use thiserror::Error;
use tracing::debug;

use super::dirty::{DirtyTracker, RecordDiff};
use super::field::{ExpenseField, FieldEdit};
use super::record_state::{FormAction, FormState, RecordStateMachine, StateError};
use super::validation::{ValidationError, validate};
use super::view::FormView;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no expense is open")]
    NotOpen,
    #[error("expense {0} is reversed and read-only")]
    ReadOnly(i64),
    #[error("another expense is loading; edits are paused")]
    Loading,
    #[error(transparent)]
    State(#[from] StateError),
    #[error("{field}: {reason}")]
    InvalidInput { field: ExpenseField, reason: String },
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Identifies one load request; only the latest is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct OpenRecord {
    record: ExpenseRecord,
    machine: RecordStateMachine,
}

#[derive(Debug, Default)]
pub struct ExpenseForm {
    open: Option<OpenRecord>,
    tracker: DirtyTracker,
    rules: Vec<AccountRuleOption>,
    errors: Vec<ValidationError>,
    message: Option<String>,
    generation: u64,
    pending: Option<LoadTicket>,
}

impl ExpenseForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn record(&self) -> Option<&ExpenseRecord> {
        self.open.as_ref().map(|open| &open.record)
    }

    pub fn state(&self) -> Option<FormState> {
        self.open.as_ref().map(|open| open.machine.state())
    }

    /// Editing an unsaved record
    pub fn is_new(&self) -> bool {
        self.state() == Some(FormState::New)
    }

    /// Start a load; any ticket handed out earlier becomes stale
    ///
    /// The open record refuses edits until the load lands or is abandoned.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// A load failed; the record on screen becomes editable again
    pub fn abandon_load(&mut self, ticket: LoadTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// Show a loaded record; returns false and changes nothing for a stale ticket
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        record: ExpenseRecord,
        rules: Vec<AccountRuleOption>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                expid = record.expid,
                ticket = ticket.0,
                latest = self.generation,
                "dropping stale expense load"
            );
            return false;
        }
        self.pending = None;
        self.show(record, rules);
        true
    }

    /// Open a record that needs no fetch, such as a fresh template
    pub fn open(&mut self, record: ExpenseRecord, rules: Vec<AccountRuleOption>) {
        let ticket = self.begin_load();
        self.finish_load(ticket, record, rules);
    }

    fn show(&mut self, mut record: ExpenseRecord, rules: Vec<AccountRuleOption>) {
        if record.acct_rule.is_empty() {
            if let Some(option) = rules.iter().find(|option| option.id == record.arid) {
                record.acct_rule = option.text.clone();
            }
        }
        self.tracker.reset(&record);
        self.open = Some(OpenRecord {
            machine: RecordStateMachine::for_record(&record),
            record,
        });
        self.rules = rules;
        self.errors.clear();
        self.message = None;
    }

    /// Apply one edit; returns the dirty flag afterwards
    pub fn apply(&mut self, edit: FieldEdit) -> Result<bool, FormError> {
        let open = self.open.as_mut().ok_or(FormError::NotOpen)?;
        if open.machine.state().is_read_only() {
            return Err(FormError::ReadOnly(open.record.expid));
        }
        if self.pending.is_some() {
            return Err(FormError::Loading);
        }
        open.machine.transition(FormAction::Edit)?;

        let field = edit.field();
        edit.apply(&mut open.record);
        if field == ExpenseField::AccountRule {
            open.record.acct_rule = self
                .rules
                .iter()
                .find(|option| option.id == open.record.arid)
                .map(|option| option.text.clone())
                .unwrap_or_default();
        }

        self.errors.retain(|err| err.field != field);
        Ok(self.tracker.update(&open.record))
    }

    /// Parse raw text for `field` and apply it
    pub fn apply_text(&mut self, field: ExpenseField, raw: &str) -> Result<bool, FormError> {
        let edit = FieldEdit::parse(field, raw)
            .map_err(|reason| FormError::InvalidInput { field, reason })?;
        self.apply(edit)
    }

    pub fn is_dirty(&self) -> bool {
        self.open.is_some() && self.tracker.is_dirty()
    }

    pub fn diff(&self) -> RecordDiff {
        match &self.open {
            Some(open) => self.tracker.diff(&open.record),
            None => RecordDiff::default(),
        }
    }

    /// Validate and build the outgoing payload
    ///
    /// Failures are kept on the form so renderers can attach them to inputs.
    pub fn prepare_submission(&mut self) -> Result<ExpensePayload, FormError> {
        let open = self.open.as_ref().ok_or(FormError::NotOpen)?;
        if !open.machine.can_transition(FormAction::Save) {
            return Err(FormError::ReadOnly(open.record.expid));
        }
        match validate(&open.record) {
            Ok(()) => {
                self.errors.clear();
                Ok(ExpensePayload::from(&open.record))
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(FormError::Validation(errors))
            }
        }
    }

    /// Accept the server copy after a save; the form is clean afterwards
    pub fn complete_save(&mut self, saved: ExpenseRecord) -> Result<FormState, FormError> {
        let open = self.open.as_mut().ok_or(FormError::NotOpen)?;
        let state = open.machine.transition(FormAction::Save)?;
        self.tracker.reset(&saved);
        open.record = saved;
        self.errors.clear();
        Ok(state)
    }

    /// The open record as the server would now hold it under `expid`
    ///
    /// Stands in for the server copy when the post-save reload fails.
    pub fn saved_copy(&self, expid: i64) -> Result<ExpenseRecord, FormError> {
        let open = self.open.as_ref().ok_or(FormError::NotOpen)?;
        let mut record = open.record.clone();
        record.expid = expid;
        record.recid = expid;
        Ok(record)
    }

    /// Guard a reversal request against the current state
    pub fn check_reversible(&self) -> Result<&ExpenseRecord, FormError> {
        let open = self.open.as_ref().ok_or(FormError::NotOpen)?;
        if !open.machine.can_transition(FormAction::Reverse) {
            return Err(StateError::InvalidTransition {
                from: open.machine.state(),
                action: FormAction::Reverse,
            }
            .into());
        }
        Ok(&open.record)
    }

    /// Hide the form; loads still in flight become stale
    pub fn close(&mut self) {
        self.open = None;
        self.tracker.clear();
        self.errors.clear();
        self.message = None;
        self.generation += 1;
        self.pending = None;
    }

    pub fn rules(&self) -> &[AccountRuleOption] {
        &self.rules
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error_for(&self, field: ExpenseField) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn view(&self) -> Option<FormView> {
        let open = self.open.as_ref()?;
        Some(FormView::build(
            &open.record,
            &self.rules,
            &self.errors,
            self.tracker.is_dirty(),
            self.message.as_deref(),
        ))
    }
}

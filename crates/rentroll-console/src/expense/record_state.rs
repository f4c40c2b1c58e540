/*
[INPUT]:  ExpenseRecord EXPID and FLAGS, FormAction enum
[OUTPUT]: Validated lifecycle transitions for an expense form
[POS]:    Expense domain logic - state machine for the record lifecycle
[UPDATE]: When record states or allowed actions change
*/

use std::fmt;

use rentroll_adapter::ExpenseRecord;
use thiserror::Error;

/// Lifecycle state of the record shown in the expense form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    /// Not saved yet (EXPID 0)
    New,
    /// Saved and still open for changes
    Editable,
    /// Reversed by the backend; read-only for good
    Reversed,
}

impl FormState {
    pub fn of(record: &ExpenseRecord) -> Self {
        if record.is_new() {
            FormState::New
        } else if record.is_reversed() {
            FormState::Reversed
        } else {
            FormState::Editable
        }
    }

    pub fn is_read_only(self) -> bool {
        self == FormState::Reversed
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormState::New => "NEW",
            FormState::Editable => "EDITABLE",
            FormState::Reversed => "REVERSED",
        };
        f.write_str(label)
    }
}

/// Actions that can trigger form state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Edit,
    Save,
    Reverse,
    Close,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid transition: {from} -> {action:?}")]
    InvalidTransition { from: FormState, action: FormAction },
}

/// State machine guarding what may happen to the open record
#[derive(Debug, Clone)]
pub struct RecordStateMachine {
    current_state: FormState,
}

impl RecordStateMachine {
    pub fn new(initial: FormState) -> Self {
        Self {
            current_state: initial,
        }
    }

    pub fn for_record(record: &ExpenseRecord) -> Self {
        Self::new(FormState::of(record))
    }

    pub fn can_transition(&self, action: FormAction) -> bool {
        matches!(
            (self.current_state, action),
            (FormState::New | FormState::Editable, FormAction::Edit)
                | (FormState::New | FormState::Editable, FormAction::Save)
                | (FormState::Editable, FormAction::Reverse)
                | (_, FormAction::Close)
        )
    }

    /// Perform a state transition
    pub fn transition(&mut self, action: FormAction) -> Result<FormState, StateError> {
        if !self.can_transition(action) {
            return Err(StateError::InvalidTransition {
                from: self.current_state,
                action,
            });
        }

        self.current_state = match (self.current_state, action) {
            (_, FormAction::Save) => FormState::Editable,
            (_, FormAction::Reverse) => FormState::Reversed,
            (state, FormAction::Edit | FormAction::Close) => state,
        };
        Ok(self.current_state)
    }

    pub fn state(&self) -> FormState {
        self.current_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentroll_adapter::ExpenseFlags;

    fn record(expid: i64, reversed: bool) -> ExpenseRecord {
        let mut record = ExpenseRecord::new_template(
            1,
            "REX",
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        );
        record.expid = expid;
        if reversed {
            record.flags.insert(ExpenseFlags::REVERSED);
        }
        record
    }

    #[test]
    fn state_follows_expid_and_flags() {
        assert_eq!(FormState::of(&record(0, false)), FormState::New);
        assert_eq!(FormState::of(&record(5, false)), FormState::Editable);
        assert_eq!(FormState::of(&record(5, true)), FormState::Reversed);
    }

    #[test]
    fn new_record_becomes_editable_on_save() {
        let mut machine = RecordStateMachine::for_record(&record(0, false));
        assert!(!machine.can_transition(FormAction::Reverse));
        assert_eq!(machine.transition(FormAction::Save), Ok(FormState::Editable));
        assert_eq!(machine.transition(FormAction::Save), Ok(FormState::Editable));
    }

    #[test]
    fn editable_record_can_be_reversed() {
        let mut machine = RecordStateMachine::new(FormState::Editable);
        assert_eq!(
            machine.transition(FormAction::Reverse),
            Ok(FormState::Reversed)
        );
    }

    #[test]
    fn nothing_leaves_reversed_except_close() {
        let mut machine = RecordStateMachine::new(FormState::Reversed);
        for action in [FormAction::Edit, FormAction::Save, FormAction::Reverse] {
            assert_eq!(
                machine.transition(action),
                Err(StateError::InvalidTransition {
                    from: FormState::Reversed,
                    action,
                })
            );
        }
        assert_eq!(machine.transition(FormAction::Close), Ok(FormState::Reversed));
        assert_eq!(machine.state(), FormState::Reversed);
    }
}

/*
[INPUT]:  Expense records and user edits
[OUTPUT]: Expense grid/form state machine and view-models
[POS]:    Expense module root
[UPDATE]: When expense submodules or exports change
*/

pub mod dirty;
pub mod field;
pub mod form;
pub mod grid;
pub mod record_state;
pub mod validation;
pub mod view;
pub mod workspace;

pub use dirty::{DirtyTracker, FieldChange, RecordDiff, diff_records};
pub use field::{ExpenseField, FieldEdit, RentalPick};
pub use form::{ExpenseForm, FormError, LoadTicket};
pub use grid::{ExpenseGrid, GridRow};
pub use record_state::{FormAction, FormState, RecordStateMachine, StateError};
pub use validation::{ValidationError, validate};
pub use view::{ButtonView, FormButton, FormView, InputView, RuleChoices};
pub use workspace::{ConfirmPrompt, ExpenseWorkspace, Intent, LoadRequest, LoadResult, Outcome, Step};

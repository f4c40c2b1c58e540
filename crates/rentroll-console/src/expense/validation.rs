/*
[INPUT]:  ExpenseRecord about to be submitted
[OUTPUT]: Field-attached validation errors
[POS]:    Expense domain - pre-submission checks
[UPDATE]: When validation rules or their messages change
*/

use rentroll_adapter::ExpenseRecord;
use rust_decimal::Decimal;
use thiserror::Error;

use super::field::ExpenseField;

pub const ACCOUNT_RULE_REQUIRED: &str = "The Account Rule needs to be set";
pub const AMOUNT_TOO_SMALL: &str = "Amount must be at least $0.01";

/// Smallest amount an expense may carry
pub fn minimum_amount() -> Decimal {
    Decimal::new(1, 2)
}

/// A failed check, attached to the input that caused it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: ExpenseField,
    pub message: String,
}

impl ValidationError {
    fn new(field: ExpenseField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Run every check and report all failures together
pub fn validate(record: &ExpenseRecord) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if record.arid == 0 {
        errors.push(ValidationError::new(
            ExpenseField::AccountRule,
            ACCOUNT_RULE_REQUIRED,
        ));
    }
    if record.amount < minimum_amount() {
        errors.push(ValidationError::new(ExpenseField::Amount, AMOUNT_TOO_SMALL));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

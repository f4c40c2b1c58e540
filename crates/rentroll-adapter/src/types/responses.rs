/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::ResponseStatus;
use super::models::ExpenseRecord;

/// Minimal envelope every service reply carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
}

/// Reply of the grid search `GET /v1/expense`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub records: Vec<ExpenseRecord>,
}

/// Reply of `GET /v1/expense/{BID}/{EXPID}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseGetResponse {
    pub status: ResponseStatus,
    pub record: ExpenseRecord,
}

/// Reply of a save; `recid` carries the EXPID the server assigned or kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveExpenseResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub recid: i64,
}

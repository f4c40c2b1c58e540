/*
[INPUT]:  ExpenseApi implementation, Session, user intents from CLI/TUI
[OUTPUT]: Outcomes of grid/form operations with synchronized selection
[POS]:    Expense orchestration - grid and form wired to the backend
[UPDATE]: When operations, confirmation rules or refresh policy change
*/

use std::sync::Arc;

use chrono::Local;
use rentroll_adapter::{ExpenseApi, ExpensePayload, ExpenseRecord, ExpenseRules, RentrollError};
use tracing::{error, info, warn};

use super::field::{ExpenseField, FieldEdit};
use super::form::{ExpenseForm, FormError, LoadTicket};
use super::grid::ExpenseGrid;
use super::validation::ValidationError;
use crate::dates::{DateRange, DateRangeError};
use crate::session::Session;

/// Navigation or action the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Open the grid row with this recid
    Select(i64),
    AddNew,
    Close,
    Reverse,
    /// Leave the expense screen altogether
    Quit,
}

/// Question to put to the user before an intent runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    DiscardChanges,
    ReverseExpense { expid: i64 },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::DiscardChanges => {
                "This expense has unsaved changes. Discard them?".to_string()
            }
            ConfirmPrompt::ReverseExpense { expid } => {
                format!("Reverse expense {expid}? A reversed expense cannot be changed.")
            }
        }
    }
}

/// First phase of an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ready(Intent),
    Confirm { prompt: ConfirmPrompt, intent: Intent },
}

/// Result of a workspace operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Refreshed { rows: usize },
    Loaded { expid: i64 },
    NewRecord,
    /// Server copy of the saved record
    Saved(ExpenseRecord),
    SavedAndNew { expid: i64 },
    Reversed { expid: i64 },
    Closed,
    /// Submission blocked locally; nothing was sent
    Invalid(Vec<ValidationError>),
    /// Refused by a business rule, either locally or by the server
    Rejected(String),
    /// Network or protocol failure
    Failed(String),
    /// A newer load superseded this one
    Stale,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            Outcome::Invalid(_) | Outcome::Rejected(_) | Outcome::Failed(_) | Outcome::Stale
        )
    }

    /// Text for a status line
    pub fn summary(&self) -> String {
        match self {
            Outcome::Refreshed { rows } => format!("{rows} expenses loaded"),
            Outcome::Loaded { expid } => format!("expense {expid} loaded"),
            Outcome::NewRecord => "new expense".to_string(),
            Outcome::Saved(record) => format!("expense {} saved", record.expid),
            Outcome::SavedAndNew { expid } => format!("expense {expid} saved, new expense"),
            Outcome::Reversed { expid } => format!("expense {expid} reversed"),
            Outcome::Closed => "form closed".to_string(),
            Outcome::Invalid(errors) => errors
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            Outcome::Rejected(message) | Outcome::Failed(message) => message.clone(),
            Outcome::Stale => "superseded by a newer selection".to_string(),
        }
    }
}

/// A form load that can run without holding the workspace
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest {
    ticket: LoadTicket,
    recid: Option<i64>,
    pub bid: i64,
    pub expid: i64,
}

#[derive(Debug)]
pub struct LoadResult {
    request: LoadRequest,
    result: Result<(ExpenseRules, ExpenseRecord), RentrollError>,
}

/// Grid and form of the expense screen bound to one backend
pub struct ExpenseWorkspace {
    api: Arc<dyn ExpenseApi>,
    session: Session,
    grid: ExpenseGrid,
    form: ExpenseForm,
}

impl ExpenseWorkspace {
    pub fn new(api: Arc<dyn ExpenseApi>, session: Session) -> Self {
        Self {
            api,
            session,
            grid: ExpenseGrid::default(),
            form: ExpenseForm::new(),
        }
    }

    pub fn api(&self) -> Arc<dyn ExpenseApi> {
        self.api.clone()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn grid(&self) -> &ExpenseGrid {
        &self.grid
    }

    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    /// Reload the grid for the session range and restore the highlight
    pub async fn refresh(&mut self) -> Outcome {
        let range = self.session.range();
        match self.api.list_expenses(range.start(), range.stop()).await {
            Ok(list) => {
                let rows = list.records.len();
                self.grid.replace(list.records, list.total);
                self.reselect();
                info!(rows, range = %range.label(), "expense grid refreshed");
                Outcome::Refreshed { rows }
            }
            Err(err) => {
                let outcome = failure("Load expenses", &err);
                self.grid.set_message(outcome.summary());
                outcome
            }
        }
    }

    fn reselect(&mut self) {
        if self.form.is_new() {
            self.grid.select_none();
            return;
        }
        match self.session.last_selected() {
            Some(recid) if self.grid.select(recid) => {}
            _ => self.grid.select_none(),
        }
    }

    pub async fn set_range(&mut self, range: DateRange) -> Outcome {
        self.session.set_range(range);
        self.refresh().await
    }

    pub async fn month_back(&mut self) -> Result<Outcome, DateRangeError> {
        let range = self.session.range().month_back()?;
        Ok(self.set_range(range).await)
    }

    pub async fn month_forward(&mut self) -> Result<Outcome, DateRangeError> {
        let range = self.session.range().month_forward()?;
        Ok(self.set_range(range).await)
    }

    /// First phase: decide whether `intent` needs the user's confirmation
    pub fn begin(&self, intent: Intent) -> Result<Step, FormError> {
        match intent {
            Intent::Reverse => {
                let record = self.form.check_reversible()?;
                Ok(Step::Confirm {
                    prompt: ConfirmPrompt::ReverseExpense {
                        expid: record.expid,
                    },
                    intent,
                })
            }
            _ if self.form.is_dirty() => Ok(Step::Confirm {
                prompt: ConfirmPrompt::DiscardChanges,
                intent,
            }),
            _ => Ok(Step::Ready(intent)),
        }
    }

    /// The user said no: keep the form and put the grid highlight back
    pub fn decline(&mut self) {
        self.reselect();
    }

    /// Second phase: run an intent that is ready or was confirmed
    pub async fn run(&mut self, intent: Intent) -> Outcome {
        match intent {
            Intent::Select(recid) => self.open_row(recid).await,
            Intent::AddNew => self.add_new().await,
            Intent::Close => self.close().await,
            Intent::Reverse => self.reverse().await,
            Intent::Quit => {
                self.form.close();
                Outcome::Closed
            }
        }
    }

    async fn open_row(&mut self, recid: i64) -> Outcome {
        let Some(request) = self.prepare_load(recid) else {
            return Outcome::Rejected(format!("no expense row {recid}"));
        };
        let loaded = Self::fetch(self.api.clone(), request).await;
        self.apply_load(loaded)
    }

    /// Open an expense by EXPID without a grid row
    pub async fn open_expense(&mut self, expid: i64) -> Outcome {
        let request = LoadRequest {
            ticket: self.form.begin_load(),
            recid: None,
            bid: self.session.business().bid,
            expid,
        };
        let loaded = Self::fetch(self.api.clone(), request).await;
        self.apply_load(loaded)
    }

    /// Highlight a row and hand out the load for it
    pub fn prepare_load(&mut self, recid: i64) -> Option<LoadRequest> {
        let record = self.grid.get(recid)?;
        let bid = if record.bid == 0 {
            self.session.business().bid
        } else {
            record.bid
        };
        let expid = record.expid;
        self.grid.select(recid);
        self.session.select(recid);
        Some(LoadRequest {
            ticket: self.form.begin_load(),
            recid: Some(recid),
            bid,
            expid,
        })
    }

    /// Rule options first, then the record
    pub async fn fetch(api: Arc<dyn ExpenseApi>, request: LoadRequest) -> LoadResult {
        let result = async {
            let rules = api.expense_rules(request.bid).await?;
            let record = api.get_expense(request.bid, request.expid).await?;
            Ok::<_, RentrollError>((rules, record))
        }
        .await;
        LoadResult { request, result }
    }

    /// Show a finished load unless a newer one was started meanwhile
    pub fn apply_load(&mut self, loaded: LoadResult) -> Outcome {
        let LoadResult { request, result } = loaded;
        if !self.form.is_current(request.ticket) {
            return Outcome::Stale;
        }
        match result {
            Ok((rules, record)) => {
                let expid = record.expid;
                let recid = request.recid.unwrap_or(record.recid);
                self.session.cache_rules(request.bid, rules);
                self.session.select(recid);
                self.grid.select(recid);
                self.form
                    .finish_load(request.ticket, record, self.session.rule_options());
                info!(expid, "expense loaded");
                Outcome::Loaded { expid }
            }
            Err(err) => {
                self.form.abandon_load(request.ticket);
                let outcome = failure("Load expense", &err);
                self.grid.set_message(outcome.summary());
                outcome
            }
        }
    }

    async fn add_new(&mut self) -> Outcome {
        self.session.clear_selection();
        self.grid.select_none();

        let business = self.session.business().clone();
        match self.api.expense_rules(business.bid).await {
            Ok(rules) => self.session.cache_rules(business.bid, rules),
            Err(err) => {
                let outcome = failure("Load account rules", &err);
                self.grid.set_message(outcome.summary());
                return outcome;
            }
        }

        let record =
            ExpenseRecord::new_template(business.bid, business.bud, Local::now().date_naive());
        self.form.open(record, self.session.rule_options());
        Outcome::NewRecord
    }

    async fn close(&mut self) -> Outcome {
        self.form.close();
        match self.refresh().await {
            Outcome::Refreshed { .. } => Outcome::Closed,
            other => other,
        }
    }

    pub fn edit(&mut self, edit: FieldEdit) -> Result<bool, FormError> {
        self.form.apply(edit)
    }

    pub fn edit_text(&mut self, field: ExpenseField, raw: &str) -> Result<bool, FormError> {
        self.form.apply_text(field, raw)
    }

    fn payload(&mut self) -> Result<ExpensePayload, Outcome> {
        match self.form.prepare_submission() {
            Ok(payload) => Ok(payload),
            Err(FormError::Validation(errors)) => Err(Outcome::Invalid(errors)),
            Err(err) => Err(Outcome::Rejected(err.to_string())),
        }
    }

    async fn submit(&mut self, payload: ExpensePayload) -> Result<i64, Outcome> {
        let bid = payload.bid;
        match self.api.save_expense(payload).await {
            Ok(expid) => {
                info!(bid, expid, "expense saved");
                Ok(expid)
            }
            Err(err) => {
                let outcome = failure("Save expense", &err);
                self.form.set_message(outcome.summary());
                Err(outcome)
            }
        }
    }

    /// Validate, submit, close the form and refresh the grid
    pub async fn save(&mut self) -> Outcome {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let bid = payload.bid;
        let expid = match self.submit(payload).await {
            Ok(expid) => expid,
            Err(outcome) => return outcome,
        };

        // The server holds the record from here on; a failed reload must not
        // leave the form in NEW, or the next save would create it again.
        let mut reload_warning = None;
        let saved = match self.api.get_expense(bid, expid).await {
            Ok(record) => record,
            Err(err) => {
                warn!(expid, error = %err, "saved expense could not be reloaded");
                reload_warning = Some(format!(
                    "Expense {expid} saved, but reloading it failed: {err}"
                ));
                match self.form.saved_copy(expid) {
                    Ok(record) => record,
                    Err(err) => return Outcome::Rejected(err.to_string()),
                }
            }
        };
        if let Err(err) = self.form.complete_save(saved.clone()) {
            warn!(expid, error = %err, "saved record did not fit the form state");
        }

        self.form.close();
        self.session.clear_selection();
        self.grid.select_none();
        match self.refresh().await {
            Outcome::Refreshed { .. } => {
                if let Some(warning) = reload_warning {
                    self.grid.set_message(warning);
                }
                Outcome::Saved(saved)
            }
            other => other,
        }
    }

    /// Save, then continue with a fresh record in the same form
    pub async fn save_and_add(&mut self) -> Outcome {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let expid = match self.submit(payload).await {
            Ok(expid) => expid,
            Err(outcome) => return outcome,
        };

        self.form.close();
        self.session.clear_selection();
        self.grid.select_none();
        if let outcome @ (Outcome::Failed(_) | Outcome::Rejected(_)) = self.refresh().await {
            return outcome;
        }
        match self.add_new().await {
            Outcome::NewRecord => Outcome::SavedAndNew { expid },
            other => other,
        }
    }

    async fn reverse(&mut self) -> Outcome {
        let (bid, expid, recid) = match self.form.check_reversible() {
            Ok(record) => (record.bid, record.expid, record.recid),
            Err(err) => return Outcome::Rejected(err.to_string()),
        };

        if let Err(err) = self.api.reverse_expense(bid, expid).await {
            let outcome = failure("Reverse expense", &err);
            self.form.set_message(outcome.summary());
            return outcome;
        }
        info!(bid, expid, "expense reversed");

        self.form.close();
        self.session.select(recid);
        match self.refresh().await {
            Outcome::Refreshed { .. } => Outcome::Reversed { expid },
            other => other,
        }
    }
}

fn failure(action: &str, err: &RentrollError) -> Outcome {
    if err.is_business_error() {
        warn!(action, error = %err, "request rejected");
        Outcome::Rejected(err.to_string())
    } else {
        error!(action, error = %err, "request failed");
        Outcome::Failed(format!("{action} failed: {err}"))
    }
}

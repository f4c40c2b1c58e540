/*
[INPUT]:  Expense operations requested by front-end components
[OUTPUT]: ExpenseApi trait, HTTP implementation, in-memory mock
[POS]:    Service seam - lets callers swap the live client for a fake
[UPDATE]: When expense endpoints are added or their signatures change
*/

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::http::{RentrollClient, RentrollError, Result};
use crate::types::{
    ExpenseFlags, ExpenseListResponse, ExpensePayload, ExpenseRecord, ExpenseRules,
    ResponseStatus,
};

/// Operations the expense screens need from the backend
///
/// Implemented by [`RentrollClient`] for live use and by [`MockExpenseApi`]
/// for tests and offline demos.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    async fn list_expenses(&self, start: NaiveDate, stop: NaiveDate)
    -> Result<ExpenseListResponse>;

    async fn get_expense(&self, bid: i64, expid: i64) -> Result<ExpenseRecord>;

    /// Returns the EXPID of the saved record
    async fn save_expense(&self, record: ExpensePayload) -> Result<i64>;

    async fn reverse_expense(&self, bid: i64, expid: i64) -> Result<()>;

    async fn expense_rules(&self, bid: i64) -> Result<ExpenseRules>;
}

#[async_trait]
impl ExpenseApi for RentrollClient {
    async fn list_expenses(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> Result<ExpenseListResponse> {
        RentrollClient::list_expenses(self, start, stop).await
    }

    async fn get_expense(&self, bid: i64, expid: i64) -> Result<ExpenseRecord> {
        RentrollClient::get_expense(self, bid, expid).await
    }

    async fn save_expense(&self, record: ExpensePayload) -> Result<i64> {
        RentrollClient::save_expense(self, record).await
    }

    async fn reverse_expense(&self, bid: i64, expid: i64) -> Result<()> {
        RentrollClient::reverse_expense(self, bid, expid).await
    }

    async fn expense_rules(&self, bid: i64) -> Result<ExpenseRules> {
        RentrollClient::expense_rules(self, bid).await
    }
}

/// A call observed by [`MockExpenseApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List { start: NaiveDate, stop: NaiveDate },
    Get { bid: i64, expid: i64 },
    Save(ExpensePayload),
    Reverse { bid: i64, expid: i64 },
    Rules { bid: i64 },
}

#[derive(Debug, Default)]
struct MockState {
    records: BTreeMap<i64, ExpenseRecord>,
    rules: ExpenseRules,
    next_expid: i64,
    calls: Vec<ApiCall>,
    pending_failure: Option<RentrollError>,
}

/// In-memory stand-in for the expense services
///
/// Behaves like the server: assigns EXPIDs and audit columns on save and
/// flags records on reversal instead of removing them.
#[derive(Debug, Default)]
pub struct MockExpenseApi {
    state: Mutex<MockState>,
}

impl MockExpenseApi {
    pub fn new(rules: ExpenseRules) -> Self {
        Self {
            state: Mutex::new(MockState {
                rules,
                next_expid: 1,
                ..MockState::default()
            }),
        }
    }

    /// Seed a stored record; its EXPID is kept
    pub fn insert(&self, mut record: ExpenseRecord) {
        let mut state = self.lock();
        record.recid = record.expid;
        state.next_expid = state.next_expid.max(record.expid + 1);
        state.records.insert(record.expid, record);
    }

    pub fn record(&self, expid: i64) -> Option<ExpenseRecord> {
        self.lock().records.get(&expid).cloned()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: RentrollError) {
        self.lock().pending_failure = Some(err);
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, call: ApiCall) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.pending_failure.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn audit_timestamp() -> String {
    Utc::now().to_rfc3339()
}

#[async_trait]
impl ExpenseApi for MockExpenseApi {
    async fn list_expenses(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> Result<ExpenseListResponse> {
        let state = self.begin(ApiCall::List { start, stop })?;
        let records: Vec<ExpenseRecord> = state
            .records
            .values()
            .filter(|record| record.dt >= start && record.dt < stop)
            .cloned()
            .collect();
        Ok(ExpenseListResponse {
            status: ResponseStatus::Success,
            total: records.len() as i64,
            records,
        })
    }

    async fn get_expense(&self, bid: i64, expid: i64) -> Result<ExpenseRecord> {
        let state = self.begin(ApiCall::Get { bid, expid })?;
        if expid == 0 {
            return Ok(ExpenseRecord::new_template(
                bid,
                String::new(),
                Utc::now().date_naive(),
            ));
        }
        state
            .records
            .get(&expid)
            .cloned()
            .ok_or_else(|| RentrollError::server(format!("Expense {expid} not found")))
    }

    async fn save_expense(&self, payload: ExpensePayload) -> Result<i64> {
        let mut state = self.begin(ApiCall::Save(payload.clone()))?;
        let now = audit_timestamp();

        let expid = if payload.expid == 0 {
            let expid = state.next_expid;
            state.next_expid += 1;
            expid
        } else {
            payload.expid
        };

        let existing = state.records.get(&expid).cloned();
        if existing.as_ref().is_some_and(ExpenseRecord::is_reversed) {
            return Err(RentrollError::server(format!(
                "Expense {expid} is reversed and cannot be changed"
            )));
        }
        if payload.expid != 0 && existing.is_none() {
            return Err(RentrollError::server(format!("Expense {expid} not found")));
        }

        let (create_ts, create_by) = existing
            .map(|record| (record.create_ts, record.create_by))
            .unwrap_or_else(|| (now.clone(), 1));

        let record = ExpenseRecord {
            recid: expid,
            expid,
            prexpid: payload.prexpid,
            arid: payload.arid,
            acct_rule: state
                .rules
                .find(&payload.bud, payload.arid)
                .map(|option| option.text.clone())
                .unwrap_or_default(),
            bid: payload.bid,
            bud: payload.bud,
            rid: payload.rid,
            raid: payload.raid,
            rname: payload.rname,
            amount: payload.amount,
            dt: payload.dt,
            comment: payload.comment,
            last_mod_time: now,
            last_mod_by: 1,
            create_ts,
            create_by,
            flags: payload.flags,
            mode: payload.mode,
        };
        state.records.insert(expid, record);
        Ok(expid)
    }

    async fn reverse_expense(&self, bid: i64, expid: i64) -> Result<()> {
        let mut state = self.begin(ApiCall::Reverse { bid, expid })?;
        let record = state
            .records
            .get_mut(&expid)
            .ok_or_else(|| RentrollError::server(format!("Expense {expid} not found")))?;
        if record.is_reversed() {
            return Err(RentrollError::server(format!(
                "Expense {expid} is already reversed"
            )));
        }
        record.flags.insert(ExpenseFlags::REVERSED);
        record.comment = format!("Reversed expense {expid}");
        record.last_mod_time = audit_timestamp();
        Ok(())
    }

    async fn expense_rules(&self, bid: i64) -> Result<ExpenseRules> {
        let state = self.begin(ApiCall::Rules { bid })?;
        Ok(state.rules.clone())
    }
}

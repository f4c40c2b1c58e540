/*
[INPUT]:  Business id, expense ids, date ranges and edited records
[OUTPUT]: Expense lists, single records, save/reversal confirmations
[POS]:    HTTP layer - expense endpoints
[UPDATE]: When adding new expense endpoints or changing request bodies
*/

use chrono::NaiveDate;
use reqwest::Method;
use tracing::info;

use crate::http::{RentrollClient, Result};
use crate::types::{
    ExpenseGetResponse, ExpenseListResponse, ExpensePayload, ExpenseRecord,
    ReverseExpenseRequest, SaveExpenseRequest, SaveExpenseResponse, StatusResponse,
    format_wire_date,
};

impl RentrollClient {
    /// List expenses whose date falls inside the range
    ///
    /// GET /v1/expense?searchDtStart={start}&searchDtStop={stop}
    pub async fn list_expenses(
        &self,
        start: NaiveDate,
        stop: NaiveDate,
    ) -> Result<ExpenseListResponse> {
        let mut url = self.url("v1/expense")?;
        url.query_pairs_mut()
            .append_pair("searchDtStart", &format_wire_date(start))
            .append_pair("searchDtStop", &format_wire_date(stop));
        let builder = self.request(Method::GET, url);
        self.send_json(builder).await
    }

    /// Fetch one expense; EXPID 0 returns the server's template for a new one
    ///
    /// GET /v1/expense/{BID}/{EXPID}
    pub async fn get_expense(&self, bid: i64, expid: i64) -> Result<ExpenseRecord> {
        let url = self.url(&format!("v1/expense/{bid}/{expid}"))?;
        let builder = self.request(Method::GET, url);
        let response: ExpenseGetResponse = self.send_json(builder).await?;
        Ok(response.record)
    }

    /// Create (EXPID 0) or update an expense, returning its EXPID
    ///
    /// POST /v1/expense/{BID}/{EXPID}
    pub async fn save_expense(&self, record: ExpensePayload) -> Result<i64> {
        let url = self.url(&format!("v1/expense/{}/{}", record.bid, record.expid))?;
        let request = SaveExpenseRequest::new(record);
        let builder = self.request(Method::POST, url).json(&request);
        let response: SaveExpenseResponse = self.send_json(builder).await?;
        let expid = if response.recid > 0 {
            response.recid
        } else {
            request.record.expid
        };
        info!(expid, bid = request.record.bid, "expense saved");
        Ok(expid)
    }

    /// Reverse an expense; the row stays and gets the reversed flag
    ///
    /// POST /v1/expense/{BID}/{EXPID} with `{"cmd":"delete",...}`
    pub async fn reverse_expense(&self, bid: i64, expid: i64) -> Result<()> {
        let url = self.url(&format!("v1/expense/{bid}/{expid}"))?;
        let builder = self
            .request(Method::POST, url)
            .json(&ReverseExpenseRequest::new(expid));
        let _: StatusResponse = self.send_json(builder).await?;
        info!(expid, bid, "expense reversed");
        Ok(())
    }
}

/*
[INPUT]:  Parsed CLI flags and configuration
[OUTPUT]: Shared command context and argument helpers
[POS]:    CLI layer root
[UPDATE]: When commands need more shared context
*/

pub mod expenses;
pub mod init;
pub mod report;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, Months, NaiveDate};
use rentroll_adapter::RentrollClient;

use rentroll_console::dates::parse_date;
use rentroll_console::{AppConfig, Business, DateRange, ExpenseWorkspace, Session};

/// Everything a command needs to reach the backend
pub struct AppContext {
    pub config: AppConfig,
    pub client: RentrollClient,
    pub business: Business,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>, business: Option<&str>) -> Result<Self> {
        let config = AppConfig::load(config_path).context("load config")?;
        let business = config.business(business)?;
        let client = RentrollClient::with_config_and_base_url(
            config.client_config(),
            &config.server.base_url,
        )
        .map_err(|err| anyhow!("create RentrollClient failed: {err}"))?;
        Ok(Self {
            config,
            client,
            business,
        })
    }

    pub fn workspace(&self, range: DateRange) -> ExpenseWorkspace {
        ExpenseWorkspace::new(
            Arc::new(self.client.clone()),
            Session::new(self.business.clone(), range),
        )
    }
}

pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|err| err.to_string())
}

pub fn current_month() -> Result<DateRange> {
    DateRange::month_of(Local::now().date_naive()).context("current month")
}

/// Range from optional bounds; a single bound spans one month
pub fn range_from_args(start: Option<NaiveDate>, stop: Option<NaiveDate>) -> Result<DateRange> {
    let range = match (start, stop) {
        (Some(start), Some(stop)) => DateRange::new(start, stop)?,
        (Some(start), None) => {
            let stop = start
                .checked_add_months(Months::new(1))
                .context("date out of range")?;
            DateRange::new(start, stop)?
        }
        (None, Some(stop)) => {
            let start = stop
                .checked_sub_months(Months::new(1))
                .context("date out of range")?;
            DateRange::new(start, stop)?
        }
        (None, None) => current_month()?,
    };
    Ok(range)
}

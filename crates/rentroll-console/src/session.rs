/*
[INPUT]:  Configured business, chosen date range, grid selections
[OUTPUT]: Session context shared by grid, form and report views
[POS]:    Console state - explicit replacement for page-global app state
[UPDATE]: When more cross-view context needs to be shared
*/

use std::collections::HashMap;

use rentroll_adapter::{AccountRuleOption, ExpenseRules};

use crate::dates::DateRange;

/// Business the console works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Business {
    pub bid: i64,
    /// Business unit designation, e.g. `REX`
    pub bud: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    business: Business,
    range: DateRange,
    last_selected: Option<i64>,
    rules: HashMap<i64, ExpenseRules>,
}

impl Session {
    pub fn new(business: Business, range: DateRange) -> Self {
        Self {
            business,
            range,
            last_selected: None,
            rules: HashMap::new(),
        }
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Grid row last opened in the form
    pub fn last_selected(&self) -> Option<i64> {
        self.last_selected
    }

    pub fn select(&mut self, recid: i64) {
        self.last_selected = Some(recid);
    }

    pub fn clear_selection(&mut self) {
        self.last_selected = None;
    }

    pub fn cache_rules(&mut self, bid: i64, rules: ExpenseRules) {
        self.rules.insert(bid, rules);
    }

    /// Rule options for the current business unit from the last fetch
    pub fn rule_options(&self) -> Vec<AccountRuleOption> {
        self.rules
            .get(&self.business.bid)
            .map(|rules| rules.for_unit(&self.business.bud).to_vec())
            .unwrap_or_default()
    }
}

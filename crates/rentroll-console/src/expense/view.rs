/*
[INPUT]:  Open expense record, its state, validation errors, rule options
[OUTPUT]: Immutable FormView/RuleChoices view-models for renderers
[POS]:    Expense presentation - per-state UI contract
[UPDATE]: When button visibility, header or flag report wording changes
*/

use rentroll_adapter::{AccountRuleOption, ExpenseRecord};
use rust_decimal::{Decimal, RoundingStrategy};

use super::field::ExpenseField;
use super::record_state::FormState;
use super::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormButton {
    Save,
    SaveAndAdd,
    Reverse,
    Close,
}

impl FormButton {
    pub const ALL: [FormButton; 4] = [
        FormButton::Save,
        FormButton::SaveAndAdd,
        FormButton::Reverse,
        FormButton::Close,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormButton::Save => "Save",
            FormButton::SaveAndAdd => "Save and Add",
            FormButton::Reverse => "Reverse",
            FormButton::Close => "Close",
        }
    }

    /// Whether the button is shown for a record in `state`
    pub fn visible_in(self, state: FormState) -> bool {
        match (state, self) {
            (FormState::New, FormButton::Save | FormButton::SaveAndAdd) => true,
            (
                FormState::Editable,
                FormButton::Save | FormButton::SaveAndAdd | FormButton::Reverse,
            ) => true,
            (FormState::Reversed, FormButton::Close) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub button: FormButton,
    pub visible: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub field: ExpenseField,
    pub value: String,
    pub enabled: bool,
    pub error: Option<String>,
}

/// Account rule list for the session's business unit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleChoices {
    pub options: Vec<AccountRuleOption>,
    pub selected: Option<usize>,
}

impl RuleChoices {
    pub fn new(options: &[AccountRuleOption], arid: i64) -> Self {
        Self {
            options: options.to_vec(),
            selected: options.iter().position(|option| option.id == arid),
        }
    }

    pub fn selected_option(&self) -> Option<&AccountRuleOption> {
        self.selected.and_then(|index| self.options.get(index))
    }
}

/// Everything a renderer needs to draw the expense form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub state: FormState,
    pub header: String,
    pub buttons: Vec<ButtonView>,
    pub inputs: Vec<InputView>,
    pub rules: RuleChoices,
    /// Info panel and flag report are shown for saved records only
    pub show_info: bool,
    pub flag_report: Vec<String>,
    pub dirty: bool,
    pub message: Option<String>,
}

impl FormView {
    pub fn build(
        record: &ExpenseRecord,
        rules: &[AccountRuleOption],
        errors: &[ValidationError],
        dirty: bool,
        message: Option<&str>,
    ) -> Self {
        let state = FormState::of(record);
        let inputs_enabled = !state.is_read_only();

        let buttons = FormButton::ALL
            .into_iter()
            .map(|button| {
                let visible = button.visible_in(state);
                ButtonView {
                    button,
                    visible,
                    enabled: visible,
                }
            })
            .collect();

        let inputs = ExpenseField::ALL
            .into_iter()
            .map(|field| InputView {
                field,
                value: field.display_value(record),
                enabled: inputs_enabled,
                error: errors
                    .iter()
                    .find(|err| err.field == field)
                    .map(|err| err.message.clone()),
            })
            .collect();

        Self {
            state,
            header: header(record),
            buttons,
            inputs,
            rules: RuleChoices::new(rules, record.arid),
            show_info: state != FormState::New,
            flag_report: flag_report(record),
            dirty,
            message: message.map(str::to_string),
        }
    }

    pub fn button(&self, button: FormButton) -> Option<&ButtonView> {
        self.buttons.iter().find(|view| view.button == button)
    }

    pub fn is_enabled(&self, button: FormButton) -> bool {
        self.button(button).is_some_and(|view| view.enabled)
    }

    pub fn visible_buttons(&self) -> impl Iterator<Item = FormButton> + '_ {
        self.buttons
            .iter()
            .filter(|view| view.visible)
            .map(|view| view.button)
    }

    pub fn input(&self, field: ExpenseField) -> Option<&InputView> {
        self.inputs.iter().find(|input| input.field == field)
    }
}

pub fn header(record: &ExpenseRecord) -> String {
    if record.is_new() {
        "Edit Expense (new)".to_string()
    } else {
        format!("Edit Expense ({})", record.expid)
    }
}

/// Status lines shown under a saved record
pub fn flag_report(record: &ExpenseRecord) -> Vec<String> {
    if record.is_new() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(3);
    if record.is_reversed() {
        lines.push(format!("REVERSED ({})", record.comment));
    }
    lines.push(format!(
        "Last Update: {} by {}",
        record.last_mod_time, record.last_mod_by
    ));
    lines.push(format!(
        "CreateTS: {} by {}",
        record.create_ts, record.create_by
    ));
    lines
}

/// `$1,234.50` style rendering for grid cells
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
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
        record.comment = "duplicate entry".to_string();
        record.last_mod_time = "2024-03-02 10:00".to_string();
        record.last_mod_by = 211;
        record.create_ts = "2024-03-01 09:00".to_string();
        record.create_by = 200;
        if reversed {
            record.flags.insert(ExpenseFlags::REVERSED);
        }
        record
    }

    fn visible(view: &FormView) -> Vec<FormButton> {
        view.visible_buttons().collect()
    }

    #[test]
    fn new_record_shows_save_buttons_only() {
        let view = FormView::build(&record(0, false), &[], &[], false, None);
        assert_eq!(visible(&view), vec![FormButton::Save, FormButton::SaveAndAdd]);
        assert_eq!(view.header, "Edit Expense (new)");
        assert!(!view.show_info);
        assert!(view.flag_report.is_empty());
        assert!(view.inputs.iter().all(|input| input.enabled));
    }

    #[test]
    fn editable_record_can_be_reversed() {
        let view = FormView::build(&record(5, false), &[], &[], false, None);
        assert_eq!(
            visible(&view),
            vec![FormButton::Save, FormButton::SaveAndAdd, FormButton::Reverse]
        );
        assert_eq!(view.header, "Edit Expense (5)");
        assert_eq!(
            view.flag_report,
            vec![
                "Last Update: 2024-03-02 10:00 by 211".to_string(),
                "CreateTS: 2024-03-01 09:00 by 200".to_string(),
            ]
        );
    }

    #[test]
    fn reversed_record_only_closes() {
        let view = FormView::build(&record(7, true), &[], &[], false, None);
        let enabled: Vec<FormButton> = view
            .buttons
            .iter()
            .filter(|button| button.enabled)
            .map(|button| button.button)
            .collect();
        assert_eq!(enabled, vec![FormButton::Close]);
        assert!(view.inputs.iter().all(|input| !input.enabled));
        assert_eq!(view.flag_report[0], "REVERSED (duplicate entry)");
    }

    #[test]
    fn errors_attach_to_inputs_and_rules_select() {
        let rules = vec![
            AccountRuleOption { id: 3, text: "Repairs".to_string() },
            AccountRuleOption { id: 4, text: "Utilities".to_string() },
        ];
        let mut open = record(5, false);
        open.arid = 4;
        let errors = vec![ValidationError {
            field: ExpenseField::Amount,
            message: "Amount must be at least $0.01".to_string(),
        }];

        let view = FormView::build(&open, &rules, &errors, true, None);

        assert_eq!(
            view.input(ExpenseField::Amount).and_then(|i| i.error.as_deref()),
            Some("Amount must be at least $0.01")
        );
        assert!(view.input(ExpenseField::Date).and_then(|i| i.error.as_ref()).is_none());
        assert_eq!(view.rules.selected_option().map(|o| o.id), Some(4));
        assert!(view.dirty);
    }

    #[test]
    fn money_is_grouped() {
        assert_eq!(format_money(Decimal::new(123450, 2)), "$1,234.50");
        assert_eq!(format_money(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_money(Decimal::new(-1234567, 1)), "-$123,456.70");
        assert_eq!(format_money(Decimal::new(1, 3)), "$0.00");
    }
}

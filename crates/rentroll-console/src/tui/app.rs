/*
[INPUT]:  ExpenseWorkspace, ReportViewer, log buffer, UI events
[OUTPUT]: AppState driving the expense grid/form and report tabs
[POS]:    TUI app state and user-intent dispatch
[UPDATE]: When tabs, focus rules or form interactions change
*/

use std::path::PathBuf;

use chrono::Local;
use crossterm::event::Event as CrosstermEvent;
use ratatui::widgets::TableState;
use tokio::sync::mpsc;
use tracing::debug;

use rentroll_console::expense::{ConfirmPrompt, ExpenseField, FieldEdit, LoadResult};
use rentroll_console::report::ReportError;
use rentroll_console::{ExpenseWorkspace, Intent, Outcome, PageSetup, ReportViewer, Step};

use super::LogBufferHandle;

pub(super) enum UiEvent {
    Input(CrosstermEvent),
    Loaded(LoadResult),
}

pub(super) type UiSender = mpsc::UnboundedSender<UiEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Expenses,
    Report,
    Logs,
}

impl Tab {
    pub(super) const ALL: [Tab; 3] = [Tab::Expenses, Tab::Report, Tab::Logs];

    pub(super) fn title(self) -> &'static str {
        match self {
            Tab::Expenses => "Expenses",
            Tab::Report => "Report",
            Tab::Logs => "Logs",
        }
    }

    pub(super) fn index(self) -> usize {
        match self {
            Tab::Expenses => 0,
            Tab::Report => 1,
            Tab::Logs => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    Grid,
    Form,
}

/// A question on screen waiting for y/n
#[derive(Debug, Clone, Copy)]
pub(super) struct PendingConfirm {
    pub(super) prompt: ConfirmPrompt,
    pub(super) intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ExportKind {
    Csv,
    Pdf,
}

pub(super) struct AppState {
    pub(super) workspace: ExpenseWorkspace,
    pub(super) viewer: ReportViewer,
    pub(super) page: PageSetup,
    pub(super) export_dir: PathBuf,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) current_tab: Tab,
    pub(super) focus: Focus,
    pub(super) grid_state: TableState,
    pub(super) field_index: usize,
    pub(super) editing: Option<String>,
    pub(super) pending: Option<PendingConfirm>,
    pub(super) status_message: String,
    pub(super) quit: bool,
}

impl AppState {
    pub(super) fn new(
        workspace: ExpenseWorkspace,
        viewer: ReportViewer,
        page: PageSetup,
        log_buffer: LogBufferHandle,
    ) -> Self {
        Self {
            workspace,
            viewer,
            page,
            export_dir: PathBuf::from("."),
            log_buffer,
            current_tab: Tab::Expenses,
            focus: Focus::Grid,
            grid_state: TableState::default(),
            field_index: 0,
            editing: None,
            pending: None,
            status_message: "Ready".to_string(),
            quit: false,
        }
    }

    pub(super) fn set_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub(super) fn next_tab(&mut self) {
        let next = (self.current_tab.index() + 1) % Tab::ALL.len();
        self.current_tab = Tab::ALL[next];
    }

    fn note(&mut self, outcome: &Outcome) {
        self.status_message = outcome.summary();
    }

    /// Keep the table cursor on the grid's selected row, or in bounds
    pub(super) fn sync_cursor(&mut self) {
        let grid = self.workspace.grid();
        match grid.selected_index() {
            Some(index) => self.grid_state.select(Some(index)),
            None if grid.is_empty() => self.grid_state.select(None),
            None => {
                let index = self.grid_state.selected().unwrap_or(0).min(grid.len() - 1);
                self.grid_state.select(Some(index));
            }
        }
    }

    pub(super) fn move_cursor(&mut self, delta: isize) {
        let len = self.workspace.grid().len();
        if len == 0 {
            self.grid_state.select(None);
            return;
        }
        let current = self.grid_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.grid_state.select(Some(next));
    }

    pub(super) fn move_field(&mut self, delta: isize) {
        let len = ExpenseField::ALL.len() as isize;
        let next = (self.field_index as isize + delta).rem_euclid(len);
        self.field_index = next as usize;
    }

    pub(super) fn selected_field(&self) -> ExpenseField {
        ExpenseField::ALL[self.field_index]
    }

    pub(super) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Grid if self.workspace.form().is_open() => Focus::Form,
            _ => Focus::Grid,
        };
    }

    pub(super) async fn refresh(&mut self) {
        let outcome = self.workspace.refresh().await;
        self.note(&outcome);
        self.sync_cursor();
    }

    pub(super) async fn month_back(&mut self) {
        match self.workspace.month_back().await {
            Ok(outcome) => self.note(&outcome),
            Err(err) => self.status_message = err.to_string(),
        }
        self.sync_cursor();
    }

    pub(super) async fn month_forward(&mut self) {
        match self.workspace.month_forward().await {
            Ok(outcome) => self.note(&outcome),
            Err(err) => self.status_message = err.to_string(),
        }
        self.sync_cursor();
    }

    /// Ask for an intent; a confirmation is parked in `pending`
    pub(super) async fn request(&mut self, intent: Intent, events: &UiSender) {
        match self.workspace.begin(intent) {
            Ok(Step::Ready(intent)) => self.execute(intent, events).await,
            Ok(Step::Confirm { prompt, intent }) => {
                self.pending = Some(PendingConfirm { prompt, intent });
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) async fn answer(&mut self, yes: bool, events: &UiSender) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if yes {
            self.execute(pending.intent, events).await;
        } else {
            self.workspace.decline();
            self.sync_cursor();
            self.status_message = "Cancelled".to_string();
        }
    }

    async fn execute(&mut self, intent: Intent, events: &UiSender) {
        if let Intent::Select(recid) = intent {
            self.start_load(recid, events);
            return;
        }
        let outcome = self.workspace.run(intent).await;
        if intent == Intent::Quit {
            self.quit = true;
            return;
        }
        self.note(&outcome);
        match outcome {
            Outcome::NewRecord => {
                self.focus = Focus::Form;
                self.field_index = 0;
            }
            Outcome::Closed => self.focus = Focus::Grid,
            _ => {}
        }
        self.sync_cursor();
    }

    /// Load the row in the background; the result arrives as `UiEvent::Loaded`
    fn start_load(&mut self, recid: i64, events: &UiSender) {
        let Some(request) = self.workspace.prepare_load(recid) else {
            self.status_message = format!("no expense row {recid}");
            return;
        };
        self.status_message = format!("loading expense {}", request.expid);
        self.sync_cursor();

        let api = self.workspace.api();
        let events = events.clone();
        tokio::spawn(async move {
            let loaded = ExpenseWorkspace::fetch(api, request).await;
            let _ = events.send(UiEvent::Loaded(loaded));
        });
    }

    pub(super) fn finish_load(&mut self, loaded: LoadResult) {
        let outcome = self.workspace.apply_load(loaded);
        if outcome == Outcome::Stale {
            debug!("dropped superseded expense load");
            return;
        }
        if matches!(outcome, Outcome::Loaded { .. }) {
            self.focus = Focus::Form;
            self.field_index = 0;
        }
        self.note(&outcome);
        self.sync_cursor();
    }

    /// Start editing the focused input with its current text
    pub(super) fn begin_edit(&mut self) {
        let Some(view) = self.workspace.form().view() else {
            return;
        };
        let field = self.selected_field();
        match view.input(field) {
            Some(input) if input.enabled => self.editing = Some(input.value.clone()),
            _ => self.status_message = format!("{} is read-only", field.label()),
        }
    }

    pub(super) fn commit_edit(&mut self) {
        let Some(text) = self.editing.take() else {
            return;
        };
        let field = self.selected_field();
        match self.workspace.edit_text(field, &text) {
            Ok(true) => self.status_message = format!("{} changed", field.label()),
            Ok(false) => {}
            Err(err) => self.status_message = err.to_string(),
        }
    }

    /// Step through the account rule choices
    pub(super) fn cycle_rule(&mut self, delta: isize) {
        let Some(view) = self.workspace.form().view() else {
            return;
        };
        let options = &view.rules.options;
        if options.is_empty() {
            self.status_message = "no account rules".to_string();
            return;
        }
        let len = options.len() as isize;
        let next = match view.rules.selected {
            Some(index) => (index as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        let rule = &options[next as usize];
        let text = rule.text.clone();
        match self.workspace.edit(FieldEdit::AccountRule(rule.id)) {
            Ok(_) => self.status_message = format!("Account Rule: {text}"),
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) async fn save(&mut self) {
        let outcome = self.workspace.save().await;
        self.note(&outcome);
        if matches!(outcome, Outcome::Saved(_)) {
            self.focus = Focus::Grid;
        }
        self.sync_cursor();
    }

    pub(super) async fn save_and_add(&mut self) {
        let outcome = self.workspace.save_and_add().await;
        self.note(&outcome);
        if matches!(outcome, Outcome::SavedAndNew { .. }) {
            self.focus = Focus::Form;
            self.field_index = 0;
        }
        self.sync_cursor();
    }

    pub(super) async fn load_report(&mut self) {
        self.status_message = match self.viewer.load().await {
            Ok(content) => format!("report loaded ({} bytes)", content.len()),
            Err(err) => format!("load report failed: {err}"),
        };
    }

    pub(super) async fn report_month(&mut self, forward: bool) {
        let moved = if forward {
            self.viewer.month_forward()
        } else {
            self.viewer.month_back()
        };
        match moved {
            Ok(()) => self.load_report().await,
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) async fn report_today(&mut self) {
        match self.viewer.today(Local::now().date_naive()) {
            Ok(()) => self.load_report().await,
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub(super) async fn export(&mut self, kind: ExportKind) {
        let exported = match kind {
            ExportKind::Csv => self.viewer.export_csv().await,
            ExportKind::Pdf => self.viewer.export_pdf(&self.page).await,
        };
        let written = exported.and_then(|report| report.write_to(&self.export_dir));
        self.status_message = match written {
            Ok(path) => format!("exported {}", path.display()),
            Err(err) => format!("export failed: {}", describe(&err)),
        };
    }
}

fn describe(err: &ReportError) -> String {
    match err {
        ReportError::NoReport => "select a report first".to_string(),
        other => other.to_string(),
    }
}

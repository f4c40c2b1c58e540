/*
[INPUT]:  Crossterm key codes, AppState, UI event sender
[OUTPUT]: Key routing to confirmations, inline edits, tab actions
[POS]:    TUI key handling
[UPDATE]: When keybindings change
*/

use crossterm::event::KeyCode;

use rentroll_console::Intent;
use rentroll_console::expense::ExpenseField;

use super::app::{AppState, ExportKind, Focus, Tab, UiSender};

/// Handles key events for the TUI.
///
/// Returns `true` once quitting went through, after any discard prompt.
pub(super) async fn handle_key_event(app: &mut AppState, key: KeyCode, events: &UiSender) -> bool {
    if app.pending.is_some() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.answer(true, events).await
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.answer(false, events).await
            }
            _ => {}
        }
        return app.quit;
    }

    if app.editing.is_some() {
        handle_edit_key(app, key);
        return false;
    }

    match key {
        KeyCode::Char('q') => {
            app.request(Intent::Quit, events).await;
            return app.quit;
        }
        KeyCode::Char('1') => app.set_tab(Tab::Expenses),
        KeyCode::Char('2') => app.set_tab(Tab::Report),
        KeyCode::Char('3') => app.set_tab(Tab::Logs),
        KeyCode::Char('l') => app.next_tab(),
        _ => match app.current_tab {
            Tab::Expenses => handle_expense_key(app, key, events).await,
            Tab::Report => handle_report_key(app, key).await,
            Tab::Logs => {}
        },
    }
    false
}

fn handle_edit_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.editing = None,
        KeyCode::Backspace => {
            if let Some(text) = app.editing.as_mut() {
                text.pop();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(text) = app.editing.as_mut() {
                text.push(ch);
            }
        }
        _ => {}
    }
}

async fn handle_expense_key(app: &mut AppState, key: KeyCode, events: &UiSender) {
    let form_open = app.workspace.form().is_open();
    match (key, app.focus) {
        (KeyCode::Tab, _) => app.toggle_focus(),
        (KeyCode::Up, Focus::Grid) => app.move_cursor(-1),
        (KeyCode::Down, Focus::Grid) => app.move_cursor(1),
        (KeyCode::Up, Focus::Form) => app.move_field(-1),
        (KeyCode::Down, Focus::Form) => app.move_field(1),
        (KeyCode::Enter, Focus::Grid) => {
            let recid = app
                .grid_state
                .selected()
                .and_then(|index| app.workspace.grid().recid_at(index));
            if let Some(recid) = recid {
                app.request(Intent::Select(recid), events).await;
            }
        }
        (KeyCode::Enter, Focus::Form) => {
            if app.selected_field() == ExpenseField::AccountRule {
                app.cycle_rule(1);
            } else {
                app.begin_edit();
            }
        }
        (KeyCode::Left, Focus::Form) if app.selected_field() == ExpenseField::AccountRule => {
            app.cycle_rule(-1)
        }
        (KeyCode::Right, Focus::Form) if app.selected_field() == ExpenseField::AccountRule => {
            app.cycle_rule(1)
        }
        (KeyCode::Char('n'), _) => app.request(Intent::AddNew, events).await,
        (KeyCode::Char('s'), _) if form_open => app.save().await,
        (KeyCode::Char('a'), _) if form_open => app.save_and_add().await,
        (KeyCode::Char('x'), _) if form_open => app.request(Intent::Reverse, events).await,
        (KeyCode::Char('c') | KeyCode::Esc, _) if form_open => {
            app.request(Intent::Close, events).await
        }
        (KeyCode::Char('['), _) => app.month_back().await,
        (KeyCode::Char(']'), _) => app.month_forward().await,
        (KeyCode::Char('r'), _) => app.refresh().await,
        _ => {}
    }
}

async fn handle_report_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Char('r') => app.load_report().await,
        KeyCode::Char('[') => app.report_month(false).await,
        KeyCode::Char(']') => app.report_month(true).await,
        KeyCode::Char('t') => app.report_today().await,
        KeyCode::Char('e') => app.export(ExportKind::Csv).await,
        KeyCode::Char('p') => app.export(ExportKind::Pdf).await,
        _ => {}
    }
}

/*
[INPUT]:  ExpenseWorkspace, ReportViewer, page setup, log buffer
[OUTPUT]: Ratatui-based TUI run loop, rendering, and shared styles
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or background loads
*/

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing::info;

use rentroll_console::{ExpenseWorkspace, PageSetup, ReportViewer};

use super::LogBufferHandle;
use super::app::{AppState, Tab, UiEvent};
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::*;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub async fn run_tui(
    workspace: ExpenseWorkspace,
    viewer: ReportViewer,
    page: PageSetup,
    log_buffer: LogBufferHandle,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = watch::channel(false);

    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || {
        while !*stop_rx.borrow() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    if input_tx.send(UiEvent::Input(event)).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut app = AppState::new(workspace, viewer, page, log_buffer);
    info!("console started");
    terminal.draw(|frame| draw_ui(frame, &mut app))?;
    app.refresh().await;

    let mut should_quit = false;
    while !should_quit {
        terminal.draw(|frame| draw_ui(frame, &mut app))?;

        let Some(event) = event_rx.recv().await else {
            break;
        };
        match event {
            UiEvent::Input(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                should_quit = handle_key_event(&mut app, key.code, &event_tx).await;
            }
            UiEvent::Input(_) => {}
            UiEvent::Loaded(loaded) => app.finish_load(loaded),
        }
    }

    let _ = stop_tx.send(true);
    info!("console stopped");
    Ok(())
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(area);

    draw_tabs(frame, layout[1], app.current_tab);

    match app.current_tab {
        Tab::Expenses => {
            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(8)])
                .split(layout[0]);
            draw_range_bar(frame, content[0], app);

            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
                .split(content[1]);
            draw_grid(frame, panes[0], app);
            draw_form(frame, panes[1], app);
        }
        Tab::Report => draw_report(frame, layout[0], app),
        Tab::Logs => draw_logs(frame, layout[0], &app.log_buffer),
    }

    draw_footer(frame, layout[2], app);

    if let Some(pending) = app.pending.as_ref() {
        draw_confirm(frame, centered_rect(area, 50, 30), pending);
    }
}

fn hotkeys(app: &AppState) -> Vec<(&'static str, &'static str)> {
    if app.pending.is_some() {
        return vec![("[y]", "Yes"), ("[n]", "No")];
    }
    if app.editing.is_some() {
        return vec![("[Enter]", "Apply"), ("[Esc]", "Cancel")];
    }
    match app.current_tab {
        Tab::Expenses => vec![
            ("[Up/Down]", "Move"),
            ("[Enter]", "Open/Edit"),
            ("[Tab]", "Grid/Form"),
            ("[n]", "New"),
            ("[s]", "Save"),
            ("[a]", "Save+Add"),
            ("[x]", "Reverse"),
            ("[c]", "Close"),
            ("[[/]]", "Month"),
        ],
        Tab::Report => vec![
            ("[Enter]", "Load"),
            ("[[/]]", "Month"),
            ("[t]", "Today"),
            ("[e]", "CSV"),
            ("[p]", "PDF"),
        ],
        Tab::Logs => Vec::new(),
    }
}

pub(super) fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut line1 = Vec::new();
    for (key, label) in hotkeys(app) {
        line1.push(Span::styled(key, key_style));
        line1.push(Span::raw(format!(" {label}  ")));
    }
    let line2 = Line::from(vec![
        Span::styled("[1/2/3]", key_style),
        Span::raw(" Tabs  "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit  "),
        Span::raw(format!("Status: {}", app.status_message)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![Line::from(line1), line2]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn focus_style() -> Style {
    Style::default()
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

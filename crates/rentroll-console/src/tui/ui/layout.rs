/*
[INPUT]:  Frame layout regions, current tab, session range
[OUTPUT]: Tab bar, range bar and layout helpers
[POS]:    TUI UI layout helpers
[UPDATE]: When tabs or the summary bar change
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::tui::app::{AppState, Tab};
use crate::tui::runtime::{border_style, header_style};

pub(in crate::tui) fn draw_tabs(frame: &mut ratatui::Frame, area: Rect, current_tab: Tab) {
    let titles = Tab::ALL
        .iter()
        .map(|tab| Line::from(tab.title()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Tabs"),
        )
        .highlight_style(header_style())
        .select(current_tab.index());

    frame.render_widget(tabs, area);
}

/// Business, date range and grid totals above the expense panels
pub(in crate::tui) fn draw_range_bar(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let session = app.workspace.session();
    let grid = app.workspace.grid();
    let mut spans = vec![
        Span::styled(format!(" {} ", session.business().bud), header_style()),
        Span::raw(format!("  {}  ", session.range().label())),
        Span::raw(format!("{} of {} expenses", grid.len(), grid.total())),
    ];
    if let Some(message) = grid.message() {
        spans.push(Span::styled(
            format!("  {message}"),
            Style::default().fg(Color::LightRed),
        ));
    }
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    frame.render_widget(widget, area);
}

pub(in crate::tui) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

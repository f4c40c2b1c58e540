/*
[INPUT]:  ReportViewer selection, range and loaded content
[OUTPUT]: Report panel rendered into Ratatui frame
[POS]:    TUI UI report viewer rendering
[UPDATE]: When report panel layout changes
*/

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::AppState;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_report(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let viewer = &app.viewer;
    let url = viewer
        .url()
        .map(|url| url.to_string())
        .unwrap_or_else(|err| err.to_string());
    let summary = vec![
        Line::from(format!(
            "{}  {}  page: {}",
            viewer.report().unwrap_or("-"),
            viewer.range().label(),
            app.page.size
        )),
        Line::styled(url, Style::default().fg(Color::DarkGray)),
    ];
    let header = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Report"),
    );
    frame.render_widget(header, layout[0]);

    let available = layout[1].height.saturating_sub(2) as usize;
    let body = match viewer.content() {
        Some(content) => content
            .lines()
            .take(available)
            .map(|line| Line::from(line.to_string()))
            .collect::<Vec<_>>(),
        None => vec![Line::from("Press [Enter] to load the report")],
    };
    let widget = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Content"),
    );
    frame.render_widget(widget, layout[1]);
}

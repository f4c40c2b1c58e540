/*
[INPUT]:  LogBufferHandle tail for the visible height
[OUTPUT]: Logs tab with level-coloured lines
[POS]:    TUI UI logs panel rendering
[UPDATE]: When log line format or panel layout changes
*/

use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::LogBufferHandle;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: &LogBufferHandle,
) {
    let available = area.height.saturating_sub(2) as usize;
    let lines = buffer
        .lock()
        .map(|guard| guard.tail(available))
        .unwrap_or_default();

    let text = lines
        .into_iter()
        .map(|line| {
            let style = level_style(&line);
            Line::styled(line, style)
        })
        .collect::<Vec<_>>();
    let panel = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(" Logs (newest last) "),
    );
    frame.render_widget(panel, area);
}

fn level_style(line: &str) -> Style {
    if line.contains(" ERROR ") {
        Style::default().fg(Color::Red)
    } else if line.contains(" WARN ") {
        Style::default().fg(Color::Yellow)
    } else if line.contains(" DEBUG ") || line.contains(" TRACE ") {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

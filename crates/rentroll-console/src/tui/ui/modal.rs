/*
[INPUT]:  Pending confirmation prompt
[OUTPUT]: Yes/No dialog overlay
[POS]:    TUI UI confirmation modal
[UPDATE]: When confirmation wording or keys change
*/

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::PendingConfirm;

pub(in crate::tui) fn draw_confirm(frame: &mut ratatui::Frame, area: Rect, pending: &PendingConfirm) {
    frame.render_widget(Clear, area);

    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(pending.prompt.message()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", key_style),
            Span::raw(" Yes   "),
            Span::styled("[n]", key_style),
            Span::raw(" No"),
        ]),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    frame.render_widget(widget, area);
}

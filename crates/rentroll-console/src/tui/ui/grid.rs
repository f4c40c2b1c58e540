/*
[INPUT]:  ExpenseGrid rows and the table cursor
[OUTPUT]: Expense table rendered into Ratatui frame
[POS]:    TUI UI expense grid rendering
[UPDATE]: When grid columns change
*/

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::tui::app::{AppState, Focus};
use crate::tui::runtime::{border_style, focus_style, header_style};

pub(in crate::tui) fn draw_grid(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &mut AppState,
) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Date"),
        Cell::from("Account Rule"),
        Cell::from("Amount"),
        Cell::from("RA"),
        Cell::from("Rentable"),
        Cell::from("Comment"),
    ])
    .style(header_style());

    let selected = app.workspace.grid().selected();
    let rows = app
        .workspace
        .grid()
        .rows()
        .into_iter()
        .map(|row| {
            let mut style = Style::default();
            if row.reversed {
                style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
            }
            if selected == Some(row.recid) {
                style = style.add_modifier(Modifier::BOLD);
            }
            Row::new(vec![
                Cell::from(row.marker),
                Cell::from(row.date),
                Cell::from(row.account_rule),
                Cell::from(row.amount),
                Cell::from(row.rental_agreement),
                Cell::from(row.rentable),
                Cell::from(row.comment),
            ])
            .style(style)
        })
        .collect::<Vec<_>>();

    let border = if app.focus == Focus::Grid {
        focus_style()
    } else {
        border_style()
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(10),
            Constraint::Min(14),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Expenses"),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, area, &mut app.grid_state);
}

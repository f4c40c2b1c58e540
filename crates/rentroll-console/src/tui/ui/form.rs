/*
[INPUT]:  FormView of the open expense, focused field, edit buffer
[OUTPUT]: Expense form pane rendered into Ratatui frame
[POS]:    TUI UI expense form rendering
[UPDATE]: When the form layout or per-state affordances change
*/

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use rentroll_console::expense::{ExpenseField, FormButton, FormState};

use crate::tui::app::{AppState, Focus};
use crate::tui::runtime::{border_style, focus_style};

fn button_key(button: FormButton) -> &'static str {
    match button {
        FormButton::Save => "[s]",
        FormButton::SaveAndAdd => "[a]",
        FormButton::Reverse => "[x]",
        FormButton::Close => "[c]",
    }
}

fn state_style(state: FormState) -> Style {
    match state {
        FormState::New => Style::default().fg(Color::LightGreen),
        FormState::Editable => Style::default().fg(Color::LightCyan),
        FormState::Reversed => Style::default().fg(Color::LightRed),
    }
    .add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn draw_form(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let border = if app.focus == Focus::Form {
        focus_style()
    } else {
        border_style()
    };
    let Some(view) = app.workspace.form().view() else {
        let widget = Paragraph::new("Select an expense with [Enter] or press [n] to add one")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title("Expense"),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(widget, area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(view.state.to_string(), state_style(view.state)),
        Span::raw(if view.dirty { "  (modified)" } else { "" }),
    ])];
    lines.push(Line::from(""));

    let focused = app.selected_field();
    for input in &view.inputs {
        let is_focused = app.focus == Focus::Form && input.field == focused;
        let value = match (&app.editing, is_focused) {
            (Some(buffer), true) => format!("{buffer}_"),
            _ => input.value.clone(),
        };
        let mut value_style = if input.enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if is_focused {
            value_style = value_style.add_modifier(Modifier::REVERSED);
        }
        let mut spans = vec![
            Span::styled(
                format!("{:>16}: ", input.field.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(value, value_style),
        ];
        if input.field == ExpenseField::AccountRule && is_focused && input.enabled {
            spans.push(Span::styled(
                "  <Left/Right>",
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
        if let Some(error) = &input.error {
            lines.push(Line::from(Span::styled(
                format!("{:>18}{error}", ""),
                Style::default().fg(Color::LightRed),
            )));
        }
    }

    if view.show_info {
        lines.push(Line::from(""));
        for info in &view.flag_report {
            lines.push(Line::from(Span::styled(
                info.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    let mut buttons = Vec::new();
    for button in view.visible_buttons() {
        let style = if view.is_enabled(button) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        buttons.push(Span::styled(
            format!("{} {}  ", button_key(button), button.label()),
            style,
        ));
    }
    lines.push(Line::from(buttons));

    if let Some(message) = &view.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(view.header.clone()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

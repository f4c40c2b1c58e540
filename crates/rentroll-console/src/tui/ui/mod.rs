/*
[INPUT]:  TUI app state for UI components
[OUTPUT]: Panel render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When panels are added or moved
*/

mod form;
mod grid;
mod layout;
mod logs;
mod modal;
mod report;

pub(in crate::tui) use form::draw_form;
pub(in crate::tui) use grid::draw_grid;
pub(in crate::tui) use layout::{centered_rect, draw_range_bar, draw_tabs};
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use modal::draw_confirm;
pub(in crate::tui) use report::draw_report;

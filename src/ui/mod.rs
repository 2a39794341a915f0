pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(header::SUMMARY_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // The table's free rows size the next refresh's process list.
    app.set_visible_rows(process_table::visible_rows(chunks[2]));

    let quit_key = app.keybinds.quit_label();
    let refresh_key = app.keybinds.refresh_label();

    header::render_title(frame, chunks[0], app.refresh_rate, &quit_key, &app.theme);
    header::render_summary(frame, chunks[1], &app.snapshot, &app.theme);
    process_table::render(frame, chunks[2], &app.snapshot.top_processes, &app.theme);
    statusbar::render(
        frame,
        chunks[3],
        &quit_key,
        &refresh_key,
        app.snapshot.top_processes.len(),
        &app.theme,
    );
}

#[cfg(test)]
mod tests;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use crate::format::truncate_unicode;
use crate::system::process::ProcessSample;
use crate::ui::theme::Theme;

const COMMAND_WIDTH: usize = 60;

/// Process rows that fit in `area` once borders and the header row are
/// taken out.
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

pub fn render(frame: &mut Frame, area: Rect, processes: &[ProcessSample], theme: &Theme) {
    let header = Row::new(["PID", "RSS(KB)", "RSS(MB)", "COMMAND"]).style(
        Style::default()
            .fg(theme.table_header_fg)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes.iter().take(visible_rows(area)).map(|p| {
        Row::new(vec![
            Cell::from(p.pid.to_string()),
            Cell::from(p.rss_kb.to_string()),
            Cell::from((p.rss_kb / 1024).to_string()),
            Cell::from(truncate_unicode(&p.command, COMMAND_WIDTH)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Top processes by RSS ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

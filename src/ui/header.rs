use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::format_rate;
use crate::system::snapshot::{Metric, Snapshot, Usage};
use crate::ui::theme::Theme;

/// Rows taken by the summary block, borders included.
pub const SUMMARY_HEIGHT: u16 = 6;

const LABEL_WIDTH: u16 = 12;
const UNAVAILABLE: &str = "n/a";

pub fn render_title(
    frame: &mut Frame,
    area: Rect,
    refresh_rate: Duration,
    quit_key: &str,
    theme: &Theme,
) {
    let line = Line::from(vec![
        Span::styled(
            " sysmon ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  refresh every {:.1} s  (press {quit_key} to quit)",
                refresh_rate.as_secs_f64()
            ),
            Style::default().fg(theme.text_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_summary(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    let cpu_available = snapshot.is_available(Metric::Cpu);
    render_gauge_row(
        frame,
        rows[0],
        "CPU",
        (snapshot.cpu_usage_percent / 100.0).clamp(0.0, 1.0),
        if cpu_available {
            format!("{:.2} %", snapshot.cpu_usage_percent)
        } else {
            UNAVAILABLE.to_string()
        },
        theme,
    );
    render_usage_row(
        frame,
        rows[1],
        "Memory",
        &snapshot.memory,
        snapshot.is_available(Metric::Memory),
        theme,
    );
    render_usage_row(
        frame,
        rows[2],
        &format!("Disk ({})", snapshot.disk_mount_point),
        &snapshot.disk,
        snapshot.is_available(Metric::Disk),
        theme,
    );
    render_network_row(frame, rows[3], snapshot, theme);
}

fn render_usage_row(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    usage: &Usage,
    available: bool,
    theme: &Theme,
) {
    let text = if available {
        format!(
            "{:.2} %  {} / {} MB",
            usage.percent,
            usage.used_mb(),
            usage.total_mb()
        )
    } else {
        UNAVAILABLE.to_string()
    };
    render_gauge_row(frame, area, label, usage.ratio(), text, theme);
}

fn render_gauge_row(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    ratio: f64,
    text: String,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            label.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        )),
        cols[0],
    );

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(text);
    frame.render_widget(gauge, cols[1]);
}

fn render_network_row(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let value = if snapshot.is_available(Metric::Network) {
        format!(
            "RX {}  TX {}",
            format_rate(snapshot.network.rx_bytes_per_sec),
            format_rate(snapshot.network.tx_bytes_per_sec)
        )
    } else {
        UNAVAILABLE.to_string()
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{:<width$}", "Network", width = LABEL_WIDTH as usize),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

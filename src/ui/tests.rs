use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::system::process::ProcessSample;
use crate::system::snapshot::{Metric, NetworkRate, Snapshot, Usage};
use crate::ui::theme::Theme;
use crate::ui::{header, process_table, statusbar};

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_process(pid: u32, rss_kb: u64, command: &str) -> ProcessSample {
    ProcessSample {
        pid,
        rss_kb,
        command: command.to_string(),
    }
}

fn make_snapshot() -> Snapshot {
    Snapshot {
        cpu_usage_percent: 12.5,
        memory: Usage::new(3 * 1024 * 1024, 8 * 1024 * 1024),
        disk: Usage::new(40 * 1024 * 1024, 100 * 1024 * 1024),
        disk_mount_point: "/".to_string(),
        network: NetworkRate {
            rx_bytes_per_sec: 2048,
            tx_bytes_per_sec: 512,
        },
        top_processes: vec![
            make_process(812, 524_288, "/usr/bin/postgres -D /var/lib/postgres"),
            make_process(1, 12_288, "/sbin/init"),
            make_process(2, 0, "kthreadd"),
        ],
        unavailable: Vec::new(),
    }
}

#[test]
fn title_shows_refresh_rate_and_quit_key() {
    let output = render_to_string(80, 1, |frame| {
        header::render_title(
            frame,
            Rect::new(0, 0, 80, 1),
            Duration::from_millis(1500),
            "q",
            &Theme::default(),
        );
    });

    assert!(output.contains("sysmon"));
    assert!(output.contains("refresh every 1.5 s"));
    assert!(output.contains("press q to quit"));
}

#[test]
fn summary_shows_every_metric() {
    let snapshot = make_snapshot();
    let output = render_to_string(80, header::SUMMARY_HEIGHT, |frame| {
        header::render_summary(
            frame,
            Rect::new(0, 0, 80, header::SUMMARY_HEIGHT),
            &snapshot,
            &Theme::default(),
        );
    });

    assert!(output.contains("CPU"));
    assert!(output.contains("12.50 %"));
    assert!(output.contains("37.50 %  3072 / 8192 MB"));
    assert!(output.contains("Disk (/)"));
    assert!(output.contains("40.00 %"));
    assert!(output.contains("RX 2 KB/s  TX 512 B/s"));
}

#[test]
fn summary_marks_unavailable_metrics() {
    let snapshot = Snapshot {
        disk_mount_point: "/data".to_string(),
        unavailable: vec![Metric::Disk, Metric::Network],
        ..make_snapshot()
    };
    let output = render_to_string(80, header::SUMMARY_HEIGHT, |frame| {
        header::render_summary(
            frame,
            Rect::new(0, 0, 80, header::SUMMARY_HEIGHT),
            &snapshot,
            &Theme::default(),
        );
    });

    assert!(output.contains("Disk (/data)"));
    assert_eq!(output.matches("n/a").count(), 2);
    assert!(output.contains("12.50 %"));
}

#[test]
fn process_table_lists_rows_in_order() {
    let snapshot = make_snapshot();
    let output = render_to_string(80, 8, |frame| {
        process_table::render(
            frame,
            Rect::new(0, 0, 80, 8),
            &snapshot.top_processes,
            &Theme::default(),
        );
    });

    assert!(output.contains("RSS(KB)"));
    assert!(output.contains("COMMAND"));
    let postgres = output.find("524288").unwrap();
    let init = output.find("/sbin/init").unwrap();
    let kthreadd = output.find("kthreadd").unwrap();
    assert!(postgres < init && init < kthreadd);
    // RSS in megabytes alongside kilobytes
    assert!(output.contains("512"));
}

#[test]
fn process_table_clips_to_visible_rows() {
    let snapshot = make_snapshot();
    let output = render_to_string(80, 5, |frame| {
        process_table::render(
            frame,
            Rect::new(0, 0, 80, 5),
            &snapshot.top_processes,
            &Theme::default(),
        );
    });

    assert!(output.contains("/sbin/init"));
    assert!(!output.contains("kthreadd"));
}

#[test]
fn statusbar_shows_key_pills() {
    let output = render_to_string(80, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 80, 1),
            "q",
            "r",
            3,
            &Theme::default(),
        );
    });

    assert!(output.contains(" q  Quit"));
    assert!(output.contains(" r  Refresh"));
    assert!(output.contains("3 shown"));
}

use std::fmt;

use serde::Serialize;

use crate::format::clip_to_width;
use crate::system::snapshot::{Snapshot, Usage};

/// Line-oriented text rendering of a snapshot for one-shot mode.
pub struct Report<'a> {
    snapshot: &'a Snapshot,
    command_width: usize,
}

impl<'a> Report<'a> {
    pub fn new(snapshot: &'a Snapshot, command_width: usize) -> Self {
        Report {
            snapshot,
            command_width,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        writeln!(f, "CPU: {:.2} %", s.cpu_usage_percent)?;
        write_usage(f, "Memory", &s.memory)?;
        write_usage(f, "Disk", &s.disk)?;
        writeln!(
            f,
            "Network: RX {} B/s, TX {} B/s",
            s.network.rx_bytes_per_sec, s.network.tx_bytes_per_sec
        )?;
        writeln!(f, "Top Processes by RSS:")?;
        writeln!(f, "{:<6} {:<10} {}", "PID", "RSS(KB)", "COMMAND")?;
        for process in &s.top_processes {
            let row = format!(
                "{:<6} {:<10} {}",
                process.pid,
                process.rss_kb,
                clip_to_width(&process.command, self.command_width)
            );
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}

fn write_usage(f: &mut fmt::Formatter<'_>, label: &str, usage: &Usage) -> fmt::Result {
    writeln!(
        f,
        "{label}: {:.2} % ({} MB used / {} MB total)",
        usage.percent,
        usage.used_mb(),
        usage.total_mb()
    )
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

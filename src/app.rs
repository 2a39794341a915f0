use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::collector::{Baseline, Collector};
use crate::system::error::SampleError;
use crate::system::snapshot::{Metric, Snapshot};
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    pub fn quit_label(&self) -> String {
        key_label(self.quit)
    }

    pub fn refresh_label(&self) -> String {
        key_label(self.refresh)
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// State of the continuous display. The collector baseline is replaced by
/// each refresh, so one refresh's trailing samples lead the next.
pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub snapshot: Snapshot,
    pub refresh_rate: Duration,
    pub keybinds: ResolvedKeybinds,
    pub theme: Theme,
    /// Rows the process table can show; sizes the next refresh's top-N.
    pub visible_rows: usize,
    baseline: Baseline,
    last_refresh: Instant,
}

impl App {
    /// Fails when the first processor-counter read fails, since no later
    /// refresh could compute a CPU delta without it.
    pub fn new(config: &Config) -> Result<Self, SampleError> {
        let collector = Collector::from_config(&config.sampling);
        let baseline = collector.baseline()?;
        // Nothing has been measured until the first refresh.
        let snapshot = Snapshot {
            disk_mount_point: config.sampling.mount_point.display().to_string(),
            unavailable: vec![Metric::Cpu, Metric::Memory, Metric::Disk, Metric::Network],
            ..Snapshot::default()
        };

        Ok(App {
            running: true,
            collector,
            snapshot,
            refresh_rate: config.general.refresh_rate(),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            theme: Theme::default(),
            visible_rows: 0,
            baseline,
            last_refresh: baseline.taken_at,
        })
    }

    /// Called on every poll tick. Returns whether a refresh happened.
    pub fn on_poll(&mut self) -> bool {
        if self.last_refresh.elapsed() < self.refresh_rate {
            return false;
        }
        self.refresh_data();
        true
    }

    pub fn refresh_data(&mut self) {
        let (snapshot, baseline) = self.collector.cycle(self.baseline, self.visible_rows);
        debug!(
            processes = snapshot.top_processes.len(),
            cpu = snapshot.cpu_usage_percent,
            "refreshed"
        );
        self.snapshot = snapshot;
        self.baseline = baseline;
        self.last_refresh = baseline.taken_at;
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows;
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        let code = normalize(key.code);
        if code == normalize(self.keybinds.quit) {
            return Action::Quit;
        }
        if code == normalize(self.keybinds.refresh) {
            return Action::Refresh;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }
}

/// Letter keybinds match either case, so `q` and `Q` both quit.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

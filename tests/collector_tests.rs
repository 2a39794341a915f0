mod common;

use std::time::{Duration, Instant};

use common::FakeProc;
use sysmon::system::collector::{Baseline, Collector};
use sysmon::system::pause::{Pause, Wait};
use sysmon::system::reader::ProcReader;
use sysmon::system::snapshot::Metric;

/// Runs one scripted step per pause instead of sleeping, so counters can
/// advance deterministically "during" the interval.
struct ScriptedPause<'a> {
    steps: Vec<Box<dyn FnMut() -> Wait + 'a>>,
    calls: Vec<Duration>,
}

impl<'a> ScriptedPause<'a> {
    fn new(steps: Vec<Box<dyn FnMut() -> Wait + 'a>>) -> Self {
        ScriptedPause {
            steps,
            calls: Vec::new(),
        }
    }
}

impl Pause for ScriptedPause<'_> {
    fn pause(&mut self, interval: Duration) -> Wait {
        let index = self.calls.len();
        self.calls.push(interval);
        match self.steps.get_mut(index) {
            Some(step) => step(),
            None => Wait::Elapsed,
        }
    }
}

fn step<'a>(f: impl FnMut() -> Wait + 'a) -> Box<dyn FnMut() -> Wait + 'a> {
    Box::new(f)
}

fn collector(proc: &FakeProc, scan_limit: usize) -> Collector {
    Collector::new(
        ProcReader::new(proc.root()).with_page_size_kb(4),
        proc.root(),
        Duration::from_secs(1),
        scan_limit,
    )
}

fn populated_proc() -> FakeProc {
    let proc = FakeProc::new();
    proc.write_cpu(1000, 0, 5000, 0);
    proc.write_meminfo(1024, 128, 256);
    proc.write_net_dev(&[("lo", 1000, 1000), ("eth0", 200, 300)]);
    proc.add_process(1, b"/sbin/init\0", "systemd", 100);
    proc.add_process(2, b"", "kthreadd", 0);
    proc.add_process(300, b"postgres\0-D\0/data\0", "postgres", 5000);
    proc.add_process(301, b"nginx\0", "nginx", 900);
    proc
}

#[test]
fn one_shot_computes_rates_across_the_interval() {
    let proc = populated_proc();
    let mut pause = ScriptedPause::new(vec![
        step(|| {
            // 20 busy ticks and 80 idle ticks elapse
            proc.write_cpu(1020, 0, 5080, 0);
            Wait::Elapsed
        }),
        step(|| {
            proc.write_net_dev(&[("lo", 9000, 9000), ("eth0", 800, 600)]);
            Wait::Elapsed
        }),
    ]);

    let snapshot = collector(&proc, 64)
        .one_shot(&mut pause, 10)
        .unwrap()
        .expect("pause was not cancelled");

    assert_eq!(pause.calls, vec![Duration::from_secs(1); 2]);
    assert!((snapshot.cpu_usage_percent - 20.0).abs() < 1e-9);
    assert_eq!(snapshot.memory.used_kb, 768);
    assert_eq!(snapshot.memory.total_kb, 1024);
    assert!((snapshot.memory.percent - 75.0).abs() < 1e-9);
    assert_eq!(snapshot.network.rx_bytes_per_sec, 600);
    assert_eq!(snapshot.network.tx_bytes_per_sec, 300);

    let pids: Vec<u32> = snapshot.top_processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![300, 301, 1, 2]);
    assert_eq!(snapshot.top_processes[0].command, "postgres -D /data");
    assert_eq!(snapshot.top_processes[0].rss_kb, 20_000);
    assert!(snapshot.is_available(Metric::Memory));
}

#[test]
fn one_shot_truncates_to_top_n() {
    let proc = populated_proc();
    let mut pause = ScriptedPause::new(Vec::new());
    let snapshot = collector(&proc, 64)
        .one_shot(&mut pause, 2)
        .unwrap()
        .unwrap();
    let pids: Vec<u32> = snapshot.top_processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![300, 301]);
}

#[test]
fn unchanged_counters_report_zero() {
    let proc = populated_proc();
    let mut pause = ScriptedPause::new(Vec::new());
    let snapshot = collector(&proc, 64)
        .one_shot(&mut pause, 10)
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.cpu_usage_percent, 0.0);
    assert_eq!(snapshot.network.rx_bytes_per_sec, 0);
    assert_eq!(snapshot.network.tx_bytes_per_sec, 0);
}

#[test]
fn cancelled_pause_abandons_the_snapshot() {
    let proc = populated_proc();
    let mut pause = ScriptedPause::new(vec![step(|| Wait::Cancelled)]);
    let result = collector(&proc, 64).one_shot(&mut pause, 10).unwrap();
    assert!(result.is_none());
    assert_eq!(pause.calls.len(), 1);
}

#[test]
fn one_shot_without_processor_counters_fails() {
    let proc = FakeProc::new();
    proc.write_meminfo(1024, 128, 256);
    let mut pause = ScriptedPause::new(Vec::new());
    assert!(collector(&proc, 64).one_shot(&mut pause, 10).is_err());
    assert!(pause.calls.is_empty());
}

#[test]
fn missing_sources_degrade_without_aborting() {
    let proc = FakeProc::new();
    proc.write_cpu(10, 10, 10, 10);
    proc.add_process(5, b"sshd\0", "sshd", 10);
    let collector = Collector::new(
        ProcReader::new(proc.root()).with_page_size_kb(4),
        proc.root().join("no-such-mount"),
        Duration::from_secs(1),
        64,
    );

    let mut pause = ScriptedPause::new(Vec::new());
    let snapshot = collector.one_shot(&mut pause, 10).unwrap().unwrap();

    assert!(snapshot.is_available(Metric::Cpu));
    assert!(!snapshot.is_available(Metric::Memory));
    assert!(!snapshot.is_available(Metric::Disk));
    assert!(!snapshot.is_available(Metric::Network));
    assert_eq!(snapshot.memory.percent, 0.0);
    assert_eq!(snapshot.disk.percent, 0.0);
    assert_eq!(snapshot.top_processes.len(), 1);
}

#[test]
fn processor_counters_vanishing_after_baseline_degrade_cpu_only() {
    let proc = populated_proc();
    let root = proc.root_buf();
    let mut pause = ScriptedPause::new(vec![step(move || {
        std::fs::remove_file(root.join("stat")).unwrap();
        Wait::Elapsed
    })]);
    let snapshot = collector(&proc, 64)
        .one_shot(&mut pause, 10)
        .unwrap()
        .unwrap();
    assert!(!snapshot.is_available(Metric::Cpu));
    assert_eq!(snapshot.cpu_usage_percent, 0.0);
    assert!(snapshot.is_available(Metric::Memory));
}

#[test]
fn scan_limit_bounds_the_candidates() {
    let proc = FakeProc::new();
    proc.write_cpu(1, 1, 1, 1);
    for pid in 1..=30 {
        proc.add_process(pid, b"worker\0", "worker", u64::from(pid));
    }
    let mut pause = ScriptedPause::new(Vec::new());
    let snapshot = collector(&proc, 8)
        .one_shot(&mut pause, 10)
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.top_processes.len(), 8);
}

#[test]
fn cycle_reuses_the_previous_trailing_sample() {
    let proc = populated_proc();
    let collector = collector(&proc, 64);
    let baseline = collector.baseline().unwrap();

    proc.write_cpu(1050, 0, 5050, 0);
    let (first, next) = collector.cycle(baseline, 3);
    assert!((first.cpu_usage_percent - 50.0).abs() < 1e-9);
    assert_eq!(first.top_processes.len(), 3);
    assert_eq!(next.cpu.user, 1050);
    assert!(next.taken_at >= baseline.taken_at);

    proc.write_cpu(1050, 0, 5150, 0);
    let (second, _) = collector.cycle(next, 3);
    assert_eq!(second.cpu_usage_percent, 0.0);
}

#[test]
fn cycle_clamps_network_counter_resets() {
    let proc = populated_proc();
    let collector = collector(&proc, 64);
    let baseline = collector.baseline().unwrap();

    proc.write_net_dev(&[("eth0", 100, 100)]);
    let (snapshot, next) = collector.cycle(baseline, 0);
    assert_eq!(snapshot.network.rx_bytes_per_sec, 0);
    assert_eq!(snapshot.network.tx_bytes_per_sec, 0);
    assert!(snapshot.top_processes.is_empty());
    assert_eq!(next.network.unwrap().rx_bytes, 100);
}

#[test]
fn cycle_survives_losing_network_source() {
    let proc = populated_proc();
    let collector = collector(&proc, 64);
    let baseline = collector.baseline().unwrap();

    std::fs::remove_file(proc.root().join("net").join("dev")).unwrap();
    let (snapshot, next) = collector.cycle(baseline, 10);
    assert!(!snapshot.is_available(Metric::Network));
    assert!(next.network.is_none());

    proc.write_net_dev(&[("eth0", 400, 400)]);
    let (snapshot, next) = collector.cycle(next, 10);
    assert!(!snapshot.is_available(Metric::Network));
    assert!(next.network.is_some());
}

#[test]
fn cycle_divides_network_growth_by_elapsed_time() {
    let proc = populated_proc();
    let collector = collector(&proc, 64);
    let two_seconds_ago = Instant::now()
        .checked_sub(Duration::from_secs(2))
        .expect("monotonic clock is past two seconds");
    let baseline = Baseline {
        taken_at: two_seconds_ago,
        ..collector.baseline().unwrap()
    };

    // eth0 grows by 2000 received and 1000 sent bytes; lo is ignored
    proc.write_net_dev(&[("lo", 50_000, 50_000), ("eth0", 2200, 1300)]);
    let (snapshot, next) = collector.cycle(baseline, 10);

    assert!(snapshot.is_available(Metric::Network));
    // Elapsed is a little over two seconds, so rates land just under Δ/2.
    let rx = snapshot.network.rx_bytes_per_sec;
    let tx = snapshot.network.tx_bytes_per_sec;
    assert!((950..=1000).contains(&rx), "rx rate was {rx}");
    assert!((475..=500).contains(&tx), "tx rate was {tx}");
    assert!(next.taken_at.duration_since(two_seconds_ago) >= Duration::from_secs(2));
}

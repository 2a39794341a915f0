use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::counters::{CpuCounters, DiskCounters, MemoryCounters, NetworkCounters};
use super::delta::{cpu_usage_percent, rate};
use super::error::SampleError;
use super::pause::{Pause, Wait};
use super::process::{ProcessSample, rank_by_rss};
use super::reader::ProcReader;
use super::snapshot::{Metric, NetworkRate, Snapshot, Usage};
use crate::config::SamplingConfig;

/// Trailing samples of one cycle, reused as the leading samples of the next.
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub cpu: CpuCounters,
    pub network: Option<NetworkCounters>,
    pub taken_at: Instant,
}

/// Runs sampling cycles and turns their readings into [`Snapshot`]s.
pub struct Collector {
    reader: ProcReader,
    mount_point: PathBuf,
    interval: Duration,
    scan_limit: usize,
}

#[derive(Default)]
struct Readings {
    cpu_percent: Option<f64>,
    memory: Option<MemoryCounters>,
    disk: Option<DiskCounters>,
    network: Option<NetworkRate>,
    processes: Vec<ProcessSample>,
}

impl Collector {
    pub fn new(
        reader: ProcReader,
        mount_point: impl Into<PathBuf>,
        interval: Duration,
        scan_limit: usize,
    ) -> Self {
        Collector {
            reader,
            mount_point: mount_point.into(),
            interval,
            scan_limit,
        }
    }

    pub fn from_config(config: &SamplingConfig) -> Self {
        Self::new(
            ProcReader::new(&config.proc_root),
            &config.mount_point,
            config.interval(),
            config.max_scanned_processes,
        )
    }

    /// Leading samples for continuous mode. Fails only when the processor
    /// counters cannot be read, since no later delta could be computed.
    pub fn baseline(&self) -> Result<Baseline, SampleError> {
        let cpu = self.reader.read_cpu_counters()?;
        Ok(Baseline {
            cpu,
            network: degrade(Metric::Network, self.reader.read_network_counters()),
            taken_at: Instant::now(),
        })
    }

    /// Samples everything once, pausing one interval between the two reads
    /// of each rate-based metric. Returns `Ok(None)` if a pause is cancelled.
    pub fn one_shot(
        &self,
        pause: &mut impl Pause,
        top_n: usize,
    ) -> Result<Option<Snapshot>, SampleError> {
        let _span = tracing::debug_span!("collector.one_shot").entered();

        let cpu_before = self.reader.read_cpu_counters()?;
        if pause.pause(self.interval) == Wait::Cancelled {
            return Ok(None);
        }
        let cpu_percent = degrade(Metric::Cpu, self.reader.read_cpu_counters())
            .map(|cpu_after| cpu_usage_percent(&cpu_before, &cpu_after));

        let memory = degrade(Metric::Memory, self.reader.read_memory_counters());
        let disk = degrade(Metric::Disk, self.reader.read_disk_usage(&self.mount_point));

        let net_before = degrade(Metric::Network, self.reader.read_network_counters());
        if pause.pause(self.interval) == Wait::Cancelled {
            return Ok(None);
        }
        let net_after = degrade(Metric::Network, self.reader.read_network_counters());
        let network = network_rate(net_before, net_after, self.interval);

        let processes = self.ranked_processes(top_n);

        Ok(Some(self.assemble(Readings {
            cpu_percent,
            memory,
            disk,
            network,
            processes,
        })))
    }

    /// One refresh of continuous mode. Deltas are taken against `baseline`
    /// over the time actually elapsed since it was sampled; the returned
    /// baseline carries this cycle's trailing samples.
    pub fn cycle(&self, baseline: Baseline, top_n: usize) -> (Snapshot, Baseline) {
        let _span = tracing::debug_span!("collector.cycle", top_n).entered();

        let cpu = degrade(Metric::Cpu, self.reader.read_cpu_counters());
        let network = degrade(Metric::Network, self.reader.read_network_counters());
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(baseline.taken_at);

        let readings = Readings {
            cpu_percent: cpu.map(|cur| cpu_usage_percent(&baseline.cpu, &cur)),
            memory: degrade(Metric::Memory, self.reader.read_memory_counters()),
            disk: degrade(Metric::Disk, self.reader.read_disk_usage(&self.mount_point)),
            network: network_rate(baseline.network, network, elapsed),
            processes: self.ranked_processes(top_n),
        };
        debug!(elapsed_ms = elapsed.as_millis() as u64, "cycle sampled");

        let next = Baseline {
            cpu: cpu.unwrap_or(baseline.cpu),
            network,
            taken_at: now,
        };
        (self.assemble(readings), next)
    }

    fn ranked_processes(&self, top_n: usize) -> Vec<ProcessSample> {
        let scanned = self.reader.read_processes(self.scan_limit);
        debug!(scanned = scanned.len(), top_n, "ranking processes");
        rank_by_rss(scanned, top_n)
    }

    fn assemble(&self, readings: Readings) -> Snapshot {
        let mut unavailable = Vec::new();
        let mut mark = |metric: Metric, present: bool| {
            if !present {
                unavailable.push(metric);
            }
        };
        mark(Metric::Cpu, readings.cpu_percent.is_some());
        mark(Metric::Memory, readings.memory.is_some());
        mark(Metric::Disk, readings.disk.is_some());
        mark(Metric::Network, readings.network.is_some());

        let memory = readings.memory.unwrap_or_default();
        let disk = readings.disk.unwrap_or_default();
        Snapshot {
            cpu_usage_percent: readings.cpu_percent.unwrap_or(0.0),
            memory: Usage::new(memory.used_kb(), memory.total_kb),
            disk: Usage::new(disk.used_kb(), disk.total_kb),
            disk_mount_point: self.mount_point.display().to_string(),
            network: readings.network.unwrap_or_default(),
            top_processes: readings.processes,
            unavailable,
        }
    }
}

fn network_rate(
    before: Option<NetworkCounters>,
    after: Option<NetworkCounters>,
    interval: Duration,
) -> Option<NetworkRate> {
    let (before, after) = (before?, after?);
    Some(NetworkRate {
        rx_bytes_per_sec: rate(before.rx_bytes, after.rx_bytes, interval),
        tx_bytes_per_sec: rate(before.tx_bytes, after.tx_bytes, interval),
    })
}

fn degrade<T>(metric: Metric, result: Result<T, SampleError>) -> Option<T> {
    result
        .inspect_err(|err| warn!(?metric, error = %err, "metric unavailable this cycle"))
        .ok()
}

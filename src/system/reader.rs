//! Raw counter reads from a procfs tree.
//!
//! Every assumption about the kernel's text layouts (which line, which
//! column) lives in this module.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::counters::{CpuCounters, DiskCounters, MemoryCounters, NetworkCounters};
use super::error::SampleError;
use super::platform;
use super::process::{ProcessBuffer, ProcessSample};

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const LOOPBACK_INTERFACE: &str = "lo";

/// Longest argument list kept per process, in bytes.
pub const CMDLINE_CAP: usize = 255;

const CPU_LABEL: &str = "cpu";
const CPU_MANDATORY_FIELDS: usize = 7;
const CPU_MAX_FIELDS: usize = 10;
const NET_DEV_HEADER_LINES: usize = 2;
const NET_DEV_MAX_FIELDS: usize = 16;
const NET_RX_BYTES_FIELD: usize = 0;
const NET_TX_BYTES_FIELD: usize = 8;
/// Index of `rss` (stat field 24) among the fields after the command name,
/// which start at field 3 (`state`).
const STAT_RSS_INDEX: usize = 24 - 3;

#[derive(Debug, Clone)]
pub struct ProcReader {
    root: PathBuf,
    page_size_kb: u64,
}

impl Default for ProcReader {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProcReader {
            root: root.into(),
            page_size_kb: platform::page_size_kb(),
        }
    }

    pub fn with_page_size_kb(mut self, page_size_kb: u64) -> Self {
        self.page_size_kb = page_size_kb;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_cpu_counters(&self) -> Result<CpuCounters, SampleError> {
        let path = self.root.join("stat");
        let file = File::open(&path).map_err(|e| SampleError::unavailable(&path, &e))?;
        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|e| SampleError::unavailable(&path, &e))?;
        parse_cpu_line(&line).ok_or_else(|| {
            SampleError::malformed(&path, format!("unexpected cpu line {:?}", line.trim_end()))
        })
    }

    /// Missing fields are left at zero; only an unreadable file is an error.
    pub fn read_memory_counters(&self) -> Result<MemoryCounters, SampleError> {
        let path = self.root.join("meminfo");
        let contents =
            fs::read_to_string(&path).map_err(|e| SampleError::unavailable(&path, &e))?;
        let memory = parse_meminfo(&contents);
        if memory.total_kb == 0 || memory.available_kb == 0 {
            debug!(?memory, "meminfo is missing fields; using zero for them");
        }
        Ok(memory)
    }

    pub fn read_disk_usage(&self, mount_point: &Path) -> Result<DiskCounters, SampleError> {
        platform::disk_usage(mount_point)
    }

    pub fn read_network_counters(&self) -> Result<NetworkCounters, SampleError> {
        let path = self.root.join("net").join("dev");
        let contents =
            fs::read_to_string(&path).map_err(|e| SampleError::unavailable(&path, &e))?;
        Ok(parse_net_dev(&contents))
    }

    /// Scans numerically named directories in directory order, keeping at
    /// most `max_count` samples. A process that exits mid-scan still takes a
    /// slot, as a zero-RSS sample with no command.
    pub fn read_processes(&self, max_count: usize) -> Vec<ProcessSample> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "cannot list processes");
                return Vec::new();
            }
        };

        let mut buffer = ProcessBuffer::with_capacity(max_count);
        for entry in entries.flatten() {
            if buffer.is_full() {
                debug!(limit = max_count, "process scan limit reached");
                break;
            }
            let Some(pid) = entry.file_name().to_str().and_then(parse_pid) else {
                continue;
            };
            buffer.push(self.read_process(pid));
        }
        buffer.into_vec()
    }

    fn read_process(&self, pid: u32) -> ProcessSample {
        let dir = self.root.join(pid.to_string());
        let cmdline = read_capped(&dir.join("cmdline"), CMDLINE_CAP).ok();
        let stat = fs::read_to_string(dir.join("stat")).ok();
        if cmdline.is_none() && stat.is_none() {
            trace!(pid, "process exited during scan");
            return ProcessSample {
                pid,
                rss_kb: 0,
                command: String::new(),
            };
        }

        let mut command = cmdline.as_deref().map(sanitize_cmdline).unwrap_or_default();
        if command.is_empty() {
            command = fs::read_to_string(dir.join("comm"))
                .map(|comm| comm.trim_end_matches('\n').to_string())
                .unwrap_or_default();
        }

        let rss_pages = stat.as_deref().and_then(parse_stat_rss_pages).unwrap_or(0);
        ProcessSample {
            pid,
            rss_kb: rss_pages.saturating_mul(self.page_size_kb),
            command,
        }
    }
}

/// Parses the aggregate `cpu` line: seven mandatory fields, `steal`
/// optional, guest fields ignored.
pub fn parse_cpu_line(line: &str) -> Option<CpuCounters> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != CPU_LABEL {
        return None;
    }
    let fields: Vec<u64> = tokens
        .take(CPU_MAX_FIELDS)
        .map_while(|t| t.parse().ok())
        .collect();
    if fields.len() < CPU_MANDATORY_FIELDS {
        return None;
    }
    Some(CpuCounters {
        user: fields[0],
        nice: fields[1],
        system: fields[2],
        idle: fields[3],
        iowait: fields[4],
        irq: fields[5],
        softirq: fields[6],
        steal: fields.get(7).copied().unwrap_or(0),
    })
}

pub fn parse_meminfo(contents: &str) -> MemoryCounters {
    let mut memory = MemoryCounters::default();
    for line in contents.lines() {
        let mut parts = line.split_whitespace();
        let (Some(label), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            continue;
        };
        match label {
            "MemTotal:" => memory.total_kb = value,
            "MemFree:" => memory.free_kb = value,
            "MemAvailable:" => memory.available_kb = value,
            _ => {}
        }
    }
    memory
}

/// Sums receive/transmit bytes over every interface except loopback.
/// Interfaces with fewer than nine numeric columns contribute nothing.
pub fn parse_net_dev(contents: &str) -> NetworkCounters {
    let mut totals = NetworkCounters::default();
    for line in contents.lines().skip(NET_DEV_HEADER_LINES) {
        let Some((iface, rest)) = line.split_once(':') else {
            continue;
        };
        if iface.trim() == LOOPBACK_INTERFACE {
            continue;
        }
        let fields: Vec<u64> = rest
            .split_whitespace()
            .take(NET_DEV_MAX_FIELDS)
            .map(|t| t.parse().unwrap_or(0))
            .collect();
        if fields.len() <= NET_TX_BYTES_FIELD {
            continue;
        }
        totals.rx_bytes = totals.rx_bytes.saturating_add(fields[NET_RX_BYTES_FIELD]);
        totals.tx_bytes = totals.tx_bytes.saturating_add(fields[NET_TX_BYTES_FIELD]);
    }
    totals
}

/// RSS in pages from a `/proc/<pid>/stat` line. The command name may
/// contain spaces and parentheses, so fields are counted from the last `)`.
pub fn parse_stat_rss_pages(stat: &str) -> Option<u64> {
    let after_comm = stat.rfind(')')? + 1;
    stat[after_comm..]
        .split_whitespace()
        .nth(STAT_RSS_INDEX)?
        .parse()
        .ok()
}

/// Joins a NUL-separated argument list into one display string.
pub fn sanitize_cmdline(raw: &[u8]) -> String {
    let raw = &raw[..raw.len().min(CMDLINE_CAP)];
    let joined: Vec<u8> = raw
        .iter()
        .map(|&b| if b == 0 { b' ' } else { b })
        .collect();
    String::from_utf8_lossy(&joined).trim_end().to_string()
}

fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok().filter(|&pid| pid > 0)
}

fn read_capped(path: &Path, cap: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(cap);
    File::open(path)?.take(cap as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

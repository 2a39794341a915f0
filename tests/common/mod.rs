// Shared test helpers: a throwaway procfs tree.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const NET_DEV_HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        FakeProc {
            dir: tempfile::tempdir().expect("create temp proc root"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn root_buf(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn write_cpu(&self, user: u64, system: u64, idle: u64, iowait: u64) {
        self.write_stat(&format!(
            "cpu  {user} 0 {system} {idle} {iowait} 0 0 0 0 0\ncpu0 {user} 0 {system} {idle} {iowait} 0 0 0 0 0\nintr 12345\n"
        ));
    }

    pub fn write_stat(&self, contents: &str) {
        fs::write(self.root().join("stat"), contents).unwrap();
    }

    pub fn write_meminfo(&self, total_kb: u64, free_kb: u64, available_kb: u64) {
        fs::write(
            self.root().join("meminfo"),
            format!(
                "MemTotal:       {total_kb} kB\nMemFree:        {free_kb} kB\nMemAvailable:   {available_kb} kB\nBuffers:          1024 kB\nCached:           2048 kB\n"
            ),
        )
        .unwrap();
    }

    /// `(name, rx_bytes, tx_bytes)` per interface.
    pub fn write_net_dev(&self, interfaces: &[(&str, u64, u64)]) {
        let mut contents = NET_DEV_HEADER.to_string();
        for (name, rx, tx) in interfaces {
            contents.push_str(&format!(
                "{name:>6}: {rx} 10 0 0 0 0 0 0 {tx} 10 0 0 0 0 0 0\n"
            ));
        }
        fs::create_dir_all(self.root().join("net")).unwrap();
        fs::write(self.root().join("net").join("dev"), contents).unwrap();
    }

    pub fn add_process(&self, pid: u32, cmdline: &[u8], comm: &str, rss_pages: u64) {
        let dir = self.root().join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cmdline"), cmdline).unwrap();
        fs::write(dir.join("comm"), format!("{comm}\n")).unwrap();
        fs::write(dir.join("stat"), stat_line(pid, comm, rss_pages)).unwrap();
    }

    /// A pid directory whose files are already gone, as when a process exits
    /// between the directory listing and the reads.
    pub fn add_vanished_process(&self, pid: u32) {
        fs::create_dir_all(self.root().join(pid.to_string())).unwrap();
    }
}

pub fn stat_line(pid: u32, comm: &str, rss_pages: u64) -> String {
    format!(
        "{pid} ({comm}) S 1 {pid} {pid} 0 -1 4194560 1200 0 0 0 15 7 0 0 20 0 1 0 4242 104857600 {rss_pages} 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0\n"
    )
}

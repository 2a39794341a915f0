use std::path::Path;

use super::counters::DiskCounters;
use super::error::SampleError;

/// Counters that come from system calls rather than text files.
pub trait PlatformExtensions {
    fn disk_usage(mount_point: &Path) -> Result<DiskCounters, SampleError>;
    fn page_size_kb() -> u64;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

pub fn disk_usage(mount_point: &Path) -> Result<DiskCounters, SampleError> {
    platform_impl::Platform::disk_usage(mount_point)
}

pub fn page_size_kb() -> u64 {
    platform_impl::Platform::page_size_kb()
}

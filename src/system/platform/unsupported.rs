use std::io;
use std::path::Path;

use super::PlatformExtensions;
use crate::system::counters::DiskCounters;
use crate::system::error::SampleError;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn disk_usage(mount_point: &Path) -> Result<DiskCounters, SampleError> {
        Err(SampleError::unavailable(
            mount_point,
            &io::Error::new(
                io::ErrorKind::Unsupported,
                "filesystem statistics are only read on Linux",
            ),
        ))
    }

    fn page_size_kb() -> u64 {
        4
    }
}

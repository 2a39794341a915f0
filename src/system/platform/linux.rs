use std::ffi::CString;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::PlatformExtensions;
use crate::system::counters::DiskCounters;
use crate::system::error::SampleError;

const FALLBACK_PAGE_SIZE_KB: u64 = 4;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn disk_usage(mount_point: &Path) -> Result<DiskCounters, SampleError> {
        let c_path = CString::new(mount_point.as_os_str().as_bytes()).map_err(|_| {
            SampleError::unavailable(
                mount_point,
                &io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
            )
        })?;

        let mut stat = MaybeUninit::<libc::statvfs>::uninit();
        // SAFETY: c_path is NUL-terminated and stat points to storage for one statvfs.
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if rc != 0 {
            return Err(SampleError::unavailable(
                mount_point,
                &io::Error::last_os_error(),
            ));
        }
        // SAFETY: statvfs returned 0 so the struct has been filled in.
        let stat = unsafe { stat.assume_init() };

        // f_frsize is the unit f_blocks and f_bavail are counted in.
        let block_size = stat.f_frsize as u64;
        Ok(DiskCounters {
            total_kb: (stat.f_blocks as u64).saturating_mul(block_size) / 1024,
            available_kb: (stat.f_bavail as u64).saturating_mul(block_size) / 1024,
        })
    }

    fn page_size_kb() -> u64 {
        // SAFETY: sysconf has no preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size >= 1024 {
            size as u64 / 1024
        } else {
            FALLBACK_PAGE_SIZE_KB
        }
    }
}

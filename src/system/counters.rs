/// Cumulative processor time since boot, in clock ticks, from the aggregate
/// `cpu` line. Every field only grows until the next reboot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuCounters {
    pub fn idle_time(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn busy_time(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }

    pub fn total_time(&self) -> u64 {
        self.idle_time().saturating_add(self.busy_time())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
}

impl MemoryCounters {
    /// Memory not available for new allocations. Saturates at zero if the
    /// source reports more available than total.
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskCounters {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl DiskCounters {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }
}

/// Byte counters summed over every interface except loopback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

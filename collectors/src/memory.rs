//! Memory usage sources.

use std::fmt::Debug;

/// A source of process memory usage snapshots.
pub trait MemorySource: Send + Sync + Debug {
    /// Returns the current memory usage in bytes.
    fn current_usage(&self) -> u64;
}

/// Reports the resident set size of the current process.
///
/// Reads `VmRSS` from `/proc/self/status`. Platforms without procfs report 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemorySource for ProcessMemory {
    fn current_usage(&self) -> u64 {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| parse_vm_rss(&status))
            .unwrap_or(0)
    }
}

/// Always reports the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedMemory(pub u64);

impl MemorySource for FixedMemory {
    fn current_usage(&self) -> u64 {
        self.0
    }
}

/// Extracts the `VmRSS` line of a procfs status file, in bytes.
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let mut fields = line["VmRSS:".len()..].split_whitespace();
    let value: u64 = fields.next()?.parse().ok()?;
    match fields.next() {
        Some("kB") | None => Some(value * 1024),
        Some(_) => None,
    }
}

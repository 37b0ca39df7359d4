//! Durability mode for WAL appends.
//!
//! Defines when the write-ahead log is fsynced.

/// Durability mode for WAL writes.
///
/// Controls when data is fsynced to disk and the trade-off between
/// latency and durability.
///
/// # Mode Comparison
///
/// | Mode | Fsync | Use Case |
/// |------|-------|----------|
/// | None | never | Tests, scratch data |
/// | Batched | every N appends or T ms | Default |
/// | Strict | every append | Audit-grade data |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Appends reach the OS page cache only.
    ///
    /// The log is still written, so a clean reopen recovers everything; an
    /// OS crash may lose recent writes.
    None,

    /// fsync after every append.
    Strict,

    /// fsync every `batch_size` appends OR when `interval_ms` has elapsed
    /// since the last fsync, whichever comes first.
    ///
    /// The interval is checked on append; there is no background flusher.
    Batched {
        /// Maximum time between fsyncs in milliseconds
        interval_ms: u64,
        /// Maximum appends between fsyncs
        batch_size: usize,
    },
}

impl DurabilityMode {
    /// Check if this mode ever fsyncs on its own.
    pub fn syncs(&self) -> bool {
        !matches!(self, DurabilityMode::None)
    }

    /// Check if this mode requires immediate fsync on every append.
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Strict)
    }

    /// Human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::None => "No fsync (fastest, recent writes lost on OS crash)",
            DurabilityMode::Strict => "Sync fsync (safest, slowest)",
            DurabilityMode::Batched { .. } => "Batched fsync (balanced speed/safety)",
        }
    }

    /// Batched mode with recommended defaults.
    ///
    /// Returns `Batched { interval_ms: 100, batch_size: 1000 }`.
    pub fn buffered_default() -> Self {
        DurabilityMode::Batched {
            interval_ms: 100,
            batch_size: 1000,
        }
    }
}

impl Default for DurabilityMode {
    fn default() -> Self {
        Self::buffered_default()
    }
}

impl std::str::FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DurabilityMode::None),
            "strict" => Ok(DurabilityMode::Strict),
            "batched" | "buffered" => Ok(DurabilityMode::buffered_default()),
            other => Err(format!(
                "unknown durability mode '{}' (expected none, strict or batched)",
                other
            )),
        }
    }
}

//! Configuration for the interaction controller.

/// How the counter store applies a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterWriteMode {
    /// Server-side `count = count + delta`. One round trip, no lost updates.
    #[default]
    Atomic,
    /// Read, compute, then compare-and-set; retried on conflict.
    CompareAndSwap { max_attempts: u32 },
}

/// Configuration for the interaction controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How counter deltas are written. Defaults to `CounterWriteMode::Atomic`.
    pub counter_mode: CounterWriteMode,

    /// Capacity of the notice broadcast channel. Slow subscribers that fall
    /// further behind miss the oldest notices.
    pub notice_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            counter_mode: CounterWriteMode::default(),
            notice_capacity: 64,
        }
    }
}

impl ControllerConfig {
    /// Create a config that writes counters with compare-and-set.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Attempts before giving up with a contention error.
    ///   Zero is treated as one.
    ///
    /// # Returns
    ///
    /// A `ControllerConfig` with `counter_mode` set to `CompareAndSwap`.
    pub fn compare_and_swap(max_attempts: u32) -> Self {
        Self {
            counter_mode: CounterWriteMode::CompareAndSwap {
                max_attempts: max_attempts.max(1),
            },
            ..Self::default()
        }
    }
}

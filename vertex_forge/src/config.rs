/// Process-wide configuration for buffers and logging

use crate::log::LogSeverity;
use crate::driver::DrawHint;

/// What a buffer does when replacement data exceeds its reserved storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Re-reserve driver storage large enough for the new data
    Grow,
    /// Fail with `Error::CapacityError`
    Reject,
}

/// Vertex Forge configuration
///
/// Read once when a buffer is created; changing it later does not affect
/// existing buffers.
#[derive(Debug, Clone)]
pub struct Config {
    /// Draw hint used by constructors that do not take one
    pub default_draw_hint: DrawHint,
    /// Policy applied by `set_data` / `add_instance` when storage is too small
    pub capacity_policy: CapacityPolicy,
    /// Number of instances reserved on the second growth step of an instanced buffer
    pub instance_growth_block: usize,
    /// Log entries below this severity are dropped
    pub min_log_severity: LogSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_draw_hint: DrawHint::Static,
            capacity_policy: CapacityPolicy::Grow,
            instance_growth_block: 32,
            min_log_severity: if cfg!(debug_assertions) {
                LogSeverity::Debug
            } else {
                LogSeverity::Info
            },
        }
    }
}

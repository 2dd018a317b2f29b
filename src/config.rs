//! Compile-time configuration.
//!
//! Thresholds are fixed at build time; there is no runtime configuration.

/// Irrigate only while relative humidity is strictly below this (%RH).
pub const HUMIDITY_THRESHOLD_PCT: f32 = 60.0;

/// Irrigate only while the raw light reading is strictly above this.
pub const LIGHT_THRESHOLD: u16 = 1000;

/// Pause between two control cycles.
pub const CYCLE_PERIOD_MS: u64 = 2_000;

/// Capacity of one formatted status line.
pub const STATUS_LINE_CAPACITY: usize = 96;

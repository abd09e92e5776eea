//! Construction capacity: how many civilian factories are free to build,
//! and how they split into per-line quanta.

/// Maximum factories a single construction line can hold.
pub const CAPACITY_QUANTUM: u32 = 15;

/// Civilian factories available for construction after the consumer-goods
/// reservation.
///
/// The reservation is `ceil((civilian + military) * penalty)` and is taken
/// entirely out of the civilian pool; a heavily militarized economy can
/// drive the result to zero.
pub fn available_capacity(civilian_total: u32, military_total: u32, penalty: f64) -> u32 {
    let reserved = (f64::from(civilian_total + military_total) * penalty).ceil() as i64;
    (i64::from(civilian_total) - reserved).max(0) as u32
}

/// Split available capacity into line assignments: full quanta first, then
/// one remainder line. Zero capacity yields no lines.
pub fn chunk_capacity(available: u32, quantum: u32) -> Vec<u32> {
    let mut chunks = Vec::with_capacity((available / quantum + 1) as usize);
    let mut remaining = available;
    while remaining >= quantum {
        chunks.push(quantum);
        remaining -= quantum;
    }
    if remaining > 0 {
        chunks.push(remaining);
    }
    chunks
}

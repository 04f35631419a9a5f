/// Pixel displacement produced by `rate` (per second) over `elapsed_ms`.
///
/// The result is truncated toward zero, so sub-pixel remainders are dropped
/// rather than rounded.
pub fn delta(rate: f64, elapsed_ms: u64) -> i32 {
    (rate * (elapsed_ms as f64 / 1000.0)).trunc() as i32
}

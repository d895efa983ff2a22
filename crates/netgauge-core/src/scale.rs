//! Rate and gauge scaling.
//!
//! Every tick the raw octet counter difference is turned into megabits per
//! second (assuming a one-second tick) and mapped onto the display's 0–255
//! analog range relative to `gauge_max`.

/// Largest value the analog gauge channel accepts.
pub const GAUGE_FULL_SCALE: i64 = 255;

/// Octet difference between two counter readings.
///
/// Signed so that a counter reset or wraparound shows up as a negative
/// delta instead of a huge unsigned one.
pub fn octet_delta(sample: u64, last_sample: u64) -> f64 {
    (i128::from(sample) - i128::from(last_sample)) as f64
}

/// Octets per tick → megabits per second.
pub fn megabits(octets: f64) -> f64 {
    let bits = octets * 8.0;
    bits / 1000.0 / 1000.0
}

/// Map a megabit rate onto the gauge range.
///
/// Rounds half away from zero and clamps only at the top: negative rates
/// come back negative.
pub fn scale_to_gauge(megabits: f64, gauge_max: f64) -> i64 {
    let scaled = ((megabits / gauge_max) * GAUGE_FULL_SCALE as f64).round() as i64;
    scaled.min(GAUGE_FULL_SCALE)
}

/// Value actually written to the gauge channel for a cycle average.
///
/// Truncates toward zero, then clamps into the channel's 0–255 range.
pub fn gauge_value(average: f64) -> u8 {
    average.trunc().clamp(0.0, GAUGE_FULL_SCALE as f64) as u8
}

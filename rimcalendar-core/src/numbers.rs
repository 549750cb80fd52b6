//! Numeric conversion helpers centralizing the float ↔ integer casts used by
//! date arithmetic.

use num_traits::cast::cast;

/// Round half-to-even and clamp to the i32 range, returning 0 for NaN.
///
/// Time-zone offsets and local tick offsets both go through here so that a
/// longitude sitting exactly between two zones lands in the same zone for
/// hour display and for firing-day math.
#[must_use]
pub fn round_ties_even_to_i32(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = f64::from(value).clamp(min, max).round_ties_even();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Narrow an i64 that is known to be small (day, hour, minute indices).
#[must_use]
pub fn narrow_i64_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Narrow a bounded index into a `u8`, saturating at the edges.
#[must_use]
pub fn narrow_to_u8(value: i64) -> u8 {
    u8::try_from(value.clamp(0, i64::from(u8::MAX))).unwrap_or(u8::MAX)
}

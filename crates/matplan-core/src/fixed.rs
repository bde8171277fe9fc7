use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// All quantities in the planning graph (quantity-per-unit on flows, net
/// inventory changes in the ledger) use this type so that planning passes
/// are deterministic and free of float drift.
pub type Fixed64 = I32F32;

/// Opaque, totally ordered point on the planning timeline.
///
/// The ledger needs ordering and equality and nothing else; callers choose
/// the epoch and resolution (seconds, minutes, bucket indexes).
pub type Timestamp = i64;

/// Convert an f64 to Fixed64. Use only for initialization and data loading.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and reporting.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

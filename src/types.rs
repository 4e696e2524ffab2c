use serde::Serialize;

/// Row id of a facility in the published hospital list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FacilityId(pub u64);

/// Monetary convention: all amounts are whole rupees. Benchmark and quoted
/// amounts are `u64`; the quoted-minus-benchmark difference is `i64` so an
/// undercharge stays representable without panicking.
pub type Rupees = u64;

/// Signed rupee difference (quoted minus benchmark).
pub type RupeeDiff = i64;

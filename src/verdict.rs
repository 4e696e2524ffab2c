use std::fmt;

use serde::Serialize;

use crate::types::{RupeeDiff, Rupees};

/// How a quoted amount compares to the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// Quoted above the cap.
    Overcharge,
    /// Quoted at the cap, or below it under the binary policy.
    Compliant,
    /// Quoted below the cap (three-way policy only).
    Undercharge,
}

impl Verdict {
    pub fn is_compliant(self) -> bool {
        !matches!(self, Verdict::Overcharge)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Overcharge => write!(f, "Critical Overcharge"),
            Verdict::Compliant => write!(f, "Compliant"),
            Verdict::Undercharge => write!(f, "Below Cap (Good Deal)"),
        }
    }
}

/// Whether an under-cap quote is reported as plain `Compliant` or as the
/// distinct favourable `Undercharge` outcome. The signed difference is
/// reported either way, so no information is lost to the policy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictPolicy {
    /// Anything at or below the cap is `Compliant`.
    #[default]
    Binary,
    /// Exactly-at-cap is `Compliant`; strictly below is `Undercharge`.
    ThreeWay,
}

/// One bill line judged against its benchmark. A pure projection of its
/// inputs, recomputed fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub benchmark: Rupees,
    pub quoted: Rupees,
    /// Quoted minus benchmark, in rupees.
    pub difference: RupeeDiff,
    /// Integer percent above the cap; 0 unless the verdict is `Overcharge`,
    /// and 0 when the benchmark itself is 0 (the ratio is undefined).
    pub overcharge_percent: u32,
    pub verdict: Verdict,
}

/// Judge a quoted amount against a benchmark under the given policy.
pub fn assess(benchmark: Rupees, quoted: Rupees, policy: VerdictPolicy) -> Assessment {
    let difference = quoted as RupeeDiff - benchmark as RupeeDiff;

    let verdict = if difference > 0 {
        Verdict::Overcharge
    } else if difference < 0 && policy == VerdictPolicy::ThreeWay {
        Verdict::Undercharge
    } else {
        Verdict::Compliant
    };

    let overcharge_percent = if difference > 0 && benchmark > 0 {
        ((difference as f64 / benchmark as f64) * 100.0).round() as u32
    } else {
        0
    };

    Assessment { benchmark, quoted, difference, overcharge_percent, verdict }
}

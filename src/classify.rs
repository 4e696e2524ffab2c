use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value fell outside its recognized enumerated set. These are rejected at
/// parse time rather than silently treated as "no adjustment", so a
/// data-entry mistake can never masquerade as a compliance finding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unrecognised city tier {0:?} (expected \"Tier 1\", \"Tier 2\" or \"Tier 3\")")]
    UnknownTier(String),

    #[error("unrecognised rate tier code {0:?} (expected \"I\", \"II\" or \"III\")")]
    UnknownRateTier(String),

    #[error("unrecognised ward type {0:?} (expected general, semi-private or private)")]
    UnknownWard(String),
}

/// NABH accreditation status. Selects which of the two listed rates applies
/// and gates the super-speciality premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accreditation {
    Nabh,
    NonNabh,
}

impl Accreditation {
    /// Total parse over the free-text accreditation column: any text that
    /// mentions NABH (case-insensitive) counts as accredited, everything
    /// else as non-accredited.
    pub fn from_text(text: &str) -> Self {
        if text.to_lowercase().contains("nabh") {
            Accreditation::Nabh
        } else {
            Accreditation::NonNabh
        }
    }

    pub fn is_accredited(self) -> bool {
        matches!(self, Accreditation::Nabh)
    }

    pub fn label(self) -> &'static str {
        match self {
            Accreditation::Nabh => "NABH",
            Accreditation::NonNabh => "Non-NABH",
        }
    }
}

/// Classification of the facility's city, driving the rate discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CityTier {
    /// Strict parse of the published tier label. Accepts only the recognised
    /// spellings; anything else errors. (The label must name the tier
    /// exactly: a stray "2" elsewhere in a malformed string does not count.)
    pub fn parse(label: &str) -> Result<Self, ClassifyError> {
        match label.trim().to_lowercase().as_str() {
            "tier 1" | "tier-1" | "tier1" | "1" => Ok(CityTier::Tier1),
            "tier 2" | "tier-2" | "tier2" | "2" => Ok(CityTier::Tier2),
            "tier 3" | "tier-3" | "tier3" | "3" => Ok(CityTier::Tier3),
            _ => Err(ClassifyError::UnknownTier(label.trim().to_string())),
        }
    }

    /// Discount applied to the running rate: Tier 1 cities pay the full
    /// listed rate, Tier 2 90%, Tier 3 80%.
    pub fn discount(self) -> f64 {
        match self {
            CityTier::Tier1 => 1.0,
            CityTier::Tier2 => 0.90,
            CityTier::Tier3 => 0.80,
        }
    }

    /// The rate-list tier whose rows apply to facilities in this city tier.
    pub fn rate_tier(self) -> RateTier {
        match self {
            CityTier::Tier1 => RateTier::I,
            CityTier::Tier2 => RateTier::II,
            CityTier::Tier3 => RateTier::III,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CityTier::Tier1 => "Tier 1",
            CityTier::Tier2 => "Tier 2",
            CityTier::Tier3 => "Tier 3",
        }
    }
}

/// Tier code a listed rate row was computed for ("I"/"II"/"III" in the
/// published price list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateTier {
    I,
    II,
    III,
}

impl RateTier {
    pub fn from_code(code: &str) -> Result<Self, ClassifyError> {
        match code.trim().to_uppercase().as_str() {
            "I" => Ok(RateTier::I),
            "II" => Ok(RateTier::II),
            "III" => Ok(RateTier::III),
            _ => Err(ClassifyError::UnknownRateTier(code.trim().to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RateTier::I => "I",
            RateTier::II => "II",
            RateTier::III => "III",
        }
    }
}

/// Patient accommodation class for the current audit. Semi-private is the
/// reference ward; the other two adjust the rate by 5% either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WardType {
    General,
    SemiPrivate,
    Private,
}

impl WardType {
    pub fn parse(value: &str) -> Result<Self, ClassifyError> {
        match value.trim().to_lowercase().as_str() {
            "general" => Ok(WardType::General),
            "semi-private" | "semi private" | "semiprivate" => Ok(WardType::SemiPrivate),
            "private" => Ok(WardType::Private),
            _ => Err(ClassifyError::UnknownWard(value.trim().to_string())),
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            WardType::General => 0.95,
            WardType::SemiPrivate => 1.0,
            WardType::Private => 1.05,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WardType::General => "General",
            WardType::SemiPrivate => "Semi-Private",
            WardType::Private => "Private",
        }
    }

    pub const ALL: [WardType; 3] = [WardType::General, WardType::SemiPrivate, WardType::Private];
}

/// Procedure categories priced uniformly across wards.
const UNIFORM_CATEGORIES: [&str; 4] = [
    "consultation",
    "laboratory investigation",
    "radiotherapy",
    "diagnostic",
];

/// Whether a procedure name falls in a uniform category (consultations, lab
/// investigations, radiotherapy, diagnostics). Uniform procedures receive no
/// ward adjustment regardless of the selected ward.
pub fn uniform_category(name: &str) -> bool {
    let lower = name.to_lowercase();
    UNIFORM_CATEGORIES.iter().any(|cat| lower.contains(cat))
}

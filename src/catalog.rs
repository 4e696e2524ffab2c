use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{Accreditation, CityTier, ClassifyError, RateTier, uniform_category};
use crate::types::FacilityId;

/// Raw hospital row, key-for-key as published in `hospitals.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "sno_")]
    pub sno: u64,
    pub city_name: String,
    pub hospital_name: String,
    pub accreditation: String,
    pub tier_type: String,
    pub address: String,
    #[serde(default)]
    pub facilities: String,
}

/// Raw price row, key-for-key as published in `prices.json`. Every rate is a
/// string in the source data; parsing happens once at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureRecord {
    pub code: String,
    pub name: String,
    #[serde(rename = "nabhRate")]
    pub nabh_rate: String,
    #[serde(rename = "nonNabhRate")]
    pub non_nabh_rate: String,
    #[serde(rename = "superSpecialityRate", default)]
    pub super_speciality_rate: String,
    #[serde(rename = "specialityClassification", default)]
    pub speciality_classification: String,
    pub tier: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A rate column is missing or not a number. Never defaulted to zero:
    /// a benchmark computed from a silently-zeroed rate would report every
    /// bill as an overcharge.
    #[error("procedure {code}: {field} {value:?} is not a valid rate")]
    InvalidRate {
        code: String,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A facility with its classification resolved. Immutable for the audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub accreditation: Accreditation,
    pub tier: CityTier,
    /// Grouping key for the city pickers. The published data carries the
    /// city in `address`; `city_name` is display-only.
    pub city: String,
    pub city_name: String,
    pub facilities_text: String,
    /// Name or facilities text mentions "super speciality".
    pub super_speciality: bool,
    /// False for facilities asserted by the user rather than drawn from the
    /// published list.
    pub listed: bool,
}

impl Facility {
    pub fn from_record(rec: &FacilityRecord) -> Result<Self, CatalogError> {
        Ok(Facility {
            id: FacilityId(rec.sno),
            accreditation: Accreditation::from_text(&rec.accreditation),
            tier: CityTier::parse(&rec.tier_type)?,
            city: rec.address.clone(),
            city_name: rec.city_name.clone(),
            super_speciality: mentions_super_speciality(&rec.hospital_name, &rec.facilities),
            name: rec.hospital_name.clone(),
            facilities_text: rec.facilities.clone(),
            listed: true,
        })
    }

    /// A facility the user asserts exists but the published list does not
    /// carry. Classified from the same free-text inputs as a listed row.
    pub fn user_asserted(
        name: &str,
        accreditation_text: &str,
        tier_label: &str,
        city: &str,
        facilities_text: &str,
    ) -> Result<Self, ClassifyError> {
        Ok(Facility {
            id: FacilityId(0),
            accreditation: Accreditation::from_text(accreditation_text),
            tier: CityTier::parse(tier_label)?,
            city: city.to_string(),
            city_name: city.to_string(),
            super_speciality: mentions_super_speciality(name, facilities_text),
            name: name.to_string(),
            facilities_text: facilities_text.to_string(),
            listed: false,
        })
    }
}

fn mentions_super_speciality(name: &str, facilities_text: &str) -> bool {
    name.to_lowercase().contains("super speciality")
        || facilities_text.to_lowercase().contains("super speciality")
}

/// A price-list row with its rates parsed and its category resolved.
/// Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    pub code: String,
    pub name: String,
    pub nabh_rate: f64,
    pub non_nabh_rate: f64,
    pub super_speciality_rate: Option<f64>,
    pub speciality_classification: String,
    pub tier: RateTier,
    /// Consultations, lab investigations, radiotherapy and diagnostics price
    /// the same across wards.
    pub uniform: bool,
}

impl Procedure {
    pub fn from_record(rec: &ProcedureRecord) -> Result<Self, CatalogError> {
        Ok(Procedure {
            nabh_rate: parse_rate(&rec.code, "nabhRate", &rec.nabh_rate)?,
            non_nabh_rate: parse_rate(&rec.code, "nonNabhRate", &rec.non_nabh_rate)?,
            super_speciality_rate: parse_optional_rate(
                &rec.code,
                "superSpecialityRate",
                &rec.super_speciality_rate,
            )?,
            tier: RateTier::from_code(&rec.tier)?,
            uniform: uniform_category(&rec.name),
            code: rec.code.clone(),
            name: rec.name.clone(),
            speciality_classification: rec.speciality_classification.clone(),
        })
    }
}

fn parse_rate(code: &str, field: &'static str, value: &str) -> Result<f64, CatalogError> {
    let invalid = || CatalogError::InvalidRate {
        code: code.to_string(),
        field,
        value: value.to_string(),
    };
    let rate: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(invalid());
    }
    Ok(rate)
}

/// Empty string means the column is absent for this row.
fn parse_optional_rate(
    code: &str,
    field: &'static str,
    value: &str,
) -> Result<Option<f64>, CatalogError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_rate(code, field, value).map(Some)
}

/// The static reference data: facilities and price-list rows, validated once
/// at load and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub facilities: Vec<Facility>,
    pub procedures: Vec<Procedure>,
}

impl Catalog {
    pub fn from_records(
        facility_records: &[FacilityRecord],
        procedure_records: &[ProcedureRecord],
    ) -> Result<Self, CatalogError> {
        let facilities = facility_records
            .iter()
            .map(Facility::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let procedures = procedure_records
            .iter()
            .map(Procedure::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog { facilities, procedures })
    }

    /// Parse the two published JSON documents.
    pub fn from_json(hospitals_json: &str, prices_json: &str) -> Result<Self, CatalogError> {
        let facility_records: Vec<FacilityRecord> =
            serde_json::from_str(hospitals_json).map_err(|source| CatalogError::Json {
                path: "hospitals.json".to_string(),
                source,
            })?;
        let procedure_records: Vec<ProcedureRecord> =
            serde_json::from_str(prices_json).map_err(|source| CatalogError::Json {
                path: "prices.json".to_string(),
                source,
            })?;
        Self::from_records(&facility_records, &procedure_records)
    }

    /// Load `hospitals.json` and `prices.json` from a directory.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let read = |file: &str| -> Result<String, CatalogError> {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        Self::from_json(&read("hospitals.json")?, &read("prices.json")?)
    }

    /// Built-in reference data so the binaries work with no data files.
    /// Rates follow the published CGHS order of magnitude; one price row per
    /// rate tier, as published.
    pub fn canonical() -> Self {
        // ── Facilities ────────────────────────────────────────────────────────
        let facility = |sno, city: &str, name: &str, accreditation: &str, tier: &str, facilities: &str| {
            FacilityRecord {
                sno,
                city_name: city.to_string(),
                hospital_name: name.to_string(),
                accreditation: accreditation.to_string(),
                tier_type: tier.to_string(),
                address: city.to_string(),
                facilities: facilities.to_string(),
            }
        };

        let facility_records = vec![
            facility(1, "Delhi", "Fortune Heart Institute", "NABH Accredited", "Tier 1",
                "Cardiology, Cardiothoracic Surgery, ICU"),
            facility(2, "Delhi", "Rajdhani Super Speciality Hospital", "NABH Accredited", "Tier 1",
                "Oncology, Neurosurgery, Orthopaedics, ICU"),
            facility(3, "Delhi", "Sparsh Nursing Home", "Not Accredited", "Tier 1",
                "General Medicine, Maternity"),
            facility(4, "Mumbai", "Harbour City Hospital", "NABH Accredited", "Tier 1",
                "General Surgery, Orthopaedics, Pathology Lab"),
            facility(5, "Mumbai", "Lotus Medical Centre", "Not Accredited", "Tier 1",
                "General Medicine, Day Care Surgery"),
            facility(6, "Jaipur", "Amber Super Speciality Hospital", "Not Accredited", "Tier 2",
                "Oncology, Nephrology, Dialysis Unit"),
            facility(7, "Jaipur", "Pink City Medical Centre", "NABH Accredited", "Tier 2",
                "General Surgery, Ophthalmology"),
            facility(8, "Nashik", "Godavari General Hospital", "NABH Accredited", "Tier 3",
                "General Surgery, Maternity, Pathology Lab"),
        ];

        // ── Price list ────────────────────────────────────────────────────────
        // (code, name, speciality, nabh, non-nabh, super-speciality column)
        let price_rows: [(&str, &str, &str, &str, &str, &str); 8] = [
            ("1", "OPD Consultation", "Medicine", "350", "300", ""),
            ("77", "Laboratory Investigation - Complete Blood Count (CBC)", "Pathology",
                "116", "104", ""),
            ("582", "Diagnostic Endoscopy - Upper GI", "Gastroenterology", "3480", "3000", ""),
            ("791", "Radiotherapy - External Beam (per sitting)", "Oncology", "1150", "1000", ""),
            ("936", "Cataract Surgery with Foldable IOL", "Ophthalmology",
                "24000", "21000", "27600"),
            ("1445", "Appendicectomy", "General Surgery", "23000", "20000", "26450"),
            ("1472", "Cholecystectomy - Laparoscopic", "General Surgery",
                "29900", "26000", "34385"),
            ("2339", "Total Knee Replacement (Unilateral)", "Orthopaedics",
                "92000", "80000", "105800"),
        ];

        let mut procedure_records = Vec::new();
        for tier in ["I", "II", "III"] {
            for (code, name, speciality, nabh, non_nabh, super_rate) in price_rows {
                procedure_records.push(ProcedureRecord {
                    code: format!("{code}/{tier}"),
                    name: name.to_string(),
                    nabh_rate: nabh.to_string(),
                    non_nabh_rate: non_nabh.to_string(),
                    super_speciality_rate: super_rate.to_string(),
                    speciality_classification: speciality.to_string(),
                    tier: tier.to_string(),
                });
            }
        }

        Self::from_records(&facility_records, &procedure_records)
            .expect("canonical catalog is valid")
    }
}

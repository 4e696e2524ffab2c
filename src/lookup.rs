//! Filtering collaborators around the catalog: the pickers and the
//! search-as-you-type endpoint. The engine never filters; it consumes the
//! validated records these functions hand back.

use std::collections::BTreeSet;

use crate::catalog::{Catalog, Facility, Procedure};
use crate::classify::{CityTier, ClassifyError};

/// Procedures whose name contains `query` (case-insensitive) in the rate
/// tier that applies to `tier_label` ("Tier 1" -> I, "Tier 2" -> II,
/// "Tier 3" -> III). An unmapped tier label is an input-validation error.
/// An empty query returns no candidates, mirroring the search box.
pub fn find_procedures_by_tier_and_query<'c>(
    catalog: &'c Catalog,
    tier_label: &str,
    query: &str,
) -> Result<Vec<&'c Procedure>, ClassifyError> {
    let tier = CityTier::parse(tier_label)?.rate_tier();
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }
    let needle = query.to_lowercase();
    Ok(catalog
        .procedures
        .iter()
        .filter(|p| p.tier == tier && p.name.to_lowercase().contains(&needle))
        .collect())
}

/// Exact-code lookup within one rate tier.
pub fn find_procedure_by_code<'c>(
    catalog: &'c Catalog,
    tier: CityTier,
    code: &str,
) -> Option<&'c Procedure> {
    catalog
        .procedures
        .iter()
        .find(|p| p.tier == tier.rate_tier() && p.code == code)
}

/// Unique city list, sorted, for the first picker.
pub fn cities(catalog: &Catalog) -> Vec<&str> {
    catalog
        .facilities
        .iter()
        .map(|f| f.city.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// All facilities whose grouping city matches exactly.
pub fn facilities_in_city<'c>(catalog: &'c Catalog, city: &str) -> Vec<&'c Facility> {
    catalog.facilities.iter().filter(|f| f.city == city).collect()
}

/// Facilities in a city whose name contains `query`, case-insensitive.
/// An empty query lists the whole city, like the combobox it feeds.
pub fn find_facilities<'c>(catalog: &'c Catalog, city: &str, query: &str) -> Vec<&'c Facility> {
    let needle = query.to_lowercase();
    catalog
        .facilities
        .iter()
        .filter(|f| f.city == city && f.name.to_lowercase().contains(&needle))
        .collect()
}

use std::collections::HashMap;
use std::env;

use rcap::catalog::Catalog;
use rcap::classify::WardType;
use rcap::engine;
use serde::Serialize;

#[derive(Serialize)]
struct Row<'a> {
    code: &'a str,
    name: &'a str,
    speciality: &'a str,
    ward: &'static str,
    benchmark: u64,
}

/// Dump the full benchmark table for one facility: every price-list row in
/// its rate tier, priced for all three wards. NDJSON on stdout, summary on
/// stderr.
fn main() {
    let catalog = Catalog::canonical();

    let query = env::args().nth(1).expect("usage: rate_table <facility name substring>");
    let needle = query.to_lowercase();
    let facility = catalog
        .facilities
        .iter()
        .find(|f| f.name.to_lowercase().contains(&needle))
        .unwrap_or_else(|| panic!("no facility matching {query:?}"));

    let rate_tier = facility.tier.rate_tier();
    let rows: Vec<Row> = catalog
        .procedures
        .iter()
        .filter(|p| p.tier == rate_tier)
        .flat_map(|p| {
            WardType::ALL.iter().map(move |&ward| Row {
                code: &p.code,
                name: &p.name,
                speciality: &p.speciality_classification,
                ward: ward.label(),
                benchmark: engine::benchmark(p, facility, ward),
            })
        })
        .collect();

    // Write NDJSON to stdout.
    for row in &rows {
        println!("{}", serde_json::to_string(row).expect("serialisation failed"));
    }

    // Per-speciality summary to stderr.
    let mut speciality_counts: HashMap<&str, usize> = HashMap::new();
    let mut speciality_sum: HashMap<&str, u64> = HashMap::new();
    // Per-ward summary.
    let mut ward_sum: HashMap<&str, u64> = HashMap::new();
    for row in &rows {
        *speciality_counts.entry(row.speciality).or_insert(0) += 1;
        *speciality_sum.entry(row.speciality).or_insert(0) += row.benchmark;
        *ward_sum.entry(row.ward).or_insert(0) += row.benchmark;
    }

    eprintln!(
        "rate_table: {} ({}, {}, {}), {} rows",
        facility.name,
        facility.city,
        facility.accreditation.label(),
        facility.tier.label(),
        rows.len()
    );

    // Speciality breakdown.
    let mut specialities: Vec<&str> = speciality_counts.keys().copied().collect();
    specialities.sort_unstable();
    for s in specialities {
        let n = speciality_counts[s];
        let mean = speciality_sum[s] / n as u64;
        eprintln!("  speciality={s:<20}  rows={n:>3}  mean_benchmark={mean:>8}");
    }

    // Ward breakdown.
    for ward in WardType::ALL {
        let label = ward.label();
        if let Some(total) = ward_sum.get(label) {
            eprintln!("  ward={label:<14}  total_benchmark={total:>10}");
        }
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use rcap::catalog::Catalog;
use rcap::classify::WardType;
use rcap::lookup;
use rcap::session::AuditSession;
use rcap::types::Rupees;
use rcap::verdict::{Verdict, VerdictPolicy};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut data_dir: Option<PathBuf> = None;
    let mut list_cities = false;
    let mut list_facilities = false;
    let mut city: Option<String> = None;
    let mut facility_query: Option<String> = None;
    let mut custom_facility: Option<String> = None;
    let mut accreditation = String::new();
    let mut tier_label: Option<String> = None;
    let mut facilities_text = String::new();
    let mut search: Option<String> = None;
    let mut procedure_code: Option<String> = None;
    let mut ward: Option<WardType> = None;
    let mut quoted: Option<Rupees> = None;
    let mut policy = VerdictPolicy::Binary;
    let mut json = false;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" => {
                i += 1;
                data_dir = Some(PathBuf::from(&args[i]));
            }
            "--cities" => list_cities = true,
            "--facilities" => list_facilities = true,
            "--city" => {
                i += 1;
                city = Some(args[i].clone());
            }
            "--facility" => {
                i += 1;
                facility_query = Some(args[i].clone());
            }
            "--custom-facility" => {
                i += 1;
                custom_facility = Some(args[i].clone());
            }
            "--accreditation" => {
                i += 1;
                accreditation = args[i].clone();
            }
            "--tier" => {
                i += 1;
                tier_label = Some(args[i].clone());
            }
            "--facilities-text" => {
                i += 1;
                facilities_text = args[i].clone();
            }
            "--search" => {
                i += 1;
                search = Some(args[i].clone());
            }
            "--procedure" => {
                i += 1;
                procedure_code = Some(args[i].clone());
            }
            "--ward" => {
                i += 1;
                ward = Some(WardType::parse(&args[i]).expect("--ward requires general, semi-private or private"));
            }
            "--quoted" => {
                i += 1;
                quoted = Some(args[i].parse().expect("--quoted requires a whole-rupee amount"));
            }
            "--three-way" => policy = VerdictPolicy::ThreeWay,
            "--json" => json = true,
            "--quiet" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("unknown flag {other:?} (try --help)");
                return ExitCode::from(2);
            }
        }
        i += 1;
    }

    let catalog = match data_dir {
        Some(dir) => match Catalog::load(&dir) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        },
        None => Catalog::canonical(),
    };

    if list_cities {
        for c in lookup::cities(&catalog) {
            println!("{c}");
        }
        return ExitCode::SUCCESS;
    }

    let mut session = AuditSession::new(&catalog);

    let Some(city) = city else {
        eprintln!("error: --city is required (or use --cities to list them)");
        return ExitCode::from(2);
    };
    if let Err(e) = session.select_city(&city) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    if list_facilities {
        for f in lookup::facilities_in_city(&catalog, &city) {
            println!(
                "{:<40} {:<10} {}",
                f.name,
                f.accreditation.label(),
                f.tier.label()
            );
        }
        return ExitCode::SUCCESS;
    }

    // A facility is needed for everything past this point: the search tier
    // comes from the facility's city tier.
    let selected = match (&facility_query, &custom_facility) {
        (Some(query), None) => session.select_facility(query),
        (None, Some(name)) => {
            let Some(tier_label) = &tier_label else {
                eprintln!("error: --custom-facility requires --tier");
                return ExitCode::from(2);
            };
            session.select_custom_facility(name, &accreditation, tier_label, &facilities_text)
        }
        (Some(_), Some(_)) => {
            eprintln!("error: --facility and --custom-facility are mutually exclusive");
            return ExitCode::from(2);
        }
        (None, None) => {
            eprintln!("error: --facility or --custom-facility is required");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = selected {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    if let Some(query) = search {
        let facility = session.facility().expect("facility was just selected");
        let hits = match lookup::find_procedures_by_tier_and_query(
            &catalog,
            facility.tier.label(),
            &query,
        ) {
            Ok(hits) => hits,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        };
        for p in &hits {
            println!(
                "{:<10} {:<55} NABH {:>8}  non-NABH {:>8}",
                p.code, p.name, p.nabh_rate, p.non_nabh_rate
            );
        }
        if !quiet {
            eprintln!("{} procedure(s) matching {query:?}", hits.len());
        }
        return ExitCode::SUCCESS;
    }

    let (Some(code), Some(ward)) = (procedure_code, ward) else {
        eprintln!("error: an audit needs --procedure and --ward (or --search to find a code)");
        return ExitCode::from(2);
    };

    if let Err(e) = session.submit_details(&code, ward, quoted, policy) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    if json {
        print_json(&session);
    } else {
        print_report(&session, quiet);
    }
    ExitCode::SUCCESS
}

fn print_json(session: &AuditSession) {
    let facility = session.facility().expect("verdict is on display");
    let procedure = session.procedure().expect("verdict is on display");
    let out = serde_json::json!({
        "procedure": { "code": procedure.code, "name": procedure.name },
        "facility": {
            "name": facility.name,
            "city": facility.city,
            "accreditation": facility.accreditation.label(),
            "tier": facility.tier.label(),
            "listed": facility.listed,
        },
        "ward": session.ward().expect("verdict is on display").label(),
        "benchmark": session.benchmark().expect("verdict is on display"),
        "assessment": session.assessment(),
    });
    println!("{}", serde_json::to_string(&out).expect("serialisation failed"));
}

fn print_report(session: &AuditSession, quiet: bool) {
    let facility = session.facility().expect("verdict is on display");
    let procedure = session.procedure().expect("verdict is on display");
    let ward = session.ward().expect("verdict is on display");
    let benchmark = session.benchmark().expect("verdict is on display");

    println!("=== Rate-cap audit ===");
    println!("Procedure:  {}  [code {}]", procedure.name, procedure.code);
    println!("Facility:   {}, {}", facility.name, facility.city);
    if !facility.listed {
        println!("            (user-asserted facility, not in the published list)");
    }
    println!("Benchmark:  Rs {benchmark} ({} ward)", ward.label());

    match session.assessment() {
        None => {
            println!("\nNo quoted amount given; re-run with --quoted to judge a bill.");
        }
        Some(a) => {
            println!("\nQuoted:     Rs {}", a.quoted);
            match a.verdict {
                Verdict::Overcharge => {
                    println!(
                        "Difference: +Rs {} ({}% above the cap)",
                        a.difference, a.overcharge_percent
                    );
                    println!("Verdict:    {}", a.verdict);
                    println!(
                        "\nThe facility is charging Rs {} above the legal cap for a {} ward in a {} city.",
                        a.difference,
                        ward.label(),
                        facility.tier.label()
                    );
                    println!("Generate dispute letter: paid action, not available in this build.");
                }
                Verdict::Compliant => {
                    println!("Difference: Rs {}", a.difference);
                    println!("Verdict:    {}", a.verdict);
                    println!("\nThe pricing is within the government approved range.");
                }
                Verdict::Undercharge => {
                    println!("Difference: Rs {}", a.difference);
                    println!("Verdict:    {}", a.verdict);
                    println!("\nThe facility charged less than the approved cap.");
                }
            }
        }
    }

    if !quiet {
        println!(
            "\nTier: {} | Accreditation: {} | Ward: {} | Ref: CGHS OM 03.10.2025",
            facility.tier.label(),
            facility.accreditation.label(),
            ward.label()
        );
    }
}

fn print_usage() {
    println!("rcap: audit a hospital bill line against the government rate cap");
    println!();
    println!("  rcap --cities");
    println!("  rcap --city Delhi --facilities");
    println!("  rcap --city Delhi --facility Rajdhani --search knee");
    println!("  rcap --city Delhi --facility Rajdhani --procedure 2339/I --ward private --quoted 120000");
    println!();
    println!("Flags:");
    println!("  --data-dir DIR      load hospitals.json / prices.json instead of built-in data");
    println!("  --cities            list known cities");
    println!("  --city NAME         select a city");
    println!("  --facilities        list facilities in the selected city");
    println!("  --facility QUERY    select a facility by name substring");
    println!("  --custom-facility NAME   assert an unlisted facility (requires --tier;");
    println!("                           optional --accreditation, --facilities-text)");
    println!("  --search QUERY      list matching procedures for the facility's tier");
    println!("  --procedure CODE    price-list row to audit");
    println!("  --ward W            general | semi-private | private");
    println!("  --quoted AMOUNT     what the facility charged, whole rupees");
    println!("  --three-way         report undercharges distinctly from compliant bills");
    println!("  --json              machine-readable output");
    println!("  --quiet             suppress the audit-trail footer");
}

//! Simple validation example: check and dimension an installation, print results.
//! Run with: cargo run --example simple_validation [path/to/installation.json]

use circuitguard::prelude::*;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), CircuitGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/non_compliant_flat.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/installation.json]");
        std::process::exit(1);
    }

    let request = circuitguard::load_request(path)?;
    let guard = CircuitGuard::new(EngineConfig::default());
    let report = guard.validate_with_dimensioning(&request).await?;

    println!("Installation: {}", report.compliance.installation_id);
    println!(
        "Status: {}",
        report.compliance.global_compliance.overall_status.as_str()
    );
    println!();

    for room in &report.compliance.room_results {
        println!("{} [{}]", room.room_id, room.compliance_status.as_str());
        for missing in &room.missing_equipment {
            println!("  - missing {}", missing);
        }
    }

    let dimensioning = &report.dimensioning;
    println!();
    println!("Breakers: {}", dimensioning.breaker_count());
    for breaker in &dimensioning.circuit_breakers {
        println!("  {}A {} - {}", breaker.rating, breaker.breaker_type, breaker.description);
    }
    println!(
        "Surge protection: {}",
        if dimensioning.surge_protection_required() { "required" } else { "not required" }
    );
    for panel in &dimensioning.electrical_panels {
        println!("Panel: {} modules", panel.modules);
    }
    for cable in &dimensioning.cables {
        println!("Cable: {} m {}", cable.length_estimate, cable.description);
    }

    if !report.compliance.is_compliant() {
        std::process::exit(1);
    }
    Ok(())
}

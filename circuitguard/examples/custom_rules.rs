//! Example: extending the built-in rule set and running it directly
//! (without CircuitGuard).
//! Run with: cargo run --example custom_rules [path/to/installation.json]

use circuitguard::model::DeficitCategory;
use circuitguard::rules::{Inventory, MinimumCountRule, RuleScope, RulesEngine};
use circuitguard::{RoomType, Severity};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<(), circuitguard::CircuitGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/compliant_flat.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_rules [path/to/installation.json]");
        std::process::exit(1);
    }

    let request = circuitguard::load_request(path)?;

    // House policy: two network sockets per bedroom, as a warning.
    let mut engine = RulesEngine::with_default_rules();
    engine.add_rule(Arc::new(
        MinimumCountRule::new(
            "HOUSE-BEDROOM-NETWORK",
            "Bedroom network sockets",
            &[RoomType::Bedroom],
            DeficitCategory::NetworkSocket,
            2,
        )
        .with_severity(Severity::Warning),
    ));

    let inventory = Inventory::from_rooms(&request.installation_id, &request.rooms);
    let violations = engine.analyze(&inventory, RuleScope::Full);

    println!(
        "Custom validation found {} violations for {}",
        violations.len(),
        path.display()
    );
    for violation in &violations {
        println!("  [{:?}] {}: {}", violation.severity, violation.rule_id, violation.message);
        if let Some(ref focus) = violation.focus_node {
            println!("    Room: {}", focus);
        }
    }

    let errors = violations.iter().filter(|v| v.is_error()).count();
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

//! CircuitGuard CLI - NF C 15-100 compliance checking and dimensioning from the command line.

use circuitguard::model::{DimensioningResult, RoomComplianceResult};
use circuitguard::rules::Rule;
use circuitguard::{
    load_request, CircuitGuard, ComplianceReport, ComplianceStatus, EngineConfig, RuleViolation,
    RulesEngine, Severity,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "circuitguard")]
#[command(about = "NF C 15-100 residential wiring compliance and dimensioning tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Remote rule matcher base URL (overrides the configuration file)
    #[arg(long, global = true, value_name = "URL")]
    matcher_url: Option<String>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the compliance of an installation
    Check {
        /// Path to the installation request (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if violations are found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Also evaluate installation-level rules
        #[arg(long)]
        full_rules: bool,
    },

    /// Check compliance and dimension the electrical installation
    Dimension {
        /// Path to the installation request (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if violations are found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// List the built-in compliance rules
    Rules {
        /// Show detailed rule descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref(), cli.matcher_url) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
            full_rules,
        } => handle_check(config, &file, format, fail_on, full_rules).await,
        Commands::Dimension {
            file,
            format,
            fail_on,
        } => handle_dimension(config, &file, format, fail_on).await,
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    path: Option<&Path>,
    matcher_url: Option<String>,
) -> Result<EngineConfig, circuitguard::CircuitGuardError> {
    let mut config = match path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if matcher_url.is_some() {
        config.matcher_url = matcher_url;
    }
    Ok(config)
}

async fn handle_check(
    config: EngineConfig,
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    full_rules: bool,
) -> i32 {
    let mut request = match load_request(file) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    request.include_dimensioning_rules |= full_rules;

    let guard = CircuitGuard::from_config(config);
    tracing::debug!("Using the {} rule matcher", guard.matcher_name());
    match guard.check_compliance(&request).await {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_compliance_human(&report),
                OutputFormat::Json => print_json(&report),
                OutputFormat::Github => output_github(file, &report),
            }
            exit_code_for(&report, fail_on.as_ref())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn handle_dimension(
    config: EngineConfig,
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
) -> i32 {
    let request = match load_request(file) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let guard = CircuitGuard::from_config(config);
    tracing::debug!("Using the {} rule matcher", guard.matcher_name());
    match guard.validate_with_dimensioning(&request).await {
        Ok(report) => {
            match format {
                OutputFormat::Human => {
                    output_compliance_human(&report.compliance);
                    output_dimensioning_human(&report.dimensioning);
                }
                OutputFormat::Json => print_json(&report),
                OutputFormat::Github => output_github(file, &report.compliance),
            }
            exit_code_for(&report.compliance, fail_on.as_ref())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// A matcher failure surfaces as an error violation, so `--fail-on` covers it.
fn exit_code_for(report: &ComplianceReport, fail_on: Option<&FailOnSeverity>) -> i32 {
    match fail_on {
        Some(severity) if should_fail(report, severity) => 1,
        _ => 0,
    }
}

fn should_fail(report: &ComplianceReport, severity: &FailOnSeverity) -> bool {
    let errors = report.count_by_severity(Severity::Error);
    match severity {
        FailOnSeverity::Error => errors > 0,
        FailOnSeverity::Warning => errors > 0 || report.count_by_severity(Severity::Warning) > 0,
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn status_label(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "COMPLIANT",
        ComplianceStatus::NonCompliant => "NON-COMPLIANT",
        ComplianceStatus::Warning => "WARNING",
        ComplianceStatus::Missing => "NOT EVALUATED",
    }
}

fn output_compliance_human(report: &ComplianceReport) {
    println!("\nInstallation: {}", report.installation_id);
    println!("{}", "─".repeat(60));
    println!(
        "  Status: {}",
        status_label(report.global_compliance.overall_status)
    );
    if let Some(ref error) = report.matcher_error {
        println!("  Rule matcher error: {}", error);
    }

    for room in &report.room_results {
        output_room_human(room);
    }

    if !report.global_compliance.violations.is_empty() {
        println!("\n  Installation:");
        for violation in &report.global_compliance.violations {
            output_violation_human(violation);
        }
    }

    if !report.global_compliance.missing_equipment_summary.is_empty() {
        println!("\n  Missing equipment:");
        for line in &report.global_compliance.missing_equipment_summary {
            println!("    - {}", line);
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", report.count_by_severity(Severity::Error));
    println!("    Warnings: {}", report.count_by_severity(Severity::Warning));
    println!("    Info:     {}", report.count_by_severity(Severity::Info));
}

fn output_room_human(room: &RoomComplianceResult) {
    println!(
        "\n  {} ({}): {}",
        room.room_id,
        room.room_type.label_fr(),
        status_label(room.compliance_status)
    );
    for violation in &room.violations {
        output_violation_human(violation);
    }
    if !room.missing_equipment.is_empty() {
        println!("      Missing: {}", room.missing_equipment.join(", "));
    }
}

fn output_violation_human(violation: &RuleViolation) {
    let level = match violation.severity {
        Severity::Error => "ERROR",
        Severity::Warning => "WARN",
        Severity::Info => "INFO",
    };
    println!("    [{}] {}: {}", level, violation.rule_id, violation.message);
    if let Some(ref fix) = violation.suggested_fix {
        println!("      Fix: {}", fix);
    }
}

fn output_dimensioning_human(result: &DimensioningResult) {
    println!("\nDimensioning");
    println!("{}", "─".repeat(60));

    println!("\n  Circuit breakers ({}):", result.breaker_count());
    for breaker in &result.circuit_breakers {
        println!(
            "    - {} x {}A {} : {}",
            breaker.quantity, breaker.rating, breaker.breaker_type, breaker.description
        );
        if let Some(ref warning) = breaker.warning {
            println!("      {}", warning);
        }
    }

    println!("\n  Surge protection:");
    if result.surge_protectors.is_empty() {
        println!("    Not required");
    }
    for spd in &result.surge_protectors {
        println!(
            "    - {} x {} {}",
            spd.quantity,
            spd.spd_type,
            spd.rating.as_deref().unwrap_or("")
        );
    }

    println!("\n  Panels:");
    for panel in &result.electrical_panels {
        println!("    - {}", panel.description);
    }

    println!("\n  Cables:");
    for cable in &result.cables {
        println!("    - {} m : {}", cable.length_estimate, cable.description);
    }

    println!("\n  Notes:");
    for note in &result.installation_notes {
        println!("    - {}", note);
    }
}

fn severity_to_github(violation: &RuleViolation) -> &'static str {
    match violation.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(file: &Path, report: &ComplianceReport) {
    for violation in report.all_violations() {
        println!(
            "::{} file={},title={}::{}",
            severity_to_github(violation),
            file.display(),
            violation.rule_id,
            violation.message.replace('\n', " ")
        );
    }
}

fn handle_rules(verbose: bool) {
    println!("Available compliance rules:\n");

    let engine = RulesEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.description());
            println!("    severity: {:?}", rule.severity());
        }
        println!();
    }
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use dashboard_core::{ConfigOverrides, DashboardConfig, VitalKind};
use dashboard_data::{BundleSource, Dashboard, DashboardSource, MockSource};
use dashboard_rules::{AppointmentListing, Segment, VitalsOverview};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dashboard-cli",
    about = "Show the patient dashboard from demo data or a JSON bundle."
)]
struct Args {
    /// JSON bundle with patient, appointments and vitals. Demo data if omitted.
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// JSON config file (patient_id, utc_offset_minutes).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference instant (RFC 3339). Defaults to the current time.
    #[arg(long, global = true)]
    now: Option<String>,

    /// Minutes east of UTC used for "today". Overrides the config file.
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Patient profile summary.
    Profile,
    /// Latest reading per vital kind, or the history of one kind.
    Vitals {
        #[arg(long)]
        kind: Option<String>,
    },
    /// Upcoming appointments (or past ones with --past).
    Appointments {
        #[arg(long)]
        past: bool,
    },
    /// Detail of a single appointment.
    Appointment { id: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref(), args.utc_offset)?;
    let timezone = config.timezone()?;
    let now = reference_instant(args.now.as_deref(), timezone)?;
    tracing::debug!(%now, patient_id = %config.patient_id, "resolved dashboard settings");

    let source: Box<dyn DashboardSource> = match &args.input {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read bundle {path:?}"))?;
            Box::new(
                BundleSource::from_json_str(&data)
                    .with_context(|| format!("Could not load bundle {path:?}"))?,
            )
        }
        None => Box::new(MockSource::at(&now)),
    };
    let dashboard = Dashboard::new(source.as_ref(), config);

    match args.command {
        Command::Profile => {
            let summary = dashboard.profile_summary(now.date_naive())?;
            if args.json {
                return print_json(&summary);
            }
            println!(
                "{} ({}, {})\nBlood type: {} | Height: {} | Weight: {}",
                summary.full_name,
                summary.age,
                if summary.is_online { "online" } else { "offline" },
                summary.blood_type,
                summary.height,
                summary.weight
            );
            println!(
                "Allergies: {}\nConditions: {}\nMedications: {}",
                summary.allergies, summary.conditions, summary.medications
            );
            println!(
                "Insurance: {} #{}\nEmergency contact: {} ({})",
                summary.insurance_provider,
                summary.insurance_id,
                summary.emergency_contact_name,
                summary.emergency_contact_relation
            );
        }
        Command::Vitals { kind: Some(kind) } => {
            let kind: VitalKind = kind.parse()?;
            let history = dashboard.vital_history(kind)?;
            if args.json {
                return print_json(&history);
            }
            println!("{kind} history ({} readings)", history.len());
            for reading in history {
                println!(
                    "  {}  {} {}  {}",
                    reading.recorded_at.with_timezone(&timezone).format("%Y-%m-%d %H:%M"),
                    reading.formatted_value(),
                    reading.unit(),
                    reading.status.label()
                );
            }
        }
        Command::Vitals { kind: None } => {
            let overview = dashboard.vitals_overview(&now)?;
            if args.json {
                return print_json(&overview);
            }
            match overview {
                VitalsOverview::Empty { message } => println!("{message}"),
                VitalsOverview::Loaded(panel) => {
                    println!("{}", panel.date_heading);
                    for item in &panel.items {
                        println!(
                            "  {:<17} {:>6} {:<7} {:<9} {}",
                            item.label, item.value, item.unit, item.status_label, item.recorded_time
                        );
                    }
                    println!("{}", panel.info_message);
                }
            }
        }
        Command::Appointments { past } => {
            let segment = if past { Segment::Past } else { Segment::Upcoming };
            let listing = dashboard.appointment_listing(segment, &now)?;
            if args.json {
                return print_json(&listing);
            }
            match listing {
                AppointmentListing::Empty { message, .. } => println!("{message}"),
                AppointmentListing::Loaded { sections, .. } => {
                    for section in sections {
                        println!("{}", section.title);
                        if section.items.is_empty() {
                            println!("  (none)");
                        }
                        for item in section.items {
                            println!(
                                "  [{}] {:<14} {} ({}) @ {}",
                                item.id, item.time, item.doctor_name, item.specialty, item.location
                            );
                        }
                    }
                }
            }
        }
        Command::Appointment { id } => {
            let detail = dashboard.appointment_detail(&id, &timezone)?;
            if args.json {
                return print_json(&detail);
            }
            println!(
                "{} - {}\n{} at {}\n{} {}\nStatus: {}",
                detail.doctor_name,
                detail.specialty,
                detail.date,
                detail.time,
                detail.location_name,
                detail.location_address,
                detail.status
            );
            let actions: Vec<String> = detail
                .actions()
                .iter()
                .map(|action| format!("{action:?}"))
                .collect();
            println!("Actions: {}", actions.join(", "));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, utc_offset: Option<i32>) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::default();
    if let Some(path) = path {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {path:?}"))?;
        let overrides: ConfigOverrides = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config {path:?}"))?;
        config = config.merged(overrides);
    }
    Ok(config.merged(ConfigOverrides {
        patient_id: None,
        utc_offset_minutes: utc_offset,
    }))
}

fn reference_instant(raw: Option<&str>, timezone: FixedOffset) -> anyhow::Result<DateTime<FixedOffset>> {
    match raw {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid --now value {raw:?}"))?;
            Ok(parsed.with_timezone(&timezone))
        }
        None => Ok(Utc::now().with_timezone(&timezone)),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

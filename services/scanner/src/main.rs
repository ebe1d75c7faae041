use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::clock::{Clock, SystemClock, format_timestamp};
use common::document_store::{DocumentStore, DocumentStoreConfig};
use common::geo::{Coordinates, haversine_meters};
use tracing::{error, info};

use scanner::config::ScannerConfig;
use scanner::error::{SUCCESS_MESSAGE, ScanError};
use scanner::location::{FixedLocationProvider, LocationProvider};
use scanner::store::DocumentAttendanceStore;
use scanner::{AttendanceService, gate};

const EMPTY_INPUT_MESSAGE: &str = "Please enter QR code data";

#[derive(Parser)]
#[command(name = "scanner", about = "Mark classroom attendance from a scanned QR code")]
struct CliParser {
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a code, check the geofence and store the attendance record.
    Mark {
        /// Scanned QR payload. Read from stdin when omitted.
        #[arg(long)]
        payload: Option<String>,
        /// Id of the signed-in student.
        #[arg(long)]
        student_id: String,
        /// Current latitude of the device.
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,
        /// Current longitude of the device.
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,
        /// Run every check but do not write to the store.
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse a code and check that it is still fresh.
    Check {
        /// Scanned QR payload. Read from stdin when omitted.
        #[arg(long)]
        payload: Option<String>,
    },
    /// Great-circle distance in meters between two points.
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli_args = CliParser::parse();

    let config = ScannerConfig::from_env().context("Failed to load scanner configuration")?;
    common::telemetry::init_tracing(&config.log_level)?;

    match cli_args.command {
        Command::Mark {
            payload,
            student_id,
            latitude,
            longitude,
            dry_run,
        } => {
            let Some(raw) = read_payload(payload)? else {
                eprintln!("{}", EMPTY_INPUT_MESSAGE);
                return Ok(ExitCode::FAILURE);
            };

            let locator = FixedLocationProvider::from_degrees(latitude, longitude)
                .context("Invalid device position")?;

            let outcome = if dry_run {
                dry_run_scan(&raw, &student_id, &locator, &config).await
            } else {
                let service = build_service(locator, &config)?;
                service.mark_attendance(&raw, &student_id).await
            };

            match outcome {
                Ok(record) => {
                    println!("{}", SUCCESS_MESSAGE);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_failure(&e)),
            }
        }
        Command::Check { payload } => {
            let Some(raw) = read_payload(payload)? else {
                eprintln!("{}", EMPTY_INPUT_MESSAGE);
                return Ok(ExitCode::FAILURE);
            };
            let now = SystemClock.now();

            match gate::check_code(&raw, now, &config.gate_policy()) {
                Ok(qr) => {
                    let age_ms = (now - qr.issued_at).num_milliseconds();
                    println!("{}", serde_json::to_string_pretty(&qr)?);
                    println!(
                        "Code is fresh: issued {} ms ago at {}",
                        age_ms,
                        format_timestamp(&qr.issued_at)
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_failure(&e)),
            }
        }
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            Coordinates::new(lat1, lon1).context("Invalid first point")?;
            Coordinates::new(lat2, lon2).context("Invalid second point")?;
            println!("{:.2}", haversine_meters(lat1, lon1, lat2, lon2));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Wire the attendance service to the configured document store
fn build_service(
    locator: FixedLocationProvider,
    config: &ScannerConfig,
) -> Result<AttendanceService> {
    let store_config = DocumentStoreConfig::from_env()?;
    let store = DocumentStore::new(store_config)?;
    let attendance_store =
        DocumentAttendanceStore::new(store, config.attendance_collection_id.clone());

    info!(
        collection_id = %config.attendance_collection_id,
        "attendance service initialized"
    );

    Ok(AttendanceService::new(
        Arc::new(locator),
        Arc::new(attendance_store),
        Arc::new(SystemClock),
        config.gate_policy(),
    ))
}

/// Gate a scan without a store
async fn dry_run_scan(
    raw: &str,
    student_id: &str,
    locator: &FixedLocationProvider,
    config: &ScannerConfig,
) -> Result<scanner::AttendanceRecord, ScanError> {
    let position = locator.current_position().await?;
    gate::submit_scan(
        raw,
        position,
        student_id,
        SystemClock.now(),
        &config.gate_policy(),
    )
}

fn report_failure(e: &ScanError) -> ExitCode {
    error!(code = e.code(), "{}", e);
    eprintln!("{}", e.user_message());
    ExitCode::FAILURE
}

/// Scanned payload from the flag or stdin, `None` when blank
fn read_payload(payload: Option<String>) -> Result<Option<String>> {
    let raw = match payload {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            buf
        }
    };

    let raw = raw.trim();
    Ok((!raw.is_empty()).then(|| raw.to_string()))
}

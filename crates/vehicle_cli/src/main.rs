//! `vehicle` command-line entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the store and dispatch one
//!   subcommand through `VehicleService`.
//! - Print results as JSON on stdout and failures as JSON on stderr.
//!
//! # Invariants
//! - Exit status identifies the failure kind (see `exit_code_for`).

mod cli;

use clap::Parser;
use cli::{new_vehicle, vehicle_patch, Cli, Commands};
use log::error;
use serde::Serialize;
use serde_json::json;
use std::process::ExitCode;
use vehicle_core::{
    health_check, init_logging, init_stderr_logging, open_db, CoreConfig, DbError, RepoErrorKind,
    ServiceError, SqliteVehicleRepository, VehicleService,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;
const EXIT_CONSTRAINT: u8 = 4;
const EXIT_CONNECTIVITY: u8 = 5;

/// Terminal failure of one CLI invocation.
struct Failure {
    code: u8,
    kind: &'static str,
    message: String,
}

impl Failure {
    fn new(code: u8, kind: &'static str, message: impl ToString) -> Self {
        Self {
            code,
            kind,
            message: message.to_string(),
        }
    }
}

impl From<ServiceError> for Failure {
    fn from(value: ServiceError) -> Self {
        Self::new(exit_code_for(&value), value.label(), value)
    }
}

impl From<DbError> for Failure {
    fn from(value: DbError) -> Self {
        let code = match &value {
            DbError::Sqlite(_) => EXIT_CONNECTIVITY,
            _ => EXIT_FAILURE,
        };
        Self::new(code, "storage_bootstrap", value)
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(
                "event=cli_exit module=cli status=error error_kind={} code={}",
                failure.kind, failure.code
            );
            eprintln!(
                "{}",
                json!({ "error": failure.kind, "message": failure.message })
            );
            ExitCode::from(failure.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let config = cli
        .load_config()
        .map_err(|err| Failure::new(EXIT_USAGE, "invalid_config", err))?;
    start_logging(&config)?;

    if let Commands::Config = cli.command {
        return print_json(&config);
    }

    let conn = open_db(&config.db_path)?;

    if let Commands::Health = cli.command {
        let status = health_check(&conn)?;
        return print_json(&json!({
            "status": if status.is_current() { "ok" } else { "outdated" },
            "schema_version": status.schema_version,
            "latest_supported": status.latest_supported,
        }));
    }

    let repo = SqliteVehicleRepository::try_new(&conn)?;
    let service = VehicleService::new(repo).with_list_limit(config.list_limit);

    match cli.command {
        Commands::Health | Commands::Config => Ok(()),
        Commands::Create {
            name,
            year,
            driveable,
            body,
        } => print_json(&service.create_vehicle(&new_vehicle(&name, year, driveable, body))?),
        Commands::Get { id } => print_json(&service.get_vehicle(id)?),
        Commands::List {
            filters,
            limit,
            offset,
        } => print_json(&service.list_vehicles(filters, limit, offset)?),
        Commands::Update {
            id,
            name,
            year,
            driveable,
            body,
        } => print_json(&service.update_vehicle(id, &vehicle_patch(name, year, driveable, body))?),
        Commands::Delete { id } => print_json(&service.delete_vehicle(id)?),
    }
}

fn start_logging(config: &CoreConfig) -> Result<(), Failure> {
    let started = match &config.log_dir {
        Some(dir) => init_logging(config.log_level, &dir.to_string_lossy()),
        None => init_stderr_logging(config.log_level),
    };
    started.map_err(|err| Failure::new(EXIT_USAGE, "invalid_config", err))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Failure> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| Failure::new(EXIT_FAILURE, "unknown", err))?;
    println!("{rendered}");
    Ok(())
}

fn exit_code_for(err: &ServiceError) -> u8 {
    match err.repo_kind() {
        None => EXIT_USAGE,
        Some(RepoErrorKind::NotFound) => EXIT_NOT_FOUND,
        Some(RepoErrorKind::ConstraintViolation) => EXIT_CONSTRAINT,
        Some(RepoErrorKind::Connectivity) => EXIT_CONNECTIVITY,
        Some(RepoErrorKind::Unknown) => EXIT_FAILURE,
    }
}

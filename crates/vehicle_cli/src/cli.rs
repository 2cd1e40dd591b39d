//! Command-line surface and argument parsing.

use clap::{Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;
use vehicle_core::config::{ENV_DB_PATH, ENV_LIST_LIMIT, ENV_LOG_DIR, ENV_LOG_LEVEL};
use vehicle_core::{ConfigError, CoreConfig, NewVehicle, VehiclePatch};

#[derive(Parser, Debug)]
#[command(name = "vehicle")]
#[command(about = "Manage vehicle records in a local SQLite store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "VEHICLE_DB_PATH")]
    pub db: Option<String>,

    /// trace|debug|info|warn|error.
    #[arg(long, global = true, env = "VEHICLE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true, env = "VEHICLE_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Page size for `list` when `--limit` is not given.
    #[arg(long, global = true, env = "VEHICLE_LIST_LIMIT")]
    pub list_limit: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the database opens and its schema is current.
    Health,
    /// Print the effective configuration.
    Config,
    /// Create a vehicle.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        driveable: bool,
        /// Free-form JSON object stored with the vehicle.
        #[arg(long, value_parser = parse_json)]
        body: Option<Value>,
    },
    /// Show one vehicle.
    Get { id: Uuid },
    /// List vehicles, optionally filtered by `field=value` pairs.
    List {
        /// Equality filter on name, manufacturing_year or is_driveable.
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Change the given fields of a vehicle; omitted fields stay as stored.
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        driveable: Option<bool>,
        #[arg(long, value_parser = parse_json)]
        body: Option<Value>,
    },
    /// Delete a vehicle and print it.
    Delete { id: Uuid },
}

impl Cli {
    /// Effective configuration: flags win over environment variables (and a
    /// loaded `.env`), which win over defaults.
    pub fn load_config(&self) -> Result<CoreConfig, ConfigError> {
        CoreConfig::from_lookup(|key| match key {
            ENV_DB_PATH => self.db.clone(),
            ENV_LOG_LEVEL => self.log_level.clone(),
            ENV_LOG_DIR => self.log_dir.clone(),
            ENV_LIST_LIMIT => self.list_limit.clone(),
            _ => None,
        })
    }
}

pub fn new_vehicle(name: &str, year: i32, driveable: bool, body: Option<Value>) -> NewVehicle {
    let payload = NewVehicle::new(name, year).driveable(driveable);
    match body {
        Some(body) => payload.with_body(body),
        None => payload,
    }
}

pub fn vehicle_patch(
    name: Option<String>,
    year: Option<i32>,
    driveable: Option<bool>,
    body: Option<Value>,
) -> VehiclePatch {
    VehiclePatch {
        name,
        manufacturing_year: year,
        is_driveable: driveable,
        body,
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected `field=value`, got `{raw}`"))
}

fn parse_json(raw: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("body must be a JSON object".to_string()),
        Err(err) => Err(format!("invalid JSON: {err}")),
    }
}

//! Core domain logic for vehicle records.
//!
//! Exposes explicit `Result`/`Option` helpers, a generic repository port
//! with SQLite and in-memory adapters, and a vehicle service on top.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{health_check, open_db, open_db_in_memory, DbError, DbResult, HealthStatus};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::brand::{Brand, BrandId, BrandPatch, NewBrand};
pub use model::entity::{Entity, Patch};
pub use model::filter::{FieldKind, FieldValue, Filter, FilterError, FilterField};
pub use model::vehicle::{NewVehicle, Vehicle, VehicleField, VehicleId, VehiclePatch};
pub use outcome::{OptionExt, ResultExt, UnwrapError};
pub use repo::brand_repo::SqliteBrandRepository;
pub use repo::memory::{MemoryBrandRepository, MemoryVehicleRepository};
pub use repo::vehicle_repo::SqliteVehicleRepository;
pub use repo::{ListQuery, RepoError, RepoErrorKind, RepoResult, Repository};
pub use service::vehicle_service::{ServiceError, ServiceResult, VehicleService};

/// Minimal liveness check.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

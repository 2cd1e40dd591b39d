//! Vehicle use-case service.
//!
//! # Responsibility
//! - Expose vehicle CRUD entry points for callers that speak raw filter
//!   strings and optional page sizes (CLI, future transports).
//! - Translate filter parse failures and repository failures into one
//!   caller-facing error type.
//!
//! # Invariants
//! - Filters are validated before the repository is touched.
//! - The service is storage-agnostic; it only talks to `Repository`.
//! - Repository errors pass through with their kind unchanged.

use crate::config::{normalize_list_limit, DEFAULT_LIST_LIMIT};
use crate::model::filter::{Filter, FilterError};
use crate::model::vehicle::{NewVehicle, Vehicle, VehicleField, VehicleId, VehiclePatch};
use crate::repo::{ListQuery, RepoError, RepoErrorKind, Repository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure returned by `VehicleService`.
#[derive(Debug)]
pub enum ServiceError {
    /// A list filter named an unknown field or carried an unparsable value.
    InvalidFilter(FilterError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Repository failure kind, if this error came from storage.
    pub fn repo_kind(&self) -> Option<RepoErrorKind> {
        match self {
            Self::InvalidFilter(_) => None,
            Self::Repo(err) => Some(err.kind()),
        }
    }

    /// Stable snake_case label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidFilter(_) => "invalid_filter",
            Self::Repo(err) => err.kind().as_str(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<FilterError> for ServiceError {
    fn from(value: FilterError) -> Self {
        Self::InvalidFilter(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper over any vehicle repository.
pub struct VehicleService<R> {
    repo: R,
    default_limit: u32,
}

impl<R> VehicleService<R>
where
    R: Repository<Model = Vehicle, Create = NewVehicle, Update = VehiclePatch>,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            default_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Page size used when `list_vehicles` gets no explicit limit.
    pub fn with_list_limit(mut self, default_limit: u32) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create_vehicle(&self, payload: &NewVehicle) -> ServiceResult<Vehicle> {
        let created = self
            .repo
            .create(payload)
            .map_err(|err| failed("create", None, err))?;
        info!(
            "event=vehicle_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> ServiceResult<Vehicle> {
        self.repo
            .get(id)
            .map_err(|err| failed("get", Some(id), err))
    }

    /// Lists vehicles matching raw `field=value` pairs.
    ///
    /// `limit` falls back to the configured default and is capped.
    pub fn list_vehicles<I, K, V>(
        &self,
        pairs: I,
        limit: Option<u32>,
        offset: u32,
    ) -> ServiceResult<Vec<Vehicle>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filter = Filter::<VehicleField>::parse(pairs).map_err(|err| {
            warn!(
                "event=vehicle_list module=service status=rejected error_kind=invalid_filter error={err}"
            );
            ServiceError::InvalidFilter(err)
        })?;

        let query = ListQuery {
            filter,
            limit: Some(normalize_list_limit(limit, self.default_limit)),
            offset,
        };
        self.repo
            .list_page(&query)
            .map_err(|err| failed("list", None, err))
    }

    pub fn update_vehicle(&self, id: VehicleId, patch: &VehiclePatch) -> ServiceResult<Vehicle> {
        let updated = self
            .repo
            .update(id, patch)
            .map_err(|err| failed("update", Some(id), err))?;
        info!("event=vehicle_update module=service status=ok id={id}");
        Ok(updated)
    }

    pub fn delete_vehicle(&self, id: VehicleId) -> ServiceResult<Vehicle> {
        let deleted = self
            .repo
            .delete(id)
            .map_err(|err| failed("delete", Some(id), err))?;
        info!("event=vehicle_delete module=service status=ok id={id}");
        Ok(deleted)
    }
}

fn failed(operation: &str, id: Option<VehicleId>, err: RepoError) -> ServiceError {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    warn!(
        "event=vehicle_{operation} module=service status=error id={id} error_kind={}",
        err.kind()
    );
    ServiceError::Repo(err)
}

#[cfg(test)]
mod tests {
    use super::{ServiceError, VehicleService};
    use crate::model::filter::FilterError;
    use crate::model::vehicle::{NewVehicle, VehiclePatch};
    use crate::repo::memory::MemoryVehicleRepository;
    use crate::repo::RepoErrorKind;
    use uuid::Uuid;

    fn service() -> VehicleService<MemoryVehicleRepository> {
        VehicleService::new(MemoryVehicleRepository::new())
    }

    #[test]
    fn create_then_get_returns_same_vehicle() {
        let service = service();
        let created = service
            .create_vehicle(&NewVehicle::new("Audi A4", 2020).driveable(true))
            .unwrap();
        assert_eq!(service.get_vehicle(created.id).unwrap(), created);
    }

    #[test]
    fn list_parses_filters_and_applies_default_limit() {
        let service = service().with_list_limit(2);
        for (name, year) in [("A", 2001), ("B", 2001), ("C", 2001), ("D", 1999)] {
            service.create_vehicle(&NewVehicle::new(name, year)).unwrap();
        }

        let page = service
            .list_vehicles([("manufacturing_year", "2001")], None, 0)
            .unwrap();
        let names: Vec<_> = page.iter().map(|vehicle| vehicle.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let rest = service
            .list_vehicles([("manufacturing_year", "2001")], Some(10), 2)
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "C");
    }

    #[test]
    fn invalid_filter_is_rejected_before_storage() {
        let service = service();
        service.repository().set_available(false);

        let err = service
            .list_vehicles([("colour", "red")], None, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidFilter(FilterError::UnknownField(_))
        ));
        assert_eq!(err.label(), "invalid_filter");
        assert_eq!(err.repo_kind(), None);
    }

    #[test]
    fn missing_vehicle_surfaces_not_found_without_writes() {
        let service = service();
        let missing = Uuid::new_v4();
        let patch = VehiclePatch {
            name: Some("ghost".to_string()),
            ..VehiclePatch::default()
        };

        for err in [
            service.get_vehicle(missing).unwrap_err(),
            service.update_vehicle(missing, &patch).unwrap_err(),
            service.delete_vehicle(missing).unwrap_err(),
        ] {
            assert_eq!(err.repo_kind(), Some(RepoErrorKind::NotFound));
        }
        assert_eq!(service.repository().write_count(), 0);
    }

    #[test]
    fn unavailable_storage_is_connectivity() {
        let service = service();
        service.repository().set_available(false);
        let err = service
            .create_vehicle(&NewVehicle::new("Offline", 2010))
            .unwrap_err();
        assert_eq!(err.repo_kind(), Some(RepoErrorKind::Connectivity));
        assert_eq!(err.label(), "connectivity");
    }
}

//! Generic repository port and its storage adapters.
//!
//! # Responsibility
//! - Define the single CRUD seam between callers and a storage engine,
//!   generic over entity, create payload and update payload.
//! - Provide a SQLite adapter and an in-memory reference adapter.
//!
//! # Invariants
//! - Every operation returns `RepoResult`; expected failures never panic.
//! - `get` on a missing identifier is `Err(RepoError::NotFound)`.
//! - `update`/`delete` on a missing identifier fail with `NotFound` before
//!   any write is attempted.
//! - A repository is bound to one entity type and one connection; it keeps
//!   no other state between calls.

pub mod brand_repo;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod vehicle_repo;

pub use error::{RepoError, RepoErrorKind, RepoResult};

use crate::model::entity::{Entity, Patch};
use crate::model::filter::{Filter, FilterField};

/// Filter plus pagination for `Repository::list_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F: FilterField> {
    pub filter: Filter<F>,
    /// Maximum rows to return; `None` means unbounded.
    pub limit: Option<u32>,
    /// Rows to skip, applied after filtering.
    pub offset: u32,
}

impl<F: FilterField> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            filter: Filter::new(),
            limit: None,
            offset: 0,
        }
    }
}

impl<F: FilterField> From<Filter<F>> for ListQuery<F> {
    fn from(filter: Filter<F>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Identifier type of a repository's model.
pub type IdOf<R> = <<R as Repository>::Model as Entity>::Id;

/// CRUD port over one entity type, created from `Create` and patched with
/// `Update`.
pub trait Repository {
    type Model: Entity;
    type Create;
    type Update: Patch<Self::Model>;

    /// Materializes `payload` into a new entity; storage assigns identity.
    fn create(&self, payload: &Self::Create) -> RepoResult<Self::Model>;

    /// Loads one entity by identifier.
    fn get(&self, id: IdOf<Self>) -> RepoResult<Self::Model>;

    /// Lists entities matching every filter entry, with pagination.
    ///
    /// Results are ordered by insertion.
    fn list_page(
        &self,
        query: &ListQuery<<Self::Model as Entity>::Field>,
    ) -> RepoResult<Vec<Self::Model>>;

    /// Lists entities matching every filter entry; an empty filter lists all.
    fn list(
        &self,
        filter: &Filter<<Self::Model as Entity>::Field>,
    ) -> RepoResult<Vec<Self::Model>> {
        self.list_page(&ListQuery::from(filter.clone()))
    }

    /// Read-modify-write of the fields provided in `patch`.
    ///
    /// An empty patch returns the stored entity without writing.
    fn update(&self, id: IdOf<Self>, patch: &Self::Update) -> RepoResult<Self::Model>;

    /// Removes one entity and returns it as it was stored.
    fn delete(&self, id: IdOf<Self>) -> RepoResult<Self::Model>;
}

impl<R: Repository + ?Sized> Repository for &R {
    type Model = R::Model;
    type Create = R::Create;
    type Update = R::Update;

    fn create(&self, payload: &Self::Create) -> RepoResult<Self::Model> {
        (**self).create(payload)
    }

    fn get(&self, id: IdOf<Self>) -> RepoResult<Self::Model> {
        (**self).get(id)
    }

    fn list_page(
        &self,
        query: &ListQuery<<Self::Model as Entity>::Field>,
    ) -> RepoResult<Vec<Self::Model>> {
        (**self).list_page(query)
    }

    fn list(
        &self,
        filter: &Filter<<Self::Model as Entity>::Field>,
    ) -> RepoResult<Vec<Self::Model>> {
        (**self).list(filter)
    }

    fn update(&self, id: IdOf<Self>, patch: &Self::Update) -> RepoResult<Self::Model> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: IdOf<Self>) -> RepoResult<Self::Model> {
        (**self).delete(id)
    }
}

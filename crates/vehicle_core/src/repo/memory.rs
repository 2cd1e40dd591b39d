//! In-memory reference adapter for the repository port.
//!
//! # Responsibility
//! - Provide a storage engine with the same contract as the SQLite adapter,
//!   for callers and tests that do not want a database.
//! - Count write operations so callers can prove a path did not write.
//!
//! # Invariants
//! - Rows keep insertion order.
//! - Constraint checks run before a row is stored or replaced.
//! - `update`/`delete` on a missing identifier never touch the write counter.
//! - Interior mutability uses `RefCell`; the adapter is not `Sync`.

use crate::model::brand::{Brand, BrandPatch, NewBrand};
use crate::model::entity::{Entity, Patch};
use crate::model::vehicle::{
    NewVehicle, Vehicle, VehiclePatch, MAX_MANUFACTURING_YEAR, MIN_MANUFACTURING_YEAR,
};
use crate::outcome::OptionExt;
use crate::repo::{ListQuery, RepoError, RepoResult, Repository};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Identity and constraint rules for entities kept in memory.
pub trait MemoryEntity: Entity {
    /// Allocates the identity of the `sequence`-th inserted row (from 1).
    fn allocate_id(sequence: u64) -> Self::Id;

    /// Validates `self` against the other stored rows.
    ///
    /// Returns a human-readable message on violation.
    fn check_constraints(&self, _others: &[Self]) -> Result<(), String> {
        Ok(())
    }

    /// Applies storage-managed fields on update.
    fn touch(&mut self, _now_ms: i64) {}
}

/// Builds a new entity from a create payload.
pub trait Materialize<M: Entity> {
    fn materialize(&self, id: M::Id, now_ms: i64) -> M;
}

pub type MemoryVehicleRepository = MemoryRepository<Vehicle, NewVehicle, VehiclePatch>;
pub type MemoryBrandRepository = MemoryRepository<Brand, NewBrand, BrandPatch>;

/// Repository storing entities in a `Vec`, bound to one entity type.
pub struct MemoryRepository<M, C, U> {
    rows: RefCell<Vec<M>>,
    next_sequence: Cell<u64>,
    writes: Cell<usize>,
    available: Cell<bool>,
    _payloads: PhantomData<fn() -> (C, U)>,
}

impl<M, C, U> Default for MemoryRepository<M, C, U>
where
    M: MemoryEntity,
    C: Materialize<M>,
    U: Patch<M>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, C, U> MemoryRepository<M, C, U>
where
    M: MemoryEntity,
    C: Materialize<M>,
    U: Patch<M>,
{
    pub fn new() -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            next_sequence: Cell::new(1),
            writes: Cell::new(0),
            available: Cell::new(true),
            _payloads: PhantomData,
        }
    }

    /// Number of successful writes (create, update, delete) so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Simulates the storage engine going away (`false`) or returning.
    ///
    /// While unavailable every operation fails with `Connectivity`.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(RepoError::Connectivity(format!(
                "in-memory {} store is offline",
                M::NAME
            )))
        }
    }

    fn position(&self, id: M::Id) -> Option<usize> {
        self.rows.borrow().iter().position(|row| row.id() == id)
    }

    fn record_write(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

impl<M, C, U> Repository for MemoryRepository<M, C, U>
where
    M: MemoryEntity,
    C: Materialize<M>,
    U: Patch<M>,
{
    type Model = M;
    type Create = C;
    type Update = U;

    fn create(&self, payload: &C) -> RepoResult<M> {
        self.ensure_available()?;
        let sequence = self.next_sequence.get();
        let entity = payload.materialize(M::allocate_id(sequence), now_ms());

        let mut rows = self.rows.borrow_mut();
        entity
            .check_constraints(&rows)
            .map_err(RepoError::ConstraintViolation)?;
        rows.push(entity.clone());
        self.next_sequence.set(sequence + 1);
        self.record_write();
        Ok(entity)
    }

    fn get(&self, id: M::Id) -> RepoResult<M> {
        self.ensure_available()?;
        self.rows
            .borrow()
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| RepoError::not_found::<M>(id))
    }

    fn list_page(&self, query: &ListQuery<M::Field>) -> RepoResult<Vec<M>> {
        self.ensure_available()?;
        let limit = query
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);

        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|row| row.matches(query.filter.iter()))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn update(&self, id: M::Id, patch: &U) -> RepoResult<M> {
        let mut entity = self.get(id)?;
        if patch.is_empty() {
            return Ok(entity);
        }
        patch.apply_to(&mut entity);
        entity.touch(now_ms());

        let index = self
            .position(id)
            .unwrap_or_raise(RepoError::not_found::<M>(id))?;
        let mut rows = self.rows.borrow_mut();
        let others: Vec<M> = rows
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, row)| row.clone())
            .collect();
        entity
            .check_constraints(&others)
            .map_err(RepoError::ConstraintViolation)?;
        rows[index] = entity.clone();
        self.record_write();
        Ok(entity)
    }

    fn delete(&self, id: M::Id) -> RepoResult<M> {
        self.get(id)?;
        let index = self
            .position(id)
            .unwrap_or_raise(RepoError::not_found::<M>(id))?;
        let removed = self.rows.borrow_mut().remove(index);
        self.record_write();
        Ok(removed)
    }
}

impl MemoryEntity for Vehicle {
    fn allocate_id(_sequence: u64) -> Uuid {
        Uuid::new_v4()
    }

    fn check_constraints(&self, _others: &[Self]) -> Result<(), String> {
        if (MIN_MANUFACTURING_YEAR..=MAX_MANUFACTURING_YEAR).contains(&self.manufacturing_year) {
            Ok(())
        } else {
            Err(format!(
                "CHECK constraint failed: manufacturing_year {} outside {MIN_MANUFACTURING_YEAR}..={MAX_MANUFACTURING_YEAR}",
                self.manufacturing_year
            ))
        }
    }

    fn touch(&mut self, now_ms: i64) {
        self.updated_at = Some(now_ms);
    }
}

impl Materialize<Vehicle> for NewVehicle {
    fn materialize(&self, id: Uuid, now_ms: i64) -> Vehicle {
        Vehicle {
            id,
            name: self.name.clone(),
            manufacturing_year: self.manufacturing_year,
            is_driveable: self.is_driveable,
            body: self.body.clone(),
            created_at: now_ms,
            updated_at: None,
        }
    }
}

impl MemoryEntity for Brand {
    fn allocate_id(sequence: u64) -> i64 {
        i64::try_from(sequence).unwrap_or(i64::MAX)
    }

    fn check_constraints(&self, others: &[Self]) -> Result<(), String> {
        if others.iter().any(|other| other.name == self.name) {
            Err(format!("UNIQUE constraint failed: brands.name `{}`", self.name))
        } else {
            Ok(())
        }
    }
}

impl Materialize<Brand> for NewBrand {
    fn materialize(&self, id: i64, _now_ms: i64) -> Brand {
        Brand {
            id,
            name: self.name.clone(),
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

//! Domain model for the vehicle registry.
//!
//! # Responsibility
//! - Define entities, their create/update payloads and filterable fields.
//! - Define the storage-neutral contracts (`Entity`, `Patch`, `Filter`) the
//!   repository port is generic over.
//!
//! # Invariants
//! - Every entity is identified by a stable `Entity::Id`.
//! - Update payloads distinguish "not provided" from "set to a falsy value".

pub mod brand;
pub mod entity;
pub mod filter;
pub mod vehicle;

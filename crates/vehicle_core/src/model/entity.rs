//! Entity and payload contracts shared by every repository adapter.
//!
//! # Responsibility
//! - Describe what the repository port needs from an entity: identity and
//!   filterable field values.
//! - Describe the partial-update contract for update payloads.
//!
//! # Invariants
//! - Patches only touch fields the caller explicitly provided.
//! - Applying the same patch twice leaves the same state as applying it once.
//! - A patch field is either absent or carries a value; explicit JSON `null`
//!   is rejected at deserialization.

use crate::model::filter::{FieldValue, FilterField};
use serde::de::{Deserialize, Deserializer, Error as _};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A storage-backed record addressed by a stable identifier.
pub trait Entity: Clone + Debug {
    /// Human-readable entity name used in errors and log events.
    const NAME: &'static str;

    /// Primary key type (integer or UUID).
    type Id: Copy + Eq + Ord + Hash + Debug + Display;

    /// Fields callers may filter on with equality predicates.
    type Field: FilterField;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Returns the current value of a filterable field.
    fn field_value(&self, field: Self::Field) -> FieldValue;

    /// Returns whether every `(field, expected)` pair matches this entity.
    fn matches<'a, I>(&self, mut entries: I) -> bool
    where
        I: Iterator<Item = (Self::Field, &'a FieldValue)>,
    {
        entries.all(|(field, expected)| &self.field_value(field) == expected)
    }
}

/// Partial update payload for entity `M`.
///
/// Implementors keep every field as `Option<T>`: `None` means the caller did
/// not provide it, `Some(value)` is applied even when `value` is falsy.
pub trait Patch<M> {
    /// Overwrites the provided fields on `target`.
    fn apply_to(&self, target: &mut M);

    /// Returns `true` when no field was provided.
    ///
    /// Adapters return the stored entity without writing for empty patches.
    fn is_empty(&self) -> bool;
}

/// `deserialize_with` helper for patch fields: a present key must carry a
/// value. Pair it with `#[serde(default)]` so an absent key stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| D::Error::custom("null is not allowed; omit the field to leave it unchanged"))
}

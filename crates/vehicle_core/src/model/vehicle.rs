//! Vehicle domain model and its create/update payloads.
//!
//! # Responsibility
//! - Define the canonical vehicle record returned by repositories.
//! - Define the create payload and the partial update payload.
//!
//! # Invariants
//! - `id` is assigned at creation and never reused.
//! - `manufacturing_year` stays within `MIN_MANUFACTURING_YEAR..=MAX_MANUFACTURING_YEAR`
//!   (enforced by storage).
//! - `body` is a free-form JSON object; it defaults to `{}`.
//! - `created_at`/`updated_at` are managed by storage, never by payloads.

use crate::model::entity::{present, Entity, Patch};
use crate::model::filter::{FieldKind, FieldValue, FilterField};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable identifier for a vehicle.
pub type VehicleId = Uuid;

/// Oldest accepted manufacturing year.
pub const MIN_MANUFACTURING_YEAR: i32 = 1900;
/// Newest accepted manufacturing year.
pub const MAX_MANUFACTURING_YEAR: i32 = 2100;

/// Canonical vehicle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub manufacturing_year: i32,
    pub is_driveable: bool,
    /// Additional free-form attributes, e.g. `{"color": "black"}`.
    pub body: Value,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last update, `None` until first update.
    pub updated_at: Option<i64>,
}

/// Filterable vehicle fields. `body` is intentionally not filterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VehicleField {
    Name,
    ManufacturingYear,
    IsDriveable,
}

impl FilterField for VehicleField {
    const ALL: &'static [Self] = &[Self::Name, Self::ManufacturingYear, Self::IsDriveable];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ManufacturingYear => "manufacturing_year",
            Self::IsDriveable => "is_driveable",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::Name => FieldKind::Text,
            Self::ManufacturingYear => FieldKind::Integer,
            Self::IsDriveable => FieldKind::Bool,
        }
    }
}

impl Entity for Vehicle {
    const NAME: &'static str = "vehicle";

    type Id = VehicleId;
    type Field = VehicleField;

    fn id(&self) -> VehicleId {
        self.id
    }

    fn field_value(&self, field: VehicleField) -> FieldValue {
        match field {
            VehicleField::Name => FieldValue::Text(self.name.clone()),
            VehicleField::ManufacturingYear => FieldValue::from(self.manufacturing_year),
            VehicleField::IsDriveable => FieldValue::Bool(self.is_driveable),
        }
    }
}

/// Create payload: every field is materialized into the new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewVehicle {
    pub name: String,
    pub manufacturing_year: i32,
    #[serde(default)]
    pub is_driveable: bool,
    #[serde(default = "empty_body")]
    pub body: Value,
}

impl NewVehicle {
    /// Creates a payload with `is_driveable = false` and an empty body.
    pub fn new(name: impl Into<String>, manufacturing_year: i32) -> Self {
        Self {
            name: name.into(),
            manufacturing_year,
            is_driveable: false,
            body: empty_body(),
        }
    }

    pub fn driveable(mut self, is_driveable: bool) -> Self {
        self.is_driveable = is_driveable;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

/// Partial update payload.
///
/// Absent JSON keys deserialize to `None` and leave the stored value alone.
/// An explicit `null` is a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehiclePatch {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub manufacturing_year: Option<i32>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_driveable: Option<bool>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Patch<Vehicle> for VehiclePatch {
    fn apply_to(&self, target: &mut Vehicle) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(year) = self.manufacturing_year {
            target.manufacturing_year = year;
        }
        if let Some(is_driveable) = self.is_driveable {
            target.is_driveable = is_driveable;
        }
        if let Some(body) = &self.body {
            target.body = body.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.manufacturing_year.is_none()
            && self.is_driveable.is_none()
            && self.body.is_none()
    }
}

fn empty_body() -> Value {
    Value::Object(Map::new())
}

//! SQLite mapping for `vehicles`.
//!
//! # Invariants
//! - `id` is stored as hyphenated UUID text and generated at insert time.
//! - `is_driveable` is stored as `0`/`1`; any other value is rejected on read.
//! - `body` is stored as JSON text and must decode on read.
//! - `updated_at` is refreshed by storage on every persisted update.

use crate::model::vehicle::{NewVehicle, Vehicle, VehicleId, VehiclePatch};
use crate::repo::sqlite::{SqliteEntity, SqliteInsert, SqliteRepository};
use crate::repo::RepoResult;
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use uuid::Uuid;

/// SQLite repository for vehicles.
pub type SqliteVehicleRepository<'conn> =
    SqliteRepository<'conn, Vehicle, NewVehicle, VehiclePatch>;

impl SqliteEntity for Vehicle {
    const TABLE: &'static str = "vehicles";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "manufacturing_year",
        "is_driveable",
        "body",
        "created_at",
        "updated_at",
    ];
    const WRITE_COLUMNS: &'static [&'static str] =
        &["name", "manufacturing_year", "is_driveable", "body"];
    /// Millisecond precision, the same unit the memory adapter stamps.
    const TOUCH_ON_UPDATE: Option<&'static str> =
        Some("updated_at = CAST(ROUND(unixepoch('subsec') * 1000) AS INTEGER)");

    fn id_to_sql(id: VehicleId) -> Value {
        Value::Text(id.to_string())
    }

    fn generate_id() -> Option<VehicleId> {
        Some(Uuid::new_v4())
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            Value::Text(self.name.clone()),
            Value::Integer(i64::from(self.manufacturing_year)),
            Value::Integer(i64::from(self.is_driveable)),
            Value::Text(serde_json::to_string(&self.body)?),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id_text: String = row.get(0)?;
        let id = Uuid::parse_str(&id_text)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;

        let is_driveable = match row.get::<_, i64>(3)? {
            0 => false,
            1 => true,
            other => return Err(rusqlite::Error::IntegralValueOutOfRange(3, other)),
        };

        let body_text: String = row.get(4)?;
        let body = serde_json::from_str(&body_text)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;

        Ok(Self {
            id,
            name: row.get(1)?,
            manufacturing_year: row.get(2)?,
            is_driveable,
            body,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl SqliteInsert<Vehicle> for NewVehicle {
    fn insert_values(&self) -> RepoResult<Vec<(&'static str, Value)>> {
        Ok(vec![
            ("name", Value::Text(self.name.clone())),
            (
                "manufacturing_year",
                Value::Integer(i64::from(self.manufacturing_year)),
            ),
            ("is_driveable", Value::Integer(i64::from(self.is_driveable))),
            ("body", Value::Text(serde_json::to_string(&self.body)?)),
        ])
    }
}

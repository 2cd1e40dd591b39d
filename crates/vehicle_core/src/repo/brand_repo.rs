//! SQLite mapping for `brands` (engine-assigned integer identity).

use crate::model::brand::{Brand, BrandId, BrandPatch, NewBrand};
use crate::repo::sqlite::{SqliteEntity, SqliteInsert, SqliteRepository};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteBrandRepository<'conn> = SqliteRepository<'conn, Brand, NewBrand, BrandPatch>;

impl SqliteEntity for Brand {
    const TABLE: &'static str = "brands";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const WRITE_COLUMNS: &'static [&'static str] = &["name"];

    fn id_to_sql(id: BrandId) -> Value {
        Value::Integer(id)
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![Value::Text(self.name.clone())])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

impl SqliteInsert<Brand> for NewBrand {
    fn insert_values(&self) -> RepoResult<Vec<(&'static str, Value)>> {
        Ok(vec![("name", Value::Text(self.name.clone()))])
    }
}

//! Generic SQLite adapter for the repository port.
//!
//! # Responsibility
//! - Implement `Repository` for any entity that describes its table mapping
//!   through `SqliteEntity`.
//! - Keep SQL text and `rusqlite` types inside this module.
//!
//! # Invariants
//! - Table and column names come from `'static` mapping constants, never
//!   from caller input; filter values are always bound parameters.
//! - `create`/`update` read the stored row back with `RETURNING` so callers
//!   see engine-assigned identity and timestamps.
//! - `update`/`delete` load the entity first and stop at `NotFound`.

use crate::db::{ensure_table, DbResult};
use crate::model::entity::{Entity, Patch};
use crate::model::filter::{FieldValue, FilterField};
use crate::outcome::OptionExt;
use crate::repo::{ListQuery, RepoError, RepoResult, Repository};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;

/// Table mapping for an entity stored in SQLite.
pub trait SqliteEntity: Entity {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str = "id";
    /// Selected columns, in the order `from_row` reads them.
    const COLUMNS: &'static [&'static str];
    /// Columns persisted by an update, in the order of `write_values`.
    /// Excludes identity and engine-managed columns.
    const WRITE_COLUMNS: &'static [&'static str];
    /// Extra assignment appended to every update, e.g. a timestamp refresh.
    const TOUCH_ON_UPDATE: Option<&'static str> = None;
    /// Ordering for `list`; defaults to insertion order.
    const ORDER_BY: &'static str = "rowid ASC";

    fn id_to_sql(id: Self::Id) -> Value;

    /// Identity chosen by the adapter at insert time; `None` lets the engine
    /// assign it (e.g. `AUTOINCREMENT`).
    fn generate_id() -> Option<Self::Id> {
        None
    }

    /// Values for `WRITE_COLUMNS`.
    fn write_values(&self) -> RepoResult<Vec<Value>>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Column values written when a create payload is inserted.
pub trait SqliteInsert<M: SqliteEntity> {
    fn insert_values(&self) -> RepoResult<Vec<(&'static str, Value)>>;
}

/// SQLite-backed repository bound to one connection and one entity type.
pub struct SqliteRepository<'conn, M, C, U> {
    conn: &'conn Connection,
    _types: PhantomData<fn() -> (M, C, U)>,
}

impl<'conn, M, C, U> SqliteRepository<'conn, M, C, U>
where
    M: SqliteEntity,
    C: SqliteInsert<M>,
    U: Patch<M>,
{
    /// Binds a repository to a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `M::TABLE` does not exist.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        ensure_table(conn, M::TABLE)?;
        Ok(Self {
            conn,
            _types: PhantomData,
        })
    }

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", M::COLUMNS.join(", "), M::TABLE)
    }

    fn find(&self, id: M::Id) -> RepoResult<Option<M>> {
        let sql = format!("{} WHERE {} = ?1;", Self::select_sql(), M::ID_COLUMN);
        self.conn
            .query_row(&sql, [M::id_to_sql(id)], M::from_row)
            .optional()
            .map_err(|err| storage_failure::<M>("get", err))
    }

    fn persist(&self, entity: &M) -> RepoResult<M> {
        let values = entity.write_values()?;
        let mut assignments: Vec<String> = M::WRITE_COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect();
        if let Some(touch) = M::TOUCH_ON_UPDATE {
            assignments.push(touch.to_string());
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{} RETURNING {};",
            M::TABLE,
            assignments.join(", "),
            M::ID_COLUMN,
            values.len() + 1,
            M::COLUMNS.join(", ")
        );

        let bind = values
            .into_iter()
            .chain(std::iter::once(M::id_to_sql(entity.id())));
        self.conn
            .query_row(&sql, params_from_iter(bind), M::from_row)
            .optional()
            .map_err(|err| storage_failure::<M>("update", err))?
            .unwrap_or_raise(RepoError::not_found::<M>(entity.id()))
    }
}

impl<M, C, U> Repository for SqliteRepository<'_, M, C, U>
where
    M: SqliteEntity,
    C: SqliteInsert<M>,
    U: Patch<M>,
{
    type Model = M;
    type Create = C;
    type Update = U;

    fn create(&self, payload: &C) -> RepoResult<M> {
        let mut columns = Vec::new();
        let mut values = Vec::new();
        if let Some(id) = M::generate_id() {
            columns.push(M::ID_COLUMN);
            values.push(M::id_to_sql(id));
        }
        for (column, value) in payload.insert_values()? {
            columns.push(column);
            values.push(value);
        }

        let target = if columns.is_empty() {
            "DEFAULT VALUES".to_string()
        } else {
            let placeholders: Vec<String> =
                (1..=values.len()).map(|index| format!("?{index}")).collect();
            format!("({}) VALUES ({})", columns.join(", "), placeholders.join(", "))
        };
        let sql = format!(
            "INSERT INTO {} {target} RETURNING {};",
            M::TABLE,
            M::COLUMNS.join(", ")
        );

        let created = self
            .conn
            .query_row(&sql, params_from_iter(values), M::from_row)
            .map_err(|err| storage_failure::<M>("create", err))?;
        debug!(
            "event=repo_create module=repo entity={} status=ok id={}",
            M::NAME,
            created.id()
        );
        Ok(created)
    }

    fn get(&self, id: M::Id) -> RepoResult<M> {
        self.find(id)?.ok_or_else(|| {
            debug!(
                "event=repo_get module=repo entity={} status=not_found id={id}",
                M::NAME
            );
            RepoError::not_found::<M>(id)
        })
    }

    fn list_page(&self, query: &ListQuery<M::Field>) -> RepoResult<Vec<M>> {
        let mut sql = format!("{} WHERE 1 = 1", Self::select_sql());
        let mut bind_values: Vec<Value> = Vec::new();

        for (field, expected) in query.filter.iter() {
            bind_values.push(field_to_sql(expected));
            sql.push_str(&format!(" AND {} = ?{}", field.name(), bind_values.len()));
        }

        sql.push_str(&format!(" ORDER BY {}", M::ORDER_BY));

        if let Some(limit) = query.limit {
            bind_values.push(Value::Integer(i64::from(limit)));
            sql.push_str(&format!(" LIMIT ?{}", bind_values.len()));
            if query.offset > 0 {
                bind_values.push(Value::Integer(i64::from(query.offset)));
                sql.push_str(&format!(" OFFSET ?{}", bind_values.len()));
            }
        } else if query.offset > 0 {
            bind_values.push(Value::Integer(i64::from(query.offset)));
            sql.push_str(&format!(" LIMIT -1 OFFSET ?{}", bind_values.len()));
        }

        let load = || -> rusqlite::Result<Vec<M>> {
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bind_values), M::from_row)?;
            rows.collect()
        };
        let entities = load().map_err(|err| storage_failure::<M>("list", err))?;

        debug!(
            "event=repo_list module=repo entity={} status=ok filters={} count={}",
            M::NAME,
            query.filter.len(),
            entities.len()
        );
        Ok(entities)
    }

    fn update(&self, id: M::Id, patch: &U) -> RepoResult<M> {
        let mut entity = self.get(id)?;
        if patch.is_empty() {
            return Ok(entity);
        }
        patch.apply_to(&mut entity);

        let updated = self.persist(&entity)?;
        debug!(
            "event=repo_update module=repo entity={} status=ok id={id}",
            M::NAME
        );
        Ok(updated)
    }

    fn delete(&self, id: M::Id) -> RepoResult<M> {
        let entity = self.get(id)?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1;", M::TABLE, M::ID_COLUMN);
        let changed = self
            .conn
            .execute(&sql, [M::id_to_sql(id)])
            .map_err(|err| storage_failure::<M>("delete", err))?;
        if changed == 0 {
            return Err(RepoError::not_found::<M>(id));
        }

        debug!(
            "event=repo_delete module=repo entity={} status=ok id={id}",
            M::NAME
        );
        Ok(entity)
    }
}

/// Converts a filter value into a bound SQLite parameter.
pub fn field_to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(flag) => Value::Integer(i64::from(*flag)),
        FieldValue::Integer(number) => Value::Integer(*number),
        FieldValue::Text(text) => Value::Text(text.clone()),
    }
}

fn storage_failure<M: Entity>(operation: &str, err: rusqlite::Error) -> RepoError {
    let mapped = RepoError::from(err);
    warn!(
        "event=repo_{operation} module=repo entity={} status=error error_kind={} error={mapped}",
        M::NAME,
        mapped.kind()
    );
    mapped
}

//! Equality filters for repository `list` calls.
//!
//! # Responsibility
//! - Represent "field name -> expected value" maps with typed keys.
//! - Parse raw string pairs (query-string style) into typed filters.
//!
//! # Invariants
//! - All entries are ANDed; an empty filter matches everything.
//! - Unknown field names never reach a repository: they fail at parse time.
//! - A field appears at most once; the last parsed occurrence wins.
//! - Every stored value has the shape of its field (`FieldValue::kind()`
//!   equals `FilterField::kind()`), so all engines compare the same way.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Storage-neutral scalar value used by filters and field projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Integer(_) => FieldKind::Integer,
            Self::Text(_) => FieldKind::Text,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Value shape of a filterable field, used when parsing raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    Text,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

/// Closed set of filterable fields for one entity.
///
/// `name()` doubles as the storage column name, so it must be a static
/// identifier and never caller-provided text.
pub trait FilterField: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Every filterable field, in declaration order.
    const ALL: &'static [Self];

    /// Public (and column) name of the field.
    fn name(self) -> &'static str;

    /// Value shape used to parse raw input.
    fn kind(self) -> FieldKind;

    /// Looks up a field by its public name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

/// Caller error raised while building a filter from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    UnknownField(String),
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown filter field `{name}`"),
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "unprocessable value `{value}` for filter `{field}`, not a {expected}"
            ),
        }
    }
}

impl Error for FilterError {}

/// Equality filter over the fields of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<F: FilterField> {
    entries: BTreeMap<F, FieldValue>,
}

impl<F: FilterField> Default for Filter<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<F: FilterField> Filter<F> {
    /// Creates an empty filter (matches every entity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one equality predicate.
    ///
    /// # Errors
    /// `InvalidValue` when `value` does not have the field's kind, e.g. an
    /// integer for a boolean field.
    pub fn with(
        mut self,
        field: F,
        value: impl Into<FieldValue>,
    ) -> Result<Self, FilterError> {
        let value = value.into();
        if value.kind() != field.kind() {
            return Err(FilterError::InvalidValue {
                field: field.name(),
                value: value.to_string(),
                expected: field.kind().describe(),
            });
        }
        self.entries.insert(field, value);
        Ok(self)
    }

    /// Parses raw `(name, value)` pairs, e.g. from a query string.
    ///
    /// # Errors
    /// - `UnknownField` when a name is not one of `F::ALL`.
    /// - `InvalidValue` when a value does not parse as the field's kind.
    pub fn parse<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (name, raw) in pairs {
            let name = name.as_ref().trim();
            let field =
                F::from_name(name).ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
            let value = parse_value(field, raw.as_ref())?;
            filter.entries.insert(field, value);
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates predicates in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &FieldValue)> + '_ {
        self.entries.iter().map(|(field, value)| (*field, value))
    }
}

fn parse_value<F: FilterField>(field: F, raw: &str) -> Result<FieldValue, FilterError> {
    let invalid = || FilterError::InvalidValue {
        field: field.name(),
        value: raw.to_string(),
        expected: field.kind().describe(),
    };

    match field.kind() {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| invalid()),
        FieldKind::Bool => parse_bool(raw).map(FieldValue::Bool).ok_or_else(invalid),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "t" | "1" => Some(true),
        "no" | "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

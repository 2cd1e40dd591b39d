//! Brand model: integer-keyed entity with a unique name.

use crate::model::entity::{present, Entity, Patch};
use crate::model::filter::{FieldKind, FieldValue, FilterField};
use serde::{Deserialize, Serialize};

/// Storage-assigned brand identifier.
pub type BrandId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    /// Unique across all brands.
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BrandField {
    Name,
}

impl FilterField for BrandField {
    const ALL: &'static [Self] = &[Self::Name];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text
    }
}

impl Entity for Brand {
    const NAME: &'static str = "brand";

    type Id = BrandId;
    type Field = BrandField;

    fn id(&self) -> BrandId {
        self.id
    }

    fn field_value(&self, field: BrandField) -> FieldValue {
        match field {
            BrandField::Name => FieldValue::Text(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewBrand {
    pub name: String,
}

impl NewBrand {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandPatch {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Patch<Brand> for BrandPatch {
    fn apply_to(&self, target: &mut Brand) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

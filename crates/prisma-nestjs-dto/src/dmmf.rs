//! Serde model of the Prisma DMMF subset the generator reads.
//!
//! The host hands over its full data-model document as JSON. Only the
//! keys below are decoded; everything else is ignored. Records are
//! treated as immutable: per-DTO adjustments go through
//! [`FieldOverrides`] and produce a new [`Field`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DtoResult;

/// Root DMMF document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub datamodel: Datamodel,
}

impl Document {
    /// Decode a document from its JSON text.
    pub fn from_json(json: &str) -> DtoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a document from an already parsed JSON value.
    pub fn from_value(value: Value) -> DtoResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Look up a model by name.
    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.datamodel.models.iter().find(|m| m.name == name)
    }
}

/// Models and enums declared in the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datamodel {
    pub models: Vec<Model>,
    pub enums: Vec<DatamodelEnum>,
}

/// A schema model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// Field kind as reported by the schema compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    Object,
    Enum,
    #[serde(other)]
    Unsupported,
}

/// A model field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub type_name: String,
    pub is_required: bool,
    pub is_list: bool,
    pub is_id: bool,
    pub is_unique: bool,
    pub is_read_only: bool,
    pub is_updated_at: bool,
    pub has_default_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relation_from_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Field {
    /// Documentation text, or `""` when absent.
    pub fn doc(&self) -> &str {
        self.documentation.as_deref().unwrap_or_default()
    }

    /// Apply an override layer, returning the adjusted copy.
    pub fn with_overrides(&self, overrides: &FieldOverrides) -> Field {
        let mut field = self.clone();
        if let Some(is_required) = overrides.is_required {
            field.is_required = is_required;
        }
        if let Some(is_list) = overrides.is_list {
            field.is_list = is_list;
        }
        if let Some(type_name) = &overrides.type_name {
            field.type_name = type_name.clone();
        }
        field
    }
}

/// Per-DTO adjustments layered over an immutable [`Field`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverrides {
    pub is_required: Option<bool>,
    pub is_list: Option<bool>,
    pub is_nullable: Option<bool>,
    pub type_name: Option<String>,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamodelEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl DatamodelEnum {
    /// Member names in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.name.as_str()).collect()
    }
}

/// A single enum member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

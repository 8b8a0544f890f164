//! `@ApiProperty()` metadata composition.
//!
//! Collects OpenAPI metadata for a single field from three sources, in
//! this order:
//!
//! 1. explicit documentation directives (`@description`, `@minimum`, ...),
//!    visited in the fixed order of [`API_PROPS`];
//! 2. a synthesized `description` built from the free text of the
//!    documentation block when no `@description` directive is present;
//! 3. type-driven defaults: `type`/`format` for numeric and temporal
//!    scalars, `enum` for enum fields, `default` from the schema default.
//!
//! A type-driven property is only added when no property of the same
//! name is already in the list, so every name appears at most once.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::annotations::{capture, strip_directives, value_pattern};
use crate::dmmf::{Field, FieldKind};
use crate::error::{DtoResult, GenerateError};
use crate::naming::DtoNaming;
use crate::render::is_code_literal;

/// Metadata directive names, in composition order.
pub const API_PROPS: &[&str] = &[
    "description",
    "example",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "maximum",
    "maxItems",
    "maxLength",
    "minimum",
    "minItems",
    "minLength",
    "oneOf",
];

/// OpenAPI `(type, format)` pairs for schema scalars.
pub const SCALAR_FORMATS: &[(&str, &str, &str)] = &[
    ("Int", "integer", "int32"),
    ("BigInt", "integer", "int64"),
    ("Float", "number", "float"),
    ("Decimal", "number", "double"),
    ("DateTime", "string", "date-time"),
];

static API_PROP_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    API_PROPS
        .iter()
        .filter_map(|name| value_pattern(name).map(|re| (*name, re)))
        .collect()
});

/// How a property value is written into the decorator body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Passed through verbatim: numbers, booleans, arrays, references.
    Code,
    /// String content, quoted and escaped on output.
    Text,
}

/// A resolved `name: value` pair of an `@ApiProperty()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProperty {
    pub name: String,
    pub value: String,
    pub kind: PropertyKind,
}

impl ApiProperty {
    /// Create a property whose kind is inferred from the value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let kind = if is_code_literal(&value) {
            PropertyKind::Code
        } else {
            PropertyKind::Text
        };
        Self {
            name: name.into(),
            value,
            kind,
        }
    }

    /// Create a property whose value is already a code expression.
    pub fn code(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: PropertyKind::Code,
        }
    }
}

/// Which groups of properties to compose. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeOptions {
    /// Schema default value.
    pub default: bool,
    /// Documentation directives and synthesized description.
    pub doc: bool,
    /// Enum reference for enum fields.
    pub enums: bool,
    /// Scalar `type`/`format` pair.
    pub types: bool,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self {
            default: true,
            doc: true,
            enums: true,
            types: true,
        }
    }
}

impl IncludeOptions {
    /// Everything except the schema default, for read DTOs.
    pub fn without_default() -> Self {
        Self {
            default: false,
            ..Self::default()
        }
    }
}

/// Look up the OpenAPI `(type, format)` pair of a scalar.
pub fn scalar_format(scalar: &str) -> Option<(&'static str, &'static str)> {
    SCALAR_FORMATS
        .iter()
        .find(|(name, _, _)| *name == scalar)
        .map(|(_, ty, format)| (*ty, *format))
}

/// Resolve the schema default of a field to its display text.
///
/// Strings, numbers and booleans pass through. A function-call default
/// such as `autoincrement()` arrives as an object with a `name` key and
/// resolves to that name. Anything else has no default.
pub fn default_value(field: &Field) -> Option<String> {
    if !field.has_default_value {
        return None;
    }

    match field.default.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => match map.get("name") {
            Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Turn an `@oneOf` payload into a list of schema references.
///
/// `["Cat", "Dog"]` becomes
/// `[{ $ref: getSchemaPath(CreateCatDto) }, { $ref: getSchemaPath(CreateDogDto) }]`.
pub fn one_of_references(field: &Field, raw: &str, naming: &DtoNaming) -> DtoResult<String> {
    let refs: Vec<String> = parse_one_of(field, raw)?
        .iter()
        .map(|class| {
            format!(
                "{{ $ref: getSchemaPath({}) }}",
                naming.create_dto_name(class)
            )
        })
        .collect();

    Ok(format!("[{}]", refs.join(", ")))
}

/// Model names listed by the field's `@oneOf` directive, if any.
pub fn one_of_models(field: &Field) -> DtoResult<Vec<String>> {
    let raw = field.documentation.as_deref().and_then(|doc| {
        API_PROP_PATTERNS
            .iter()
            .find(|(name, _)| *name == "oneOf")
            .and_then(|(_, pattern)| capture(pattern, doc))
    });

    match raw {
        Some(raw) => parse_one_of(field, &raw),
        None => Ok(Vec::new()),
    }
}

fn parse_one_of(field: &Field, raw: &str) -> DtoResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| GenerateError::one_of(&field.name, e))
}

/// Compose the `@ApiProperty()` properties of a field.
pub fn parse_api_property(
    field: &Field,
    include: IncludeOptions,
    naming: &DtoNaming,
) -> DtoResult<Vec<ApiProperty>> {
    let mut properties: Vec<ApiProperty> = Vec::new();

    if include.doc {
        if let Some(doc) = field.documentation.as_deref() {
            for (name, pattern) in API_PROP_PATTERNS.iter() {
                let Some(value) = capture(pattern, doc) else {
                    continue;
                };
                if *name == "oneOf" {
                    let refs = one_of_references(field, &value, naming)?;
                    properties.push(ApiProperty::code(*name, refs));
                } else {
                    properties.push(ApiProperty::new(*name, value));
                }
            }

            if !has_property(&properties, "description") {
                let description = strip_directives(doc);
                if !description.is_empty() {
                    properties.push(ApiProperty::new("description", description));
                }
            }
        }
    }

    if include.types {
        if let Some((ty, format)) = scalar_format(&field.type_name) {
            push_unique(&mut properties, ApiProperty::new("type", ty));
            push_unique(&mut properties, ApiProperty::new("format", format));
        }
    }

    if include.enums && field.kind == FieldKind::Enum {
        push_unique(&mut properties, ApiProperty::code("enum", &field.type_name));
    }

    if include.default {
        if let Some(default) = default_value(field) {
            push_unique(&mut properties, ApiProperty::new("default", default));
        }
    }

    trace!(field = %field.name, count = properties.len(), "Composed api properties");
    Ok(properties)
}

fn has_property(properties: &[ApiProperty], name: &str) -> bool {
    properties.iter().any(|p| p.name == name)
}

fn push_unique(properties: &mut Vec<ApiProperty>, property: ApiProperty) {
    if !has_property(properties, &property.name) {
        properties.push(property);
    }
}

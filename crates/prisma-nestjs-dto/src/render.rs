//! Decorator text rendering.
//!
//! Turns composed property lists into the decorator source text that a
//! DTO template splices above a class property:
//!
//! ```text
//! @IsNotEmpty()
//! @IsDecimal()
//! @Type(() => String)
//! @ApiProperty({
//!   description: `Unit price`,
//!   type: `number`,
//!   format: `double`,
//! })
//! ```
//!
//! String content is emitted as a template literal. A value is passed
//! through as code instead when it is exactly `true` or `false`, or when
//! it starts with a digit or `[`.

use crate::api_property::{ApiProperty, PropertyKind};
use crate::class_validator::ClassValidator;

/// Decide whether a raw value reads as a code literal.
///
/// Numbers, booleans and array literals pass through unquoted. The empty
/// string does not: it is rendered as an empty template literal so the
/// output stays valid syntax.
pub fn is_code_literal(value: &str) -> bool {
    match value.chars().next() {
        None => false,
        Some(first) => {
            value == "true" || value == "false" || first.is_ascii_digit() || first == '['
        }
    }
}

/// Wrap string content in a template literal, escaping as needed.
pub fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    format!("`{}`", escaped)
}

/// Encode a property value for the decorator body.
pub fn encode_value(property: &ApiProperty) -> String {
    match property.kind {
        PropertyKind::Code => property.value.clone(),
        PropertyKind::Text => quote(&property.value),
    }
}

/// Compose the `@ApiProperty()` decorator.
///
/// Returns an empty string for an empty list unless `annotate_all` is
/// set, in which case a bare `@ApiProperty()` is emitted.
pub fn decorate_api_property(properties: &[ApiProperty], annotate_all: bool) -> String {
    if properties.is_empty() {
        return if annotate_all {
            "@ApiProperty()\n".to_string()
        } else {
            String::new()
        };
    }

    let mut decorator = String::from("@ApiProperty({\n");
    for property in properties {
        decorator.push_str(&format!("  {}: {},\n", property.name, encode_value(property)));
    }
    decorator.push_str("})\n");
    decorator
}

/// Compose `class-validator` decorators, one line per descriptor.
pub fn decorate_class_validators(validators: &[ClassValidator]) -> String {
    let mut output = String::new();

    for validator in validators {
        output.push_str(&format!(
            "@{}({})\n",
            validator.name,
            validator.value.as_deref().unwrap_or_default()
        ));
        if let Some(target) = &validator.transform_to {
            output.push_str(&format!("@Type(() => {})\n", target));
        }
    }

    output
}

//! `class-validator` descriptor composition.
//!
//! Validation rules for a field are derived from its shape first
//! (required/optional, list, scalar type, nested object, enum
//! membership) and then from explicit validator directives in its
//! documentation, e.g. `@IsEmail()` or `@Length(2, 20)`. Argument blobs
//! are passed through verbatim.
//!
//! Names are unique within a field's list. An explicit directive naming
//! a validator that shape rules already produced replaces its arguments
//! in place; the enum membership `IsIn` always wins over an explicit one.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::annotations::validator_pattern;
use crate::dmmf::{DatamodelEnum, Field, FieldKind};

/// Validator names recognized as documentation directives.
pub const AVAILABLE_VALIDATORS: &[&str] = &[
    "Allow",
    "ArrayContains",
    "ArrayMaxSize",
    "ArrayMinSize",
    "ArrayNotContains",
    "ArrayNotEmpty",
    "ArrayUnique",
    "Contains",
    "Equals",
    "IsAlpha",
    "IsAlphanumeric",
    "IsAscii",
    "IsBase32",
    "IsBase64",
    "IsBIC",
    "IsBoolean",
    "IsBooleanString",
    "IsBtcAddress",
    "IsByteLength",
    "IsCreditCard",
    "IsCurrency",
    "IsDataURI",
    "IsDate",
    "IsDateString",
    "IsDecimal",
    "IsDefined",
    "IsDivisibleBy",
    "IsEAN",
    "IsEmail",
    "IsEmpty",
    "IsEnum",
    "IsEthereumAddress",
    "IsFirebasePushId",
    "IsFQDN",
    "IsFullWidth",
    "IsHalfWidth",
    "IsHash",
    "IsHexColor",
    "IsHexadecimal",
    "IsHSL",
    "IsIBAN",
    "IsIdentityCard",
    "IsIn",
    "IsInstance",
    "IsInt",
    "IsIP",
    "IsISBN",
    "IsISIN",
    "IsISO31661Alpha2",
    "IsISO31661Alpha3",
    "IsISO8601",
    "IsISRC",
    "IsISSN",
    "IsJSON",
    "IsJWT",
    "IsLatitude",
    "IsLatLong",
    "IsLocale",
    "IsLongitude",
    "IsLowercase",
    "IsMACAddress",
    "IsMagnetURI",
    "IsMilitaryTime",
    "IsMimeType",
    "IsMobilePhone",
    "IsMongoId",
    "IsMultibyte",
    "IsNegative",
    "IsNotEmpty",
    "IsNotEmptyObject",
    "IsNotIn",
    "IsNumber",
    "IsNumberString",
    "IsObject",
    "IsOctal",
    "IsOptional",
    "IsPassportNumber",
    "IsPhoneNumber",
    "IsPort",
    "IsPositive",
    "IsPostalCode",
    "IsRFC3339",
    "IsRgbColor",
    "IsSemVer",
    "IsString",
    "IsSurrogatePair",
    "IsUppercase",
    "IsUrl",
    "IsUUID",
    "IsVariableWidth",
    "Length",
    "Matches",
    "Max",
    "MaxDate",
    "MaxLength",
    "Min",
    "MinDate",
    "MinLength",
    "NotContains",
    "NotEquals",
];

/// Validator implied by a schema scalar, with optional coercion target.
pub const SCALAR_VALIDATORS: &[(&str, &str, Option<&str>)] = &[
    ("String", "IsString", None),
    ("Boolean", "IsBoolean", None),
    ("Int", "IsInt", None),
    ("BigInt", "IsInt", None),
    ("Float", "IsNumber", None),
    ("Decimal", "IsDecimal", Some("String")),
    ("DateTime", "IsRFC3339", None),
];

static VALIDATOR_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    AVAILABLE_VALIDATORS
        .iter()
        .filter_map(|name| validator_pattern(name).map(|re| (*name, re)))
        .collect()
});

/// A single validation decorator: `@Name(value)`, optionally followed by
/// a `@Type(() => Target)` coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassValidator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_to: Option<String>,
}

impl ClassValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            transform_to: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            transform_to: None,
        }
    }

    /// Attach a companion type coercion.
    pub fn transform_to(mut self, target: impl Into<String>) -> Self {
        self.transform_to = Some(target.into());
        self
    }
}

/// Look up the validator implied by a scalar type.
pub fn scalar_to_validator(scalar: &str) -> Option<ClassValidator> {
    SCALAR_VALIDATORS
        .iter()
        .find(|(name, _, _)| *name == scalar)
        .map(|(_, validator, target)| {
            let v = ClassValidator::new(*validator);
            match target {
                Some(target) => v.transform_to(*target),
                None => v,
            }
        })
}

/// Collect explicit validator directives from documentation text, in
/// vocabulary order.
pub fn extract_validators(documentation: &str) -> Vec<ClassValidator> {
    VALIDATOR_PATTERNS
        .iter()
        .filter_map(|(name, re)| {
            re.captures(documentation).map(|caps| ClassValidator {
                name: (*name).to_string(),
                value: caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|v| !v.is_empty()),
                transform_to: None,
            })
        })
        .collect()
}

/// Compose the validation descriptors of a field.
///
/// `enums` is the full list of declared enums, used to resolve the legal
/// members of enum-kind fields.
pub fn parse_class_validators(field: &Field, enums: &[DatamodelEnum]) -> Vec<ClassValidator> {
    let mut validators = Vec::new();

    if field.is_required {
        validators.push(ClassValidator::new("IsNotEmpty"));
    } else {
        validators.push(ClassValidator::new("IsOptional"));
    }

    if field.is_list {
        validators.push(ClassValidator::new("IsArray"));
        if field.kind == FieldKind::Object {
            validators.push(ClassValidator::with_value("ValidateNested", "{ each: true }"));
        }
    } else {
        if let Some(type_validator) = scalar_to_validator(&field.type_name) {
            validators.push(type_validator);
        }
        if field.kind == FieldKind::Object {
            validators.push(ClassValidator::new("ValidateNested"));
        }
    }

    if field.kind == FieldKind::Object {
        validators.push(ClassValidator::with_value(
            "Type",
            format!("() => {}", field.type_name),
        ));
    }

    let is_enum = field.kind == FieldKind::Enum;

    if let Some(doc) = field.documentation.as_deref() {
        for explicit in extract_validators(doc) {
            if is_enum && explicit.name == "IsIn" {
                continue;
            }
            match validators.iter_mut().find(|v| v.name == explicit.name) {
                Some(existing) => {
                    if explicit.value.is_some() {
                        existing.value = explicit.value;
                    }
                }
                None => validators.push(explicit),
            }
        }
    }

    if is_enum {
        match enums.iter().find(|e| e.name == field.type_name) {
            Some(declared) => {
                let members = declared.member_names();
                let encoded =
                    serde_json::to_string(&members).unwrap_or_else(|_| "[]".to_string());
                validators.push(ClassValidator::with_value("IsIn", encoded));
            }
            None => {
                warn!(field = %field.name, enum_name = %field.type_name, "Enum declaration not found");
                validators.push(ClassValidator::with_value("IsIn", "[]"));
            }
        }
    }

    trace!(field = %field.name, count = validators.len(), "Composed class validators");
    validators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmmf::EnumValue;

    fn scalar(type_name: &str, required: bool) -> Field {
        Field {
            name: "value".into(),
            kind: FieldKind::Scalar,
            type_name: type_name.into(),
            is_required: required,
            ..Default::default()
        }
    }

    fn names(validators: &[ClassValidator]) -> Vec<&str> {
        validators.iter().map(|v| v.name.as_str()).collect()
    }

    fn role_enum() -> DatamodelEnum {
        DatamodelEnum {
            name: "Role".into(),
            values: vec![
                EnumValue { name: "USER".into() },
                EnumValue { name: "ADMIN".into() },
            ],
            documentation: None,
        }
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for name in AVAILABLE_VALIDATORS {
            assert!(seen.insert(*name), "duplicate validator {}", name);
        }
    }

    #[test]
    fn test_required_string() {
        let validators = parse_class_validators(&scalar("String", true), &[]);
        assert_eq!(names(&validators), vec!["IsNotEmpty", "IsString"]);
    }

    #[test]
    fn test_optional_decimal_has_coercion() {
        let validators = parse_class_validators(&scalar("Decimal", false), &[]);
        assert_eq!(names(&validators), vec!["IsOptional", "IsDecimal"]);
        assert_eq!(validators[1].transform_to.as_deref(), Some("String"));
    }

    #[test]
    fn test_unknown_scalar_has_no_type_validator() {
        let validators = parse_class_validators(&scalar("Bytes", true), &[]);
        assert_eq!(names(&validators), vec!["IsNotEmpty"]);
    }

    #[test]
    fn test_object_list() {
        let field = Field {
            name: "posts".into(),
            kind: FieldKind::Object,
            type_name: "Post".into(),
            is_list: true,
            ..Default::default()
        };
        let validators = parse_class_validators(&field, &[]);
        assert_eq!(
            names(&validators),
            vec!["IsOptional", "IsArray", "ValidateNested", "Type"]
        );
        assert_eq!(validators[2].value.as_deref(), Some("{ each: true }"));
        assert_eq!(validators[3].value.as_deref(), Some("() => Post"));
    }

    #[test]
    fn test_object_single() {
        let field = Field {
            name: "author".into(),
            kind: FieldKind::Object,
            type_name: "User".into(),
            is_required: true,
            ..Default::default()
        };
        let validators = parse_class_validators(&field, &[]);
        assert_eq!(names(&validators), vec!["IsNotEmpty", "ValidateNested", "Type"]);
        assert_eq!(validators[1].value, None);
    }

    #[test]
    fn test_enum_membership() {
        let field = Field {
            name: "role".into(),
            kind: FieldKind::Enum,
            type_name: "Role".into(),
            is_required: true,
            documentation: Some("@IsIn(['X'])".into()),
            ..Default::default()
        };
        let validators = parse_class_validators(&field, &[role_enum()]);
        let is_in: Vec<_> = validators.iter().filter(|v| v.name == "IsIn").collect();
        assert_eq!(is_in.len(), 1);
        assert_eq!(is_in[0].value.as_deref(), Some(r#"["USER","ADMIN"]"#));
    }

    #[test]
    fn test_explicit_directives() {
        let mut field = scalar("String", true);
        field.documentation =
            Some("Contact address\n@IsEmail()\n@Length(5, 120)\n@Matches(/^a(b)$/)".into());
        let validators = parse_class_validators(&field, &[]);
        assert_eq!(
            names(&validators),
            vec!["IsNotEmpty", "IsString", "IsEmail", "Length", "Matches"]
        );
        assert_eq!(validators[2].value, None);
        assert_eq!(validators[3].value.as_deref(), Some("5, 120"));
        assert_eq!(validators[4].value.as_deref(), Some("/^a(b)$/"));
    }

    #[test]
    fn test_explicit_overrides_shape_arguments() {
        let mut field = scalar("Decimal", true);
        field.documentation = Some("@IsDecimal({ decimal_digits: '2' })\n@IsNotEmpty()".into());
        let validators = parse_class_validators(&field, &[]);
        assert_eq!(names(&validators), vec!["IsNotEmpty", "IsDecimal"]);
        assert_eq!(
            validators[1].value.as_deref(),
            Some("{ decimal_digits: '2' }")
        );
        assert_eq!(validators[1].transform_to.as_deref(), Some("String"));
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        let mut field = scalar("String", true);
        field.documentation = Some("@MinLength(3)".into());
        let validators = parse_class_validators(&field, &[]);
        assert_eq!(names(&validators), vec!["IsNotEmpty", "IsString", "MinLength"]);
    }
}

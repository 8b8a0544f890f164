//! Directive extraction from documentation comments.
//!
//! Schema authors attach structured metadata to fields and enums by
//! writing directive lines into `///` comments:
//!
//! ```text
//! /// The user's display name
//! /// @minLength 3
//! /// @example "Ada"
//! /// @IsAlphanumeric()
//! /// @DtoCreateOptional
//! ```
//!
//! Three line shapes are recognized, all anchored at the start of a
//! line (leading blanks allowed):
//!
//! - value directives, `@name <value>`, where the value runs to the end
//!   of the line and must contain at least one non-blank character;
//! - validator directives, `@Name` or `@Name(<args>)`, where the argument
//!   blob is captured verbatim;
//! - flag directives, a bare `@Name`.
//!
//! Matching is case-sensitive and the first occurrence in the text wins.

use regex::Regex;
use tracing::warn;

use crate::dmmf::Field;

/// Hide the field from every input DTO.
pub const DTO_READ_ONLY: &str = "DtoReadOnly";
/// Hide the field from the plain DTO.
pub const DTO_ENTITY_HIDDEN: &str = "DtoEntityHidden";
/// Keep an otherwise skipped field in the create DTO, as optional.
pub const DTO_CREATE_OPTIONAL: &str = "DtoCreateOptional";
/// Keep an otherwise skipped field in the update DTO.
pub const DTO_UPDATE_OPTIONAL: &str = "DtoUpdateOptional";
/// Make a relation input required in the create DTO.
pub const DTO_RELATION_REQUIRED: &str = "DtoRelationRequired";
pub const DTO_RELATION_CAN_CREATE_ON_CREATE: &str = "DtoRelationCanCreateOnCreate";
pub const DTO_RELATION_CAN_CONNECT_ON_CREATE: &str = "DtoRelationCanConnectOnCreate";
pub const DTO_RELATION_CAN_CREATE_ON_UPDATE: &str = "DtoRelationCanCreateOnUpdate";
pub const DTO_RELATION_CAN_CONNECT_ON_UPDATE: &str = "DtoRelationCanConnectOnUpdate";
pub const DTO_RELATION_CAN_CONNECT_OR_CREATE_ON_UPDATE: &str =
    "DtoRelationCanConnectOrCreateOnUpdate";
pub const DTO_RELATION_AS_PROPERTY_ON_CREATE: &str = "DtoRelationAsPropertyOnCreate";

/// Relation modifiers that keep a relation field in the create DTO.
pub const DTO_RELATION_MODIFIERS_ON_CREATE: &[&str] = &[
    DTO_RELATION_CAN_CREATE_ON_CREATE,
    DTO_RELATION_CAN_CONNECT_ON_CREATE,
    DTO_RELATION_AS_PROPERTY_ON_CREATE,
];

/// Relation modifiers that keep a relation field in the update DTO.
pub const DTO_RELATION_MODIFIERS_ON_UPDATE: &[&str] = &[
    DTO_RELATION_CAN_CREATE_ON_UPDATE,
    DTO_RELATION_CAN_CONNECT_ON_UPDATE,
    DTO_RELATION_CAN_CONNECT_OR_CREATE_ON_UPDATE,
];

/// Build the pattern for a value directive `@name <value>`.
pub fn value_pattern(name: &str) -> Option<Regex> {
    compile(&format!(r"(?m)^[ \t]*@{}[ \t]+(\S[^\r\n]*)", regex::escape(name)))
}

/// Build the pattern for a validator directive `@Name` / `@Name(args)`.
pub fn validator_pattern(name: &str) -> Option<Regex> {
    compile(&format!(
        r"(?m)^[ \t]*@{}(?:\(([^\r\n]*)\))?[ \t\r]*$",
        regex::escape(name)
    ))
}

/// Build the pattern for a bare flag directive `@Name`.
pub fn flag_pattern(name: &str) -> Option<Regex> {
    compile(&format!(r"(?m)^[ \t]*@{}(?:[\s(]|$)", regex::escape(name)))
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Invalid directive pattern");
            None
        }
    }
}

/// Run a compiled value pattern against documentation text.
pub fn capture(pattern: &Regex, documentation: &str) -> Option<String> {
    pattern
        .captures(documentation)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the value of `@directive <value>` from documentation text.
///
/// Returns the text after the directive name up to the end of its line,
/// or `None` when the directive is absent or has no value.
pub fn extract(documentation: Option<&str>, directive: &str) -> Option<String> {
    let documentation = documentation?;
    let pattern = value_pattern(directive)?;
    capture(&pattern, documentation)
}

/// Check whether a field's documentation carries the bare flag `@flag`.
pub fn is_annotated_with(field: &Field, flag: &str) -> bool {
    flag_pattern(flag).is_some_and(|re| re.is_match(field.doc()))
}

/// Check whether a field carries any of the given flags.
pub fn is_annotated_with_one_of(field: &Field, flags: &[&str]) -> bool {
    flags.iter().any(|flag| is_annotated_with(field, flag))
}

/// Remove every directive line and trim what remains.
///
/// This is the free-text description of a documentation block.
pub fn strip_directives(documentation: &str) -> String {
    documentation
        .lines()
        .filter(|line| !line.trim_start().starts_with('@'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documented(doc: &str) -> Field {
        Field {
            name: "f".into(),
            documentation: Some(doc.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_value_on_own_line() {
        let doc = "Age in years\n@minimum 5\n@maximum 120";
        assert_eq!(extract(Some(doc), "minimum"), Some("5".to_string()));
        assert_eq!(extract(Some(doc), "maximum"), Some("120".to_string()));
        assert_eq!(extract(Some(doc), "minLength"), None);
    }

    #[test]
    fn test_extract_absent_documentation() {
        assert_eq!(extract(None, "minimum"), None);
    }

    #[test]
    fn test_extract_requires_whole_name() {
        assert_eq!(extract(Some("@minimum 5"), "min"), None);
        assert_eq!(extract(Some("@min 5"), "minimum"), None);
    }

    #[test]
    fn test_extract_empty_value_is_absent() {
        assert_eq!(extract(Some("@description"), "description"), None);
        assert_eq!(extract(Some("@description   \nnext"), "description"), None);
    }

    #[test]
    fn test_extract_stops_at_line_end() {
        let doc = "@example hello world\n@minimum 1";
        assert_eq!(extract(Some(doc), "example"), Some("hello world".to_string()));
    }

    #[test]
    fn test_extract_first_occurrence_wins() {
        let doc = "@example first\n@example second";
        assert_eq!(extract(Some(doc), "example"), Some("first".to_string()));
    }

    #[test]
    fn test_extract_is_case_sensitive() {
        assert_eq!(extract(Some("@Minimum 5"), "minimum"), None);
    }

    #[test]
    fn test_extract_handles_crlf() {
        let doc = "@minimum 5\r\n@maximum 9\r\n";
        assert_eq!(extract(Some(doc), "minimum"), Some("5".to_string()));
    }

    #[test]
    fn test_extract_ignores_mid_line_mentions() {
        assert_eq!(extract(Some("see @minimum 5"), "minimum"), None);
    }

    #[test]
    fn test_flag_matching() {
        let field = documented("Internal\n@DtoReadOnly");
        assert!(is_annotated_with(&field, DTO_READ_ONLY));
        assert!(!is_annotated_with(&field, DTO_ENTITY_HIDDEN));

        let longer = documented("@DtoReadOnlyish");
        assert!(!is_annotated_with(&longer, DTO_READ_ONLY));
    }

    #[test]
    fn test_flag_one_of() {
        let field = documented("@DtoRelationCanConnectOnCreate");
        assert!(is_annotated_with_one_of(&field, DTO_RELATION_MODIFIERS_ON_CREATE));
        assert!(!is_annotated_with_one_of(&field, DTO_RELATION_MODIFIERS_ON_UPDATE));
    }

    #[test]
    fn test_validator_pattern_args() {
        let re = validator_pattern("Length").unwrap();
        let caps = re.captures("@Length(2, 20)").unwrap();
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("2, 20"));

        let caps = re.captures("@Length").unwrap();
        assert!(caps.get(1).is_none());
        assert!(!re.is_match("@LengthX()"));
    }

    #[test]
    fn test_strip_directives() {
        let doc = "  The title\n@minLength 3\n  @example foo\nShown to users  ";
        assert_eq!(strip_directives(doc), "The title\nShown to users");
        assert_eq!(strip_directives("@minimum 1\n@maximum 2"), "");
    }
}

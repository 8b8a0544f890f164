//! Enum-to-code lookup files.
//!
//! An enum documented with a `@DtoGenMapping` directive gets a small
//! module exporting `map<EnumName>(key)`, which looks the key up in the
//! object expression given by the directive:
//!
//! ```text
//! /// @DtoGenMapping ({
//! ///   ACTIVE: 'A',
//! ///   BLOCKED: 'B' })
//! enum Status { ACTIVE BLOCKED }
//! ```
//!
//! The directive must open its line. The parenthesized form may span
//! several documentation lines; an expression whose parentheses never
//! close produces no file. The older single-line form
//! `@DtoGenMapping { ... }` is accepted when no parenthesized form exists.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::annotations::{capture, value_pattern};
use crate::dmmf::DatamodelEnum;
use crate::generator::GeneratedFile;

/// Directive keyword for enum mappings.
pub const DTO_GEN_MAPPING: &str = "DtoGenMapping";

static MAPPING_START: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*@DtoGenMapping\s*\(").ok());

static LEGACY_MAPPING: LazyLock<Option<Regex>> =
    LazyLock::new(|| value_pattern(DTO_GEN_MAPPING));

/// Find the mapping expression in an enum's documentation.
pub fn extract_mapping(documentation: &str) -> Option<String> {
    let Some(start) = MAPPING_START
        .as_ref()
        .and_then(|re| re.find(documentation))
        .map(|m| m.end() - 1)
    else {
        return LEGACY_MAPPING
            .as_ref()
            .and_then(|re| capture(re, documentation))
            .map(|value| value.trim_end().to_string());
    };

    let collapsed = documentation[start..].replace("\r\n", " ").replace('\n', " ");
    match balanced_parens(&collapsed) {
        Some(expression) => Some(expression.to_string()),
        None => {
            warn!(
                directive = DTO_GEN_MAPPING,
                text = %collapsed,
                "Unbalanced mapping expression, skipping"
            );
            None
        }
    }
}

/// Return the prefix of `text` up to the parenthesis closing its first
/// character, skipping over quoted strings.
fn balanced_parens(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Render the lookup module for an enum.
pub fn render_mapping(enum_name: &str, expression: &str, import_path: &str) -> String {
    format!(
        "import type {{ {name} }} from '{import_path}';\n\
         \n\
         export function map{name}(key: {name} | string): string | undefined {{\n\
         \x20 const mapping: Record<string, string | undefined> = {expression};\n\
         \x20 return mapping[key];\n\
         }}\n",
        name = enum_name,
        import_path = import_path,
        expression = expression,
    )
}

/// Produce the mapping file for one enum, if it carries a mapping.
pub fn generate_mapping_file(
    declaration: &DatamodelEnum,
    output_dir: &Path,
    import_path: &str,
) -> Option<GeneratedFile> {
    let documentation = declaration.documentation.as_deref()?;
    let expression = extract_mapping(documentation)?;

    debug!(enum_name = %declaration.name, "Generating enum mapping");

    Some(GeneratedFile {
        path: output_dir.join(format!("{}.ts", declaration.name)),
        content: render_mapping(&declaration.name, &expression, import_path),
    })
}

/// Produce mapping files for every enum that carries a mapping.
pub fn gen_enum_mappings(
    enums: &[DatamodelEnum],
    output_dir: &Path,
    import_path: &str,
) -> Vec<GeneratedFile> {
    enums
        .iter()
        .filter_map(|e| generate_mapping_file(e, output_dir, import_path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn status(doc: Option<&str>) -> DatamodelEnum {
        DatamodelEnum {
            name: "Status".into(),
            values: Vec::new(),
            documentation: doc.map(String::from),
        }
    }

    #[test]
    fn test_single_line_parenthesized() {
        assert_eq!(
            extract_mapping("@DtoGenMapping ({ A: '1', B: '2' })").as_deref(),
            Some("({ A: '1', B: '2' })")
        );
    }

    #[test]
    fn test_multi_line_parenthesized() {
        let doc = "Order status\n@DtoGenMapping ({ A: '1',\nB: '2' })\nmore text (ignored)";
        assert_eq!(
            extract_mapping(doc).as_deref(),
            Some("({ A: '1', B: '2' })")
        );
    }

    #[test]
    fn test_parens_inside_strings() {
        let doc = "@DtoGenMapping ({ A: ')', B: '(x' })";
        assert_eq!(extract_mapping(doc).as_deref(), Some("({ A: ')', B: '(x' })"));
    }

    #[test]
    fn test_legacy_bare_form() {
        let doc = "@DtoGenMapping { A: '1', B: '2' }\nnotes";
        assert_eq!(extract_mapping(doc).as_deref(), Some("{ A: '1', B: '2' }"));
    }

    #[test]
    fn test_unbalanced_expression_is_skipped() {
        assert_eq!(extract_mapping("@DtoGenMapping ({ A: '1'"), None);
        assert_eq!(extract_mapping("@DtoGenMapping ({ A: '1',\nB: ')' }"), None);

        let declaration = status(Some("@DtoGenMapping ({ A: '1'\nnotes"));
        assert!(generate_mapping_file(&declaration, Path::new("out"), "@prisma/client").is_none());
    }

    #[test]
    fn test_mention_in_prose_is_not_a_directive() {
        let doc = "Codes: see @DtoGenMapping (legacy docs) for details";
        assert_eq!(extract_mapping(doc), None);

        let doc = "Uses @DtoGenMapping ({ A: '1' }) elsewhere\n@DtoGenMapping ({ B: '2' })";
        assert_eq!(extract_mapping(doc).as_deref(), Some("({ B: '2' })"));
    }

    #[test]
    fn test_indented_directive() {
        let doc = "Status\n  @DtoGenMapping ({ A: '1' })";
        assert_eq!(extract_mapping(doc).as_deref(), Some("({ A: '1' })"));
    }

    #[test]
    fn test_absent_directive() {
        assert_eq!(extract_mapping("Just a status"), None);
        assert!(generate_mapping_file(&status(None), Path::new("out"), "@prisma/client").is_none());
        assert!(
            generate_mapping_file(&status(Some("no mapping")), Path::new("out"), "@prisma/client")
                .is_none()
        );
    }

    #[test]
    fn test_generated_file() {
        let declaration = status(Some("@DtoGenMapping ({ A: '1',\n  B: '2' })"));
        let file =
            generate_mapping_file(&declaration, Path::new("out/mappings"), "@prisma/client")
                .unwrap();

        assert_eq!(file.path, PathBuf::from("out/mappings/Status.ts"));
        assert_eq!(
            file.content,
            "import type { Status } from '@prisma/client';\n\
             \n\
             export function mapStatus(key: Status | string): string | undefined {\n\
             \x20 const mapping: Record<string, string | undefined> = ({ A: '1',   B: '2' });\n\
             \x20 return mapping[key];\n\
             }\n"
        );
    }

    #[test]
    fn test_gen_enum_mappings_skips_plain_enums() {
        let enums = vec![status(Some("@DtoGenMapping ({ A: '1' })")), status(None)];
        assert_eq!(gen_enum_mappings(&enums, Path::new("."), "@prisma/client").len(), 1);
    }
}

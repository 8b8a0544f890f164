//! Property-based tests for directive extraction and decorator output.

use std::path::Path;

use proptest::prelude::*;

use prisma_nestjs_dto::enum_mapping::extract_mapping;
use prisma_nestjs_dto::render::{is_code_literal, quote};
use prisma_nestjs_dto::{
    decorate_api_property, extract, generate_mapping_file, parse_api_property,
    parse_class_validators, ApiProperty, DatamodelEnum, DtoNaming, Field, FieldKind,
    IncludeOptions,
};

fn member_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z_]{0,8}"
}

fn free_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,30}[a-zA-Z]"
}

fn string_field(documentation: String) -> Field {
    Field {
        name: "value".into(),
        kind: FieldKind::Scalar,
        type_name: "String".into(),
        is_required: true,
        documentation: Some(documentation),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_extracts_value_on_its_own_line(
        before in free_text(),
        value in 0u32..100_000,
        after in free_text(),
    ) {
        let doc = format!("{}\n@minimum {}\n{}", before, value, after);
        prop_assert_eq!(extract(Some(&doc), "minimum"), Some(value.to_string()));
    }

    #[test]
    fn prop_description_is_free_text(
        text in free_text(),
        length in 1u32..500,
    ) {
        let field = string_field(format!("{}\n@maxLength {}", text, length));
        let properties =
            parse_api_property(&field, IncludeOptions::default(), &DtoNaming::default()).unwrap();

        let description: Vec<_> = properties.iter().filter(|p| p.name == "description").collect();
        prop_assert_eq!(description.len(), 1);
        prop_assert_eq!(&description[0].value, text.trim());
    }

    #[test]
    fn prop_numbers_are_never_quoted(n in 0u64..u64::MAX) {
        let text = decorate_api_property(&[ApiProperty::new("example", n.to_string())], false);
        prop_assert_eq!(text, format!("@ApiProperty({{\n  example: {},\n}})\n", n));
    }

    #[test]
    fn prop_words_are_quoted(text in "[a-zA-Z][a-zA-Z ]{0,20}") {
        prop_assume!(text != "true" && text != "false");
        prop_assert!(!is_code_literal(&text));
        let rendered = decorate_api_property(&[ApiProperty::new("example", text.clone())], false);
        let expected = format!("  example: {},\n", quote(&text));
        prop_assert!(rendered.contains(&expected));
    }

    #[test]
    fn prop_property_names_are_unique(
        minimum in proptest::option::of(0u32..1000),
        example in proptest::option::of(free_text()),
        type_name in prop_oneof![
            Just("Int"), Just("BigInt"), Just("Float"), Just("Decimal"),
            Just("DateTime"), Just("String"), Just("Boolean"),
        ],
    ) {
        let mut doc = String::from("Some value");
        if let Some(minimum) = minimum {
            doc.push_str(&format!("\n@minimum {}", minimum));
        }
        if let Some(example) = &example {
            doc.push_str(&format!("\n@example {}", example));
        }
        let field = Field {
            type_name: type_name.into(),
            has_default_value: true,
            default: Some(serde_json::json!(1)),
            ..string_field(doc)
        };

        let properties =
            parse_api_property(&field, IncludeOptions::default(), &DtoNaming::default()).unwrap();
        let mut names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }

    #[test]
    fn prop_enum_fields_get_one_membership_check(
        members in proptest::collection::btree_set(member_name(), 1..6),
        explicit in any::<bool>(),
        required in any::<bool>(),
    ) {
        let declaration = DatamodelEnum {
            name: "Kind".into(),
            values: members
                .iter()
                .map(|m| serde_json::from_value(serde_json::json!({ "name": m })).unwrap())
                .collect(),
            documentation: None,
        };
        let field = Field {
            name: "kind".into(),
            kind: FieldKind::Enum,
            type_name: "Kind".into(),
            is_required: required,
            documentation: explicit.then(|| "@IsIn(['OTHER'])".to_string()),
            ..Default::default()
        };

        let validators = parse_class_validators(&field, &[declaration]);
        let is_in: Vec<_> = validators.iter().filter(|v| v.name == "IsIn").collect();
        prop_assert_eq!(is_in.len(), 1);

        let listed: Vec<String> =
            serde_json::from_str(is_in[0].value.as_deref().unwrap()).unwrap();
        prop_assert_eq!(listed, members.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_mapping_spans_lines(
        members in proptest::collection::btree_set(member_name(), 1..5),
    ) {
        let entries: Vec<String> = members.iter().map(|m| format!("{}: '{}'", m, m.to_lowercase())).collect();
        let doc = format!("Mapped enum\n@DtoGenMapping ({{\n{}\n}})", entries.join(",\n"));

        let expression = extract_mapping(&doc).unwrap();
        prop_assert!(expression.starts_with("({"), "expression should start with '({{': {}", expression);
        prop_assert!(expression.ends_with("})"), "expression should end with '}})': {}", expression);
        for member in &members {
            let expected = format!("{}: '{}'", member, member.to_lowercase());
            prop_assert!(expression.contains(&expected));
        }

        let declaration = DatamodelEnum {
            name: "Mapped".into(),
            values: Vec::new(),
            documentation: Some(doc),
        };
        let file = generate_mapping_file(&declaration, Path::new("out"), "@prisma/client").unwrap();
        prop_assert!(file.content.contains("export function mapMapped(key: Mapped | string)"));
    }

    #[test]
    fn prop_composition_is_deterministic(
        text in free_text(),
        minimum in 0u32..1000,
        validator in prop_oneof![Just("@IsEmail()"), Just("@Length(1, 10)"), Just("@IsUUID('4')")],
    ) {
        let field = string_field(format!("{}\n@minimum {}\n{}", text, minimum, validator));

        let first = (
            parse_api_property(&field, IncludeOptions::default(), &DtoNaming::default()).unwrap(),
            parse_class_validators(&field, &[]),
        );
        let second = (
            parse_api_property(&field, IncludeOptions::default(), &DtoNaming::default()).unwrap(),
            parse_class_validators(&field, &[]),
        );
        prop_assert_eq!(first, second);
    }
}

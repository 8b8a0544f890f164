//! Property-based tests for prisma-nestjs-dto-cli.
//!
//! Properties tested:
//! - Config override precedence
//! - Dry run safety
//! - Every protocol request gets exactly one response with its id

use std::io::Cursor;
use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use prisma_nestjs_dto::GeneratedFile;
use prisma_nestjs_dto_cli::{
    config::{CliArgs, Config, ConfigManager},
    rpc::GeneratorServer,
    writer::{FileStatus, OutputWriter},
};

/// Generate a relative path segment.
fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

fn arb_method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("getManifest".to_string()),
        "[a-z][a-zA-Z]{0,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_cli_args_take_precedence(
        file_dir in arb_segment(),
        cli_dir in proptest::option::of(arb_segment()),
        file_no_deps in any::<bool>(),
        cli_no_deps in proptest::option::of(any::<bool>()),
        cli_validation in proptest::option::of(any::<bool>()),
    ) {
        let mut config = Config::default();
        config.output.dir = PathBuf::from(&file_dir);
        config.generator.no_dependencies = file_no_deps;

        let args = CliArgs {
            output: cli_dir.clone().map(PathBuf::from),
            no_dependencies: cli_no_deps,
            class_validation: cli_validation,
            ..Default::default()
        };
        let merged = ConfigManager::merge_cli_args(config, &args);

        prop_assert_eq!(merged.output.dir, PathBuf::from(cli_dir.unwrap_or(file_dir)));
        prop_assert_eq!(merged.generator.no_dependencies, cli_no_deps.unwrap_or(file_no_deps));
        prop_assert_eq!(merged.generator.class_validation, cli_validation.unwrap_or(true));
    }

    #[test]
    fn prop_dry_run_never_touches_disk(
        segments in proptest::collection::vec(arb_segment(), 1..4),
        content in ".{0,200}",
    ) {
        let dir = TempDir::new().unwrap();
        let mut path = dir.path().to_path_buf();
        for segment in &segments {
            path.push(segment);
        }
        path.set_extension("ts");

        let files = vec![GeneratedFile { path: path.clone(), content: content.clone() }];
        let report = OutputWriter::new(true).write_all(&files).unwrap();

        prop_assert_eq!(report.outcomes.len(), 1);
        prop_assert_eq!(report.outcomes[0].status, FileStatus::Previewed);
        prop_assert!(!path.exists());
        prop_assert!(!dir.path().join(&segments[0]).exists());
    }

    #[test]
    fn prop_one_response_per_request(
        requests in proptest::collection::vec((0u32..10_000, arb_method()), 1..8),
    ) {
        let input: String = requests
            .iter()
            .map(|(id, method)| {
                format!("{}\n", json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": {} }))
            })
            .collect();

        let mut output = Vec::new();
        let handled = GeneratorServer::default()
            .serve(Cursor::new(input), &mut output)
            .unwrap();
        prop_assert_eq!(handled, requests.len());

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        prop_assert_eq!(responses.len(), requests.len());

        for ((id, method), response) in requests.iter().zip(&responses) {
            prop_assert_eq!(&response["id"], &json!(id));
            let answered = response.get("result").is_some();
            let failed = response.get("error").is_some();
            prop_assert!(answered != failed);
            if method == "getManifest" {
                prop_assert!(answered);
            }
        }
    }
}

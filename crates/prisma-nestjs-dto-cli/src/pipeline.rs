//! Offline generation from a DMMF JSON file.
//!
//! `prisma-nestjs-dto generate --dmmf schema.json` runs the same
//! generator the protocol loop does, with options taken from the TOML
//! config instead of the schema's generator block.

use std::path::{Path, PathBuf};

use prisma_nestjs_dto::{Document, DtoGenerator, GeneratedFile, GeneratedOutput};
use tracing::debug;

use crate::config::Config;
use crate::error::{CliResult, ConfigError};
use crate::writer::is_current;

/// Read and decode a DMMF document.
///
/// Accepts either the bare document or a dump of the whole `generate`
/// request parameters, in which case the `dmmf` member is used.
pub fn load_document(path: &Path) -> CliResult<Document> {
    if !path.exists() {
        return Err(ConfigError::not_found(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut value: serde_json::Value =
        serde_json::from_str(&content).map_err(prisma_nestjs_dto::GenerateError::from)?;
    if let Some(dmmf) = value.get_mut("dmmf").map(serde_json::Value::take) {
        debug!(path = %path.display(), "Using embedded dmmf member");
        value = dmmf;
    }

    Ok(Document::from_value(value)?)
}

/// Run the generator with file-based configuration.
pub fn generate(config: &Config, document: &Document) -> CliResult<GeneratedOutput> {
    let generator = DtoGenerator::new(config.generator.clone());
    Ok(generator.generate(document, &config.output.dir)?)
}

/// Return the paths whose on-disk content differs from the generated one.
pub fn stale_files(files: &[GeneratedFile]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|file| !is_current(file))
        .map(|file| file.path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_dmmf(dir: &Path, value: serde_json::Value) -> PathBuf {
        let path = dir.join("dmmf.json");
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn document_json() -> serde_json::Value {
        json!({
            "datamodel": {
                "enums": [{ "name": "Role", "values": [{ "name": "USER" }],
                            "documentation": "@DtoGenMapping ({ USER: 'u' })" }],
                "models": []
            }
        })
    }

    #[test]
    fn test_load_bare_document() {
        let dir = TempDir::new().unwrap();
        let path = write_dmmf(dir.path(), document_json());

        let document = load_document(&path).unwrap();
        assert_eq!(document.datamodel.enums.len(), 1);
    }

    #[test]
    fn test_load_embedded_document() {
        let dir = TempDir::new().unwrap();
        let path = write_dmmf(dir.path(), json!({ "generator": {}, "dmmf": document_json() }));

        let document = load_document(&path).unwrap();
        assert_eq!(document.datamodel.enums[0].name, "Role");
    }

    #[test]
    fn test_load_missing_document() {
        let dir = TempDir::new().unwrap();
        assert!(load_document(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_stale_files() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.dir = dir.path().to_path_buf();

        let document: Document = serde_json::from_value(document_json()).unwrap();
        let output = generate(&config, &document).unwrap();
        assert_eq!(stale_files(&output.files).len(), output.files.len());

        for file in &output.files {
            std::fs::create_dir_all(file.path.parent().unwrap()).unwrap();
            std::fs::write(&file.path, &file.content).unwrap();
        }
        assert!(stale_files(&output.files).is_empty());

        std::fs::write(&output.files[0].path, "changed").unwrap();
        assert_eq!(stale_files(&output.files), vec![output.files[0].path.clone()]);
    }
}

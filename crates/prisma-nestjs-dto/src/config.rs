//! Generator configuration.
//!
//! Options come from the `generator` block of the Prisma schema, where
//! every value arrives as a string, or from a TOML file for offline
//! runs. Boolean flags therefore accept both `true` and `"true"`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DtoResult, GenerateError};

/// Options controlling decorator generation and output layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Emit `class-validator` decorators for create/update DTOs.
    #[serde(deserialize_with = "flag")]
    pub class_validation: bool,

    /// Skip `@nestjs/swagger` output and map `Json`/`Decimal` to plain types.
    #[serde(deserialize_with = "flag")]
    pub no_dependencies: bool,

    /// Emit `@ApiProperty()` even for properties with no metadata.
    #[serde(deserialize_with = "flag")]
    pub annotate_all_dto_properties: bool,

    pub create_dto_prefix: String,
    pub update_dto_prefix: String,
    pub connect_dto_prefix: String,
    pub dto_suffix: String,
    pub entity_prefix: String,
    pub entity_suffix: String,

    /// Prepended to the module name when importing a related DTO class.
    pub dto_import_prefix: String,

    /// Module the generated enum mapping files import enums from.
    pub prisma_client_import_path: String,

    /// Subdirectory of the output directory for enum mapping files.
    pub enum_mapping_dir: String,

    /// Write the per-model decorator manifest.
    #[serde(deserialize_with = "flag")]
    pub emit_decorator_manifest: bool,

    pub manifest_file_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            class_validation: true,
            no_dependencies: false,
            annotate_all_dto_properties: false,
            create_dto_prefix: "Create".to_string(),
            update_dto_prefix: "Update".to_string(),
            connect_dto_prefix: "Connect".to_string(),
            dto_suffix: "Dto".to_string(),
            entity_prefix: String::new(),
            entity_suffix: String::new(),
            dto_import_prefix: "./".to_string(),
            prisma_client_import_path: "@prisma/client".to_string(),
            enum_mapping_dir: "mappings".to_string(),
            emit_decorator_manifest: true,
            manifest_file_name: "dto-decorators.json".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Read the config map of a Prisma `generator` block.
    ///
    /// Unknown keys (such as `provider` or `output`) are ignored.
    pub fn from_generator_config(value: &Value) -> DtoResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| GenerateError::config("generator.config", e.to_string()))
    }
}

/// Accept a boolean or its string spelling.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got \"{}\"",
                other
            ))),
        },
    }
}

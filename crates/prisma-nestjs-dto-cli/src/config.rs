//! Configuration management for the CLI.
//!
//! Offline runs read `prisma-nestjs-dto.toml`; values given on the
//! command line take precedence. When running under Prisma the options
//! come from the schema's `generator` block instead and this file is not
//! consulted.

use std::path::{Path, PathBuf};

use prisma_nestjs_dto::GeneratorConfig;
use serde::Deserialize;

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "prisma-nestjs-dto.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Decorator generation options, same keys as the `generator` block.
    pub generator: GeneratorConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path the default file in the working directory is tried.
    /// A missing default file yields the default configuration; a missing
    /// explicitly named file is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            if path.is_some() {
                return Err(ConfigError::not_found(config_path).into());
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject values that would produce unusable output paths.
    pub fn validate(config: &Config) -> CliResult<()> {
        if config.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value("output.dir", "must not be empty").into());
        }
        if config.generator.emit_decorator_manifest
            && config.generator.manifest_file_name.trim().is_empty()
        {
            return Err(ConfigError::invalid_value(
                "generator.manifestFileName",
                "must not be empty when the manifest is emitted",
            )
            .into());
        }
        Ok(())
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(class_validation) = args.class_validation {
            config.generator.class_validation = class_validation;
        }

        if let Some(no_dependencies) = args.no_dependencies {
            config.generator.no_dependencies = no_dependencies;
        }

        if let Some(annotate_all) = args.annotate_all_dto_properties {
            config.generator.annotate_all_dto_properties = annotate_all;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# prisma-nestjs-dto configuration file
# Used by `prisma-nestjs-dto generate --dmmf <file>`. When run by Prisma,
# the same [generator] keys are read from the schema's generator block.

[output]
# Output directory for enum mappings and the decorator manifest
dir = "./generated"

[generator]
# Emit class-validator decorators on create/update DTOs
classValidation = true

# Skip @nestjs/swagger decorators and map Json/Decimal to plain types
noDependencies = false

# Emit a bare @ApiProperty() on properties without metadata
annotateAllDtoProperties = false

# DTO class name affixes
createDtoPrefix = "Create"
updateDtoPrefix = "Update"
connectDtoPrefix = "Connect"
dtoSuffix = "Dto"
entityPrefix = ""
entitySuffix = ""

# Prefix of related DTO imports, e.g. "./" gives './create-user.dto'
dtoImportPrefix = "./"

# Module the enum mapping files import enum types from
prismaClientImportPath = "@prisma/client"

# Subdirectory for enum mapping files
enumMappingDir = "mappings"

# Write a JSON manifest of every planned DTO field and its decorators
emitDecoratorManifest = true
manifestFileName = "dto-decorators.json"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Class validation override.
    pub class_validation: Option<bool>,

    /// No dependencies override.
    pub no_dependencies: Option<bool>,

    /// Annotate all properties override.
    pub annotate_all_dto_properties: Option<bool>,
}

//! Generator entry point.
//!
//! Runs DTO planning for every model and enum mapping for every enum of
//! a DMMF document, returning the files the host should write.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::dmmf::Document;
use crate::dto::{DtoPlanner, ModelPlan};
use crate::enum_mapping::gen_enum_mappings;
use crate::error::{DtoResult, GenerateError};

/// A file to be written verbatim by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Everything produced by one generator run.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub files: Vec<GeneratedFile>,
    pub plans: Vec<ModelPlan>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generator: &'static str,
    version: &'static str,
    models: &'a [ModelPlan],
}

/// Decorator generator configured for one run.
#[derive(Debug, Clone, Default)]
pub struct DtoGenerator {
    config: GeneratorConfig,
}

impl DtoGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Plan every model of the document.
    pub fn plan(&self, document: &Document) -> DtoResult<Vec<ModelPlan>> {
        let planner = DtoPlanner::new(document, &self.config);
        document
            .datamodel
            .models
            .iter()
            .map(|model| planner.plan_model(model))
            .collect()
    }

    /// Generate all output files below `output_dir`.
    pub fn generate(&self, document: &Document, output_dir: &Path) -> DtoResult<GeneratedOutput> {
        let plans = self.plan(document)?;

        let mut files = gen_enum_mappings(
            &document.datamodel.enums,
            &output_dir.join(&self.config.enum_mapping_dir),
            &self.config.prisma_client_import_path,
        );
        debug!(count = files.len(), "Generated enum mappings");

        if self.config.emit_decorator_manifest {
            files.push(GeneratedFile {
                path: output_dir.join(&self.config.manifest_file_name),
                content: self.manifest(&plans)?,
            });
        }

        info!(
            models = plans.len(),
            enums = document.datamodel.enums.len(),
            files = files.len(),
            "Generation complete"
        );

        Ok(GeneratedOutput { files, plans })
    }

    /// Serialize plans as the decorator manifest.
    pub fn manifest(&self, plans: &[ModelPlan]) -> DtoResult<String> {
        let manifest = Manifest {
            generator: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            models: plans,
        };
        let mut content = serde_json::to_string_pretty(&manifest)
            .map_err(|e| GenerateError::Manifest(e.to_string()))?;
        content.push('\n');
        Ok(content)
    }
}

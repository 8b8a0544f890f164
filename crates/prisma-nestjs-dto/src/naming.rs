//! DTO class and module naming.

use convert_case::{Case, Casing};

use crate::config::GeneratorConfig;
use crate::dto::DtoVariant;

/// Builds DTO class names from model names and configured affixes.
#[derive(Debug, Clone)]
pub struct DtoNaming {
    create_prefix: String,
    update_prefix: String,
    connect_prefix: String,
    dto_suffix: String,
    entity_prefix: String,
    entity_suffix: String,
    import_prefix: String,
}

impl DtoNaming {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            create_prefix: config.create_dto_prefix.clone(),
            update_prefix: config.update_dto_prefix.clone(),
            connect_prefix: config.connect_dto_prefix.clone(),
            dto_suffix: config.dto_suffix.clone(),
            entity_prefix: config.entity_prefix.clone(),
            entity_suffix: config.entity_suffix.clone(),
            import_prefix: config.dto_import_prefix.clone(),
        }
    }

    /// e.g. `User` -> `CreateUserDto`
    pub fn create_dto_name(&self, model: &str) -> String {
        class_name(model, &self.create_prefix, &self.dto_suffix)
    }

    /// e.g. `User` -> `UpdateUserDto`
    pub fn update_dto_name(&self, model: &str) -> String {
        class_name(model, &self.update_prefix, &self.dto_suffix)
    }

    /// e.g. `User` -> `ConnectUserDto`
    pub fn connect_dto_name(&self, model: &str) -> String {
        class_name(model, &self.connect_prefix, &self.dto_suffix)
    }

    /// e.g. `User` -> `User`
    pub fn plain_dto_name(&self, model: &str) -> String {
        class_name(model, &self.entity_prefix, &self.entity_suffix)
    }

    /// Class name of a variant.
    pub fn dto_name(&self, variant: DtoVariant, model: &str) -> String {
        match variant {
            DtoVariant::Create => self.create_dto_name(model),
            DtoVariant::Update => self.update_dto_name(model),
            DtoVariant::Plain => self.plain_dto_name(model),
            DtoVariant::Connect => self.connect_dto_name(model),
        }
    }

    /// File stem of the module declaring a variant's class.
    ///
    /// e.g. `User` -> `create-user.dto` or `user.entity`
    pub fn module_name(&self, variant: DtoVariant, model: &str) -> String {
        let (prefix, kind) = match variant {
            DtoVariant::Create => (&self.create_prefix, "dto"),
            DtoVariant::Update => (&self.update_prefix, "dto"),
            DtoVariant::Connect => (&self.connect_prefix, "dto"),
            DtoVariant::Plain => (&self.entity_prefix, "entity"),
        };
        let stem = format!("{}{}", prefix, to_pascal_case(model));
        format!("{}.{}", stem.to_case(Case::Kebab), kind)
    }

    /// Import path of the module declaring a variant's class.
    pub fn module_path(&self, variant: DtoVariant, model: &str) -> String {
        format!("{}{}", self.import_prefix, self.module_name(variant, model))
    }
}

impl Default for DtoNaming {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

fn class_name(model: &str, prefix: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, to_pascal_case(model), suffix)
}

/// Convert a model name to PascalCase.
///
/// Word boundaries are `_`, `-`, spaces and case changes, so acronyms
/// collapse (`APIKey` -> `ApiKey`).
pub fn to_pascal_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

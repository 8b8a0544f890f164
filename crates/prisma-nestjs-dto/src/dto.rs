//! Per-model DTO planning.
//!
//! For every model four DTO variants are planned: create, update, plain
//! and connect. A plan lists the fields that belong to the variant, each
//! with its composed metadata and rendered decorator text, plus the
//! import statements those decorators need. Class bodies themselves are
//! left to the host's templates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::annotations::{
    is_annotated_with, is_annotated_with_one_of, DTO_CREATE_OPTIONAL, DTO_ENTITY_HIDDEN,
    DTO_READ_ONLY, DTO_RELATION_MODIFIERS_ON_CREATE, DTO_RELATION_MODIFIERS_ON_UPDATE,
    DTO_RELATION_REQUIRED, DTO_UPDATE_OPTIONAL,
};
use crate::api_property::{one_of_models, parse_api_property, ApiProperty, IncludeOptions};
use crate::class_validator::{parse_class_validators, ClassValidator};
use crate::config::GeneratorConfig;
use crate::dmmf::{Document, Field, FieldKind, FieldOverrides, Model};
use crate::error::DtoResult;
use crate::naming::DtoNaming;
use crate::render::{decorate_api_property, decorate_class_validators};

/// The DTO flavours generated per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtoVariant {
    Create,
    Update,
    Plain,
    Connect,
}

/// A field as it appears in one DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedField {
    pub name: String,
    pub type_name: String,
    pub kind: FieldKind,
    pub is_required: bool,
    pub is_list: bool,
    pub is_nullable: bool,
    pub api_properties: Vec<ApiProperty>,
    pub class_validators: Vec<ClassValidator>,
    /// Rendered decorator block, validators first.
    pub decorators: String,
    /// DTO classes from other modules the field refers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_dtos: Vec<RelatedDto>,
}

/// A DTO class declared in its own module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDto {
    pub class_name: String,
    pub module: String,
}

/// `import { a, b } from 'module';`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    pub from: String,
    pub destruct: Vec<String>,
}

impl ImportStatement {
    pub fn new(from: impl Into<String>, destruct: Vec<String>) -> Self {
        Self {
            from: from.into(),
            destruct,
        }
    }

    /// Render as a TypeScript import line.
    pub fn render(&self) -> String {
        format!("import {{ {} }} from '{}';", self.destruct.join(", "), self.from)
    }
}

/// Merge statements importing from the same module, keeping first-seen
/// module order with sorted, unique names.
pub fn zip_import_statements(imports: Vec<ImportStatement>) -> Vec<ImportStatement> {
    let mut zipped: Vec<(String, BTreeSet<String>)> = Vec::new();

    for statement in imports {
        match zipped.iter_mut().find(|(from, _)| *from == statement.from) {
            Some((_, names)) => names.extend(statement.destruct),
            None => zipped.push((statement.from, statement.destruct.into_iter().collect())),
        }
    }

    zipped
        .into_iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(from, names)| ImportStatement::new(from, names.into_iter().collect()))
        .collect()
}

/// One DTO class: its name, fields and imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoPlan {
    pub variant: DtoVariant,
    pub class_name: String,
    pub fields: Vec<PlannedField>,
    pub imports: Vec<ImportStatement>,
    /// Classes to register with `@ApiExtraModels()`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_extra_models: Vec<String>,
}

/// All DTO plans of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlan {
    pub model: String,
    pub create: DtoPlan,
    pub update: DtoPlan,
    pub plain: DtoPlan,
    pub connect: DtoPlan,
}

// =============================================================================
// Field classifiers
// =============================================================================

pub fn is_relation(field: &Field) -> bool {
    field.kind == FieldKind::Object
}

pub fn is_read_only(field: &Field) -> bool {
    field.is_read_only || is_annotated_with(field, DTO_READ_ONLY)
}

pub fn is_id_with_default_value(field: &Field) -> bool {
    field.is_id && field.has_default_value
}

pub fn is_required_with_default_value(field: &Field) -> bool {
    field.is_required && field.has_default_value
}

/// Names of scalar fields backing a relation (foreign keys).
pub fn relation_scalar_names(model: &Model) -> BTreeSet<&str> {
    model
        .fields
        .iter()
        .flat_map(|f| f.relation_from_fields.iter().map(String::as_str))
        .collect()
}

// =============================================================================
// Planner
// =============================================================================

struct FieldOptions {
    include: IncludeOptions,
    validate: bool,
}

/// Plans DTO variants for the models of one document.
pub struct DtoPlanner<'a> {
    document: &'a Document,
    config: &'a GeneratorConfig,
    naming: DtoNaming,
}

impl<'a> DtoPlanner<'a> {
    pub fn new(document: &'a Document, config: &'a GeneratorConfig) -> Self {
        Self {
            document,
            config,
            naming: DtoNaming::new(config),
        }
    }

    /// Plan all four variants of a model.
    pub fn plan_model(&self, model: &Model) -> DtoResult<ModelPlan> {
        let plan = ModelPlan {
            model: model.name.clone(),
            create: self.plan_create(model)?,
            update: self.plan_update(model)?,
            plain: self.plan_plain(model)?,
            connect: self.plan_connect(model)?,
        };
        debug!(
            model = %model.name,
            create = plan.create.fields.len(),
            update = plan.update.fields.len(),
            plain = plan.plain.fields.len(),
            connect = plan.connect.fields.len(),
            "Planned model DTOs"
        );
        Ok(plan)
    }

    pub fn plan_create(&self, model: &Model) -> DtoResult<DtoPlan> {
        let relation_scalars = relation_scalar_names(model);
        let options = FieldOptions {
            include: IncludeOptions::default(),
            validate: true,
        };
        let mut fields = Vec::new();

        for field in &model.fields {
            let mut overrides = FieldOverrides::default();
            let mut related = None;

            if is_read_only(field) {
                continue;
            }
            if is_relation(field) {
                if !is_annotated_with_one_of(field, DTO_RELATION_MODIFIERS_ON_CREATE) {
                    continue;
                }
                self.check_related_model(model, field);
                overrides.type_name = Some(self.naming.create_dto_name(&field.type_name));
                related = Some(self.related_dto(DtoVariant::Create, &field.type_name));
                if is_annotated_with(field, DTO_RELATION_REQUIRED) {
                    overrides.is_required = Some(true);
                }
                // list relations can not be required
                if field.is_list {
                    overrides.is_required = Some(false);
                }
            }
            if relation_scalars.contains(field.name.as_str()) {
                continue;
            }

            let is_dto_optional = is_annotated_with(field, DTO_CREATE_OPTIONAL);
            if is_dto_optional {
                overrides.is_required = Some(false);
            } else if is_id_with_default_value(field)
                || field.is_updated_at
                || is_required_with_default_value(field)
            {
                trace!(model = %model.name, field = %field.name, "Skipping generated field on create");
                continue;
            }

            fields.push(self.plan_field(field, &overrides, &options, related)?);
        }

        Ok(self.finish(DtoVariant::Create, self.naming.create_dto_name(&model.name), fields))
    }

    pub fn plan_update(&self, model: &Model) -> DtoResult<DtoPlan> {
        let relation_scalars = relation_scalar_names(model);
        let options = FieldOptions {
            include: IncludeOptions::default(),
            validate: true,
        };
        let mut fields = Vec::new();

        for field in &model.fields {
            let mut overrides = FieldOverrides {
                is_required: Some(false),
                ..Default::default()
            };
            let mut related = None;

            if is_read_only(field) {
                continue;
            }
            if is_relation(field) {
                if !is_annotated_with_one_of(field, DTO_RELATION_MODIFIERS_ON_UPDATE) {
                    continue;
                }
                self.check_related_model(model, field);
                overrides.type_name = Some(self.naming.update_dto_name(&field.type_name));
                related = Some(self.related_dto(DtoVariant::Update, &field.type_name));
            }
            if relation_scalars.contains(field.name.as_str()) {
                continue;
            }

            if !is_annotated_with(field, DTO_UPDATE_OPTIONAL)
                && (field.is_id || field.is_updated_at || is_required_with_default_value(field))
            {
                continue;
            }

            fields.push(self.plan_field(field, &overrides, &options, related)?);
        }

        Ok(self.finish(DtoVariant::Update, self.naming.update_dto_name(&model.name), fields))
    }

    pub fn plan_plain(&self, model: &Model) -> DtoResult<DtoPlan> {
        let relation_scalars = relation_scalar_names(model);
        let options = FieldOptions {
            include: IncludeOptions::without_default(),
            validate: false,
        };
        let mut fields = Vec::new();

        for field in &model.fields {
            if is_annotated_with(field, DTO_ENTITY_HIDDEN)
                || is_relation(field)
                || relation_scalars.contains(field.name.as_str())
            {
                continue;
            }

            let overrides = FieldOverrides {
                is_required: Some(true),
                is_nullable: Some(!field.is_required),
                ..Default::default()
            };
            fields.push(self.plan_field(field, &overrides, &options, None)?);
        }

        Ok(self.finish(DtoVariant::Plain, self.naming.plain_dto_name(&model.name), fields))
    }

    pub fn plan_connect(&self, model: &Model) -> DtoResult<DtoPlan> {
        let options = FieldOptions {
            include: IncludeOptions::without_default(),
            validate: false,
        };
        let unique: Vec<&Field> = model
            .fields
            .iter()
            .filter(|f| f.is_id || f.is_unique)
            .collect();
        let overrides = FieldOverrides {
            is_required: Some(unique.len() == 1),
            ..Default::default()
        };

        let fields = unique
            .into_iter()
            .map(|field| self.plan_field(field, &overrides, &options, None))
            .collect::<DtoResult<Vec<_>>>()?;

        Ok(self.finish(DtoVariant::Connect, self.naming.connect_dto_name(&model.name), fields))
    }

    fn plan_field(
        &self,
        field: &Field,
        overrides: &FieldOverrides,
        options: &FieldOptions,
        related: Option<RelatedDto>,
    ) -> DtoResult<PlannedField> {
        let adjusted = field.with_overrides(overrides);

        let class_validators = if options.validate && self.config.class_validation {
            parse_class_validators(&adjusted, &self.document.datamodel.enums)
        } else {
            Vec::new()
        };

        let api_properties = if self.config.no_dependencies {
            Vec::new()
        } else {
            parse_api_property(field, options.include, &self.naming)?
        };

        let mut decorators = decorate_class_validators(&class_validators);
        if !self.config.no_dependencies {
            decorators.push_str(&decorate_api_property(
                &api_properties,
                self.config.annotate_all_dto_properties,
            ));
        }

        let type_name = if self.config.no_dependencies {
            match adjusted.type_name.as_str() {
                "Json" => "Object".to_string(),
                "Decimal" => "Float".to_string(),
                _ => adjusted.type_name.clone(),
            }
        } else {
            adjusted.type_name.clone()
        };

        let mut related_dtos: Vec<RelatedDto> = related.into_iter().collect();
        if api_properties.iter().any(|p| p.name == "oneOf") {
            for model in one_of_models(field)? {
                related_dtos.push(self.related_dto(DtoVariant::Create, &model));
            }
        }

        Ok(PlannedField {
            name: field.name.clone(),
            type_name,
            kind: field.kind,
            is_required: adjusted.is_required,
            is_list: adjusted.is_list,
            is_nullable: overrides.is_nullable.unwrap_or(false),
            api_properties,
            class_validators,
            decorators,
            related_dtos,
        })
    }

    fn related_dto(&self, variant: DtoVariant, model: &str) -> RelatedDto {
        RelatedDto {
            class_name: self.naming.dto_name(variant, model),
            module: self.naming.module_path(variant, model),
        }
    }

    fn check_related_model(&self, model: &Model, field: &Field) {
        if self.document.find_model(&field.type_name).is_none() {
            warn!(
                model = %model.name,
                field = %field.name,
                related = %field.type_name,
                "Relation target not found in document"
            );
        }
    }

    fn finish(&self, variant: DtoVariant, class_name: String, fields: Vec<PlannedField>) -> DtoPlan {
        let related = related_classes(&fields, &class_name);
        let api_extra_models = if self.config.no_dependencies {
            Vec::new()
        } else {
            related.iter().map(|r| r.class_name.clone()).collect()
        };
        let imports = self.collect_imports(&fields, &related, !api_extra_models.is_empty());
        DtoPlan {
            variant,
            class_name,
            fields,
            imports,
            api_extra_models,
        }
    }

    fn collect_imports(
        &self,
        fields: &[PlannedField],
        related: &[&RelatedDto],
        extra_models: bool,
    ) -> Vec<ImportStatement> {
        let mut imports = Vec::new();

        let enum_types: Vec<String> = fields
            .iter()
            .filter(|f| f.kind == FieldKind::Enum)
            .map(|f| f.type_name.clone())
            .collect();
        if !enum_types.is_empty() {
            imports.push(ImportStatement::new(
                self.config.prisma_client_import_path.clone(),
                enum_types,
            ));
        }

        if !self.config.no_dependencies && !fields.is_empty() {
            let mut swagger = Vec::new();
            if self.config.annotate_all_dto_properties
                || fields.iter().any(|f| !f.api_properties.is_empty())
            {
                swagger.push("ApiProperty".to_string());
            }
            if fields
                .iter()
                .flat_map(|f| &f.api_properties)
                .any(|p| p.name == "oneOf")
            {
                swagger.push("getSchemaPath".to_string());
            }
            if extra_models {
                swagger.push("ApiExtraModels".to_string());
            }
            imports.push(ImportStatement::new("@nestjs/swagger", swagger));
        }

        let validators: Vec<&ClassValidator> =
            fields.iter().flat_map(|f| &f.class_validators).collect();
        imports.push(ImportStatement::new(
            "class-validator",
            validators
                .iter()
                .filter(|v| v.name != "Type")
                .map(|v| v.name.clone())
                .collect(),
        ));
        if validators
            .iter()
            .any(|v| v.name == "Type" || v.transform_to.is_some())
        {
            imports.push(ImportStatement::new(
                "class-transformer",
                vec!["Type".to_string()],
            ));
        }

        for dto in related {
            imports.push(ImportStatement::new(
                dto.module.clone(),
                vec![dto.class_name.clone()],
            ));
        }

        zip_import_statements(imports)
    }
}

/// Unique related classes of a DTO in first-seen order, excluding the
/// DTO's own class.
fn related_classes<'f>(fields: &'f [PlannedField], own_class: &str) -> Vec<&'f RelatedDto> {
    let mut seen = BTreeSet::new();
    fields
        .iter()
        .flat_map(|f| &f.related_dtos)
        .filter(|r| r.class_name != own_class && seen.insert(r.class_name.as_str()))
        .collect()
}

//! # prisma-nestjs-dto
//!
//! Decorator generation for NestJS DTOs derived from a Prisma schema.
//!
//! Schema authors annotate fields and enums with directive lines in
//! their `///` documentation comments. This crate recovers those
//! directives, merges them with type-driven defaults, and renders
//! `@ApiProperty()` and `class-validator` decorator text for each DTO
//! field, plus small enum lookup modules for `@DtoGenMapping` enums.
//!
//! ## Architecture
//!
//! - [`annotations`] - directive extraction from documentation text
//! - [`api_property`] - OpenAPI metadata composition
//! - [`class_validator`] - validation descriptor composition
//! - [`render`] - decorator text rendering and value quoting
//! - [`enum_mapping`] - enum lookup module generation
//! - [`dto`] - per-model DTO field planning and imports
//! - [`generator`] - the entry point tying it together
//! - [`dmmf`] - input document model
//! - [`config`] - generator options
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust
//! use prisma_nestjs_dto::{parse_api_property, decorate_api_property, DtoNaming, Field, IncludeOptions};
//!
//! let field = Field {
//!     name: "age".into(),
//!     type_name: "Int".into(),
//!     documentation: Some("Age in years\n@minimum 0".into()),
//!     ..Default::default()
//! };
//!
//! let properties = parse_api_property(&field, IncludeOptions::default(), &DtoNaming::default()).unwrap();
//! let text = decorate_api_property(&properties, false);
//! assert!(text.contains("minimum: 0,"));
//! assert!(text.contains("description: `Age in years`,"));
//! ```

pub mod annotations;
pub mod api_property;
pub mod class_validator;
pub mod config;
pub mod dmmf;
pub mod dto;
pub mod enum_mapping;
pub mod error;
pub mod generator;
pub mod naming;
pub mod render;

// Re-export main types for convenience
pub use annotations::extract;
pub use api_property::{parse_api_property, ApiProperty, IncludeOptions, PropertyKind};
pub use class_validator::{parse_class_validators, ClassValidator};
pub use config::GeneratorConfig;
pub use dmmf::{DatamodelEnum, Document, Field, FieldKind, Model};
pub use dto::{DtoPlan, DtoPlanner, DtoVariant, ModelPlan, PlannedField, RelatedDto};
pub use enum_mapping::generate_mapping_file;
pub use error::{DtoResult, GenerateError};
pub use generator::{DtoGenerator, GeneratedFile, GeneratedOutput};
pub use naming::DtoNaming;
pub use render::{decorate_api_property, decorate_class_validators};

//! # prisma-nestjs-dto-cli
//!
//! Host side of the `prisma-nestjs-dto` generator: the Prisma generator
//! protocol, offline runs from a DMMF dump, configuration and file output.
//!
//! ## Architecture
//!
//! - [`rpc`] - JSON-RPC loop spoken with `prisma generate`
//! - [`pipeline`] - offline generation from a DMMF JSON file
//! - [`config`] - configuration management and TOML parsing
//! - [`writer`] - change-aware file output and dry-run support
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - error types and handling

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod rpc;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use rpc::GeneratorServer;
pub use writer::{OutputWriter, WriteReport};

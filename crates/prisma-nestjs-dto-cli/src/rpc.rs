//! Prisma generator protocol.
//!
//! Prisma starts the generator binary and talks JSON-RPC 2.0 with it:
//! one request object per line on the generator's stdin, one response
//! object per line on its stderr. Two methods exist:
//!
//! - `getManifest` asks for display name and default output location;
//! - `generate` hands over the output directory, the `generator` block
//!   options and the DMMF document, and expects `null` once files are
//!   written.
//!
//! The loop ends when stdin is closed.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use prisma_nestjs_dto::{Document, DtoGenerator, GeneratorConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult, ProtocolError};
use crate::writer::{OutputWriter, WriteReport};

/// Name shown by `prisma generate`.
pub const PRETTY_NAME: &str = "NestJS DTO Decorators";

/// Output location used when the generator block has no `output`.
pub const DEFAULT_OUTPUT: &str = "../src/generated/nestjs-dto";

/// Error code for failures while handling a known method.
pub const SERVER_ERROR: i64 = -32000;
/// Error code for unknown methods.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Error code for lines that are not JSON-RPC requests.
pub const PARSE_ERROR: i64 = -32700;

/// An incoming JSON-RPC request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// An outgoing JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Either the method result or an error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            outcome: Outcome::Error(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Error response for a failed method call, carrying the cause chain.
    pub fn failure(id: Value, error: &CliError) -> Self {
        let mut chain = vec![error.to_string()];
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = std::error::Error::source(cause);
        }

        Self {
            jsonrpc: "2.0",
            id,
            outcome: Outcome::Error(RpcError {
                code: SERVER_ERROR,
                message: error.to_string(),
                data: Some(json!({ "stack": chain.join("\n  caused by: ") })),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateParams {
    generator: GeneratorBlock,
    #[serde(default)]
    dmmf: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeneratorBlock {
    #[serde(default)]
    output: Option<EnvValue>,
    #[serde(default)]
    config: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvValue {
    #[serde(default)]
    value: Option<String>,
}

/// Answers generator protocol requests.
#[derive(Debug)]
pub struct GeneratorServer {
    writer: OutputWriter,
}

impl Default for GeneratorServer {
    fn default() -> Self {
        Self::new(OutputWriter::new(false))
    }
}

impl GeneratorServer {
    pub fn new(writer: OutputWriter) -> Self {
        Self { writer }
    }

    /// Serve requests from `input` until EOF, writing responses to
    /// `output`. Returns the number of requests answered.
    pub fn serve<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> CliResult<usize> {
        let mut handled = 0;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line);
            serde_json::to_writer(&mut *output, &response).map_err(ProtocolError::Encode)?;
            output.write_all(b"\n")?;
            output.flush()?;
            handled += 1;
        }

        info!(requests = handled, "Generator input closed");
        Ok(handled)
    }

    /// Decode one request line and answer it.
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!(error = %e, "Unreadable request");
                let error = ProtocolError::invalid_request(e.to_string());
                Response::error(Value::Null, PARSE_ERROR, error.to_string())
            }
        }
    }

    /// Answer a decoded request.
    pub fn handle(&self, request: &Request) -> Response {
        debug!(method = %request.method, id = %request.id, "Handling request");

        match request.method.as_str() {
            "getManifest" => Response::result(request.id.clone(), manifest()),
            "generate" => match self.generate(&request.params) {
                Ok(report) => {
                    info!(
                        written = report.written(),
                        unchanged = report.unchanged(),
                        "Generated decorator outputs"
                    );
                    Response::result(request.id.clone(), Value::Null)
                }
                Err(e) => {
                    warn!(error = %e, "Generation failed");
                    Response::failure(request.id.clone(), &e)
                }
            },
            other => Response::error(
                request.id.clone(),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    fn generate(&self, params: &Value) -> CliResult<WriteReport> {
        let params: GenerateParams = serde_json::from_value(params.clone())
            .map_err(|e| ProtocolError::invalid_request(e.to_string()))?;

        let output_dir = params
            .generator
            .output
            .and_then(|output| output.value)
            .map(PathBuf::from)
            .ok_or_else(|| ProtocolError::missing_param("generator.output.value"))?;
        let dmmf = params
            .dmmf
            .ok_or_else(|| ProtocolError::missing_param("dmmf"))?;

        let config = GeneratorConfig::from_generator_config(&params.generator.config)?;
        let document = Document::from_value(dmmf)?;

        let output = DtoGenerator::new(config).generate(&document, &output_dir)?;
        self.writer.write_all(&output.files)
    }
}

/// The `getManifest` result.
pub fn manifest() -> Value {
    json!({
        "manifest": {
            "prettyName": PRETTY_NAME,
            "defaultOutput": DEFAULT_OUTPUT,
            "requiresGenerators": [],
        }
    })
}

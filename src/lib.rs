//! protoc-gen-go-dep library
//!
//! This crate provides the code generation logic for turning Protocol Buffer
//! messages marked with `option (dep.profile) = "htmx";` into Go methods for
//! tenant-scoped persistence, HTTP listing and form binding.

#![deny(missing_docs)]
#![deny(warnings)]

pub mod codegen;
pub mod generator;
pub mod naming;
pub mod options;
pub mod params;
pub mod request;
pub mod schema;

#[cfg(test)]
mod testing;

use prost_types::compiler::CodeGeneratorResponse;
use thiserror::Error;

pub use params::GenerationConfig;
pub use request::DecodedRequest;

/// Errors that can occur while reading a plugin request
///
/// Emission itself cannot fail; every error here aborts the run before any
/// output is written.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The request envelope is not a valid `CodeGeneratorRequest`
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The file descriptors in the request do not form a valid set
    #[error("Invalid descriptors: {0}")]
    DescriptorError(String),

    /// A file named in `file_to_generate` has no descriptor
    #[error("File descriptor not found: {0}")]
    MissingFile(String),
}

/// Generate the response for an already decoded request
pub fn generate(request: &DecodedRequest, config: &GenerationConfig) -> CodeGeneratorResponse {
    generator::generate(request, config)
}

/// Generate the response from raw `CodeGeneratorRequest` bytes
///
/// This entry point preserves extension options by decoding the file
/// descriptors with prost-reflect.
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    generator::generate_from_bytes(bytes)
}

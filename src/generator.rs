//! Code generation orchestration
//!
//! Decode the request, parse the parameter, filter and emit per file, and
//! collect the rendered units into a `CodeGeneratorResponse`.

use crate::codegen::{self, go, GeneratedUnit};
use crate::options::{try_get_profile_marker, PROFILE_MARKER};
use crate::params::GenerationConfig;
use crate::request::{self, DecodedRequest};
use crate::schema::SchemaFile;
use crate::GeneratorError;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;

/// Build the output units for every file of a decoded request
pub fn emit(request: &DecodedRequest, config: &GenerationConfig) -> Vec<GeneratedUnit> {
    request
        .files
        .iter()
        .filter_map(|file| {
            if !config.quiet {
                warn_on_foreign_profiles(file);
            }
            codegen::emit_file(file, config)
        })
        .collect()
}

/// Generate the response for a decoded request
pub fn generate(request: &DecodedRequest, config: &GenerationConfig) -> CodeGeneratorResponse {
    if !config.quiet {
        for warning in &config.warnings {
            tracing::warn!("{}", warning);
        }
    }

    let files = emit(request, config)
        .iter()
        .map(|unit| {
            tracing::debug!(
                file = %unit.name,
                source = %unit.source,
                fragments = unit.fragments.len(),
                "generated"
            );
            File {
                name: Some(unit.name.clone()),
                content: Some(go::render(unit, request.compiler_version.as_deref())),
                ..Default::default()
            }
        })
        .collect();

    CodeGeneratorResponse {
        file: files,
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

/// Generate the response from raw request bytes
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, GeneratorError> {
    let request = request::decode(bytes)?;
    let config = GenerationConfig::from_parameter(&request.parameter);
    Ok(generate(&request, &config))
}

fn warn_on_foreign_profiles(file: &SchemaFile) {
    for message in &file.messages {
        if let Some(profile) = try_get_profile_marker(message) {
            if profile != PROFILE_MARKER {
                tracing::warn!(
                    file = %file.name,
                    message = %message.name,
                    profile = %profile,
                    "skipping message: only the {:?} profile is generated",
                    PROFILE_MARKER
                );
            }
        }
    }
}

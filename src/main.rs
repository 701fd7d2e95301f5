//! protoc-gen-go-dep - A protoc plugin generating persistence, HTTP and form
//! glue for Go protobuf messages
//!
//! This binary reads a CodeGeneratorRequest from stdin and writes a
//! CodeGeneratorResponse to stdout, following the protoc plugin protocol.
//!
//! Usage:
//!   protoc --go-dep_out=quiet,paths=source_relative:. example.proto

use prost::Message;
use protoc_gen_go_dep::{request, GenerationConfig};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PROTOC_GEN_GO_DEP_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("protoc-gen-go-dep: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Read raw bytes from stdin
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;

    // A malformed request aborts before anything is written to stdout
    let request = request::decode(&buf)?;
    let config = GenerationConfig::from_parameter(&request.parameter);

    init_logging(config.quiet);

    let response = protoc_gen_go_dep::generate(&request, &config);

    // Write CodeGeneratorResponse to stdout
    let mut out = Vec::new();
    response.encode(&mut out)?;
    io::stdout().write_all(&out)?;

    Ok(())
}

/// Log to stderr; stdout carries the response
fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

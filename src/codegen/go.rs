//! Go rendering of generated units

use super::{form, handler, persistence, GeneratedUnit, Operation};
use std::collections::BTreeSet;

/// Name written into the generated-code header
pub const GENERATOR_NAME: &str = "protoc-gen-go-dep";

/// Version written into the generated-code header
pub const GENERATOR_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// An import line of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoImport {
    /// Import path
    pub path: &'static str,
    /// Imported only for its side effects (`_ "path"`)
    pub blank: bool,
}

impl GoImport {
    const fn new(path: &'static str) -> Self {
        Self { path, blank: false }
    }

    const fn side_effect(path: &'static str) -> Self {
        Self { path, blank: true }
    }

    /// Standard library packages have no dot in their first path element
    pub fn is_std(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

pub(crate) const SQL: GoImport = GoImport::new("database/sql");
pub(crate) const JSON: GoImport = GoImport::new("encoding/json");
pub(crate) const ERRORS: GoImport = GoImport::new("errors");
pub(crate) const HTTP: GoImport = GoImport::new("net/http");
pub(crate) const STRCONV: GoImport = GoImport::new("strconv");
pub(crate) const CHI: GoImport = GoImport::new("github.com/go-chi/chi/v5");
pub(crate) const PQ: GoImport = GoImport::side_effect("github.com/lib/pq");
pub(crate) const PROTOJSON: GoImport = GoImport::new("google.golang.org/protobuf/encoding/protojson");

/// Imports every generated file carries
pub const FIXED_IMPORTS: [GoImport; 4] = [SQL, PQ, HTTP, CHI];

/// Imports referenced by one operation
pub fn operation_imports(operation: &Operation) -> Vec<GoImport> {
    match operation {
        Operation::TableName { .. } => vec![],
        Operation::List | Operation::Get | Operation::Update => vec![SQL, PROTOJSON],
        Operation::Create { required } => {
            let mut imports = vec![SQL, PROTOJSON];
            if required.is_some() {
                imports.push(ERRORS);
            }
            imports
        }
        Operation::Delete => vec![SQL],
        Operation::HandleForm { bindings } => {
            let mut imports = vec![HTTP];
            if form::uses_strconv(bindings) {
                imports.push(STRCONV);
            }
            imports
        }
        Operation::ListHandler { .. } => vec![SQL, HTTP, CHI, JSON],
    }
}

/// All imports of a unit: the fixed set plus whatever its fragments use
pub fn unit_imports(unit: &GeneratedUnit) -> BTreeSet<GoImport> {
    FIXED_IMPORTS
        .into_iter()
        .chain(
            unit.fragments
                .iter()
                .flat_map(|fragment| operation_imports(&fragment.operation)),
        )
        .collect()
}

/// Line-oriented writer producing gofmt-style indentation
#[derive(Debug, Default)]
pub struct GoWriter {
    buf: String,
    depth: usize,
}

impl GoWriter {
    /// Write one line at the current indentation
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Write an empty line
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write a line opening a block and indent what follows
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and write the line closing a block
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// The text written so far
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render a unit as Go source
///
/// `compiler_version` is the protoc version from the request, if known.
pub fn render(unit: &GeneratedUnit, compiler_version: Option<&str>) -> String {
    let mut w = GoWriter::default();

    w.line(format!(
        "// Code generated by {}. DO NOT EDIT.",
        GENERATOR_NAME
    ));
    w.line("// versions:");
    w.line(format!("// \t{} {}", GENERATOR_NAME, GENERATOR_VERSION));
    w.line(format!(
        "// \t{:<width$} {}",
        "protoc",
        compiler_version.unwrap_or("(unknown)"),
        width = GENERATOR_NAME.len()
    ));
    w.line(format!("// source: {}", unit.source));
    w.blank();
    w.line(format!("package {}", unit.package));
    w.blank();
    render_imports(&mut w, &unit_imports(unit));

    for fragment in &unit.fragments {
        w.blank();
        let name = fragment.message_name.as_str();
        let receiver = fragment.receiver.as_str();
        match &fragment.operation {
            Operation::TableName { table } => persistence::render_table_name(&mut w, name, receiver, table),
            Operation::List => persistence::render_list(&mut w, name, receiver),
            Operation::Get => persistence::render_get(&mut w, name, receiver),
            Operation::Create { required } => {
                persistence::render_create(&mut w, name, receiver, required.as_ref())
            }
            Operation::Update => persistence::render_update(&mut w, name, receiver),
            Operation::Delete => persistence::render_delete(&mut w, name, receiver),
            Operation::HandleForm { bindings } => form::render(&mut w, name, receiver, bindings),
            Operation::ListHandler {
                tenant_param,
                db_context_key,
            } => handler::render_list_handler(&mut w, name, receiver, tenant_param, db_context_key),
        }
    }

    w.finish()
}

fn render_imports(w: &mut GoWriter, imports: &BTreeSet<GoImport>) {
    let (std, third_party): (Vec<&GoImport>, Vec<&GoImport>) =
        imports.iter().partition(|import| import.is_std());

    w.open("import (");
    let groups = [std, third_party];
    for (index, group) in groups.iter().filter(|group| !group.is_empty()).enumerate() {
        if index > 0 {
            w.blank();
        }
        for import in group {
            if import.blank {
                w.line(format!("_ \"{}\"", import.path));
            } else {
                w.line(format!("\"{}\"", import.path));
            }
        }
    }
    w.close(")");
}

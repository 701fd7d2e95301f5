//! In-memory schema model
//!
//! Built once by the request decoder and never mutated afterwards.

use prost_reflect::DynamicMessage;

/// A proto file selected for generation
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFile {
    /// Proto file name as given to protoc, e.g. `example.proto`
    pub name: String,
    /// Declared proto package
    pub proto_package: String,
    /// Go package name of the generated code
    pub go_package_name: String,
    /// Go import path from `go_package`, if any
    pub go_import_path: Option<String>,
    /// Top-level messages in declaration order
    pub messages: Vec<Message>,
}

/// A message declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Declared name, e.g. `Hello`
    pub name: String,
    /// Name of the generated Go struct
    pub go_ident: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// `google.protobuf.MessageOptions`, extensions included
    pub options: DynamicMessage,
}

/// A field declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared name
    pub name: String,
    /// Name of the generated Go struct field and getter suffix
    pub go_name: String,
    /// Value type
    pub kind: FieldKind,
    /// Singular, repeated or map
    pub cardinality: Cardinality,
    /// Scalar with explicit presence, generated as a pointer in Go
    pub has_presence: bool,
    /// Member of a real (non-synthetic) oneof
    pub in_oneof: bool,
}

/// Value type of a field, collapsed to what the Go side distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// `int32`, `sint32`, `sfixed32`
    Int32,
    /// `int64`, `sint64`, `sfixed64`
    Int64,
    /// `uint32`, `fixed32`
    Uint32,
    /// `uint64`, `fixed64`
    Uint64,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `string`
    String,
    /// `bytes`
    Bytes,
    /// An enum; the Go type is known when it is declared in the same file
    Enum {
        /// Go type name of the enum
        go_ident: Option<String>,
    },
    /// A message or group
    Message,
}

impl FieldKind {
    /// Go type of a scalar kind
    pub fn go_scalar_type(&self) -> Option<&str> {
        match self {
            FieldKind::Bool => Some("bool"),
            FieldKind::Int32 => Some("int32"),
            FieldKind::Int64 => Some("int64"),
            FieldKind::Uint32 => Some("uint32"),
            FieldKind::Uint64 => Some("uint64"),
            FieldKind::Float => Some("float32"),
            FieldKind::Double => Some("float64"),
            FieldKind::String => Some("string"),
            FieldKind::Bytes => Some("[]byte"),
            FieldKind::Enum { go_ident } => go_ident.as_deref(),
            FieldKind::Message => None,
        }
    }
}

/// Field cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A single value
    Singular,
    /// `repeated`
    Repeated,
    /// `map<K, V>`
    Map,
}

//! Code generation for eligible messages
//!
//! Emission is split in two steps. [`emit_file`] decides *what* to generate
//! and returns a [`GeneratedUnit`] of [`Fragment`]s; [`go::render`] turns a
//! unit into Go source text.

pub mod form;
pub mod go;
mod handler;
mod persistence;

use crate::naming;
use crate::options::{file_has_eligible_message, is_eligible};
use crate::params::GenerationConfig;
use crate::schema::{Cardinality, Field, FieldKind, Message, SchemaFile};
use form::FormBinding;

/// One output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Target file name, `<prefix>.pb.dep.go`
    pub name: String,
    /// Proto file the unit was generated from
    pub source: String,
    /// Go package clause
    pub package: String,
    /// Fragments, grouped per message in declaration order
    pub fragments: Vec<Fragment>,
}

/// A generated method bound to a message's Go type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Declared message name
    pub message_name: String,
    /// Go type of the receiver
    pub receiver: String,
    /// What the method does
    pub operation: Operation,
}

impl Fragment {
    /// The operation kind of this fragment
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

/// Generated operations with the data each one needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `TableName() string`
    TableName {
        /// Table identifier returned by the method
        table: String,
    },
    /// `List(db, tenant) (map[int64]*T, error)`
    List,
    /// `Get(db, tenant, id) error`
    Get,
    /// `Create(db, tenant) error`
    Create {
        /// First declared field, which must be set; `None` for empty messages
        required: Option<RequiredField>,
    },
    /// `Update(db, tenant, id) error`
    Update,
    /// `Delete(db, tenant, id) error`
    Delete,
    /// `HandleForm(req) error`
    HandleForm {
        /// One binding per declared field, in declaration order
        bindings: Vec<FormBinding>,
    },
    /// `ListHandler(w, req)`
    ListHandler {
        /// chi route parameter holding the tenant
        tenant_param: String,
        /// Request-context key of the `*sql.DB`
        db_context_key: String,
    },
}

impl Operation {
    /// The operation kind
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::TableName { .. } => OperationKind::TableName,
            Operation::List => OperationKind::List,
            Operation::Get => OperationKind::Get,
            Operation::Create { .. } => OperationKind::Create,
            Operation::Update => OperationKind::Update,
            Operation::Delete => OperationKind::Delete,
            Operation::HandleForm { .. } => OperationKind::HandleForm,
            Operation::ListHandler { .. } => OperationKind::ListHandler,
        }
    }
}

/// Kinds of generated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// Table identifier accessor
    TableName,
    /// Tenant-scoped listing
    List,
    /// Single-row fetch
    Get,
    /// Validated insert
    Create,
    /// Replace by id
    Update,
    /// Remove by id
    Delete,
    /// Form binding
    HandleForm,
    /// HTTP list endpoint
    ListHandler,
}

impl OperationKind {
    /// Every kind, in emission order
    pub const ALL: [OperationKind; 8] = [
        OperationKind::TableName,
        OperationKind::List,
        OperationKind::Get,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
        OperationKind::HandleForm,
        OperationKind::ListHandler,
    ];

    /// Name of the generated Go method
    pub fn method_name(&self) -> &'static str {
        match self {
            OperationKind::TableName => "TableName",
            OperationKind::List => "List",
            OperationKind::Get => "Get",
            OperationKind::Create => "Create",
            OperationKind::Update => "Update",
            OperationKind::Delete => "Delete",
            OperationKind::HandleForm => "HandleForm",
            OperationKind::ListHandler => "ListHandler",
        }
    }
}

/// The field a `Create` call refuses to persist when empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField {
    /// Go field name, also used in the error message
    pub go_name: String,
    /// How emptiness is tested
    pub check: EmptyCheck,
}

/// Emptiness test applied to a field getter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCheck {
    /// `x.GetF() == ""`
    EmptyString,
    /// `x.GetF() == 0`
    Zero,
    /// `!x.GetF()`
    False,
    /// `len(x.GetF()) == 0`
    NoElements,
    /// `x.GetF() == nil`
    Nil,
}

impl EmptyCheck {
    /// The test matching a field's Go representation
    pub fn for_field(field: &Field) -> Self {
        if field.cardinality != Cardinality::Singular {
            return EmptyCheck::NoElements;
        }
        match field.kind {
            FieldKind::String => EmptyCheck::EmptyString,
            FieldKind::Bytes => EmptyCheck::NoElements,
            FieldKind::Bool => EmptyCheck::False,
            FieldKind::Message => EmptyCheck::Nil,
            FieldKind::Int32
            | FieldKind::Int64
            | FieldKind::Uint32
            | FieldKind::Uint64
            | FieldKind::Float
            | FieldKind::Double
            | FieldKind::Enum { .. } => EmptyCheck::Zero,
        }
    }
}

/// Build the output unit for a file, or `None` when no message is eligible
pub fn emit_file(file: &SchemaFile, config: &GenerationConfig) -> Option<GeneratedUnit> {
    if !file_has_eligible_message(file) {
        return None;
    }

    let prefix = naming::generated_filename_prefix(
        &file.name,
        file.go_import_path.as_deref(),
        config.paths,
    );

    Some(GeneratedUnit {
        name: naming::output_file_name(&prefix),
        source: file.name.clone(),
        package: file.go_package_name.clone(),
        fragments: file
            .messages
            .iter()
            .filter(|message| is_eligible(message))
            .flat_map(|message| emit_message(message, config))
            .collect(),
    })
}

/// Build the fragments for one message, in the fixed operation order
pub fn emit_message(message: &Message, config: &GenerationConfig) -> Vec<Fragment> {
    OperationKind::ALL
        .iter()
        .map(|kind| Fragment {
            message_name: message.name.clone(),
            receiver: message.go_ident.clone(),
            operation: operation(*kind, message, config),
        })
        .collect()
}

fn operation(kind: OperationKind, message: &Message, config: &GenerationConfig) -> Operation {
    match kind {
        OperationKind::TableName => Operation::TableName {
            table: naming::table_name(&message.name),
        },
        OperationKind::List => Operation::List,
        OperationKind::Get => Operation::Get,
        OperationKind::Create => Operation::Create {
            required: message.fields.first().map(|field| RequiredField {
                go_name: field.go_name.clone(),
                check: EmptyCheck::for_field(field),
            }),
        },
        OperationKind::Update => Operation::Update,
        OperationKind::Delete => Operation::Delete,
        OperationKind::HandleForm => Operation::HandleForm {
            bindings: message
                .fields
                .iter()
                .map(|field| form::bind(&message.name, field))
                .collect(),
        },
        OperationKind::ListHandler => Operation::ListHandler {
            tenant_param: config.tenant_param.clone(),
            db_context_key: config.db_context_key.clone(),
        },
    }
}

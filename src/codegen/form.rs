//! Form binding for `HandleForm`
//!
//! Every declared field is read from the form value named
//! `<MessageName>__<FieldName>`. Fields without a single-value form
//! representation are listed but left untouched.

use super::go::GoWriter;
use crate::naming::{self, go_string_literal};
use crate::schema::{Cardinality, Field, FieldKind};

/// How one field is populated from the submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    /// Go struct field being assigned
    pub field_go_name: String,
    /// Form value name, `<MessageName>__<FieldName>`
    pub form_name: String,
    /// Conversion applied to the form value
    pub target: BindTarget,
}

/// Conversion from form text to the Go field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    /// Plain string assignment; `pointer` for fields with explicit presence
    Text {
        /// Assign through a pointer
        pointer: bool,
    },
    /// `[]byte` conversion
    Bytes,
    /// Parsed with `strconv`, then converted to `go_type`
    Parsed {
        /// strconv function and bit size
        parser: Parser,
        /// Go type of the struct field
        go_type: String,
        /// Assign through a pointer
        pointer: bool,
    },
    /// All values of a repeated string field
    TextList,
    /// Not bound
    Skipped {
        /// Short explanation rendered as a comment
        reason: &'static str,
    },
}

/// `strconv` parse functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    /// `strconv.ParseBool`
    Bool,
    /// `strconv.ParseInt` with the given bit size
    Int(u8),
    /// `strconv.ParseUint` with the given bit size
    Uint(u8),
    /// `strconv.ParseFloat` with the given bit size
    Float(u8),
}

impl Parser {
    fn call(&self, arg: &str) -> String {
        match self {
            Parser::Bool => format!("strconv.ParseBool({})", arg),
            Parser::Int(bits) => format!("strconv.ParseInt({}, 10, {})", arg, bits),
            Parser::Uint(bits) => format!("strconv.ParseUint({}, 10, {})", arg, bits),
            Parser::Float(bits) => format!("strconv.ParseFloat({}, {})", arg, bits),
        }
    }
}

/// Decide how a field of `message_name` is bound
pub fn bind(message_name: &str, field: &Field) -> FormBinding {
    FormBinding {
        field_go_name: field.go_name.clone(),
        form_name: naming::form_field_name(message_name, &field.go_name),
        target: bind_target(field),
    }
}

fn bind_target(field: &Field) -> BindTarget {
    if field.in_oneof {
        return BindTarget::Skipped {
            reason: "oneof member",
        };
    }

    match field.cardinality {
        Cardinality::Map => {
            return BindTarget::Skipped {
                reason: "map field",
            }
        }
        Cardinality::Repeated if field.kind == FieldKind::String => return BindTarget::TextList,
        Cardinality::Repeated => {
            return BindTarget::Skipped {
                reason: "repeated field",
            }
        }
        Cardinality::Singular => {}
    }

    let pointer = field.has_presence;
    let parsed = |parser: Parser| BindTarget::Parsed {
        parser,
        go_type: field.kind.go_scalar_type().unwrap_or_default().to_string(),
        pointer,
    };

    match &field.kind {
        FieldKind::String => BindTarget::Text { pointer },
        FieldKind::Bytes => BindTarget::Bytes,
        FieldKind::Bool => parsed(Parser::Bool),
        FieldKind::Int32 => parsed(Parser::Int(32)),
        FieldKind::Int64 => parsed(Parser::Int(64)),
        FieldKind::Uint32 => parsed(Parser::Uint(32)),
        FieldKind::Uint64 => parsed(Parser::Uint(64)),
        FieldKind::Float => parsed(Parser::Float(32)),
        FieldKind::Double => parsed(Parser::Float(64)),
        FieldKind::Enum { go_ident: Some(_) } => parsed(Parser::Int(32)),
        FieldKind::Enum { go_ident: None } => BindTarget::Skipped {
            reason: "enum declared in another file",
        },
        FieldKind::Message => BindTarget::Skipped {
            reason: "message field",
        },
    }
}

/// Whether the rendered bindings call into `strconv`
pub(crate) fn uses_strconv(bindings: &[FormBinding]) -> bool {
    bindings
        .iter()
        .any(|b| matches!(b.target, BindTarget::Parsed { .. }))
}

pub(crate) fn render(w: &mut GoWriter, message_name: &str, receiver: &str, bindings: &[FormBinding]) {
    w.line(format!(
        "// HandleForm populates {} from the submitted form and validates it.",
        message_name
    ));
    w.open(format!("func (x *{}) HandleForm(req *http.Request) error {{", receiver));

    if bindings
        .iter()
        .any(|b| matches!(b.target, BindTarget::TextList))
    {
        w.open("if err := req.ParseForm(); err != nil {");
        w.line("return err");
        w.close("}");
        w.blank();
    }

    for binding in bindings {
        render_binding(w, binding);
    }

    w.line("return x.Validate()");
    w.close("}");
}

fn render_binding(w: &mut GoWriter, binding: &FormBinding) {
    let field = &binding.field_go_name;
    let form_name = go_string_literal(&binding.form_name);

    match &binding.target {
        BindTarget::Text { pointer: false } => {
            w.line(format!("x.{} = req.FormValue({})", field, form_name));
        }
        BindTarget::Text { pointer: true } => {
            w.open(format!("if v := req.FormValue({}); v != \"\" {{", form_name));
            w.line(format!("x.{} = &v", field));
            w.close("}");
        }
        BindTarget::Bytes => {
            w.line(format!("x.{} = []byte(req.FormValue({}))", field, form_name));
        }
        BindTarget::TextList => {
            w.line(format!("x.{} = req.Form[{}]", field, form_name));
        }
        BindTarget::Parsed {
            parser,
            go_type,
            pointer,
        } => {
            w.open(format!("if v := req.FormValue({}); v != \"\" {{", form_name));
            w.line(format!("n, err := {}", parser.call("v")));
            w.open("if err != nil {");
            w.line("return err");
            w.close("}");
            match (*parser, *pointer) {
                (Parser::Bool, false) => w.line(format!("x.{} = n", field)),
                (Parser::Bool, true) => w.line(format!("x.{} = &n", field)),
                (_, false) => w.line(format!("x.{} = {}(n)", field, go_type)),
                (_, true) => {
                    w.line(format!("val := {}(n)", go_type));
                    w.line(format!("x.{} = &val", field));
                }
            }
            w.close("}");
        }
        BindTarget::Skipped { reason } => {
            w.line(format!("// {} is not bound from the form: {}", field, reason));
        }
    }
}

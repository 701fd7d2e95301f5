//! Naming conventions shared by every generated fragment
//!
//! Generated symbols and form field names are consumed by hand-written
//! front-end templates, so each rule lives here exactly once.

/// Suffix appended to the generated-filename prefix of every output unit
pub const OUTPUT_SUFFIX: &str = ".pb.dep.go";

/// How output file names are derived from their proto file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathsMode {
    /// Place output under the `go_package` import path (protoc-gen-go default)
    #[default]
    Import,
    /// Place output next to the proto file, relative to the proto root
    SourceRelative,
}

impl PathsMode {
    /// Parse the `paths` plugin parameter
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "import" => Some(PathsMode::Import),
            "source_relative" => Some(PathsMode::SourceRelative),
            _ => None,
        }
    }
}

/// Table identifier for a message: its declared name, lowercased
pub fn table_name(message_name: &str) -> String {
    message_name.to_lowercase()
}

/// Form field identifier: `<MessageName>__<FieldName>`
pub fn form_field_name(message_name: &str, field_go_name: &str) -> String {
    format!("{}__{}", message_name, field_go_name)
}

/// Name of the generated file for a generated-filename prefix
pub fn output_file_name(prefix: &str) -> String {
    format!("{}{}", prefix, OUTPUT_SUFFIX)
}

/// Convert a proto identifier into the exported Go identifier protoc-gen-go uses
///
/// Underscores followed by a lowercase letter are dropped and the letter is
/// capitalized; a leading underscore becomes `X`; `.` separators of nested
/// names become `_` unless followed by a lowercase letter.
pub fn go_camel_case(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 1);
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next_is_lower = bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);

        if c == b'.' && next_is_lower {
            // dropped; the following letter is capitalized below
        } else if c == b'.' {
            out.push('_');
        } else if c == b'_' && (i == 0 || bytes[i - 1] == b'.') {
            out.push('X');
        } else if c == b'_' && next_is_lower {
            // dropped
        } else if c.is_ascii_digit() {
            out.push(c as char);
        } else if c.is_ascii() {
            out.push(c.to_ascii_uppercase() as char);
            while bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
                i += 1;
                out.push(bytes[i] as char);
            }
        } else {
            // Non-ASCII input is copied through unchanged, one code point at a time
            let ch = s[i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            out.push(ch);
            i += ch.len_utf8() - 1;
        }
        i += 1;
    }

    out
}

/// Go identifier for a message or enum, from its full name and proto package
pub fn go_ident(full_name: &str, proto_package: &str) -> String {
    let local = if proto_package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(proto_package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    go_camel_case(local)
}

/// Split a `go_package` option into its import path and package name
pub fn split_go_package(go_package: &str) -> (Option<String>, String) {
    match go_package.split_once(';') {
        Some((path, name)) => {
            let path = (!path.is_empty()).then(|| path.to_string());
            (path, name.to_string())
        }
        None => (
            Some(go_package.to_string()),
            base_name(go_package).to_string(),
        ),
    }
}

/// Resolve the Go package name for a proto file
///
/// Preference order: `go_package` (explicit name or last path element),
/// the proto package with `.` replaced by `_`, then the file's base name.
pub fn go_package_name(go_package: Option<&str>, proto_package: &str, file_name: &str) -> String {
    let raw = match go_package.filter(|p| !p.is_empty()) {
        Some(go_package) => split_go_package(go_package).1,
        None if !proto_package.is_empty() => proto_package.replace('.', "_"),
        None => strip_proto_suffix(base_name(file_name)).to_string(),
    };
    go_sanitized(&raw)
}

/// Generated-filename prefix for a proto file
pub fn generated_filename_prefix(
    file_name: &str,
    go_import_path: Option<&str>,
    paths: PathsMode,
) -> String {
    let stem = strip_proto_suffix(file_name);
    match (paths, go_import_path) {
        (PathsMode::Import, Some(import_path)) if !import_path.is_empty() => {
            format!("{}/{}", import_path.trim_end_matches('/'), base_name(stem))
        }
        _ => stem.to_string(),
    }
}

/// Quote a string as a Go interpreted string literal
pub fn go_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Make an arbitrary string a valid Go identifier
fn go_sanitized(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let starts_with_letter = cleaned
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    if !starts_with_letter || GO_KEYWORDS.contains(&cleaned.as_str()) {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn strip_proto_suffix(name: &str) -> &str {
    name.strip_suffix(".proto").unwrap_or(name)
}

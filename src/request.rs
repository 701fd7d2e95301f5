//! Decoding of the protoc `CodeGeneratorRequest`
//!
//! `prost_types::FileDescriptorProto` drops extension fields from options, so
//! the request envelope is decoded with a projection that keeps every
//! `proto_file` as raw bytes. Those bytes are handed to prost-reflect, which
//! preserves extension options when decoding a descriptor set.

use crate::naming;
use crate::schema::{Cardinality, Field, FieldKind, Message, SchemaFile};
use crate::GeneratorError;
use prost::Message as _;
use prost_reflect::{DescriptorPool, FieldDescriptor, FileDescriptor, Kind, MessageDescriptor};
use prost_types::field_descriptor_proto::Label;

/// Wire projections of the plugin protocol messages
#[allow(missing_docs)]
pub mod wire {
    /// `google.protobuf.compiler.CodeGeneratorRequest` with raw file descriptors
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RawCodeGeneratorRequest {
        #[prost(string, repeated, tag = "1")]
        pub file_to_generate: Vec<String>,
        #[prost(string, optional, tag = "2")]
        pub parameter: Option<String>,
        #[prost(message, optional, tag = "3")]
        pub compiler_version: Option<prost_types::compiler::Version>,
        #[prost(bytes = "vec", repeated, tag = "15")]
        pub proto_file: Vec<Vec<u8>>,
    }

    /// `google.protobuf.FileDescriptorSet` with raw file descriptors
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RawFileDescriptorSet {
        #[prost(bytes = "vec", repeated, tag = "1")]
        pub file: Vec<Vec<u8>>,
    }
}

/// A decoded plugin request
#[derive(Debug, Clone)]
pub struct DecodedRequest {
    /// Raw plugin parameter string
    pub parameter: String,
    /// protoc version, formatted as `vMAJOR.MINOR.PATCH[-SUFFIX]`
    pub compiler_version: Option<String>,
    /// Files to generate, in request order
    pub files: Vec<SchemaFile>,
}

/// Decode raw request bytes into the schema model
///
/// Fails only on structurally malformed input: an undecodable envelope, a
/// descriptor set prost-reflect rejects, or a `file_to_generate` entry that
/// is missing from the descriptors.
pub fn decode(bytes: &[u8]) -> Result<DecodedRequest, GeneratorError> {
    let request = wire::RawCodeGeneratorRequest::decode(bytes)
        .map_err(|e| GeneratorError::DecodeError(e.to_string()))?;

    let descriptor_set = wire::RawFileDescriptorSet {
        file: request.proto_file,
    }
    .encode_to_vec();
    let pool = DescriptorPool::decode(descriptor_set.as_slice())
        .map_err(|e| GeneratorError::DescriptorError(e.to_string()))?;

    let files = request
        .file_to_generate
        .iter()
        .map(|name| {
            pool.get_file_by_name(name)
                .map(|file| schema_file(&file))
                .ok_or_else(|| GeneratorError::MissingFile(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedRequest {
        parameter: request.parameter.unwrap_or_default(),
        compiler_version: request.compiler_version.as_ref().map(format_version),
        files,
    })
}

fn format_version(version: &prost_types::compiler::Version) -> String {
    let mut formatted = format!(
        "v{}.{}.{}",
        version.major(),
        version.minor(),
        version.patch()
    );
    if !version.suffix().is_empty() {
        formatted.push('-');
        formatted.push_str(version.suffix());
    }
    formatted
}

fn schema_file(file: &FileDescriptor) -> SchemaFile {
    let proto = file.file_descriptor_proto();
    let go_package = proto
        .options
        .as_ref()
        .and_then(|opts| opts.go_package.as_deref())
        .filter(|p| !p.is_empty());
    let go_import_path = go_package.and_then(|p| naming::split_go_package(p).0);
    let is_proto2 = matches!(proto.syntax.as_deref(), None | Some("") | Some("proto2"));

    SchemaFile {
        name: file.name().to_string(),
        proto_package: file.package_name().to_string(),
        go_package_name: naming::go_package_name(go_package, file.package_name(), file.name()),
        go_import_path,
        messages: file
            .messages()
            .map(|message| schema_message(file, &message, is_proto2))
            .collect(),
    }
}

fn schema_message(file: &FileDescriptor, message: &MessageDescriptor, is_proto2: bool) -> Message {
    Message {
        name: message.name().to_string(),
        go_ident: naming::go_ident(message.full_name(), file.package_name()),
        fields: message
            .fields()
            .map(|field| schema_field(file, &field, is_proto2))
            .collect(),
        options: message.options(),
    }
}

fn schema_field(file: &FileDescriptor, field: &FieldDescriptor, is_proto2: bool) -> Field {
    let proto = field.field_descriptor_proto();
    let kind = field_kind(file, &field.kind());

    let cardinality = if field.is_map() {
        Cardinality::Map
    } else if field.is_list() {
        Cardinality::Repeated
    } else {
        Cardinality::Singular
    };

    // proto3 `optional` is modelled as a synthetic oneof
    let in_oneof = proto.oneof_index.is_some() && !proto.proto3_optional();

    let has_presence = cardinality == Cardinality::Singular
        && kind != FieldKind::Message
        && !in_oneof
        && (proto.proto3_optional() || (is_proto2 && proto.label() != Label::Repeated));

    Field {
        name: field.name().to_string(),
        go_name: naming::go_camel_case(field.name()),
        kind,
        cardinality,
        has_presence,
        in_oneof,
    }
}

fn field_kind(file: &FileDescriptor, kind: &Kind) -> FieldKind {
    match kind {
        Kind::Bool => FieldKind::Bool,
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => FieldKind::Int32,
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => FieldKind::Int64,
        Kind::Uint32 | Kind::Fixed32 => FieldKind::Uint32,
        Kind::Uint64 | Kind::Fixed64 => FieldKind::Uint64,
        Kind::Float => FieldKind::Float,
        Kind::Double => FieldKind::Double,
        Kind::String => FieldKind::String,
        Kind::Bytes => FieldKind::Bytes,
        Kind::Enum(enum_desc) => {
            // Enums from other files may live in another Go package
            let same_file = enum_desc.parent_file().name() == file.name();
            FieldKind::Enum {
                go_ident: same_file
                    .then(|| naming::go_ident(enum_desc.full_name(), file.package_name())),
            }
        }
        Kind::Message(_) => FieldKind::Message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_files, proto_field};
    use prost_types::field_descriptor_proto::Type;
    use prost_types::{
        DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
        FileDescriptorProto, MessageOptions, OneofDescriptorProto,
    };

    fn enum_proto(name: &str, zero: &str) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_string()),
            value: vec![EnumValueDescriptorProto {
                name: Some(zero.to_string()),
                number: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// Decode a request generating the last of `files`
    fn decode_last(files: Vec<FileDescriptorProto>) -> SchemaFile {
        let target = files
            .last()
            .and_then(|f| f.name.clone())
            .expect("at least one named file");
        let request = wire::RawCodeGeneratorRequest {
            file_to_generate: vec![target],
            proto_file: fixture_files()
                .into_iter()
                .chain(files)
                .map(|f| f.encode_to_vec())
                .collect(),
            ..Default::default()
        };
        let mut decoded = decode(&request.encode_to_vec()).expect("request decodes");
        decoded.files.remove(0)
    }

    fn field_named<'a>(file: &'a SchemaFile, name: &str) -> &'a Field {
        file.messages[0]
            .fields
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn test_proto2_singular_scalars_have_presence() {
        let legacy = FileDescriptorProto {
            name: Some("legacy.proto".to_string()),
            package: Some("legacy".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Hello".to_string()),
                field: vec![
                    proto_field("email", 1, Label::Required, Type::String, None),
                    proto_field("age", 2, Label::Required, Type::Int32, None),
                    proto_field("nick", 3, Label::Optional, Type::String, None),
                    proto_field("tags", 4, Label::Repeated, Type::String, None),
                ],
                ..Default::default()
            }],
            syntax: Some("proto2".to_string()),
            ..Default::default()
        };
        let file = decode_last(vec![legacy]);

        for name in ["email", "age", "nick"] {
            assert!(field_named(&file, name).has_presence, "{name} has presence");
        }
        let tags = field_named(&file, "tags");
        assert!(!tags.has_presence);
        assert_eq!(tags.cardinality, Cardinality::Repeated);
    }

    #[test]
    fn test_proto3_field_mapping() {
        let common = FileDescriptorProto {
            name: Some("common.proto".to_string()),
            package: Some("common".to_string()),
            enum_type: vec![enum_proto("Level", "LEVEL_UNSPECIFIED")],
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };

        let tags_entry = DescriptorProto {
            name: Some("TagsEntry".to_string()),
            field: vec![
                proto_field("key", 1, Label::Optional, Type::String, None),
                proto_field("value", 2, Label::Optional, Type::String, None),
            ],
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let profile = DescriptorProto {
            name: Some("Profile".to_string()),
            field: vec![
                proto_field("name", 1, Label::Optional, Type::String, None),
                FieldDescriptorProto {
                    oneof_index: Some(1),
                    proto3_optional: Some(true),
                    ..proto_field("nick", 2, Label::Optional, Type::String, None)
                },
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    ..proto_field("email", 3, Label::Optional, Type::String, None)
                },
                proto_field(
                    "tags",
                    4,
                    Label::Repeated,
                    Type::Message,
                    Some(".example.Profile.TagsEntry"),
                ),
                proto_field("aliases", 5, Label::Repeated, Type::String, None),
                proto_field("status", 6, Label::Optional, Type::Enum, Some(".example.Status")),
                proto_field("level", 7, Label::Optional, Type::Enum, Some(".common.Level")),
            ],
            nested_type: vec![tags_entry],
            oneof_decl: vec![
                OneofDescriptorProto {
                    name: Some("contact".to_string()),
                    ..Default::default()
                },
                OneofDescriptorProto {
                    name: Some("_nick".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let example = FileDescriptorProto {
            name: Some("example.proto".to_string()),
            package: Some("example".to_string()),
            dependency: vec!["common.proto".to_string()],
            message_type: vec![profile],
            enum_type: vec![enum_proto("Status", "STATUS_UNSPECIFIED")],
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };
        let file = decode_last(vec![common, example]);

        let name = field_named(&file, "name");
        assert!(!name.has_presence && !name.in_oneof);

        let nick = field_named(&file, "nick");
        assert!(nick.has_presence, "proto3 optional has presence");
        assert!(!nick.in_oneof, "synthetic oneof is not a real oneof");

        let email = field_named(&file, "email");
        assert!(email.in_oneof);
        assert!(!email.has_presence);

        assert_eq!(field_named(&file, "tags").cardinality, Cardinality::Map);
        assert_eq!(field_named(&file, "aliases").cardinality, Cardinality::Repeated);

        assert_eq!(
            field_named(&file, "status").kind,
            FieldKind::Enum {
                go_ident: Some("Status".to_string())
            }
        );
        assert_eq!(
            field_named(&file, "level").kind,
            FieldKind::Enum { go_ident: None }
        );
    }

    #[test]
    fn test_format_version() {
        let version = prost_types::compiler::Version {
            major: Some(4),
            minor: Some(25),
            patch: Some(1),
            suffix: Some(String::new()),
        };
        assert_eq!(format_version(&version), "v4.25.1");

        let version = prost_types::compiler::Version {
            suffix: Some("rc2".to_string()),
            ..version
        };
        assert_eq!(format_version(&version), "v4.25.1-rc2");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, GeneratorError::DecodeError(_)));
    }

    #[test]
    fn test_decode_empty_request() {
        let decoded = decode(&[]).expect("empty request is well-formed");
        assert!(decoded.files.is_empty());
        assert_eq!(decoded.parameter, "");
        assert!(decoded.compiler_version.is_none());
    }

    #[test]
    fn test_decode_missing_file_to_generate() {
        let request = wire::RawCodeGeneratorRequest {
            file_to_generate: vec!["absent.proto".to_string()],
            ..Default::default()
        };
        let err = decode(&request.encode_to_vec()).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingFile(name) if name == "absent.proto"));
    }
}

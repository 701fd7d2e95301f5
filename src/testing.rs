//! Test fixtures: a minimal descriptor pool declaring `(dep.profile)` and
//! builders for schema model values.

use crate::naming;
use crate::options::{PROFILE_EXTENSION, PROFILE_EXTENSION_NUMBER};
use crate::schema::{Cardinality, Field, FieldKind, Message, SchemaFile};
use prost::Message as _;
use prost_reflect::{DescriptorPool, DynamicMessage, ReflectMessage, Value};
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::uninterpreted_option::NamePart;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    UninterpretedOption,
};

pub(crate) fn proto_field(
    name: &str,
    number: i32,
    label: Label,
    ty: Type,
    type_name: Option<&str>,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label.into()),
        r#type: Some(ty.into()),
        type_name: type_name.map(str::to_string),
        ..Default::default()
    }
}

fn options_message(name: &str, mut fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    fields.push(proto_field(
        "uninterpreted_option",
        999,
        Label::Repeated,
        Type::Message,
        Some(".google.protobuf.UninterpretedOption"),
    ));
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        extension_range: vec![ExtensionRange {
            start: Some(1000),
            end: Some(536_870_912),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// The parts of `google/protobuf/descriptor.proto` the generator touches
fn descriptor_file() -> FileDescriptorProto {
    let name_part = DescriptorProto {
        name: Some("NamePart".to_string()),
        field: vec![
            proto_field("name_part", 1, Label::Optional, Type::String, None),
            proto_field("is_extension", 2, Label::Optional, Type::Bool, None),
        ],
        ..Default::default()
    };

    let uninterpreted = DescriptorProto {
        name: Some("UninterpretedOption".to_string()),
        field: vec![
            proto_field(
                "name",
                2,
                Label::Repeated,
                Type::Message,
                Some(".google.protobuf.UninterpretedOption.NamePart"),
            ),
            proto_field("identifier_value", 3, Label::Optional, Type::String, None),
            proto_field("string_value", 7, Label::Optional, Type::Bytes, None),
            proto_field("aggregate_value", 8, Label::Optional, Type::String, None),
        ],
        nested_type: vec![name_part],
        ..Default::default()
    };

    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![
            uninterpreted,
            options_message(
                "FileOptions",
                vec![proto_field("go_package", 11, Label::Optional, Type::String, None)],
            ),
            options_message("MessageOptions", vec![]),
            options_message("FieldOptions", vec![]),
        ],
        ..Default::default()
    }
}

/// `dep/options.proto`
fn dep_options_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("dep/options.proto".to_string()),
        package: Some("dep".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        extension: vec![FieldDescriptorProto {
            extendee: Some(".google.protobuf.MessageOptions".to_string()),
            ..proto_field(
                "profile",
                PROFILE_EXTENSION_NUMBER as i32,
                Label::Optional,
                Type::String,
                None,
            )
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// `descriptor.proto` and `dep/options.proto`, in dependency order
pub(crate) fn fixture_files() -> Vec<FileDescriptorProto> {
    vec![descriptor_file(), dep_options_file()]
}

pub(crate) fn pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: fixture_files(),
    })
    .expect("fixture descriptors are valid")
}

/// Empty `MessageOptions`
pub(crate) fn empty_options() -> DynamicMessage {
    let desc = pool()
        .get_message_by_name("google.protobuf.MessageOptions")
        .expect("MessageOptions in fixture pool");
    DynamicMessage::new(desc)
}

/// `MessageOptions` with `(dep.profile)` set through the resolved extension
pub(crate) fn profile_options(profile: &str) -> DynamicMessage {
    let mut options = empty_options();
    let extension = options
        .descriptor()
        .parent_pool()
        .get_extension_by_name(PROFILE_EXTENSION)
        .expect("dep.profile in fixture pool");
    options.set_extension(&extension, Value::String(profile.to_string()));
    options
}

/// `MessageOptions` carrying `(dep.profile)` as an uninterpreted option
pub(crate) fn uninterpreted_profile(profile: &str) -> DynamicMessage {
    let raw = prost_types::MessageOptions {
        uninterpreted_option: vec![UninterpretedOption {
            name: vec![NamePart {
                name_part: PROFILE_EXTENSION.to_string(),
                is_extension: true,
            }],
            string_value: Some(profile.as_bytes().to_vec()),
            ..Default::default()
        }],
        ..Default::default()
    };
    DynamicMessage::decode(empty_options().descriptor(), raw.encode_to_vec().as_slice())
        .expect("uninterpreted options decode")
}

pub(crate) fn field(name: &str, kind: FieldKind) -> Field {
    Field {
        name: name.to_string(),
        go_name: naming::go_camel_case(name),
        kind,
        cardinality: Cardinality::Singular,
        has_presence: false,
        in_oneof: false,
    }
}

pub(crate) fn string_field(name: &str) -> Field {
    field(name, FieldKind::String)
}

pub(crate) fn message_with_options(
    name: &str,
    fields: Vec<Field>,
    options: DynamicMessage,
) -> Message {
    Message {
        name: name.to_string(),
        go_ident: naming::go_camel_case(name),
        fields,
        options,
    }
}

pub(crate) fn message(name: &str, fields: Vec<Field>, profile: Option<&str>) -> Message {
    let options = match profile {
        Some(profile) => profile_options(profile),
        None => empty_options(),
    };
    message_with_options(name, fields, options)
}

pub(crate) fn file(name: &str, package: &str, messages: Vec<Message>) -> SchemaFile {
    SchemaFile {
        name: name.to_string(),
        proto_package: package.to_string(),
        go_package_name: naming::go_package_name(None, package, name),
        go_import_path: None,
        messages,
    }
}

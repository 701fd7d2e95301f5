//! Resolution of the `(dep.profile)` message option
//!
//! The profile is declared in `proto/dep/options.proto` as a string
//! extension of `google.protobuf.MessageOptions`. This is the only place
//! that inspects options dynamically; everything downstream asks
//! [`is_eligible`] or [`file_has_eligible_message`].

use crate::schema::{Message, SchemaFile};
use prost_reflect::{DynamicMessage, ReflectMessage};
use prost_types::UninterpretedOption;

/// Full name of the profile extension
pub const PROFILE_EXTENSION: &str = "dep.profile";

/// Field number of the profile extension
pub const PROFILE_EXTENSION_NUMBER: u32 = 51234;

/// The only profile this generator emits code for
pub const PROFILE_MARKER: &str = "htmx";

/// Read the profile declared on a message, if any
pub fn try_get_profile_marker(message: &Message) -> Option<String> {
    // First try the resolved extension field
    if let Some(profile) = profile_from_extension(&message.options) {
        return Some(profile);
    }

    // Fallback to uninterpreted_option
    profile_from_uninterpreted(&message.options)
}

/// Whether code is generated for a message
pub fn is_eligible(message: &Message) -> bool {
    try_get_profile_marker(message).as_deref() == Some(PROFILE_MARKER)
}

/// Whether any message of a file is generated, and so whether the file gets
/// an output unit at all
pub fn file_has_eligible_message(file: &SchemaFile) -> bool {
    file.messages.iter().any(is_eligible)
}

fn profile_from_extension(options: &DynamicMessage) -> Option<String> {
    let extension = options
        .descriptor()
        .parent_pool()
        .get_extension_by_name(PROFILE_EXTENSION)?;

    if !options.has_extension(&extension) {
        return None;
    }

    options
        .get_extension(&extension)
        .as_str()
        .map(str::to_string)
}

fn profile_from_uninterpreted(options: &DynamicMessage) -> Option<String> {
    let options: prost_types::MessageOptions = options.transcode_to().ok()?;

    options
        .uninterpreted_option
        .iter()
        .find(|opt| is_profile_option(opt))
        .and_then(|opt| opt.string_value.as_ref())
        .map(|value| String::from_utf8_lossy(value).into_owned())
}

/// Check if an uninterpreted option is exactly `(dep.profile)`
fn is_profile_option(opt: &UninterpretedOption) -> bool {
    match opt.name.as_slice() {
        [part] => part.is_extension && part.name_part == PROFILE_EXTENSION,
        _ => false,
    }
}

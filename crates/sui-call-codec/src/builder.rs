//! Call argument assembly.
//!
//! [`validate_parameter`] is the synchronous per-keystroke check; it never
//! touches the network. [`build_arguments`] runs the full encoding pass over
//! every parameter in declaration order, consulting the object directory for
//! object arguments, and stops at the first failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sui_call_types::network::Network;
use sui_call_types::{
    ArgumentError, EncodedArgument, PureValue, TypeCategory, TypeDescriptor, ValidationOutcome,
};
use tracing::debug;

use crate::numeric::validate_unsigned;
use crate::object::{resolve_object, ObjectDirectory};
use crate::scalar::encode_scalar;
use crate::vector::encode_vector;
use crate::CodecOptions;

/// A user-facing parameter of a target function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub descriptor: TypeDescriptor,
    #[serde(default)]
    pub optional: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, type_str: &str) -> Self {
        Self {
            name: name.into(),
            descriptor: TypeDescriptor::parse(type_str),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// What the builder may consult while encoding.
pub struct BuildContext<'a> {
    pub network: Network,
    /// Object directory for existence checks; `None` skips them.
    pub directory: Option<&'a dyn ObjectDirectory>,
    pub options: CodecOptions,
}

impl<'a> BuildContext<'a> {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            directory: None,
            options: CodecOptions::default(),
        }
    }

    pub fn with_directory(mut self, directory: &'a dyn ObjectDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }
}

/// Encode one parameter. Returns `Ok(None)` for an empty optional parameter.
pub fn encode_argument(
    param: &ParameterSpec,
    text: &str,
) -> Result<Option<EncodedArgument>, ArgumentError> {
    if text.is_empty() {
        return if param.optional {
            Ok(None)
        } else {
            Err(ArgumentError::Required {
                param: param.name.clone(),
            })
        };
    }

    let encoded = match &param.descriptor.category {
        TypeCategory::Vector(element) => encode_vector(&param.name, text, element)?,
        _ => encode_scalar(&param.name, text, &param.descriptor)?,
    };
    Ok(Some(encoded))
}

/// Synchronous validation of the current text of one parameter.
///
/// Object arguments are checked for shape only; existence is verified by
/// [`resolve_object`] separately.
pub fn validate_parameter(
    param: &ParameterSpec,
    text: &str,
    options: &CodecOptions,
) -> ValidationOutcome {
    if let TypeCategory::UnsignedInt(width) = param.descriptor.category {
        return validate_unsigned(&param.name, text, width, param.optional, options);
    }

    match encode_argument(param, text) {
        Ok(None) => ValidationOutcome::empty(),
        Ok(Some(encoded)) => ValidationOutcome::ok(normalized_text(&encoded)),
        Err(error) => ValidationOutcome::invalid(error),
    }
}

/// Canonical text of an encoded argument, for display next to the input.
pub fn normalized_text(encoded: &EncodedArgument) -> String {
    match encoded {
        EncodedArgument::Object { id } => id.clone(),
        EncodedArgument::Pure(PureValue::String(s)) => s.clone(),
        EncodedArgument::Pure(value) => match value.to_json() {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
        EncodedArgument::PureVector { values, .. } => {
            serde_json::Value::Array(values.iter().map(|v| v.to_json()).collect()).to_string()
        }
    }
}

/// Encode every parameter in order. Empty optional parameters are omitted.
///
/// Fails fast: the first invalid parameter is returned as the error and no
/// later parameter is looked at.
pub async fn build_arguments(
    params: &[ParameterSpec],
    inputs: &BTreeMap<String, String>,
    ctx: &BuildContext<'_>,
) -> Result<Vec<EncodedArgument>, ArgumentError> {
    let mut arguments = Vec::with_capacity(params.len());

    for param in params {
        let text = inputs.get(&param.name).map(String::as_str).unwrap_or("");
        let Some(encoded) = encode_argument(param, text)? else {
            continue;
        };

        if let EncodedArgument::Object { id } = &encoded {
            if ctx.directory.is_some() {
                resolve_object(&param.name, id, param.descriptor.object_type(), ctx.directory)
                    .await
                    .into_result()?;
            }
        }
        arguments.push(encoded);
    }

    debug!(
        network = %ctx.network,
        count = arguments.len(),
        "built call arguments"
    );
    Ok(arguments)
}

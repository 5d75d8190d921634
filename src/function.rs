//! Target function descriptors.

use serde::{Deserialize, Serialize};
use sui_call_codec::ParameterSpec;
use sui_call_types::TypeDescriptor;

/// Whether a call is submitted as a transaction or only simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
    Submit,
    Simulate,
}

impl std::fmt::Display for CallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallMode::Submit => write!(f, "submit"),
            CallMode::Simulate => write!(f, "simulate"),
        }
    }
}

/// One declared parameter, as the function's interface lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionParameter {
    pub name: String,
    pub type_string: String,
    #[serde(default)]
    pub optional: bool,
}

/// A callable function of a deployed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    /// `package::module`, e.g. `0x2::coin`.
    pub target_module: String,
    pub name: String,
    pub parameters: Vec<FunctionParameter>,
    /// Entry functions mutate state and need a signer; view functions are
    /// simulated.
    pub is_mutating: bool,
}

impl FunctionDescriptor {
    pub fn new(target_module: impl Into<String>, name: impl Into<String>, is_mutating: bool) -> Self {
        Self {
            target_module: target_module.into(),
            name: name.into(),
            parameters: Vec::new(),
            is_mutating,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, type_string: impl Into<String>) -> Self {
        self.parameters.push(FunctionParameter {
            name: name.into(),
            type_string: type_string.into(),
            optional: false,
        });
        self
    }

    pub fn with_optional_parameter(
        mut self,
        name: impl Into<String>,
        type_string: impl Into<String>,
    ) -> Self {
        self.parameters.push(FunctionParameter {
            name: name.into(),
            type_string: type_string.into(),
            optional: true,
        });
        self
    }

    /// Fully qualified call target, `package::module::function`.
    pub fn target(&self) -> String {
        format!("{}::{}", self.target_module, self.name)
    }

    pub fn mode(&self) -> CallMode {
        if self.is_mutating {
            CallMode::Submit
        } else {
            CallMode::Simulate
        }
    }

    /// Parameters the user fills in. The runtime-injected `TxContext` is
    /// dropped here, so it never reaches validation or encoding.
    pub fn user_parameters(&self) -> Vec<ParameterSpec> {
        self.parameters
            .iter()
            .filter_map(|p| {
                let descriptor = TypeDescriptor::parse(&p.type_string);
                if descriptor.is_tx_context() {
                    return None;
                }
                Some(ParameterSpec {
                    name: p.name.clone(),
                    descriptor,
                    optional: p.optional,
                })
            })
            .collect()
    }
}

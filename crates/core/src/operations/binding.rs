//! Parameter binding
//!
//! Turns a caller-supplied [`ParamSet`] into validated [`BoundArgs`] for one
//! operation. Positional values bind in declared order, named values bind by
//! name, and absent or `null` optional parameters take their declared
//! default. Nothing is coerced: a string where an integer is declared is an
//! error, not a parse attempt.

use std::str::FromStr;

use armory_domain::{ArmoryError, ParamSet, PvpBracket, Result};
use serde_json::Value;

use super::catalog::{ArgValue, OperationDescriptor, ParamKind, ParamSpec};

/// Validated arguments of one invocation, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundArgs {
    values: Vec<(&'static str, ArgValue)>,
}

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ArgValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind `params` against the operation's declared parameters.
///
/// # Errors
/// Returns `ArmoryError::InvalidParameter` when there are too many positional
/// values, a name is not declared, a required parameter is missing, or a value
/// has the wrong type or is outside its enumeration.
pub fn bind(descriptor: &OperationDescriptor, params: &ParamSet) -> Result<BoundArgs> {
    let operation = descriptor.name();
    let mut supplied: Vec<Option<&Value>> = vec![None; descriptor.params.len()];

    match params {
        ParamSet::Positional(values) => {
            if values.len() > descriptor.params.len() {
                return Err(ArmoryError::invalid_parameter(
                    operation,
                    format!(
                        "expected at most {} argument(s), got {}",
                        descriptor.params.len(),
                        values.len()
                    ),
                ));
            }
            for (slot, value) in supplied.iter_mut().zip(values) {
                *slot = Some(value);
            }
        }
        ParamSet::Named(map) => {
            for (name, value) in map {
                let index = descriptor.position_of(name).ok_or_else(|| {
                    ArmoryError::invalid_parameter(operation, format!("unknown parameter `{name}`"))
                })?;
                supplied[index] = Some(value);
            }
        }
    }

    let values = descriptor
        .params
        .iter()
        .zip(supplied)
        .map(|(spec, value)| bind_one(operation, spec, value).map(|v| (spec.name, v)))
        .collect::<Result<Vec<_>>>()?;

    Ok(BoundArgs { values })
}

fn bind_one(operation: &str, spec: &ParamSpec, value: Option<&Value>) -> Result<ArgValue> {
    match value.filter(|v| !v.is_null()) {
        Some(value) => coerce(operation, spec, value),
        None => spec.default.clone().ok_or_else(|| {
            ArmoryError::invalid_parameter(
                operation,
                format!("missing required parameter `{}`", spec.name),
            )
        }),
    }
}

fn coerce(operation: &str, spec: &ParamSpec, value: &Value) -> Result<ArgValue> {
    let mismatch = || {
        ArmoryError::invalid_parameter(
            operation,
            format!("`{}` must be {}, got {value}", spec.name, spec.kind.describe()),
        )
    };

    match spec.kind {
        ParamKind::Integer => value.as_i64().map(ArgValue::Integer).ok_or_else(mismatch),
        ParamKind::Text => value.as_str().map(|s| ArgValue::Text(s.to_string())).ok_or_else(mismatch),
        ParamKind::TextList => value
            .as_array()
            .ok_or_else(mismatch)?
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
            .collect::<Result<Vec<_>>>()
            .map(ArgValue::TextList),
        ParamKind::Bracket => {
            let code = value.as_str().ok_or_else(mismatch)?;
            PvpBracket::from_str(code).map(ArgValue::Bracket).map_err(|_| {
                let expected: Vec<_> = PvpBracket::ALL.iter().map(PvpBracket::as_str).collect();
                ArmoryError::invalid_parameter(
                    operation,
                    format!("invalid pvp bracket `{code}`, expected one of {}", expected.join(", ")),
                )
            })
        }
    }
}

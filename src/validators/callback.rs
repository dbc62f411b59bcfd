use crate::callback::{Signature, Type};
use crate::errors::{CallbackError, Diagnostic};
use serde_json::Value;

const PARAM_TEMPLATE: &str = "the callback expects a parameter of type \"{expected}\"";

/// Check a declared signature against what the call site expects.
///
/// Clauses are checked in a fixed order and the first violation is reported:
/// return type present, single return type, return type matches, exactly one
/// parameter, parameter typed, single parameter type, parameter type matches.
#[track_caller]
pub fn validate(signature: &Signature, param: Type, returns: Type) -> Result<(), CallbackError> {
    let expected_return = Value::String(returns.to_string());
    let expected_param = Value::String(param.to_string());

    let declared = match signature.returns.as_slice() {
        [] => {
            return Err(CallbackError::MissingReturnType(Diagnostic::new(
                "callback without return type",
                signature.to_string(),
                "the callback must return \"{expected}\"",
                &[("expected", expected_return)],
            )))
        }
        [single] => *single,
        many => {
            return Err(CallbackError::MultipleReturnTypes(Diagnostic::new(
                "invalid return type",
                signature.to_string(),
                "the callback must return \"{expected}\" but declares \"{declared}\"",
                &[("expected", expected_return), ("declared", union(many))],
            )))
        }
    };
    if declared != returns {
        return Err(CallbackError::WrongReturnType(Diagnostic::new(
            "invalid return type",
            signature.to_string(),
            "the callback must return \"{expected}\" but returns \"{declared}\"",
            &[("expected", expected_return), ("declared", Value::String(declared.to_string()))],
        )));
    }

    let first = match signature.params.as_slice() {
        [only] => only,
        params => {
            return Err(CallbackError::WrongParamCount(Diagnostic::new(
                "unexpected parameter count",
                signature.to_string(),
                "the callback must take exactly 1 parameter but declares {count}",
                &[("count", Value::from(params.len()))],
            )))
        }
    };
    let name = Value::String(first.name.clone());

    let declared = match first.types.as_slice() {
        [] => {
            return Err(CallbackError::UntypedParam(Diagnostic::new(
                "invalid parameter type",
                first.name.clone(),
                &format!("{PARAM_TEMPLATE} but \"{{param}}\" has no declared type"),
                &[("expected", expected_param), ("param", name)],
            )))
        }
        [single] => *single,
        many => {
            return Err(CallbackError::MultipleParamTypes(Diagnostic::new(
                "invalid parameter type",
                first.name.clone(),
                &format!("{PARAM_TEMPLATE} but \"{{param}}\" declares \"{{declared}}\""),
                &[("expected", expected_param), ("param", name), ("declared", union(many))],
            )))
        }
    };
    if declared != param {
        return Err(CallbackError::WrongParamType(Diagnostic::new(
            "invalid parameter type",
            first.name.clone(),
            &format!("{PARAM_TEMPLATE} but \"{{param}}\" is of type \"{{declared}}\""),
            &[
                ("expected", expected_param),
                ("param", name),
                ("declared", Value::String(declared.to_string())),
            ],
        )));
    }
    Ok(())
}

fn union(types: &[Type]) -> Value {
    Value::String(types.iter().map(Type::to_string).collect::<Vec<_>>().join("|"))
}

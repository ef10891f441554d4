//! Validation of bound values against parameter descriptors
//!
//! Checks run per parameter in a fixed order: presence, type, choices, input
//! file existence, custom validator. Parameters are visited in declaration
//! order and the first failure is returned.

use crate::{
    core::{
        bindings::{Bindings, BoundValues},
        parameter::{ParameterDescriptor, ParameterKind, join_values},
        registry::ParameterRegistry,
        value::Value,
    },
    error::{Result, WrapperError},
};
use tracing::{debug, instrument};

/// Validate caller bindings against a registry.
///
/// Unknown names are rejected first so a typo is reported as such rather than
/// as a missing required parameter.
#[instrument(skip_all, fields(command = registry.command()))]
pub fn validate_bindings(registry: &ParameterRegistry, bindings: &Bindings) -> Result<BoundValues> {
    if let Some(unknown) = bindings.names().find(|name| !registry.contains(name)) {
        return Err(WrapperError::unknown_parameter(unknown, registry.command()));
    }

    let slots = registry
        .iter()
        .map(|descriptor| {
            let value = validate_value(descriptor, bindings.get(descriptor.name()))?;
            Ok((descriptor.name().to_string(), value))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Validated {} parameter(s)", slots.len());
    Ok(BoundValues::from_slots(slots))
}

/// Validate and coerce a single value, falling back to the default when unbound.
///
/// Returns `Ok(None)` for an optional parameter with neither value nor default.
pub fn validate_value(
    descriptor: &ParameterDescriptor,
    raw: Option<&Value>,
) -> Result<Option<Value>> {
    let name = descriptor.name();

    let Some(raw) = raw
        .filter(|v| !is_empty_list(v))
        .or(descriptor.default_value())
    else {
        if descriptor.is_required() {
            return Err(WrapperError::missing_parameter(name));
        }
        return Ok(None);
    };

    let value = coerce(descriptor, raw)?;
    check_choices(descriptor, &value)?;
    check_input_files(descriptor, &value)?;

    match descriptor.validator() {
        Some(validator) => validator
            .validate(&value)
            .map(Some)
            .map_err(|message| WrapperError::custom_validation(name, message)),
        None => Ok(Some(value)),
    }
}

fn is_empty_list(value: &Value) -> bool {
    matches!(value, Value::List(items) if items.is_empty())
}

fn coerce(descriptor: &ParameterDescriptor, raw: &Value) -> Result<Value> {
    let target = descriptor.value_type();
    let mismatch = |received: &Value| {
        WrapperError::type_validation(descriptor.name(), target.name(), received.describe())
    };

    match (descriptor.is_multiple(), raw) {
        (true, Value::List(items)) => items
            .iter()
            .map(|item| item.coerce(target).ok_or_else(|| mismatch(item)))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        // A lone value for a multi-valued parameter is a one-element list
        (true, scalar) => scalar
            .coerce(target)
            .map(|v| Value::List(vec![v]))
            .ok_or_else(|| mismatch(scalar)),
        (false, scalar) => scalar.coerce(target).ok_or_else(|| mismatch(scalar)),
    }
}

fn check_choices(descriptor: &ParameterDescriptor, value: &Value) -> Result<()> {
    let Some(choices) = descriptor.choices() else {
        return Ok(());
    };

    match value.as_slice().iter().find(|v| !choices.contains(v)) {
        Some(outside) => Err(WrapperError::invalid_choice(
            descriptor.name(),
            join_values(choices),
            outside.to_arg(),
        )),
        None => Ok(()),
    }
}

fn check_input_files(descriptor: &ParameterDescriptor, value: &Value) -> Result<()> {
    match descriptor.kind() {
        ParameterKind::InputFile => {
            match value
                .as_slice()
                .iter()
                .filter_map(Value::as_path)
                .find(|path| !path.exists())
            {
                Some(missing) => Err(WrapperError::file_not_found(descriptor.name(), missing)),
                None => Ok(()),
            }
        }
        ParameterKind::Flag | ParameterKind::Option | ParameterKind::OutputFile => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ValueType;
    use std::fs;
    use tempfile::TempDir;

    fn dbtype() -> ParameterDescriptor {
        ParameterDescriptor::option("dbtype", ValueType::Integer)
            .with_flag("--dbtype")
            .choices([0, 1, 2])
            .default(0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_type_conversion() {
        let param = ParameterDescriptor::option("int_param", ValueType::Integer)
            .default(0)
            .build()
            .unwrap();
        let value = validate_value(&param, Some(&Value::from("42"))).unwrap();
        assert_eq!(value, Some(Value::Integer(42)));
    }

    #[test]
    fn test_type_mismatch_names_parameter_and_type() {
        let param = ParameterDescriptor::option("min_seq_id", ValueType::Real)
            .build()
            .unwrap();
        let err = validate_value(&param, Some(&Value::from("not_a_number"))).unwrap_err();
        match err {
            WrapperError::TypeValidation {
                parameter,
                expected,
                received,
            } => {
                assert_eq!(parameter, "min_seq_id");
                assert_eq!(expected, "real number");
                assert!(received.contains("not_a_number"));
            }
            other => panic!("Expected TypeValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_choices() {
        let param = dbtype();
        assert_eq!(
            validate_value(&param, Some(&Value::Integer(1))).unwrap(),
            Some(Value::Integer(1))
        );

        let err = validate_value(&param, Some(&Value::Integer(5))).unwrap_err();
        match err {
            WrapperError::InvalidChoice {
                parameter, allowed, ..
            } => {
                assert_eq!(parameter, "dbtype");
                assert_eq!(allowed, "0, 1, 2");
            }
            other => panic!("Expected InvalidChoice, got {other:?}"),
        }
    }

    #[test]
    fn test_required_without_value() {
        let param = ParameterDescriptor::option("required_param", ValueType::Text)
            .required(true)
            .build()
            .unwrap();
        let err = validate_value(&param, None).unwrap_err();
        assert!(
            matches!(err, WrapperError::MissingParameter { ref parameter } if parameter == "required_param")
        );

        let err = validate_value(&param, Some(&Value::List(vec![]))).unwrap_err();
        assert!(matches!(err, WrapperError::MissingParameter { .. }));
    }

    #[test]
    fn test_required_with_default_is_satisfied() {
        let param = ParameterDescriptor::option("v", ValueType::Integer)
            .required(true)
            .default(3)
            .build()
            .unwrap();
        assert_eq!(validate_value(&param, None).unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn test_optional_without_default_is_unbound() {
        let param = ParameterDescriptor::option("threads", ValueType::Integer)
            .build()
            .unwrap();
        assert_eq!(validate_value(&param, None).unwrap(), None);
    }

    #[test]
    fn test_input_file_existence() {
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("input.fasta");
        fs::write(&existing, ">seq1\nAAAA\n").unwrap();
        let missing = temp_dir.path().join("missing.fasta");

        let input = ParameterDescriptor::input_file("input_file").build().unwrap();
        assert!(validate_value(&input, Some(&Value::from(existing.clone()))).is_ok());

        let err = validate_value(&input, Some(&Value::from(missing.clone()))).unwrap_err();
        assert!(matches!(err, WrapperError::FileNotFound { .. }));

        let output = ParameterDescriptor::output_file("output_file").build().unwrap();
        assert_eq!(
            validate_value(&output, Some(&Value::from(missing.clone()))).unwrap(),
            Some(Value::Path(missing))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_input_path_is_a_type_error() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(OsStr::from_bytes(b"a\xff.fasta"));
        fs::write(&path, ">seq1\nAAAA\n").unwrap();
        assert!(path.exists());

        let input = ParameterDescriptor::input_file("input_file").build().unwrap();
        let err = validate_value(&input, Some(&Value::from(path))).unwrap_err();
        match err {
            WrapperError::TypeValidation {
                parameter,
                received,
                ..
            } => {
                assert_eq!(parameter, "input_file");
                assert!(received.contains("non-UTF-8"));
            }
            other => panic!("Expected TypeValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_integer_out_of_range_is_rejected() {
        let param = ParameterDescriptor::option("id_offset", ValueType::Integer)
            .build()
            .unwrap();
        let err = validate_value(&param, Some(&Value::Real(1e20))).unwrap_err();
        assert!(matches!(err, WrapperError::TypeValidation { .. }));
    }

    #[test]
    fn test_multiple_input_files_name_the_missing_one() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.fasta");
        let b = temp_dir.path().join("b.fasta");
        fs::write(&a, ">a\nMK\n").unwrap();

        let param = ParameterDescriptor::input_file("input_files")
            .positional()
            .multiple(true)
            .build()
            .unwrap();

        let err = validate_value(&param, Some(&Value::from(vec![a, b.clone()]))).unwrap_err();
        match err {
            WrapperError::FileNotFound { parameter, path } => {
                assert_eq!(parameter, "input_files");
                assert_eq!(path, b);
            }
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_promoted_for_multiple() {
        let param = ParameterDescriptor::output_file("outputs")
            .multiple(true)
            .build()
            .unwrap();
        let value = validate_value(&param, Some(&Value::from("out"))).unwrap();
        assert_eq!(value, Some(Value::List(vec![Value::Path("out".into())])));
    }

    #[test]
    fn test_list_for_single_value_is_rejected() {
        let param = dbtype();
        let err = validate_value(&param, Some(&Value::from(vec![1, 2]))).unwrap_err();
        assert!(matches!(err, WrapperError::TypeValidation { .. }));
    }

    #[test]
    fn test_custom_validator_transforms_and_rejects() {
        let param = ParameterDescriptor::option("threads", ValueType::Integer)
            .validator(|value: &Value| match value {
                Value::Integer(n) if *n > 0 => Ok(Value::Integer((*n).min(64))),
                _ => Err("threads must be positive".to_string()),
            })
            .build()
            .unwrap();

        assert_eq!(
            validate_value(&param, Some(&Value::Integer(128))).unwrap(),
            Some(Value::Integer(64))
        );

        let err = validate_value(&param, Some(&Value::Integer(0))).unwrap_err();
        match err {
            WrapperError::CustomValidation { parameter, message } => {
                assert_eq!(parameter, "threads");
                assert_eq!(message, "threads must be positive");
            }
            other => panic!("Expected CustomValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_bindings_fail_fast_in_declaration_order() {
        let mut registry = ParameterRegistry::new("mock-command");
        registry
            .add(
                ParameterDescriptor::input_file("input_file")
                    .positional()
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry.add(dbtype()).unwrap();

        // Both are invalid; the first declared parameter is reported.
        let bindings = Bindings::new()
            .set("dbtype", 9)
            .set("input_file", "/non/existent/file.fasta");
        let err = validate_bindings(&registry, &bindings).unwrap_err();
        assert_eq!(err.parameter(), Some("input_file"));
    }

    #[test]
    fn test_unknown_binding_is_rejected() {
        let mut registry = ParameterRegistry::new("mock-command");
        registry.add(dbtype()).unwrap();

        let err = validate_bindings(&registry, &Bindings::new().set("db_type", 1)).unwrap_err();
        assert!(matches!(err, WrapperError::UnknownParameter { ref parameter, .. } if parameter == "db_type"));
    }

    #[test]
    fn test_bindings_use_defaults() {
        let mut registry = ParameterRegistry::new("mock-command");
        registry.add(dbtype()).unwrap();
        registry.add(ParameterDescriptor::flag("shuffle").build().unwrap()).unwrap();

        let bound = validate_bindings(&registry, &Bindings::new().set("shuffle", true)).unwrap();
        assert_eq!(bound.get("dbtype"), Some(&Value::Integer(0)));
        assert_eq!(bound.get("shuffle"), Some(&Value::Boolean(true)));
    }
}

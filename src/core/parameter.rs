//! Declarative parameter descriptors
//!
//! A [`ParameterDescriptor`] describes one command-line parameter accepted by
//! an MMseqs2 subcommand. Descriptors are built with [`ParameterBuilder`],
//! which checks the descriptor's own invariants; uniqueness within a command
//! is checked by [`crate::core::ParameterRegistry`].

use crate::{
    core::value::{Value, ValueType},
    error::{Result, WrapperError},
};
use regex::Regex;
use std::{fmt, sync::Arc, sync::OnceLock};

/// Role a parameter plays on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Switch emitted alone when true
    Flag,
    /// Flag followed by a value
    Option,
    /// Path that must exist at validation time
    InputFile,
    /// Path written by the tool; never checked
    OutputFile,
}

impl ParameterKind {
    pub const fn is_file(self) -> bool {
        matches!(self, Self::InputFile | Self::OutputFile)
    }
}

/// Additional check or transform applied to a coerced value.
///
/// Implementations must be pure. Returning `Err` rejects the value with the
/// given message; returning `Ok` binds the (possibly transformed) value.
pub trait ValueValidator: Send + Sync {
    fn validate(&self, value: &Value) -> std::result::Result<Value, String>;
}

impl<F> ValueValidator for F
where
    F: Fn(&Value) -> std::result::Result<Value, String> + Send + Sync,
{
    fn validate(&self, value: &Value) -> std::result::Result<Value, String> {
        self(value)
    }
}

/// Immutable description of one accepted parameter
#[derive(Clone)]
pub struct ParameterDescriptor {
    name: String,
    flag: String,
    description: String,
    kind: ParameterKind,
    value_type: ValueType,
    default: Option<Value>,
    choices: Option<Vec<Value>>,
    required: bool,
    multiple: bool,
    validator: Option<Arc<dyn ValueValidator>>,
}

impl ParameterDescriptor {
    /// Start a boolean flag; defaults to `false`
    pub fn flag(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Flag, ValueType::Boolean)
            .default(false)
    }

    /// Start a single-value option of the given type
    pub fn option(name: impl Into<String>, value_type: ValueType) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Option, value_type)
    }

    /// Start a required input file reference
    pub fn input_file(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::InputFile, ValueType::Path).required(true)
    }

    /// Start a required output file reference
    pub fn output_file(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::OutputFile, ValueType::Path).required(true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flag_token(&self) -> &str {
        &self.flag
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    pub const fn is_required(&self) -> bool {
        self.required
    }

    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Whether the parameter is rendered without a preceding flag token
    pub fn is_positional(&self) -> bool {
        self.flag.is_empty()
    }

    pub(crate) fn validator(&self) -> Option<&dyn ValueValidator> {
        self.validator.as_deref()
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("flag", &self.flag)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("default", &self.default)
            .field("choices", &self.choices)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Builder for [`ParameterDescriptor`]
#[must_use]
pub struct ParameterBuilder {
    descriptor: ParameterDescriptor,
}

impl ParameterBuilder {
    fn new(name: impl Into<String>, kind: ParameterKind, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            descriptor: ParameterDescriptor {
                flag: derive_flag(&name),
                name,
                description: String::new(),
                kind,
                value_type,
                default: None,
                choices: None,
                required: false,
                multiple: false,
                validator: None,
            },
        }
    }

    /// Override the flag derived from the name
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.descriptor.flag = flag.into();
        self
    }

    /// Render the value without a flag token
    pub fn positional(mut self) -> Self {
        self.descriptor.flag.clear();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = description.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.descriptor.value_type = value_type;
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.descriptor.default = Some(default.into());
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.descriptor.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.descriptor.required = required;
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.descriptor.multiple = multiple;
        self
    }

    pub fn validator(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.descriptor.validator = Some(Arc::new(validator));
        self
    }

    /// Check the descriptor's invariants and produce it
    pub fn build(self) -> Result<ParameterDescriptor> {
        let mut d = self.descriptor;

        if d.name.trim().is_empty() {
            return Err(WrapperError::configuration(d.name, "name must not be empty"));
        }

        if d.kind == ParameterKind::Flag {
            if d.multiple {
                return Err(WrapperError::configuration(
                    d.name,
                    "a boolean flag cannot accept multiple values",
                ));
            }
            if d.value_type != ValueType::Boolean {
                return Err(WrapperError::configuration(
                    d.name,
                    format!("a boolean flag must have boolean values, not {}", d.value_type),
                ));
            }
            if d.flag.is_empty() {
                return Err(WrapperError::configuration(
                    d.name,
                    "a boolean flag cannot be positional",
                ));
            }
        }

        if d.kind.is_file() && d.value_type != ValueType::Path {
            return Err(WrapperError::configuration(
                d.name,
                format!("a file parameter must have path values, not {}", d.value_type),
            ));
        }

        if !d.flag.is_empty() && !flag_pattern().is_match(&d.flag) {
            return Err(WrapperError::configuration(
                d.name,
                format!("flag '{}' must look like -x or --long-name", d.flag),
            ));
        }

        if let Some(choices) = d.choices.take() {
            let coerced = choices
                .iter()
                .map(|choice| {
                    choice.coerce(d.value_type).ok_or_else(|| {
                        WrapperError::configuration(
                            &d.name,
                            format!("choice {} is not a valid {}", choice.describe(), d.value_type),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            d.choices = Some(coerced);
        }

        if let Some(default) = d.default.take() {
            let coerced = coerce_default(&d, &default)?;
            if let Some(choices) = &d.choices {
                if let Some(outside) = coerced.as_slice().iter().find(|v| !choices.contains(v)) {
                    return Err(WrapperError::configuration(
                        d.name,
                        format!(
                            "default {} is not among the allowed choices [{}]",
                            outside,
                            join_values(choices)
                        ),
                    ));
                }
            }
            d.default = Some(coerced);
        }

        Ok(d)
    }
}

fn coerce_default(d: &ParameterDescriptor, default: &Value) -> Result<Value> {
    let invalid = || {
        WrapperError::configuration(
            &d.name,
            format!("default {} is not a valid {}", default.describe(), d.value_type),
        )
    };

    match default {
        Value::List(items) if d.multiple => items
            .iter()
            .map(|item| item.coerce(d.value_type).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        Value::List(_) => Err(invalid()),
        scalar => scalar.coerce(d.value_type).ok_or_else(invalid),
    }
}

/// `-v` for one-letter names, `--min-seq-id` for `min_seq_id`
fn derive_flag(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{}", name.replace('_', "-"))
    }
}

fn flag_pattern() -> &'static Regex {
    static FLAG: OnceLock<Regex> = OnceLock::new();
    FLAG.get_or_init(|| {
        Regex::new(r"^(-[A-Za-z0-9]|--[A-Za-z0-9][A-Za-z0-9_-]*)$")
            .expect("Failed to compile flag regex")
    })
}

pub(crate) fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_arg)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_creation() {
        let param = ParameterDescriptor::option("test_param", ValueType::Integer)
            .with_flag("--test")
            .description("A test parameter")
            .default(42)
            .build()
            .unwrap();

        assert_eq!(param.name(), "test_param");
        assert_eq!(param.flag_token(), "--test");
        assert_eq!(param.value_type(), ValueType::Integer);
        assert_eq!(param.default_value(), Some(&Value::Integer(42)));
        assert!(!param.is_required());
    }

    #[test]
    fn test_derived_flags() {
        let short = ParameterDescriptor::option("v", ValueType::Integer).build().unwrap();
        assert_eq!(short.flag_token(), "-v");

        let long = ParameterDescriptor::option("min_seq_id", ValueType::Real)
            .build()
            .unwrap();
        assert_eq!(long.flag_token(), "--min-seq-id");

        let input = ParameterDescriptor::input_file("query_db").build().unwrap();
        assert_eq!(input.flag_token(), "--query-db");
        assert!(input.is_required());
        assert_eq!(input.kind(), ParameterKind::InputFile);
    }

    #[test]
    fn test_flag_defaults_to_false() {
        let flag = ParameterDescriptor::flag("verbose").build().unwrap();
        assert_eq!(flag.value_type(), ValueType::Boolean);
        assert_eq!(flag.default_value(), Some(&Value::Boolean(false)));
        assert!(!flag.is_required());
    }

    #[test]
    fn test_multiple_flag_is_rejected() {
        let err = ParameterDescriptor::flag("shuffle")
            .multiple(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, WrapperError::Configuration { ref parameter, .. } if parameter == "shuffle"));
    }

    #[test]
    fn test_default_outside_choices_is_rejected() {
        let err = ParameterDescriptor::option("dbtype", ValueType::Integer)
            .choices([0, 1, 2])
            .default(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, WrapperError::Configuration { .. }));
        assert!(err.to_string().contains("dbtype"));
    }

    #[test]
    fn test_default_must_match_type() {
        let err = ParameterDescriptor::option("id_offset", ValueType::Integer)
            .default("zero")
            .build()
            .unwrap_err();
        assert!(matches!(err, WrapperError::Configuration { .. }));
    }

    #[test]
    fn test_choices_are_coerced() {
        let param = ParameterDescriptor::option("min_seq_id", ValueType::Real)
            .choices([0, 1])
            .default(1)
            .build()
            .unwrap();
        assert_eq!(param.choices(), Some(&[Value::Real(0.0), Value::Real(1.0)][..]));
        assert_eq!(param.default_value(), Some(&Value::Real(1.0)));
    }

    #[test]
    fn test_malformed_flag_is_rejected() {
        let err = ParameterDescriptor::option("threads", ValueType::Integer)
            .with_flag("threads")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("-x or --long-name"));
    }

    #[test]
    fn test_positional_flag_rejected() {
        let err = ParameterDescriptor::flag("compressed")
            .positional()
            .build()
            .unwrap_err();
        assert!(matches!(err, WrapperError::Configuration { .. }));
    }

    #[test]
    fn test_positional_file() {
        let param = ParameterDescriptor::output_file("output_db")
            .positional()
            .build()
            .unwrap();
        assert!(param.is_positional());
        assert!(param.kind().is_file());
    }

    #[test]
    fn test_file_parameter_requires_path_type() {
        let err = ParameterDescriptor::input_file("input_file")
            .value_type(ValueType::Text)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("path values"));
    }
}

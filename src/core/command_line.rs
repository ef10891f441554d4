//! Command-line assembly
//!
//! Turns a registry plus validated values into the exact argv token list that
//! is executed, and into a shell-quoted preview used only for display.

use crate::core::{
    bindings::BoundValues,
    parameter::{ParameterDescriptor, ParameterKind},
    registry::ParameterRegistry,
    value::Value,
};
use std::path::Path;

/// Whether values equal to a descriptor's default are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultPolicy {
    /// Render every bound value, defaults included
    #[default]
    Emit,
    /// Skip values equal to the default and let the tool apply its own
    Omit,
}

/// Builds argv token lists for one command
#[derive(Debug, Clone, Copy)]
pub struct CommandLineBuilder<'a> {
    registry: &'a ParameterRegistry,
    policy: DefaultPolicy,
}

impl<'a> CommandLineBuilder<'a> {
    pub const fn new(registry: &'a ParameterRegistry) -> Self {
        Self {
            registry,
            policy: DefaultPolicy::Emit,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: DefaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build `[executable, command_name, ...parameter tokens]`.
    ///
    /// Values are assumed to be validated; nothing is checked and the
    /// filesystem is never touched.
    pub fn build(&self, executable: &Path, values: &BoundValues) -> Vec<String> {
        let mut tokens = vec![
            executable.to_string_lossy().into_owned(),
            self.registry.command().to_string(),
        ];

        for descriptor in self.registry.iter() {
            let Some(value) = values.get(descriptor.name()) else {
                continue;
            };
            if self.policy == DefaultPolicy::Omit && descriptor.default_value() == Some(value) {
                continue;
            }
            tokens.extend(render_parameter(descriptor, value));
        }

        tokens
    }
}

/// Tokens for one parameter.
///
/// Multi-valued parameters emit their flag once followed by every value as a
/// separate token.
pub fn render_parameter(descriptor: &ParameterDescriptor, value: &Value) -> Vec<String> {
    let flag = descriptor.flag_token();

    match descriptor.kind() {
        ParameterKind::Flag => match value.as_bool() {
            Some(true) => vec![flag.to_string()],
            _ => Vec::new(),
        },
        ParameterKind::Option | ParameterKind::InputFile | ParameterKind::OutputFile => {
            let values = value.as_slice();
            if values.is_empty() {
                return Vec::new();
            }

            let mut tokens = Vec::with_capacity(values.len() + 1);
            if !flag.is_empty() {
                tokens.push(flag.to_string());
            }
            tokens.extend(values.iter().map(Value::to_arg));
            tokens
        }
    }
}

/// Join tokens with spaces, quoting any that the shell would split or expand
pub fn preview<S: AsRef<str>>(tokens: &[S]) -> String {
    shell_words::join(tokens)
}

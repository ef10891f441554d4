//! Ordered parameter registry owned by a single command

use crate::{
    core::parameter::ParameterDescriptor,
    error::{Result, WrapperError},
};
use std::collections::HashMap;
use tracing::debug;

/// Declaration-ordered collection of parameter descriptors
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    command: String,
    descriptors: Vec<ParameterDescriptor>,
    index: HashMap<String, usize>,
}

/// Help-oriented summary of one parameter
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParameterSummary {
    pub name: String,
    pub flag: String,
    pub kind: String,
    pub value_type: String,
    pub required: bool,
    pub multiple: bool,
    pub default: Option<String>,
    pub choices: Option<Vec<String>>,
    pub description: String,
}

impl ParameterRegistry {
    /// Create an empty registry for the named command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            descriptors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a descriptor; names must be unique
    pub fn add(&mut self, descriptor: ParameterDescriptor) -> Result<()> {
        if self.index.contains_key(descriptor.name()) {
            return Err(WrapperError::configuration(
                descriptor.name(),
                format!(
                    "parameter is declared more than once for command '{}'",
                    self.command
                ),
            ));
        }

        debug!(
            "Registering parameter '{}' ({:?}) for {}",
            descriptor.name(),
            descriptor.kind(),
            self.command
        );
        self.index
            .insert(descriptor.name().to_string(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Look up a descriptor by name
    pub fn get(&self, name: &str) -> Result<&ParameterDescriptor> {
        self.index
            .get(name)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| WrapperError::unknown_parameter(name, &self.command))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors.iter()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(ParameterDescriptor::name).collect()
    }

    /// Summaries of every parameter, for help output
    pub fn summaries(&self) -> Vec<ParameterSummary> {
        self.descriptors
            .iter()
            .map(|d| ParameterSummary {
                name: d.name().to_string(),
                flag: d.flag_token().to_string(),
                kind: format!("{:?}", d.kind()),
                value_type: d.value_type().to_string(),
                required: d.is_required(),
                multiple: d.is_multiple(),
                default: d.default_value().map(ToString::to_string),
                choices: d
                    .choices()
                    .map(|c| c.iter().map(ToString::to_string).collect()),
                description: d.description().to_string(),
            })
            .collect()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

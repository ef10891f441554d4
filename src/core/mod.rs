//! Core functionality for describing and running tool invocations
//!
//! Contains parameter descriptors and their registry, binding validation,
//! command-line assembly, and the command/result types.

pub mod bindings;
pub mod command;
pub mod command_line;
pub mod parameter;
pub mod registry;
pub mod result;
pub mod validator;
pub mod value;

pub use bindings::{Bindings, BoundValues};
pub use command::{Command, CommandDefinition, CommandState};
pub use command_line::{CommandLineBuilder, DefaultPolicy};
pub use parameter::{ParameterDescriptor, ParameterKind};
pub use registry::{ParameterRegistry, ParameterSummary};
pub use result::{CommandResult, ExecutionOutcome};
pub use value::{Value, ValueType};

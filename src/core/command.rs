//! Command definitions and validated, executable command instances
//!
//! A [`CommandDefinition`] supplies the subcommand name and declares its
//! parameters. [`Command`] pairs a definition with an executable path and a
//! validated set of bindings, and can be previewed or run.

use crate::{
    core::{
        bindings::{Bindings, BoundValues},
        command_line::{CommandLineBuilder, DefaultPolicy, preview},
        registry::{ParameterRegistry, ParameterSummary},
        result::CommandResult,
        validator::validate_bindings,
        value::Value,
    },
    error::{Result, WrapperError},
    utils::process::{Executor, RunOptions},
};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Declarative description of one MMseqs2 subcommand
pub trait CommandDefinition {
    /// Subcommand token passed to the tool, e.g. `createdb`
    fn command_name(&self) -> &str;

    /// Register every parameter the subcommand accepts, in command-line order
    fn init_parameters(&self, registry: &mut ParameterRegistry) -> Result<()>;

    /// Whether values equal to their default are rendered
    fn default_policy(&self) -> DefaultPolicy {
        DefaultPolicy::Emit
    }
}

/// Build the parameter registry for a definition
pub fn registry_for<D: CommandDefinition + ?Sized>(definition: &D) -> Result<ParameterRegistry> {
    let mut registry = ParameterRegistry::new(definition.command_name());
    definition.init_parameters(&mut registry)?;
    Ok(registry)
}

/// Lifecycle of a [`Command`]; construction only succeeds into `Validated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Validated,
    Executing,
    Completed,
}

/// A validated invocation of one subcommand
pub struct Command<D: CommandDefinition> {
    definition: D,
    executable: PathBuf,
    registry: ParameterRegistry,
    values: BoundValues,
    state: CommandState,
    single_use: bool,
    executor: Executor,
}

impl<D: CommandDefinition> Command<D> {
    /// Declare the definition's parameters and validate `bindings` against them.
    ///
    /// Fails on a malformed registry, an unknown binding name, or the first
    /// invalid value in declaration order.
    #[instrument(skip_all, fields(command = definition.command_name()))]
    pub fn new(definition: D, executable: impl Into<PathBuf>, bindings: Bindings) -> Result<Self> {
        let registry = registry_for(&definition)?;
        let values = validate_bindings(&registry, &bindings)?;
        debug!("Bound {} parameter(s) for {}", values.len(), registry.command());

        Ok(Self {
            definition,
            executable: executable.into(),
            registry,
            values,
            state: CommandState::Validated,
            single_use: false,
            executor: Executor::default(),
        })
    }

    /// Refuse any `run` after the first one
    #[must_use]
    pub fn single_use(mut self) -> Self {
        self.single_use = true;
        self
    }

    /// Log command lines at debug level instead of info
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.executor = Executor::new(debug);
        self
    }

    /// Subcommand token, e.g. `createdb`
    pub fn command_name(&self) -> &str {
        self.definition.command_name()
    }

    /// MMseqs2 executable the command line starts with
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Parameters declared by the definition
    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    /// Current lifecycle state
    pub const fn state(&self) -> CommandState {
        self.state
    }

    /// Bound value of a parameter; `None` when optional and unset
    pub fn get_parameter(&self, name: &str) -> Result<Option<&Value>> {
        self.registry.get(name)?;
        Ok(self.values.get(name))
    }

    /// Parameter names in declaration order
    pub fn list_parameters(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Names, flags, and descriptions for help output
    pub fn describe_parameters(&self) -> Vec<ParameterSummary> {
        self.registry.summaries()
    }

    /// The exact token list `run` executes
    pub fn command_line(&self) -> Vec<String> {
        CommandLineBuilder::new(&self.registry)
            .with_policy(self.definition.default_policy())
            .build(&self.executable, &self.values)
    }

    /// Shell-quoted rendering of [`Self::command_line`], for display only
    pub fn preview(&self) -> String {
        preview(&self.command_line())
    }

    /// Execute the command once.
    ///
    /// Only usage errors are returned as `Err`; a failed, timed-out or
    /// unlaunchable process is reported in the [`CommandResult`].
    #[instrument(skip_all, fields(command = self.definition.command_name()))]
    pub fn run(&mut self, options: &RunOptions) -> Result<CommandResult> {
        match self.state {
            CommandState::Validated => {}
            CommandState::Completed if !self.single_use => {}
            CommandState::Completed => {
                return Err(WrapperError::state(
                    self.command_name(),
                    "single-use command has already been executed; build a new one to run again",
                ));
            }
            CommandState::Executing => {
                return Err(WrapperError::state(
                    self.command_name(),
                    "command is already executing",
                ));
            }
        }

        let tokens = self.command_line();
        self.state = CommandState::Executing;
        let result = self.executor.execute(&tokens, options);
        self.state = CommandState::Completed;

        info!(
            "{} finished: success={}, returncode={}",
            self.command_name(),
            result.success(),
            result.returncode()
        );
        Ok(result)
    }
}

impl<D: CommandDefinition> fmt::Display for Command<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

impl<D: CommandDefinition> fmt::Debug for Command<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("command", &self.command_name())
            .field("executable", &self.executable)
            .field("values", &self.values)
            .field("state", &self.state)
            .finish()
    }
}

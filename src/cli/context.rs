use std::io;

use chrono::Duration;
use strsim::levenshtein;
use thiserror::Error;

use super::{
    commands,
    output,
    registry::{CommandEntry, CommandRegistry},
};
use crate::{
    config::{ConfigCache, ConfigError, JsonFileSource, SystemConfig},
    errors::RecurrenceError,
    recurrence::MAX_OCCURRENCES,
    time::SystemClock,
};

const CONFIG_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

/// State shared by every command in one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub last_command: Option<String>,
    registry: CommandRegistry,
    config: ConfigCache<JsonFileSource, SystemClock>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Self {
        Self::with_config_source(mode, JsonFileSource::default())
    }

    pub fn with_config_source(mode: CliMode, source: JsonFileSource) -> Self {
        let mut registry = CommandRegistry::default();
        commands::register_all(&mut registry);
        Self {
            mode,
            running: true,
            last_command: None,
            registry,
            config: ConfigCache::new(
                source,
                SystemClock,
                Duration::minutes(CONFIG_TTL_MINUTES),
            ),
        }
    }

    pub fn prompt(&self) -> String {
        "recurrence> ".into()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn commands(&self) -> Vec<&CommandEntry> {
        self.registry.list()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn config(&self) -> &ConfigCache<JsonFileSource, SystemClock> {
        &self.config
    }

    pub fn system_config(&self) -> Result<SystemConfig, ConfigError> {
        self.config.get()
    }

    /// Occurrence limit from the system configuration. Falls back to the built-in
    /// cap when the configuration cannot be read.
    pub fn occurrence_cap(&self) -> u32 {
        match self.config.get() {
            Ok(config) => config.occurrence_cap(),
            Err(err) => {
                tracing::warn!(error = %err, "system configuration unavailable");
                output::warning(format!("Configuration unavailable ({err}); using defaults."));
                MAX_OCCURRENCES
            }
        }
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match self.registry.handler(command) {
            Some(handler) => match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub fn report_error(&self, err: CommandError) {
        tracing::debug!(command = ?self.last_command, error = %err, "command failed");
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

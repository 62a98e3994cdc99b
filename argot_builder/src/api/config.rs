use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::api::binder::{BindError, Binder};
use crate::api::value::BoxError;

/// A config record: a struct whose fields are bound to the flags of one command.
///
/// Usually derived (see `argot::Config`), which wires [`Before`], [`Run`] and [`RunCancellable`] through.
/// A record is bound twice per command: once when the command is built to validate it and record its help,
/// and once more when its command is reached during parsing.
pub trait Config {
    /// Bind each field, in declaration order.
    fn bind<'b>(&'b mut self, binder: &mut Binder<'b>) -> Result<(), BindError>;

    /// Called after this command's flags are resolved, before descending into a sub-command.
    fn before(&mut self) -> Result<(), RunError> {
        Ok(())
    }

    /// Which run capability the record offers.
    fn run_mode(&self) -> RunMode {
        RunMode::None
    }

    /// Run the command.
    /// Only called when [`Config::run_mode`] is not [`RunMode::None`].
    fn run(&mut self, cancellation: &Cancellation) -> Result<(), RunError> {
        let _ = cancellation;
        Err(RunError::message("no run method implemented"))
    }
}

impl Config for () {
    fn bind<'b>(&'b mut self, _binder: &mut Binder<'b>) -> Result<(), BindError> {
        Ok(())
    }
}

/// The run capability of a config record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// The command cannot be run; it only groups sub-commands.
    None,
    /// The command runs without a cancellation handle.
    Plain,
    /// The command runs with a cancellation handle.
    Cancellable,
}

/// The pre-run hook of a config record.
pub trait Before {
    /// Called once this command's flags are resolved.
    fn before(&mut self) -> Result<(), RunError>;
}

/// The run capability of a config record.
pub trait Run {
    /// Run the command.
    fn run(&mut self) -> Result<(), RunError>;
}

/// The cancellable run capability of a config record.
pub trait RunCancellable {
    /// Run the command, observing the cancellation handle.
    fn run(&mut self, cancellation: &Cancellation) -> Result<(), RunError>;
}

/// A cancellation handle, shared between the caller of a run and the command being run.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    /// Create a handle that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone of this handle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Error returned from a hook or a run.
///
/// Optionally carries the process exit code, and whether help should be printed alongside it.
/// ```
/// # use argot_builder::RunError;
/// let error = RunError::message("bad input").with_exit_code(3).usage();
/// assert_eq!(error.exit_code(), Some(3));
/// assert!(error.is_usage());
/// assert_eq!(error.to_string(), "bad input");
/// ```
#[derive(Debug, Error)]
#[error("{source}")]
pub struct RunError {
    source: BoxError,
    exit_code: Option<i32>,
    usage: bool,
}

impl RunError {
    /// Wrap an error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
            exit_code: None,
            usage: false,
        }
    }

    /// Create an error from a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(message.into())
    }

    /// Set the process exit code.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    /// Mark as a usage error, so help is printed alongside it.
    pub fn usage(mut self) -> Self {
        self.usage = true;
        self
    }

    /// The process exit code, if one was set.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Whether help should be printed alongside the error.
    pub fn is_usage(&self) -> bool {
        self.usage
    }
}

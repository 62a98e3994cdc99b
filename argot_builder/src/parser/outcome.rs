use thiserror::Error;

use crate::api::{BuildError, Cancellation, CoercionError, Command, RunError, RunMode};
use crate::model::NodeId;
use crate::parser::{EnvError, ParseError};

/// Error for when the command line does not fit the command tree.
#[derive(Debug, Error)]
pub enum UsageError {
    /// The flags of a command could not be consumed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The first residual token names no child command.
    #[error("unknown command '{0}'.")]
    UnknownCommand(String),
    /// A command that only groups sub-commands was given none.
    #[error("no command specified.")]
    NoCommandSpecified,
    /// Residual tokens were given to a command that takes none.
    #[error("unexpected arguments: {}.", .0.join(" "))]
    UnexpectedArguments(Vec<String>),
    /// A required field was set neither by argument nor by environment.
    #[error("required flag '--{0}' not set.")]
    RequiredFieldMissing(String),
    /// An environment variable does not convert to its field's type.
    #[error("invalid value '{token}' for flag '--{name}' from environment variable {key}: {source}")]
    InvalidEnvValue {
        /// The environment variable.
        key: String,
        /// The flag name.
        name: String,
        /// The offending value.
        token: String,
        /// The conversion error.
        source: CoercionError,
    },
}

/// Error from parsing or running a command tree.
#[derive(Debug, Error)]
pub enum Error {
    /// The command line does not fit the command tree.
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// The help flag was set.
    #[error("help requested.")]
    HelpRequested,
    /// An environment variable could not be looked up.
    #[error(transparent)]
    EnvLookup(#[from] EnvError),
    /// A `before` hook failed.
    #[error(transparent)]
    Hook(RunError),
    /// The run failed.
    #[error(transparent)]
    Run(RunError),
    /// The command was run, but its config record has no run capability.
    #[error("no run method implemented.")]
    NoRunMethod,
    /// A config record failed to bind during parsing.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Error {
    /// The process exit code for the error.
    ///
    /// Help requests exit with `0`, run errors with their own code when they carry one, and everything else with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::HelpRequested => 0,
            Error::Hook(error) | Error::Run(error) => error.exit_code().unwrap_or(1),
            _ => 1,
        }
    }

    /// Whether help should be printed alongside the error.
    pub fn is_usage(&self) -> bool {
        match self {
            Error::Usage(_) | Error::HelpRequested => true,
            Error::Hook(error) | Error::Run(error) => error.is_usage(),
            _ => false,
        }
    }
}

/// The outcome of a parse: the command reached and the error, if any.
///
/// Borrows the command tree, so the config records can only be inspected once the result is dropped.
pub struct ParseResult<'c, 'a> {
    command: &'c mut Command<'a>,
    node: NodeId,
    error: Option<Error>,
}

impl<'c, 'a> std::fmt::Debug for ParseResult<'c, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseResult")
            .field("node", &self.node)
            .field("error", &self.error)
            .finish()
    }
}

impl<'c, 'a> ParseResult<'c, 'a> {
    pub(crate) fn new(command: &'c mut Command<'a>, node: NodeId, error: Option<Error>) -> Self {
        Self {
            command,
            node,
            error,
        }
    }

    /// The parse error, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take the parse error, if any, releasing the command tree.
    pub fn into_error(self) -> Option<Error> {
        self.error
    }

    /// The deepest command reached; on error, the command where the error occurred.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The help of the command reached.
    pub fn help(&self) -> String {
        self.command.help(self.node)
    }

    /// Run the command reached, with a cancellation handle that is never cancelled.
    ///
    /// A parse error is returned without running, after printing help if it is a usage error.
    pub fn run(self) -> Result<(), Error> {
        self.run_with(&Cancellation::new())
    }

    /// Run the command reached, forwarding the cancellation handle if the command accepts one.
    pub fn run_with(self, cancellation: &Cancellation) -> Result<(), Error> {
        let ParseResult {
            command,
            node,
            error,
        } = self;
        execute(command, node, error, cancellation)
    }

    /// Run the command reached and exit the process.
    ///
    /// Errors other than help requests are printed; the exit code follows [`Error::exit_code`].
    pub fn run_or_exit(self) -> ! {
        let code = self.run_to_exit_code(&Cancellation::new());
        std::process::exit(code);
    }

    /// Run the command reached, printing any error, and return the process exit code.
    pub fn run_to_exit_code(self, cancellation: &Cancellation) -> i32 {
        let ParseResult {
            command,
            node,
            error,
        } = self;

        match execute(command, node, error, cancellation) {
            Ok(()) => 0,
            Err(error) => {
                if !matches!(error, Error::HelpRequested) {
                    command.interface.print_error(format!("error: {error}"));
                }

                error.exit_code()
            }
        }
    }
}

fn execute(
    command: &mut Command<'_>,
    node: NodeId,
    error: Option<Error>,
    cancellation: &Cancellation,
) -> Result<(), Error> {
    let result = match error {
        Some(error) => Err(error),
        None => {
            let config = &mut *command.nodes[node.0].config;

            match config.run_mode() {
                RunMode::None => Err(Error::NoRunMethod),
                RunMode::Plain => config.run(&Cancellation::new()).map_err(Error::Run),
                RunMode::Cancellable => config.run(cancellation).map_err(Error::Run),
            }
        }
    };

    if let Err(error) = &result {
        if error.is_usage() {
            let help = command.help(node);

            match error {
                Error::HelpRequested => command.interface.print(help),
                _ => command.interface.print_error(help),
            }
        }
    }

    result
}

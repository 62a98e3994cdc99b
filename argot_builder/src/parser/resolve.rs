use std::env;

use crate::api::{Binder, Bindings, BuildError, Command, RunMode};
use crate::model::NodeId;
use crate::parser::tokenizer::tokenize;
use crate::parser::{Environment, Error, ParseResult, UsageError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

enum Step {
    Delegate { child: NodeId, args: Vec<String> },
    Runnable,
}

impl<'a> Command<'a> {
    /// Parse the process arguments (skipping the program name).
    pub fn parse(&mut self) -> ParseResult<'_, 'a> {
        self.parse_args(env::args().skip(1).collect())
    }

    /// Parse the given tokens.
    pub fn parse_tokens(&mut self, tokens: &[&str]) -> ParseResult<'_, 'a> {
        self.parse_args(tokens.iter().map(|token| token.to_string()).collect())
    }

    /// Parse the given arguments.
    ///
    /// Each command level binds its config record, consumes its flags, delegates to a child,
    /// or fills its positional arguments, then falls back to environment variables,
    /// checks required fields and calls its `before` hook.
    pub fn parse_args(&mut self, args: Vec<String>) -> ParseResult<'_, 'a> {
        let root = self.root();

        if let Some(node) = self.help_pass(root, &args) {
            return ParseResult::new(self, node, Some(Error::HelpRequested));
        }

        let mut node = root;
        let mut args = args;

        loop {
            match self.parse_level(node, args) {
                Ok(Step::Delegate { child, args: rest }) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Delegating to '{}'.", self.nodes[child.0].name);
                    }

                    node = child;
                    args = rest;
                }
                Ok(Step::Runnable) => return ParseResult::new(self, node, None),
                Err(error) => return ParseResult::new(self, node, Some(error)),
            }
        }
    }

    // Finds the command whose help was requested, without touching any config record.
    // A level whose record claims `help` itself has no help flag to scan for, but may still lead to a child that does.
    fn help_pass(&self, start: NodeId, args: &[String]) -> Option<NodeId> {
        let mut node = start;
        let mut args = args.to_vec();

        loop {
            let current = &self.nodes[node.0];
            let mut bindings = Bindings::help_only(current.help.clone());
            let residual = tokenize(&args, &mut bindings);

            if bindings.help_requested() {
                return Some(node);
            }

            let residual = residual.ok()?;
            let (first, rest) = residual.split_first()?;
            node = *current.lookup.get(first)?;
            args = rest.to_vec();
        }
    }

    fn parse_level(&mut self, node: NodeId, args: Vec<String>) -> Result<Step, Error> {
        let environment = &*self.environment;
        let current = &mut self.nodes[node.0];

        let delegate = {
            let mut binder = Binder::new();
            current
                .config
                .bind(&mut binder)
                .map_err(|source| BuildError::Bind {
                    command: current.name.clone(),
                    source,
                })?;
            let mut bindings = binder.finish();
            let residual = tokenize(&args, &mut bindings).map_err(UsageError::from)?;

            if bindings.help_requested() {
                return Err(Error::HelpRequested);
            }

            let delegate = if let Some(sink) = bindings.take_sink() {
                sink.fill(residual);
                None
            } else if !current.children.is_empty() {
                match residual.split_first() {
                    None => None,
                    Some((first, rest)) => match current.lookup.get(first) {
                        Some(child) => Some((*child, rest.to_vec())),
                        None => return Err(UsageError::UnknownCommand(first.clone()).into()),
                    },
                }
            } else if !residual.is_empty() {
                return Err(UsageError::UnexpectedArguments(residual).into());
            } else {
                None
            };

            merge_environment(&mut bindings, environment)?;
            check_required(&bindings)?;
            delegate
        };

        current.config.before().map_err(Error::Hook)?;

        match delegate {
            Some((child, args)) => Ok(Step::Delegate { child, args }),
            None if !current.children.is_empty() && current.config.run_mode() == RunMode::None => {
                Err(UsageError::NoCommandSpecified.into())
            }
            None => Ok(Step::Runnable),
        }
    }
}

// Fields not set by argument take their environment variable, when present.
fn merge_environment(
    bindings: &mut Bindings<'_>,
    environment: &dyn Environment,
) -> Result<(), Error> {
    for field in bindings.fields_mut() {
        let key = match &field.spec.env {
            Some(key) if field.set_count() == 0 => key.clone(),
            _ => continue,
        };

        if let Some(value) = environment.lookup(&key)? {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Setting '{}' from environment variable {key}.", field.spec.name);
            }

            field
                .set(&value)
                .map_err(|source| UsageError::InvalidEnvValue {
                    key,
                    name: field.spec.name.clone(),
                    token: value,
                    source,
                })?;
        }
    }

    Ok(())
}

fn check_required(bindings: &Bindings<'_>) -> Result<(), UsageError> {
    match bindings
        .fields()
        .iter()
        .find(|field| field.spec.required && field.set_count() == 0)
    {
        Some(field) => Err(UsageError::RequiredFieldMissing(field.spec.name.clone())),
        None => Ok(()),
    }
}

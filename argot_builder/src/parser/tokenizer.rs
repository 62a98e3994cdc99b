use thiserror::Error;

use crate::api::{Bindings, CoercionError};
use crate::constant::TRUE_LITERAL;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for when the flag tokens of one command cannot be consumed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token is shaped like a flag but is not one (ex: `---x`, `-=x`).
    #[error("bad flag syntax: {0}")]
    BadFlagSyntax(String),
    /// No field has the flag name.
    #[error("flag provided but not defined: -{0}")]
    UndefinedFlag(String),
    /// A flag that takes a value was given none.
    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),
    /// The flag's value does not convert to the field's type.
    #[error("invalid value '{token}' for flag -{name}: {source}")]
    InvalidValue {
        /// The flag name, as written.
        name: String,
        /// The offending value.
        token: String,
        /// The conversion error.
        source: CoercionError,
    },
}

/// Consume the leading flag tokens, writing into the bindings.
/// Returns the residual tokens, starting at the first non-flag token (or after `--`).
pub(crate) fn tokenize(args: &[String], bindings: &mut Bindings<'_>) -> Result<Vec<String>, ParseError> {
    let mut tokenizer = Tokenizer {
        remaining: args,
        bindings,
    };

    while tokenizer.next_flag()? {}

    Ok(tokenizer.remaining.to_vec())
}

struct Tokenizer<'t, 'b> {
    remaining: &'t [String],
    bindings: &'t mut Bindings<'b>,
}

impl<'t, 'b> Tokenizer<'t, 'b> {
    // Whether to keep going.
    fn next_flag(&mut self) -> Result<bool, ParseError> {
        let remaining = self.remaining;
        let Some((token, rest)) = remaining.split_first() else {
            return Ok(false);
        };

        if token.len() < 2 || !token.starts_with('-') {
            return Ok(false);
        }

        self.remaining = rest;

        if token == "--" {
            return Ok(false);
        }

        if let Some(long) = token.strip_prefix("--") {
            if long.starts_with('-') || long.starts_with('=') {
                return Err(ParseError::BadFlagSyntax(token.clone()));
            }

            let (name, value) = split_value(long);
            self.resolve(name, value, true)?;
        } else {
            let cluster = &token[1..];

            if cluster.starts_with('=') {
                return Err(ParseError::BadFlagSyntax(token.clone()));
            }

            // Only the last flag of a cluster may take the inline value, or the next token.
            let (cluster, value) = split_value(cluster);
            let mut characters = cluster.chars();
            let last = characters.next_back();

            for character in characters {
                self.resolve(&character.to_string(), None, false)?;
            }

            if let Some(last) = last {
                self.resolve(&last.to_string(), value, true)?;
            }
        }

        Ok(true)
    }

    fn resolve(&mut self, name: &str, value: Option<&str>, lookahead: bool) -> Result<(), ParseError> {
        let remaining = self.remaining;
        let field = self
            .bindings
            .field_mut(name)
            .ok_or_else(|| ParseError::UndefinedFlag(name.to_string()))?;

        let token = match value {
            Some(value) => value.to_string(),
            None if field.is_boolean() => TRUE_LITERAL.to_string(),
            None => match remaining.split_first() {
                Some((next, rest)) if lookahead => {
                    self.remaining = rest;
                    next.clone()
                }
                _ => return Err(ParseError::MissingArgument(name.to_string())),
            },
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Setting '{name}' from '{token}'.");
        }

        field.set(&token).map_err(|source| ParseError::InvalidValue {
            name: name.to_string(),
            token,
            source,
        })
    }
}

fn split_value(flag: &str) -> (&str, Option<&str>) {
    match flag.find('=') {
        Some(index) if index > 0 => (&flag[..index], Some(&flag[index + 1..])),
        _ => (flag, None),
    }
}

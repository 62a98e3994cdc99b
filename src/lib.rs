//! `argot` is a declarative command line parser for Rust.
//!
//! Describe the options of a command as the fields of a struct, tag each field with a short string of metadata,
//! and `argot` turns the struct into flags, environment variable fallbacks and help output.
//! Commands nest into a tree: each sub-command has its own struct, and the command line walks down the tree.
//!
//! The design concerns are:
//! * *Declarative configuration*:
//! The fields of a config struct are the flags; there is no separate description to keep in sync.
//! * *Type driven conversion*:
//! Each field's type decides how a token is converted (see [`Value`]), once, when the command is built.
//! * *Fail at build time*:
//! Misconfigured structs (unknown tags, duplicate names, unsupported types) are reported when the command tree is built,
//! never part way through a parse.
//! * *GNU flavoured grammar*:
//! `--name value`, `--name=value`, `-n value`, short clusters (`-abc value`) and `--` to end the flags.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/remote.rs")]
//! ```
//!
//! ```console
//! $ remote fetch -h
//! Download objects from remotes.
//!
//! USAGE:
//!     remote fetch [OPTIONS] [REMOTE]...
//!
//! OPTIONS:
//!     -h, --help                           show usage help
//!     -d, --depth <N>        REMOTE_DEPTH  limit fetching to the given number of commits
//!     -t, --timeout <VALUE>                give up after this long (default: 30s)
//!
//! ARGUMENTS:
//!     [REMOTE]...  the remotes to fetch from
//!
//! $ REMOTE_DEPTH=3 remote -v f origin
//! verbose output enabled
//! fetching origin (depth: Some(3), timeout: 30s)
//!
//! $ remote fetch --depth deep origin
//! <help>
//! error: invalid value 'deep' for flag -depth: cannot convert 'deep' to u32: invalid digit found in string
//! ```
//!
//! # Tags
//! A field's tag is a comma separated list of `key` or `key=value` entries.
//! Values may be single quoted to contain commas (ex: `help='first, second'`).
//! With the derive Api, tags are given as string literals: `#[cli("short=p,env=PORT")]`.
//!
//! | key | effect |
//! |-----|--------|
//! | `-` | skip the field |
//! | `required` | the flag must be given, by argument or environment variable |
//! | `name=..` | the long flag name; defaults to the kebab cased field name |
//! | `short=c` | a one character alias |
//! | `placeholder=..` | the value's name in help output |
//! | `env=KEY` | fall back to the environment variable when the flag is not given |
//! | `help=..` | the help text |
//! | `default=..` | the default shown in help, instead of the field's initial value |
//! | `nodefault` | show no default in help |
//! | `hidden` | leave the flag out of help |
//! | `append` | a `Vec<T>` field; every occurrence of the flag appends |
//! | `args` | a `Vec<String>` field receiving the positional arguments; only `name`, `placeholder` and `help` apply |
//! | `embed` | a nested config struct, whose flags are flattened into this one |
//!
//! Unknown keys are an error, listing every unknown key of the field.
//!
//! # Values
//! Any type implementing [`Value`] may be a field.
//! `argot` implements it for `String`, `bool`, `char`, the integer and float primitives, [`std::time::Duration`]
//! (`1h30m`, `1.5s`, `300ms`), [`std::path::PathBuf`], IP and socket addresses, and `Option<T>` or `Box<T>` of any value.
//! A `bool` flag takes no value (`--verbose`), but accepts one inline (`--verbose=false`).
//! An `Option<T>` field stays `None` until its flag is given.
//!
//! Implement [`Value`] for your own types by picking a conversion from [`Capabilities`]:
//! ```
//! use argot::{Capabilities, Value};
//! use std::str::FromStr;
//!
//! #[derive(Debug, PartialEq)]
//! enum Level {
//!     Low,
//!     High,
//! }
//!
//! impl FromStr for Level {
//!     type Err = String;
//!
//!     fn from_str(value: &str) -> Result<Self, Self::Err> {
//!         match value {
//!             "low" => Ok(Level::Low),
//!             "high" => Ok(Level::High),
//!             _ => Err(format!("unknown level '{value}'")),
//!         }
//!     }
//! }
//!
//! impl Value for Level {
//!     fn capabilities() -> Capabilities<Self> {
//!         Capabilities::none().text()
//!     }
//! }
//!
//! let coercion = Level::coercion().unwrap();
//! assert_eq!(coercion.fresh("high").unwrap(), Level::High);
//! assert!(coercion.fresh("medium").is_err());
//! ```
//!
//! # Commands
//! A [`Command`] tree is built from a root config with [`Command::new`], adding sub-commands with [`CommandBuilder::subcommand`].
//! Parsing resolves one command level at a time:
//! 1. The level's flags are consumed, up to the first positional token or `--`.
//! 2. The remaining tokens go to the `args` field, or name a sub-command, or are an error.
//! 3. Flags not given fall back to their `env` variable.
//! 4. Required flags are checked; the first missing one is reported.
//! 5. The config's `before` hook runs, then parsing descends into the sub-command.
//!
//! The deepest command reached is run through [`ParseResult::run`], [`ParseResult::run_with`] (forwarding a [`Cancellation`])
//! or [`ParseResult::run_or_exit`].
//! Usage errors print the command's help; `-h`/`--help` is available on every command.
//!
//! ```
//! use argot::{Command, Config, MapEnvironment, MemoryInterface};
//!
//! #[derive(Debug, Default, Config)]
//! struct Serve {
//!     #[cli("short=p,env=PORT")]
//!     port: u16,
//!     #[cli("append,short=t")]
//!     tags: Vec<String>,
//! }
//!
//! let mut serve = Serve::default();
//! let error = Command::new("serve", &mut serve)
//!     .environment(MapEnvironment::from([("PORT", "8080")]))
//!     .interface(MemoryInterface::default())
//!     .build_command()
//!     .unwrap()
//!     .parse_tokens(&["-t", "a", "--tags=b"])
//!     .into_error();
//!
//! assert!(error.is_none());
//! assert_eq!(serve.port, 8080);
//! assert_eq!(serve.tags, vec!["a", "b"]);
//! ```
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events while binding and parsing.
#![deny(missing_docs)]

pub use argot_builder::*;

/// Derive [`Config`](trait@Config) for a struct; see the crate documentation for its tags.
pub use argot_derive::Config;

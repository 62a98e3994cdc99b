/// Display metadata for one bound field.
///
/// Derived once per config record field while a command is built.
/// External help renderers read these; the parser never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The long flag name, without dashes (ex: `dry-run`).
    pub name: String,
    /// The single character alias, without the dash.
    pub short: Option<char>,
    /// Help text for the flag.
    pub help: String,
    /// Placeholder shown for the value (ex: `PATH`); empty means the default placeholder.
    pub placeholder: String,
    /// Whether the field must be set by argument or environment variable.
    pub required: bool,
    /// The environment variable consulted when the flag is absent.
    pub env: Option<String>,
    /// Whether repeated occurrences accumulate into a sequence.
    pub multiple: bool,
    /// Whether the field is left out of help output.
    pub hidden: bool,
    /// Whether the flag takes no value (`--flag` means `--flag=true`).
    pub boolean: bool,
    /// The rendered initial value, or the `default` tag text; empty when hidden.
    pub default: String,
}

impl FieldSpec {
    /// Whether the flag consumes a value.
    pub fn has_arg(&self) -> bool {
        !self.boolean
    }
}

/// Display metadata for a command's positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    /// The name derived from the sink field (ex: `files`).
    pub name: String,
    /// Placeholder shown in usage; empty means the upper-cased name.
    pub placeholder: String,
    /// Help text for the positional arguments.
    pub help: String,
}

/// Identifies one command within a built [`Command`](crate::Command) tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A read-only view of one command, for help renderers.
#[derive(Debug)]
pub struct CommandInfo<'c> {
    /// The command name.
    pub name: &'c str,
    /// The names from the root down to this command, space separated.
    pub full_name: String,
    /// The alternative name the parent also accepts.
    pub alias: Option<&'c str>,
    /// One line summary, shown in the parent's command list.
    pub about: Option<&'c str>,
    /// Long form description, shown at the top of this command's help.
    pub description: Option<&'c str>,
    /// Bound fields in declaration order, the injected help flag first.
    pub fields: &'c [FieldSpec],
    /// The positional argument sink, if any.
    pub positional: Option<&'c PositionalSpec>,
    /// The child commands in registration order.
    pub subcommands: Vec<SubcommandInfo<'c>>,
}

/// A child command entry within [`CommandInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcommandInfo<'c> {
    /// The child name.
    pub name: &'c str,
    /// The child alias.
    pub alias: Option<&'c str>,
    /// The child summary.
    pub about: Option<&'c str>,
}

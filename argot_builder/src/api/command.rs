use std::collections::HashMap;

use thiserror::Error;

use crate::api::binder::{BindError, Binder};
use crate::api::Config;
use crate::model::{CommandInfo, FieldSpec, NodeId, PositionalSpec, SubcommandInfo};
use crate::parser::{ConsoleInterface, Environment, Printer, ProcessEnvironment, UserInterface};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for when a command tree is built incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A config record could not be bound.
    #[error("command '{command}': {source}")]
    Bind {
        /// The command owning the record.
        command: String,
        /// The binding error.
        source: BindError,
    },
    /// Two children of one command share a name or alias.
    #[error("command '{command}' has more than one sub-command named '{name}'.")]
    DuplicateCommand {
        /// The parent command.
        command: String,
        /// The repeated name.
        name: String,
    },
    /// A command has both a positional argument field and sub-commands.
    #[error("command '{command}' cannot take both positional arguments and sub-commands.")]
    ArgsWithSubcommands {
        /// The command.
        command: String,
    },
}

/// The builder for a [`Command`] tree.
///
/// Each command owns a mutable borrow of its config record for the lifetime of the tree.
pub struct CommandBuilder<'a> {
    name: String,
    alias: Option<String>,
    about: Option<String>,
    description: Option<String>,
    config: &'a mut dyn Config,
    subcommands: Vec<CommandBuilder<'a>>,
    environment: Option<Box<dyn Environment + 'a>>,
    interface: Option<Box<dyn UserInterface + 'a>>,
}

impl<'a> CommandBuilder<'a> {
    /// Create a command builder for the config record.
    pub fn new<C: Config>(name: impl Into<String>, config: &'a mut C) -> Self {
        Self {
            name: name.into(),
            alias: None,
            about: None,
            description: None,
            config,
            subcommands: Vec::default(),
            environment: None,
            interface: None,
        }
    }

    /// Set the one line summary, shown in the parent's command list.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Set the long form description, shown at the top of this command's help.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an alternative name, also accepted by the parent.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add a sub-command.
    pub fn subcommand(mut self, subcommand: CommandBuilder<'a>) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Set the environment consulted for `env` tagged fields.
    /// Only the root command's environment is used.
    pub fn environment(mut self, environment: impl Environment + 'a) -> Self {
        self.environment = Some(Box::new(environment));
        self
    }

    /// Set where help and errors are printed.
    /// Only the root command's interface is used.
    pub fn interface(mut self, interface: impl UserInterface + 'a) -> Self {
        self.interface = Some(Box::new(interface));
        self
    }

    /// Build the command tree.
    ///
    /// Every config record is bound once here, so misconfigured records are reported before any parse.
    pub fn build_command(mut self) -> Result<Command<'a>, BuildError> {
        let environment = self
            .environment
            .take()
            .unwrap_or_else(|| Box::new(ProcessEnvironment));
        let interface = self
            .interface
            .take()
            .unwrap_or_else(|| Box::<ConsoleInterface>::default());
        let mut nodes = Vec::default();
        insert(&mut nodes, self, None)?;

        Ok(Command {
            nodes,
            environment,
            interface,
        })
    }

    /// Build the command tree.
    ///
    /// If the build fails, the error is printed and the process exits with status `1`.
    /// To instead handle the error programmatically, use [`CommandBuilder::build_command`].
    pub fn build(self) -> Command<'a> {
        match self.build_command() {
            Ok(command) => command,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

pub(crate) struct Node<'a> {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) about: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) config: &'a mut dyn Config,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) positional: Option<PositionalSpec>,
    pub(crate) help: Option<FieldSpec>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) lookup: HashMap<String, NodeId>,
}

/// A built command tree, ready to parse.
///
/// The root is the command the tree was built from; sub-commands are addressed by [`NodeId`].
pub struct Command<'a> {
    pub(crate) nodes: Vec<Node<'a>>,
    pub(crate) environment: Box<dyn Environment + 'a>,
    pub(crate) interface: Box<dyn UserInterface + 'a>,
}

impl<'a> std::fmt::Debug for Command<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.nodes[0].name)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl<'a> Command<'a> {
    /// Create a command builder for the config record.
    /// ```
    /// # use argot_builder::*;
    /// let mut config = ();
    /// let command = Command::new("tool", &mut config)
    ///     .about("does things")
    ///     .build_command()
    ///     .unwrap();
    /// assert_eq!(command.info(command.root()).name, "tool");
    /// ```
    pub fn new<C: Config>(name: impl Into<String>, config: &'a mut C) -> CommandBuilder<'a> {
        CommandBuilder::new(name, config)
    }

    /// The root command.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The parent of a command, or `None` for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// The child commands, in registration order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Follow child names (or aliases) down from the root.
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        let mut node = self.root();

        for name in path {
            node = *self.nodes[node.0].lookup.get(*name)?;
        }

        Some(node)
    }

    /// The names from the root down to the command, space separated.
    pub fn full_name(&self, node: NodeId) -> String {
        let mut names = vec![self.nodes[node.0].name.as_str()];
        let mut current = self.nodes[node.0].parent;

        while let Some(parent) = current {
            names.push(self.nodes[parent.0].name.as_str());
            current = self.nodes[parent.0].parent;
        }

        names.reverse();
        names.join(" ")
    }

    /// A read-only view of the command, for help renderers.
    pub fn info(&self, node: NodeId) -> CommandInfo<'_> {
        let current = &self.nodes[node.0];

        CommandInfo {
            name: &current.name,
            full_name: self.full_name(node),
            alias: current.alias.as_deref(),
            about: current.about.as_deref(),
            description: current.description.as_deref(),
            fields: &current.fields,
            positional: current.positional.as_ref(),
            subcommands: current
                .children
                .iter()
                .map(|child| {
                    let child = &self.nodes[child.0];
                    SubcommandInfo {
                        name: &child.name,
                        alias: child.alias.as_deref(),
                        about: child.about.as_deref(),
                    }
                })
                .collect(),
        }
    }

    /// Render the help for a command, fit to the terminal width.
    pub fn help(&self, node: NodeId) -> String {
        Printer::terminal().render(&self.info(node))
    }
}

struct Snapshot {
    fields: Vec<FieldSpec>,
    positional: Option<PositionalSpec>,
    help: Option<FieldSpec>,
}

fn snapshot(config: &mut dyn Config) -> Result<Snapshot, BindError> {
    let mut binder = Binder::new();
    config.bind(&mut binder)?;
    let bindings = binder.finish();

    Ok(Snapshot {
        fields: bindings.specs(),
        positional: bindings.positional(),
        help: bindings.help_spec(),
    })
}

fn insert<'a>(
    nodes: &mut Vec<Node<'a>>,
    builder: CommandBuilder<'a>,
    parent: Option<NodeId>,
) -> Result<NodeId, BuildError> {
    let CommandBuilder {
        name,
        alias,
        about,
        description,
        config,
        subcommands,
        ..
    } = builder;
    let Snapshot {
        fields,
        positional,
        help,
    } = snapshot(&mut *config).map_err(|source| BuildError::Bind {
        command: name.clone(),
        source,
    })?;

    if positional.is_some() && !subcommands.is_empty() {
        return Err(BuildError::ArgsWithSubcommands { command: name });
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Built command '{name}' with {} fields.", fields.len());
    }

    let id = NodeId(nodes.len());
    nodes.push(Node {
        name,
        alias,
        about,
        description,
        config,
        fields,
        positional,
        help,
        parent,
        children: Vec::default(),
        lookup: HashMap::default(),
    });

    for subcommand in subcommands {
        let keys: Vec<String> = std::iter::once(subcommand.name.clone())
            .chain(subcommand.alias.clone())
            .collect();
        let child = insert(nodes, subcommand, Some(id))?;

        for key in keys {
            if nodes[id.0].lookup.insert(key.clone(), child).is_some() {
                return Err(BuildError::DuplicateCommand {
                    command: nodes[id.0].name.clone(),
                    name: key,
                });
            }
        }

        nodes[id.0].children.push(child);
    }

    Ok(id)
}

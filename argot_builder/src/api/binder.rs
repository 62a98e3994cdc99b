use std::any::Any;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use heck::ToKebabCase;
use thiserror::Error;

use crate::api::field::{AnonymousSlot, Append, BoundField, Scalar, Switch};
use crate::api::tags::Tags;
use crate::api::value::Value;
use crate::api::Config;
use crate::constant::*;
use crate::model::{FieldSpec, PositionalSpec};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for when a config record cannot be bound to flags.
///
/// Every variant names the offending field, qualified by its embedding path (ex: `server.port`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No conversion exists for the field's type.
    #[error("field '{field}' has unsupported type {type_name}.")]
    UnsupportedType {
        /// The field.
        field: String,
        /// The field's type.
        type_name: &'static str,
    },
    /// A flag name or short name is already taken.
    #[error("field '{field}' reuses the flag name '{name}'.")]
    DuplicateName {
        /// The field.
        field: String,
        /// The repeated name.
        name: String,
    },
    /// The tag holds keys that mean nothing.
    #[error("field '{field}' has unknown tags: {}.", .keys.join(", "))]
    UnknownTags {
        /// The field.
        field: String,
        /// The unknown keys, sorted.
        keys: Vec<String>,
    },
    /// The short name is not exactly one character.
    #[error("field '{field}' has invalid short name '{short}': must be exactly 1 character.")]
    InvalidShortName {
        /// The field.
        field: String,
        /// The short name as written.
        short: String,
    },
    /// The tag holds keys that exclude each other.
    #[error("field '{field}' has conflicting tags '{left}' and '{right}'.")]
    ConflictingTags {
        /// The field.
        field: String,
        /// The first key.
        left: &'static str,
        /// The second key.
        right: &'static str,
    },
    /// An `args` field is not a `Vec<String>`.
    #[error("field '{field}' is tagged 'args' but is not a Vec<String>.")]
    InvalidArgsField {
        /// The field.
        field: String,
    },
    /// A second `args` field within one config record.
    #[error("field '{field}' is tagged 'args', but '{previous}' already receives the positional arguments.")]
    DuplicateArgsField {
        /// The field.
        field: String,
        /// The field bound first.
        previous: String,
    },
    /// An `append` tag on a field that is not bound as a sequence.
    #[error("field '{field}' is tagged 'append' but is not bound as a sequence.")]
    InvalidAppendField {
        /// The field.
        field: String,
    },
    /// An `embed` tag on a field that is not bound as a config record.
    #[error("field '{field}' is tagged 'embed' but is not bound as a config record.")]
    InvalidEmbedField {
        /// The field.
        field: String,
    },
}

/// The receiver of residual positional tokens.
pub(crate) struct Sink<'b> {
    pub(crate) field: String,
    pub(crate) spec: PositionalSpec,
    variable: &'b mut Vec<String>,
}

impl<'b> Sink<'b> {
    // An empty residual keeps the initial value.
    pub(crate) fn fill(self, residual: Vec<String>) {
        if !residual.is_empty() {
            *self.variable = residual;
        }
    }
}

/// Binds the fields of a config record to flags.
///
/// [`Config::bind`] implementations call one method per field, in declaration order.
/// The `ident` is the field identifier; it names errors and, kebab-cased, the flag.
/// The `tag` is the field's tag string (see [`parse_tag`](crate::parse_tag)).
/// ```
/// # use argot_builder::*;
/// struct Serve {
///     port: u16,
///     tags: Vec<String>,
/// }
///
/// impl Config for Serve {
///     fn bind<'b>(&'b mut self, binder: &mut Binder<'b>) -> Result<(), BindError> {
///         binder.field("port", "short=p,help=port to listen on", &mut self.port)?;
///         binder.append("tags", "append", &mut self.tags)?;
///         Ok(())
///     }
/// }
/// ```
pub struct Binder<'b> {
    fields: Vec<BoundField<'b>>,
    sink: Option<Sink<'b>>,
    claimed: HashSet<String>,
    path: Vec<String>,
}

impl<'b> Binder<'b> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::default(),
            sink: None,
            claimed: HashSet::default(),
            path: Vec::default(),
        }
    }

    /// Bind a single valued field.
    pub fn field<T: Value>(
        &mut self,
        ident: &str,
        tag: &str,
        variable: &'b mut T,
    ) -> Result<(), BindError> {
        let field = self.qualify(ident);
        let tags = Tags::parse(&field, tag)?;

        if tags.exclude {
            return Ok(());
        }

        if tags.args {
            return self.sink(field, ident, tags, variable);
        }

        if tags.append {
            return Err(BindError::InvalidAppendField { field });
        }

        if tags.embed {
            return Err(BindError::InvalidEmbedField { field });
        }

        let coercion = T::coercion().map_err(|unsupported| BindError::UnsupportedType {
            field: field.clone(),
            type_name: unsupported.type_name,
        })?;
        self.register(field, ident, tags, false, Box::new(Scalar::new(variable, coercion)))
    }

    /// Bind a sequence field, where every occurrence of the flag appends an element.
    pub fn append<T: Value>(
        &mut self,
        ident: &str,
        tag: &str,
        variable: &'b mut Vec<T>,
    ) -> Result<(), BindError> {
        let field = self.qualify(ident);
        let tags = Tags::parse(&field, tag)?;

        if tags.exclude {
            return Ok(());
        }

        if tags.args {
            return self.sink(field, ident, tags, variable);
        }

        if tags.embed {
            return Err(BindError::InvalidEmbedField { field });
        }

        let coercion = T::coercion().map_err(|unsupported| BindError::UnsupportedType {
            field: field.clone(),
            type_name: unsupported.type_name,
        })?;
        self.register(field, ident, tags, true, Box::new(Append::new(variable, coercion)))
    }

    /// Bind the field receiving residual positional tokens.
    /// The field must be a `Vec<String>`.
    pub fn args(
        &mut self,
        ident: &str,
        tag: &str,
        variable: &'b mut (dyn Any + 'static),
    ) -> Result<(), BindError> {
        let field = self.qualify(ident);
        let tags = Tags::parse(&field, tag)?;

        if tags.exclude {
            return Ok(());
        }

        self.sink(field, ident, tags, variable)
    }

    /// Check the tag of a field that binds nothing (tagged `-`).
    pub fn skip(&mut self, ident: &str, tag: &str) -> Result<(), BindError> {
        let field = self.qualify(ident);
        Tags::parse(&field, tag)?;
        Ok(())
    }

    /// Bind a nested config record, whose fields are flattened into this one.
    pub fn embed<C: Config + ?Sized>(
        &mut self,
        ident: &str,
        tag: &str,
        variable: &'b mut C,
    ) -> Result<(), BindError> {
        let field = self.qualify(ident);
        let tags = Tags::parse(&field, tag)?;

        if tags.exclude {
            return Ok(());
        }

        if tags.args {
            return Err(BindError::InvalidArgsField { field });
        }

        if tags.append {
            return Err(BindError::InvalidAppendField { field });
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Embedding '{field}'.");
        }

        self.path.push(ident.to_string());
        let result = variable.bind(self);
        self.path.pop();
        result
    }

    pub(crate) fn finish(mut self) -> Bindings<'b> {
        let help = if self.claimed.contains(HELP_NAME) {
            None
        } else {
            let variable = Rc::new(Cell::new(false));
            let short = if self.claimed.contains(&HELP_SHORT.to_string()) {
                None
            } else {
                Some(HELP_SHORT)
            };
            let spec = FieldSpec {
                name: HELP_NAME.to_string(),
                short,
                help: HELP_MESSAGE.to_string(),
                placeholder: String::default(),
                required: false,
                env: None,
                multiple: false,
                hidden: false,
                boolean: true,
                default: String::default(),
            };
            self.fields.insert(
                0,
                BoundField::new(spec, Box::new(Switch::new(variable.clone()))),
            );
            Some(variable)
        };

        Bindings::new(self.fields, self.sink, help)
    }

    fn qualify(&self, ident: &str) -> String {
        let ident = ident.trim_start_matches("r#");

        if self.path.is_empty() {
            ident.to_string()
        } else {
            format!("{}.{ident}", self.path.join("."))
        }
    }

    fn claim(&mut self, field: &str, name: String) -> Result<(), BindError> {
        if self.claimed.insert(name.clone()) {
            Ok(())
        } else {
            Err(BindError::DuplicateName {
                field: field.to_string(),
                name,
            })
        }
    }

    fn register(
        &mut self,
        field: String,
        ident: &str,
        tags: Tags,
        multiple: bool,
        slot: Box<dyn AnonymousSlot + 'b>,
    ) -> Result<(), BindError> {
        let name = tags
            .name
            .unwrap_or_else(|| ident.trim_start_matches("r#").to_kebab_case());
        self.claim(&field, name.clone())?;

        if let Some(short) = tags.short {
            self.claim(&field, short.to_string())?;
        }

        let default = match (tags.hide_default, tags.default) {
            (true, _) => String::default(),
            (false, Some(text)) => text,
            (false, None) => slot.render(),
        };
        let spec = FieldSpec {
            name,
            short: tags.short,
            help: tags.help.unwrap_or_default(),
            placeholder: tags.placeholder.unwrap_or_default(),
            required: tags.required,
            env: tags.env,
            multiple,
            hidden: tags.hidden,
            boolean: slot.is_boolean(),
            default,
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Bound '{field}' to '--{}'.", spec.name);
        }

        self.fields.push(BoundField::new(spec, slot));
        Ok(())
    }

    fn sink(
        &mut self,
        field: String,
        ident: &str,
        tags: Tags,
        variable: &'b mut (dyn Any + 'static),
    ) -> Result<(), BindError> {
        let variable = match variable.downcast_mut::<Vec<String>>() {
            Some(variable) => variable,
            None => return Err(BindError::InvalidArgsField { field }),
        };

        if let Some(previous) = &self.sink {
            return Err(BindError::DuplicateArgsField {
                field,
                previous: previous.field.clone(),
            });
        }

        let spec = PositionalSpec {
            name: tags
                .name
                .unwrap_or_else(|| ident.trim_start_matches("r#").to_kebab_case()),
            placeholder: tags.placeholder.unwrap_or_default(),
            help: tags.help.unwrap_or_default(),
        };
        self.sink = Some(Sink {
            field,
            spec,
            variable,
        });
        Ok(())
    }
}

/// The bound fields of one config record, live for one parse.
pub(crate) struct Bindings<'b> {
    fields: Vec<BoundField<'b>>,
    lookup: HashMap<String, usize>,
    sink: Option<Sink<'b>>,
    help: Option<Rc<Cell<bool>>>,
}

impl<'b> Bindings<'b> {
    fn new(
        fields: Vec<BoundField<'b>>,
        sink: Option<Sink<'b>>,
        help: Option<Rc<Cell<bool>>>,
    ) -> Self {
        let mut lookup = HashMap::default();

        for (index, field) in fields.iter().enumerate() {
            lookup.insert(field.spec.name.clone(), index);

            if let Some(short) = field.spec.short {
                lookup.insert(short.to_string(), index);
            }
        }

        Self {
            fields,
            lookup,
            sink,
            help,
        }
    }

    /// Bindings holding nothing but the injected help flag, if the record has one.
    pub(crate) fn help_only(spec: Option<FieldSpec>) -> Bindings<'static> {
        match spec {
            None => Bindings::new(Vec::default(), None, None),
            Some(spec) => {
                let variable = Rc::new(Cell::new(false));
                let field = BoundField::new(spec, Box::new(Switch::new(variable.clone())));
                Bindings::new(vec![field], None, Some(variable))
            }
        }
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut BoundField<'b>> {
        let index = *self.lookup.get(name)?;
        self.fields.get_mut(index)
    }

    pub(crate) fn fields(&self) -> &[BoundField<'b>] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [BoundField<'b>] {
        &mut self.fields
    }

    pub(crate) fn help_requested(&self) -> bool {
        self.help.as_ref().is_some_and(|help| help.get())
    }

    /// The injected help flag's spec, when one was injected.
    pub(crate) fn help_spec(&self) -> Option<FieldSpec> {
        self.help.as_ref().and_then(|_| {
            self.fields
                .first()
                .filter(|field| field.spec.name == HELP_NAME)
                .map(|field| field.spec.clone())
        })
    }

    pub(crate) fn specs(&self) -> Vec<FieldSpec> {
        self.fields.iter().map(|field| field.spec.clone()).collect()
    }

    pub(crate) fn positional(&self) -> Option<PositionalSpec> {
        self.sink.as_ref().map(|sink| sink.spec.clone())
    }

    pub(crate) fn take_sink(&mut self) -> Option<Sink<'b>> {
        self.sink.take()
    }
}

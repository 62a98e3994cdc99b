use std::error::Error as StdError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::api::duration::{format_duration, parse_duration};

/// A boxed error, as produced by user supplied conversions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error for when a token cannot be converted into a field's type.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// The token held nothing to scan (ex: it was empty or blank).
    #[error("no value found in the input")]
    NoMatch,
    /// The conversion for the type rejected the token.
    #[error("cannot convert '{token}' to {type_name}: {source}")]
    Invalid {
        /// The offending token.
        token: String,
        /// The target type.
        type_name: &'static str,
        /// The conversion's own error.
        source: BoxError,
    },
}

/// Error for when no conversion exists for a field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no conversion available for type {type_name}")]
pub struct Unsupported {
    /// The unsupported type.
    pub type_name: &'static str,
}

/// A type that updates itself in place from a token.
///
/// This takes precedence over every other conversion.
/// ```
/// # use argot_builder::*;
/// #[derive(Debug, Default)]
/// struct Level(u8);
///
/// impl Setter for Level {
///     fn set(&mut self, token: &str) -> Result<(), BoxError> {
///         self.0 = match token {
///             "low" => 1,
///             "high" => 9,
///             _ => return Err(format!("unknown level '{token}'").into()),
///         };
///         Ok(())
///     }
/// }
///
/// impl Value for Level {
///     fn capabilities() -> Capabilities<Self> {
///         Capabilities::none().setter()
///     }
/// }
///
/// let coercion = Level::coercion().unwrap();
/// assert_eq!(coercion.fresh("high").unwrap().0, 9);
/// ```
pub trait Setter {
    /// Update `self` from the token.
    fn set(&mut self, token: &str) -> Result<(), BoxError>;
}

/// A type that decodes from the raw bytes of a token.
pub trait FromBytes: Sized {
    /// Decode a value from the token bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, BoxError>;
}

/// The conversion chosen for a type, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// In place update through [`Setter`].
    Setter,
    /// Textual decoding through [`FromStr`].
    Text,
    /// Binary decoding through [`FromBytes`].
    Binary,
    /// Duration literal (ex: `1h30m`).
    Duration,
    /// The token itself, verbatim.
    Verbatim,
    /// A built-in scanner for primitive kinds.
    Scan,
}

type ParseFn<T> = fn(&str) -> Result<T, BoxError>;

/// The conversions a type declares, resolved into a [`Coercion`] by priority.
///
/// Probes are checked in this order: setter, text, binary, duration, verbatim, scan.
/// The first one present wins.
pub struct Capabilities<T> {
    setter: Option<(fn() -> T, fn(&mut T, &str) -> Result<(), BoxError>)>,
    text: Option<ParseFn<T>>,
    binary: Option<fn(&[u8]) -> Result<T, BoxError>>,
    duration: Option<fn(Duration) -> T>,
    verbatim: Option<fn(String) -> T>,
    scan: Option<ParseFn<T>>,
    render: Option<fn(&T) -> String>,
    boolean: bool,
}

impl<T: 'static> Capabilities<T> {
    /// Declare nothing.
    pub fn none() -> Self {
        Self {
            setter: None,
            text: None,
            binary: None,
            duration: None,
            verbatim: None,
            scan: None,
            render: None,
            boolean: false,
        }
    }

    /// Declare the in-place [`Setter`] conversion.
    pub fn setter(mut self) -> Self
    where
        T: Setter + Default,
    {
        let zero: fn() -> T = T::default;
        let set: fn(&mut T, &str) -> Result<(), BoxError> = set_in_place::<T>;
        self.setter = Some((zero, set));
        self
    }

    /// Declare the [`FromStr`] conversion.
    pub fn text(mut self) -> Self
    where
        T: FromStr,
        T::Err: Into<BoxError>,
    {
        let parse: ParseFn<T> = parse_text::<T>;
        self.text = Some(parse);
        self
    }

    /// Declare the [`FromBytes`] conversion.
    pub fn binary(mut self) -> Self
    where
        T: FromBytes,
    {
        let decode: fn(&[u8]) -> Result<T, BoxError> = T::from_bytes;
        self.binary = Some(decode);
        self
    }

    /// Declare the duration literal conversion.
    pub fn duration(mut self, from: fn(Duration) -> T) -> Self {
        self.duration = Some(from);
        self
    }

    /// Declare the verbatim conversion.
    pub fn verbatim(mut self) -> Self
    where
        T: From<String>,
    {
        let from: fn(String) -> T = <T as From<String>>::from;
        self.verbatim = Some(from);
        self
    }

    /// Declare a scanner.
    /// Tokens are trimmed first, and blank tokens never reach the scanner.
    pub fn scan(mut self, scan: ParseFn<T>) -> Self {
        self.scan = Some(scan);
        self
    }

    /// Render values through [`fmt::Display`].
    pub fn display(mut self) -> Self
    where
        T: fmt::Display,
    {
        let render: fn(&T) -> String = render_display::<T>;
        self.render = Some(render);
        self
    }

    /// Render values through the given function.
    pub fn render(mut self, render: fn(&T) -> String) -> Self {
        self.render = Some(render);
        self
    }

    /// Mark the type as a boolean, so its flag takes no value.
    pub fn boolean(mut self) -> Self {
        self.boolean = true;
        self
    }

    /// Choose the highest priority conversion declared.
    pub fn resolve(self) -> Result<Coercion<T>, Unsupported>
    where
        T: fmt::Debug,
    {
        let type_name = std::any::type_name::<T>();
        let render: Rc<dyn Fn(&T) -> String> = match self.render {
            Some(render) => Rc::new(render),
            None => Rc::new(|value: &T| format!("{value:?}")),
        };

        if let Some((zero, set)) = self.setter {
            let assign = move |slot: &mut T, token: &str| {
                set(slot, token).map_err(|source| invalid(token, type_name, source))
            };
            let fresh = move |token: &str| -> Result<T, CoercionError> {
                let mut value = zero();
                set(&mut value, token).map_err(|source| invalid(token, type_name, source))?;
                Ok(value)
            };
            return Ok(Coercion {
                strategy: Strategy::Setter,
                assign: Rc::new(assign),
                fresh: Rc::new(fresh),
                render,
                boolean: self.boolean,
            });
        }

        let (strategy, parse): (Strategy, Rc<dyn Fn(&str) -> Result<T, CoercionError>>) =
            if let Some(parse) = self.text {
                (
                    Strategy::Text,
                    Rc::new(move |token: &str| {
                        parse(token).map_err(|source| invalid(token, type_name, source))
                    }),
                )
            } else if let Some(decode) = self.binary {
                (
                    Strategy::Binary,
                    Rc::new(move |token: &str| {
                        decode(token.as_bytes()).map_err(|source| invalid(token, type_name, source))
                    }),
                )
            } else if let Some(from) = self.duration {
                (
                    Strategy::Duration,
                    Rc::new(move |token: &str| {
                        parse_duration(token)
                            .map(from)
                            .map_err(|source| invalid(token, type_name, Box::new(source)))
                    }),
                )
            } else if let Some(from) = self.verbatim {
                (
                    Strategy::Verbatim,
                    Rc::new(move |token: &str| Ok(from(token.to_string()))),
                )
            } else if let Some(scan) = self.scan {
                (
                    Strategy::Scan,
                    Rc::new(move |token: &str| {
                        let trimmed = token.trim();

                        if trimmed.is_empty() {
                            return Err(CoercionError::NoMatch);
                        }

                        scan(trimmed).map_err(|source| invalid(token, type_name, source))
                    }),
                )
            } else {
                return Err(Unsupported { type_name });
            };

        let replace = parse.clone();
        Ok(Coercion {
            strategy,
            assign: Rc::new(move |slot: &mut T, token: &str| -> Result<(), CoercionError> {
                *slot = replace(token)?;
                Ok(())
            }),
            fresh: parse,
            render,
            boolean: self.boolean,
        })
    }
}

fn invalid(token: &str, type_name: &'static str, source: BoxError) -> CoercionError {
    CoercionError::Invalid {
        token: token.to_string(),
        type_name,
        source,
    }
}

fn set_in_place<T: Setter>(slot: &mut T, token: &str) -> Result<(), BoxError> {
    slot.set(token)
}

fn parse_text<T>(token: &str) -> Result<T, BoxError>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    T::from_str(token).map_err(Into::into)
}

fn render_display<T: fmt::Display>(value: &T) -> String {
    value.to_string()
}

/// The resolved conversion for one type.
pub struct Coercion<T> {
    strategy: Strategy,
    assign: Rc<dyn Fn(&mut T, &str) -> Result<(), CoercionError>>,
    fresh: Rc<dyn Fn(&str) -> Result<T, CoercionError>>,
    render: Rc<dyn Fn(&T) -> String>,
    boolean: bool,
}

impl<T> Clone for Coercion<T> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy,
            assign: self.assign.clone(),
            fresh: self.fresh.clone(),
            render: self.render.clone(),
            boolean: self.boolean,
        }
    }
}

impl<T> fmt::Debug for Coercion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion")
            .field("strategy", &self.strategy)
            .field("boolean", &self.boolean)
            .finish()
    }
}

impl<T: 'static> Coercion<T> {
    /// The chosen conversion.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Whether the flag for this type takes no value.
    pub fn is_boolean(&self) -> bool {
        self.boolean
    }

    /// Update the slot from the token.
    /// On failure the slot is left untouched, except by in-place setters.
    pub fn assign(&self, slot: &mut T, token: &str) -> Result<(), CoercionError> {
        (self.assign)(slot, token)
    }

    /// Produce a new value from the token.
    pub fn fresh(&self, token: &str) -> Result<T, CoercionError> {
        (self.fresh)(token)
    }

    /// Render a value for help output.
    pub fn render(&self, value: &T) -> String {
        (self.render)(value)
    }

    pub(crate) fn optional(self) -> Coercion<Option<T>> {
        let inner = Rc::new(self);
        let assign = inner.clone();
        let fresh = inner.clone();
        let render = inner.clone();

        Coercion {
            strategy: inner.strategy,
            assign: Rc::new(move |slot: &mut Option<T>, token: &str| -> Result<(), CoercionError> {
                match slot {
                    Some(value) => assign.assign(value, token),
                    None => {
                        *slot = Some(assign.fresh(token)?);
                        Ok(())
                    }
                }
            }),
            fresh: Rc::new(move |token: &str| fresh.fresh(token).map(Some)),
            render: Rc::new(move |slot: &Option<T>| {
                slot.as_ref()
                    .map(|value| render.render(value))
                    .unwrap_or_default()
            }),
            boolean: false,
        }
    }

    pub(crate) fn boxed(self) -> Coercion<Box<T>> {
        let inner = Rc::new(self);
        let assign = inner.clone();
        let fresh = inner.clone();
        let render = inner.clone();

        Coercion {
            strategy: inner.strategy,
            assign: Rc::new(move |slot: &mut Box<T>, token: &str| assign.assign(slot, token)),
            fresh: Rc::new(move |token: &str| fresh.fresh(token).map(Box::new)),
            render: Rc::new(move |slot: &Box<T>| render.render(slot)),
            boolean: false,
        }
    }
}

/// A type that config fields may hold.
///
/// Implement [`Value::capabilities`] to declare conversions; the highest priority one is used.
/// Wrappers (such as [`Option`] and [`Box`]) override [`Value::coercion`] to delegate to their inner type.
pub trait Value: Sized + fmt::Debug + 'static {
    /// The conversions this type offers.
    fn capabilities() -> Capabilities<Self>;

    /// The conversion used for fields of this type.
    fn coercion() -> Result<Coercion<Self>, Unsupported> {
        Self::capabilities().resolve()
    }
}

impl<T: Value> Value for Option<T> {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
    }

    fn coercion() -> Result<Coercion<Self>, Unsupported> {
        T::coercion().map(Coercion::optional)
    }
}

impl<T: Value> Value for Box<T> {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
    }

    fn coercion() -> Result<Coercion<Self>, Unsupported> {
        T::coercion().map(Coercion::boxed)
    }
}

impl Value for String {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().verbatim().display()
    }
}

impl Value for bool {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().scan(scan_bool).display().boolean()
    }
}

impl Value for char {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none().text().display()
    }
}

impl Value for Duration {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
            .duration(|duration| duration)
            .render(format_duration)
    }
}

impl Value for PathBuf {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
            .text()
            .render(|path: &PathBuf| path.display().to_string())
    }
}

macro_rules! textual {
    ($($t:ty),*) => {
        $(
            impl Value for $t {
                fn capabilities() -> Capabilities<Self> {
                    Capabilities::none().text().display()
                }
            }
        )*
    };
}

textual!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

macro_rules! integer {
    ($($t:ty),*) => {
        $(
            impl Value for $t {
                fn capabilities() -> Capabilities<Self> {
                    fn scan(token: &str) -> Result<$t, BoxError> {
                        let (digits, radix) = split_radix(token);
                        Ok(<$t>::from_str_radix(&digits, radix)?)
                    }

                    Capabilities::none().scan(scan).display()
                }
            }
        )*
    };
}

integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float {
    ($($t:ty),*) => {
        $(
            impl Value for $t {
                fn capabilities() -> Capabilities<Self> {
                    fn scan(token: &str) -> Result<$t, BoxError> {
                        Ok(token.parse::<$t>()?)
                    }

                    Capabilities::none().scan(scan).display()
                }
            }
        )*
    };
}

float!(f32, f64);

pub(crate) fn scan_bool(token: &str) -> Result<bool, BoxError> {
    match token {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("'{token}' is not a boolean literal").into()),
    }
}

// Keeps the sign, drops the base prefix.
fn split_radix(token: &str) -> (String, u32) {
    let (sign, unsigned) = match token.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", token.strip_prefix('+').unwrap_or(token)),
    };
    let lower = unsigned.get(..2).map(|prefix| prefix.to_ascii_lowercase());
    let radix = match lower.as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => 10,
    };

    if radix == 10 {
        (format!("{sign}{unsigned}"), radix)
    } else {
        (format!("{sign}{}", &unsigned[2..]), radix)
    }
}

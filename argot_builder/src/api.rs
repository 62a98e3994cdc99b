mod binder;
mod command;
mod config;
mod duration;
mod field;
mod tags;
mod value;

pub use binder::*;
pub use command::*;
pub use config::*;
pub use duration::*;
pub use tags::parse_tag;
pub use value::*;

pub(crate) use binder::Bindings;

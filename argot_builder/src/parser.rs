mod environment;
mod interface;
mod outcome;
mod printer;
mod resolve;
mod tokenizer;

pub use environment::*;
pub use interface::*;
pub use outcome::*;
pub use tokenizer::ParseError;

pub(crate) use printer::Printer;

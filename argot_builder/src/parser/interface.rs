use std::cell::RefCell;
use std::rc::Rc;

/// Where help and errors are printed.
pub trait UserInterface {
    /// Print a message (ex: requested help) to the user.
    fn print(&self, message: String);

    /// Print an error (or help shown because of one) to the user.
    fn print_error(&self, message: String);
}

/// Prints messages to stdout and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}

/// Captures messages and errors in memory.
///
/// Clones share the same buffers, so a clone kept aside observes what the command printed.
/// ```
/// # use argot_builder::*;
/// let interface = MemoryInterface::default();
/// let observer = interface.clone();
/// interface.print("hello".to_string());
/// assert_eq!(observer.messages(), vec!["hello"]);
/// assert!(observer.errors().is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryInterface {
    messages: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl MemoryInterface {
    /// The messages printed so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// The errors printed so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl UserInterface for MemoryInterface {
    fn print(&self, message: String) {
        self.messages.borrow_mut().push(message);
    }

    fn print_error(&self, message: String) {
        self.errors.borrow_mut().push(message);
    }
}

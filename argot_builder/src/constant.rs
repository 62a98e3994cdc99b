pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "show usage help";
pub(crate) const DEFAULT_PLACEHOLDER: &str = "VALUE";
pub(crate) const TRUE_LITERAL: &str = "true";

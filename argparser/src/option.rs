//! Option Registry data model.

use crate::error::Result;

/// Whether and how an option accepts an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// The option takes no argument.
    None,
    /// A mandatory argument, supplied either attached (`-oARG`,
    /// `--option=ARG`) or as the following command-line element
    /// (`-o ARG`, `--option ARG`).
    Required(String),
    /// An optional argument. It can only be attached (`-oARG`,
    /// `--option=ARG`); it is never taken from the following element.
    Optional(String),
}

impl ArgSpec {
    pub(crate) fn takes_arg(&self) -> bool {
        !matches!(self, ArgSpec::None)
    }
}

/// Side-effecting capability run when the scan recognizes an option.
///
/// The arity is an explicit variant, not inferred at call time: no-argument
/// options carry `NoArg`, options with a (mandatory or optional) argument
/// carry `WithArg` and receive `None` when an optional argument was
/// omitted. Handlers may fail, which stops the parse.
pub enum Handler {
    NoArg(Box<dyn FnMut() -> Result<()>>),
    WithArg(Box<dyn FnMut(Option<&str>) -> Result<()>>),
}

/// Specification of one of a command's options.
pub struct Opt {
    pub(crate) short_name: Option<char>,
    pub(crate) long_name: Option<String>,
    pub(crate) arg: ArgSpec,
    pub(crate) description: String,
    pub(crate) handler: Option<Handler>,
    pub(crate) hidden: bool,
}

impl Opt {
    /// Create an option with a long name (without the leading `--`).
    pub fn new(long_name: &str) -> Self {
        Opt {
            short_name: None,
            long_name: Some(long_name.to_string()),
            arg: ArgSpec::None,
            description: String::new(),
            handler: None,
            hidden: false,
        }
    }

    /// Create an option that only has a short name.
    pub fn short_only(c: char) -> Self {
        Opt {
            short_name: Some(c),
            long_name: None,
            arg: ArgSpec::None,
            description: String::new(),
            handler: None,
            hidden: false,
        }
    }

    /// Add a short name (without the leading `-`).
    pub fn short(mut self, c: char) -> Self {
        self.short_name = Some(c);
        self
    }

    /// The option requires an argument, shown as `name` in the help.
    pub fn required_arg(mut self, name: &str) -> Self {
        self.arg = ArgSpec::Required(name.to_string());
        self
    }

    /// The option accepts an attached argument, shown as `name` in the help.
    pub fn optional_arg(mut self, name: &str) -> Self {
        self.arg = ArgSpec::Optional(name.to_string());
        self
    }

    /// The option's manual text for the help screen. May contain embedded
    /// newlines, indentation and `-`/`*` bullets, which the help formatter
    /// preserves across wrapped lines.
    pub fn description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    /// Hidden options parse normally but are left out of the help screen.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Handler for a no-argument option.
    pub fn on<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Result<()> + 'static,
    {
        self.handler = Some(Handler::NoArg(Box::new(f)));
        self
    }

    /// Handler for an option that takes an argument. Receives `None` when
    /// an optional argument was omitted.
    pub fn on_arg<F>(mut self, f: F) -> Self
    where
        F: FnMut(Option<&str>) -> Result<()> + 'static,
    {
        self.handler = Some(Handler::WithArg(Box::new(f)));
        self
    }
}

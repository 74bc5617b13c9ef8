//! An enjoyable argument parser that follows common command-line conventions.
//!
//! A [`Command`] owns an ordered registry of [`Opt`] specifications. Parsing
//! scans an argument vector once, classifying each element as a long option
//! (`--name`, `--name=VALUE`), a short option or cluster (`-c`, `-cVALUE`,
//! `-abc`), the end-of-options marker (`--`), or an operand, and fires each
//! matched option's handler at the moment it is recognized. Help rendering
//! lays the registry out in two columns and word-wraps descriptions and
//! manual text with [`HelpLayout`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use argparser::{Command, Opt};
//!
//! let verbose = Rc::new(RefCell::new(false));
//! let flag = verbose.clone();
//! let mut cmd = Command::new("demo").usage("[OPTION...] FILE...").option(
//!     Opt::new("verbose")
//!         .short('v')
//!         .description("Enable verbose output.")
//!         .on(move || {
//!             *flag.borrow_mut() = true;
//!             Ok(())
//!         }),
//! );
//!
//! let argv: Vec<String> = ["demo", "-v", "input.txt"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let mut errors = Vec::new();
//! let outcome = cmd.parse(&argv, &mut errors);
//! assert!(outcome.success);
//! assert_eq!(outcome.operands, ["input.txt"]);
//! assert!(*verbose.borrow());
//! ```

pub mod command;
pub mod error;
pub mod help;
pub mod option;

pub use command::{Command, ParseOutcome};
pub use error::{ParseError, Result};
pub use help::{print_help, wrap_block, HelpLayout};
pub use option::{ArgSpec, Handler, Opt};

//! Command definition and the single-pass argument scan.

use std::io::{self, Write};

use crate::error::{ParseError, Result};
use crate::help::{self, HelpLayout};
use crate::option::{ArgSpec, Handler, Opt};

/// Result of scanning one argument vector.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Non-option arguments, in order of appearance. On failure these are
    /// the operands accumulated before the scan stopped.
    pub operands: Vec<String>,
    /// False when the scan stopped on a parsing error.
    pub success: bool,
}

/// Rules that determine how a program's command-line arguments are
/// interpreted, plus the text of its help screen.
///
/// The option list is the registry consumed by both the parser and the
/// help formatter. Short and long names are expected to be unique within
/// one command; the engine does not validate this.
pub struct Command {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) manual: Option<String>,
    pub(crate) options: Vec<Opt>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Command {
            name: name.to_string(),
            usage: String::new(),
            manual: None,
            options: Vec::new(),
        }
    }

    /// One-line calling convention, shown after the command name in the
    /// `Usage:` line. Convention: `[...]` marks optional operands, `...`
    /// repetition.
    pub fn usage(mut self, text: &str) -> Self {
        self.usage = text.to_string();
        self
    }

    /// Free-form manual text, word-wrapped below the `Usage:` line.
    pub fn manual(mut self, text: &str) -> Self {
        self.manual = Some(text.to_string());
        self
    }

    pub fn option(mut self, opt: Opt) -> Self {
        self.options.push(opt);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse an argument vector, firing option handlers as a side effect.
    ///
    /// `argv[0]` is the command's name and is never scanned. On error, a
    /// single-line message is written to `errors` and the outcome reports
    /// failure; a failed scan cannot be resumed.
    pub fn parse(&mut self, argv: &[String], errors: &mut dyn Write) -> ParseOutcome {
        let mut session = Session::new(argv);
        match session.run(&mut self.options) {
            Ok(()) => ParseOutcome {
                operands: session.operands,
                success: true,
            },
            Err(e) => {
                let _ = writeln!(errors, "{}", e);
                ParseOutcome {
                    operands: session.operands,
                    success: false,
                }
            }
        }
    }

    /// Render the help screen for this command to `out`.
    pub fn print_help<W: Write>(&self, layout: &HelpLayout, out: &mut W) -> io::Result<()> {
        help::print_help(self, layout, out)
    }
}

/// Transient state of one parse call.
struct Session<'a> {
    argv: &'a [String],
    /// Cursor into `argv`; only ever advances.
    next: usize,
    /// Short-cluster characters peeled off the current token, examined
    /// before the cursor moves on (`-abc` is `-a` plus a pending `bc`).
    pending: Option<String>,
    operands: Vec<String>,
}

impl<'a> Session<'a> {
    fn new(argv: &'a [String]) -> Self {
        Session {
            argv,
            next: 1,
            pending: None,
            operands: Vec::new(),
        }
    }

    fn run(&mut self, options: &mut [Opt]) -> Result<()> {
        loop {
            if let Some(cluster) = self.pending.take() {
                self.scan_short(&cluster, options)?;
                continue;
            }

            let Some(arg) = self.argv.get(self.next) else {
                break;
            };
            self.next += 1;

            if arg.is_empty() {
                self.operands.push(arg.clone());
            } else if arg == "--" {
                // End of options: everything after the marker is an
                // operand, dashes or not.
                self.operands
                    .extend(self.argv[self.next..].iter().cloned());
                self.next = self.argv.len();
                break;
            } else if let Some(body) = arg.strip_prefix("--") {
                self.scan_long(body, options)?;
            } else if arg.len() > 1 && arg.starts_with('-') {
                self.scan_short(&arg[1..], options)?;
            } else {
                // Plain operand, or the conventional stdin/stdout "-".
                self.operands.push(arg.clone());
            }
        }
        Ok(())
    }

    /// Handle `--name` or `--name=VALUE`.
    fn scan_long(&mut self, body: &str, options: &mut [Opt]) -> Result<()> {
        let (name, attached) = match body.find('=') {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let rendered = format!("--{}", name);

        let opt = options
            .iter_mut()
            .find(|o| o.long_name.as_deref() == Some(name))
            .ok_or_else(|| ParseError::UnknownOption(rendered.clone()))?;

        let value = match (&opt.arg, attached) {
            (ArgSpec::None, Some(_)) => {
                return Err(ParseError::UnexpectedArgument(rendered));
            }
            (ArgSpec::None, None) | (ArgSpec::Optional(_), None) => None,
            // An attached value wins even over a following element.
            (_, Some(v)) => Some(v.to_string()),
            (ArgSpec::Required(_), None) => Some(self.take_next(&rendered)?),
        };

        invoke(opt, value.as_deref())
    }

    /// Handle the characters after a single `-`: one short option, with
    /// either an attached argument or further clustered options.
    fn scan_short(&mut self, cluster: &str, options: &mut [Opt]) -> Result<()> {
        let mut chars = cluster.chars();
        let Some(c) = chars.next() else {
            return Ok(());
        };
        let rest = chars.as_str();
        let rendered = format!("-{}", c);

        let opt = options
            .iter_mut()
            .find(|o| o.short_name == Some(c))
            .ok_or_else(|| ParseError::UnknownOption(rendered.clone()))?;

        if opt.arg.takes_arg() {
            let value = if !rest.is_empty() {
                // Attached characters are the argument, never more options.
                Some(rest.to_string())
            } else if matches!(opt.arg, ArgSpec::Required(_)) {
                Some(self.take_next(&rendered)?)
            } else {
                // Optional arguments are never pulled from the next element.
                None
            };
            invoke(opt, value.as_deref())
        } else {
            if !rest.is_empty() {
                // Cluster continuation: re-examine the leftover characters
                // before the cursor advances.
                self.pending = Some(rest.to_string());
            }
            invoke(opt, None)
        }
    }

    /// Consume the next element as an option-argument.
    fn take_next(&mut self, rendered: &str) -> Result<String> {
        match self.argv.get(self.next) {
            Some(value) => {
                self.next += 1;
                Ok(value.clone())
            }
            None => Err(ParseError::MissingArgument(rendered.to_string())),
        }
    }
}

/// Fire an option's handler, dispatching on the handler's own arity.
fn invoke(opt: &mut Opt, value: Option<&str>) -> Result<()> {
    match opt.handler.as_mut() {
        Some(Handler::NoArg(f)) => f(),
        Some(Handler::WithArg(f)) => f(value),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    type CallLog = Rc<RefCell<Vec<String>>>;

    /// A command with two flags, a mandatory-argument option and an
    /// optional-argument option, recording every handler call.
    fn recorder(log: &CallLog) -> Command {
        let quiet = log.clone();
        let verbose = log.clone();
        let file = log.clone();
        let tag = log.clone();
        Command::new("prog")
            .usage("[OPTION...] OPERAND...")
            .option(Opt::new("quiet").short('q').on(move || {
                quiet.borrow_mut().push("quiet".to_string());
                Ok(())
            }))
            .option(Opt::new("verbose").short('v').on(move || {
                verbose.borrow_mut().push("verbose".to_string());
                Ok(())
            }))
            .option(
                Opt::new("file")
                    .short('f')
                    .required_arg("FILE")
                    .on_arg(move |arg| {
                        file.borrow_mut().push(format!("file={:?}", arg));
                        Ok(())
                    }),
            )
            .option(
                Opt::new("tag")
                    .short('t')
                    .optional_arg("TAG")
                    .on_arg(move |arg| {
                        tag.borrow_mut().push(format!("tag={:?}", arg));
                        Ok(())
                    }),
            )
    }

    fn parse(cmd: &mut Command, args: &[&str]) -> (ParseOutcome, String) {
        let mut errors = Vec::new();
        let outcome = cmd.parse(&argv(args), &mut errors);
        (outcome, String::from_utf8(errors).unwrap())
    }

    #[test]
    fn program_name_is_never_scanned() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["--verbose"]);
        assert!(outcome.success);
        assert!(outcome.operands.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn operands_keep_their_order() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "one", "-v", "two", "three"]);
        assert!(outcome.success);
        assert_eq!(outcome.operands, ["one", "two", "three"]);
        assert_eq!(*log.borrow(), ["verbose"]);
    }

    #[test]
    fn empty_string_is_an_operand() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "", "x"]);
        assert!(outcome.success);
        assert_eq!(outcome.operands, ["", "x"]);
    }

    #[test]
    fn bare_dash_is_an_operand() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "-", "x"]);
        assert!(outcome.success);
        assert_eq!(outcome.operands, ["-", "x"]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn end_of_options_marker_stops_the_scan() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "--", "-x", "file"]);
        assert!(outcome.success);
        assert_eq!(outcome.operands, ["-x", "file"]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn long_attached_and_separate_arguments_agree() {
        for args in [
            &["prog", "--file=out.txt"][..],
            &["prog", "--file", "out.txt"][..],
        ] {
            let log = CallLog::default();
            let mut cmd = recorder(&log);
            let (outcome, _) = parse(&mut cmd, args);
            assert!(outcome.success);
            assert_eq!(*log.borrow(), [r#"file=Some("out.txt")"#]);
        }
    }

    #[test]
    fn short_attached_and_separate_arguments_agree() {
        for args in [&["prog", "-fout.txt"][..], &["prog", "-f", "out.txt"][..]] {
            let log = CallLog::default();
            let mut cmd = recorder(&log);
            let (outcome, _) = parse(&mut cmd, args);
            assert!(outcome.success);
            assert_eq!(*log.borrow(), [r#"file=Some("out.txt")"#]);
        }
    }

    #[test]
    fn cluster_is_equivalent_to_separate_shorts() {
        let clustered = CallLog::default();
        let mut cmd = recorder(&clustered);
        let (outcome, _) = parse(&mut cmd, &["prog", "-qvf", "X"]);
        assert!(outcome.success);

        let separate = CallLog::default();
        let mut cmd = recorder(&separate);
        let (outcome2, _) = parse(&mut cmd, &["prog", "-q", "-v", "-f", "X"]);
        assert!(outcome2.success);

        assert_eq!(*clustered.borrow(), *separate.borrow());
        assert_eq!(
            *clustered.borrow(),
            ["quiet", "verbose", r#"file=Some("X")"#]
        );
    }

    #[test]
    fn cluster_argument_attaches_to_first_taker() {
        // After -q, the f option consumes everything that follows it.
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "-qfvX"]);
        assert!(outcome.success);
        assert_eq!(*log.borrow(), ["quiet", r#"file=Some("vX")"#]);
    }

    #[test]
    fn optional_argument_absent_versus_empty() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "--tag", "--tag="]);
        assert!(outcome.success);
        assert_eq!(*log.borrow(), ["tag=None", r#"tag=Some("")"#]);
    }

    #[test]
    fn optional_argument_never_consumes_the_next_element() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "-t", "value"]);
        assert!(outcome.success);
        assert_eq!(*log.borrow(), ["tag=None"]);
        assert_eq!(outcome.operands, ["value"]);
    }

    #[test]
    fn optional_argument_attached_to_short() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "-trelease"]);
        assert!(outcome.success);
        assert_eq!(*log.borrow(), [r#"tag=Some("release")"#]);
    }

    #[test]
    fn unknown_long_option_fails() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, errors) = parse(&mut cmd, &["prog", "--bogus"]);
        assert!(!outcome.success);
        assert_eq!(errors, "Unknown option: --bogus\n");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unknown_short_inside_cluster_fails_after_earlier_flags() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, errors) = parse(&mut cmd, &["prog", "-vz"]);
        assert!(!outcome.success);
        assert_eq!(errors, "Unknown option: -z\n");
        assert_eq!(*log.borrow(), ["verbose"]);
    }

    #[test]
    fn missing_mandatory_argument_fails() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, errors) = parse(&mut cmd, &["prog", "--file"]);
        assert!(!outcome.success);
        assert_eq!(errors, "Option --file requires an argument.\n");

        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, errors) = parse(&mut cmd, &["prog", "-f"]);
        assert!(!outcome.success);
        assert_eq!(errors, "Option -f requires an argument.\n");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn value_attached_to_flag_fails() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, errors) = parse(&mut cmd, &["prog", "--verbose=yes"]);
        assert!(!outcome.success);
        assert_eq!(errors, "Option --verbose does not allow an argument.\n");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn operands_accumulated_before_a_failure_are_reported() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "a", "b", "--bogus", "c"]);
        assert!(!outcome.success);
        assert_eq!(outcome.operands, ["a", "b"]);
    }

    #[test]
    fn handler_error_stops_the_scan() {
        let log = CallLog::default();
        let seen = log.clone();
        let mut cmd = Command::new("prog")
            .option(Opt::new("bad").on(|| {
                Err(ParseError::Handler("handler said no".to_string()))
            }))
            .option(Opt::new("after").on(move || {
                seen.borrow_mut().push("after".to_string());
                Ok(())
            }));
        let (outcome, errors) = parse(&mut cmd, &["prog", "--bad", "--after"]);
        assert!(!outcome.success);
        assert_eq!(errors, "handler said no\n");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn handlers_fire_once_per_occurrence() {
        let log = CallLog::default();
        let mut cmd = recorder(&log);
        let (outcome, _) = parse(&mut cmd, &["prog", "-v", "--verbose", "-vv"]);
        assert!(outcome.success);
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn option_without_handler_still_parses() {
        let mut cmd = Command::new("prog").option(Opt::new("flag").short('x'));
        let (outcome, errors) = parse(&mut cmd, &["prog", "--flag", "-x", "rest"]);
        assert!(outcome.success);
        assert!(errors.is_empty());
        assert_eq!(outcome.operands, ["rest"]);
    }
}

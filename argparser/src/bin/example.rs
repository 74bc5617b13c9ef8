//! Demonstration program for the argparser library.

use std::cell::RefCell;
use std::env;
use std::io;
use std::process;
use std::rc::Rc;

use argparser::{Command, HelpLayout, Opt, ParseError};

#[derive(Debug)]
struct Settings {
    verbose: bool,
    filename: Option<String>,
    log_enabled: bool,
    log_file: String,
    n: i64,
    debug: bool,
}

fn convert_number(arg: &str) -> argparser::Result<i64> {
    let number: i64 = arg
        .parse()
        .map_err(|_| ParseError::Handler(format!("Not a number: {}.", arg)))?;
    if number < 10 || number > 20 {
        return Err(ParseError::Handler(format!(
            "Number out of range: {} (allowed range: 10-20).",
            number
        )));
    }
    Ok(number)
}

/// Width of the attached terminal, honoring a COLUMNS override.
fn terminal_width() -> usize {
    if let Some(cols) = env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
    {
        if cols > 0 {
            return cols;
        }
    }
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    if rc == 0 && ws.ws_col > 0 {
        ws.ws_col as usize
    } else {
        80
    }
}

fn main() {
    let settings = Rc::new(RefCell::new(Settings {
        verbose: false,
        filename: None,
        log_enabled: false,
        log_file: "log.txt".to_string(),
        n: 10,
        debug: false,
    }));
    let layout = HelpLayout::new(terminal_width());

    // Filled in once the command exists, so the -h handler can print the
    // help screen of the very command it belongs to.
    let help_text = Rc::new(RefCell::new(String::new()));

    let verbose = settings.clone();
    let debug = settings.clone();
    let file = settings.clone();
    let log = settings.clone();
    let number = settings.clone();
    let help = help_text.clone();
    let default_log = settings.borrow().log_file.clone();

    let mut cmd = Command::new("example")
        .usage("[OPTION...] OPERAND...")
        .manual(
            "This is a test program that uses the argparser library to show how to \
             implement different options. Notice how the help screen properly \
             word-wraps the text.\n\n\
             This includes newline characters and indentation:\n\n   \
             - As you can see, indentation entered on purpose...\n   \
             - ...is being respected.\n\
             \nThank you for trying this out.",
        )
        .option(
            Opt::new("verbose")
                .short('v')
                .description("Enable verbose program output.")
                .on(move || {
                    verbose.borrow_mut().verbose = true;
                    Ok(())
                }),
        )
        .option(
            // Undocumented switch, left out of the help screen.
            Opt::new("debug").hidden().on(move || {
                debug.borrow_mut().debug = true;
                Ok(())
            }),
        )
        .option(
            Opt::new("file")
                .short('f')
                .required_arg("FILENAME")
                .description("Write output to file FILENAME.")
                .on_arg(move |arg| {
                    file.borrow_mut().filename = arg.map(str::to_string);
                    Ok(())
                }),
        )
        .option(
            Opt::new("help")
                .short('h')
                .description("Print help screen and quit.")
                .on(move || {
                    print!("{}", help.borrow());
                    process::exit(0)
                }),
        )
        .option(
            Opt::new("log")
                .short('l')
                .optional_arg("LOG_FILE")
                .description(&format!(
                    "Enable logging (default log file: {}).",
                    default_log
                ))
                .on_arg(move |arg| {
                    let mut settings = log.borrow_mut();
                    settings.log_enabled = true;
                    if let Some(path) = arg {
                        settings.log_file = path.to_string();
                    }
                    Ok(())
                }),
        )
        .option(
            Opt::short_only('n')
                .required_arg("NUMBER")
                .description("Set n to a NUMBER between 10 and 20.")
                .on_arg(move |arg| {
                    // A mandatory argument is always present.
                    if let Some(arg) = arg {
                        number.borrow_mut().n = convert_number(arg)?;
                    }
                    Ok(())
                }),
        );

    let mut rendered = Vec::new();
    let _ = cmd.print_help(&layout, &mut rendered);
    *help_text.borrow_mut() = String::from_utf8_lossy(&rendered).into_owned();

    let argv: Vec<String> = env::args().collect();

    println!("Program settings before parsing:");
    println!("{:?}\n", settings.borrow());

    let outcome = cmd.parse(&argv, &mut io::stderr());
    if outcome.success {
        println!("Parsing successful.");
    } else {
        println!("Parsing failed.");
    }

    println!("\nProgram settings after parsing:");
    println!("{:?}", settings.borrow());

    println!("\nRemaining operands: {:?}", outcome.operands);

    if !outcome.success {
        process::exit(1);
    }
}

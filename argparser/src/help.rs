//! Help-screen rendering: two-column option layout and word wrapping.

use std::io::{self, Write};

use crate::command::Command;
use crate::option::{ArgSpec, Opt};

/// Width configuration for one help rendering.
///
/// The line width is the terminal's width capped at 80 columns. From it
/// derives the minimum width reserved for the description column, so that
/// unusually long option fragments cannot squeeze descriptions into a
/// sliver.
#[derive(Debug, Clone, Copy)]
pub struct HelpLayout {
    pub(crate) max_line: usize,
    pub(crate) min_description: usize,
}

impl HelpLayout {
    pub fn new(terminal_width: usize) -> Self {
        let max_line = terminal_width.min(80);
        HelpLayout {
            max_line,
            min_description: (max_line as f64 / 1.618) as usize,
        }
    }

    pub fn max_line(&self) -> usize {
        self.max_line
    }
}

impl Default for HelpLayout {
    fn default() -> Self {
        HelpLayout::new(80)
    }
}

/// Render a command's help screen: the `Usage:` line, the wrapped manual
/// text, and the sorted two-column option table.
pub fn print_help<W: Write>(cmd: &Command, layout: &HelpLayout, out: &mut W) -> io::Result<()> {
    writeln!(out, "Usage: {} {}", cmd.name, cmd.usage)?;
    if let Some(manual) = &cmd.manual {
        wrap_block(&format!("\n{}", manual), 0, 0, layout, out)?;
    }

    let mut entries: Vec<(String, &str)> = cmd
        .options
        .iter()
        .filter(|o| !o.hidden)
        .map(|o| (option_fragment(o), o.description.as_str()))
        .collect();
    if entries.is_empty() {
        return Ok(());
    }
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    writeln!(out, "\nOptions:")?;

    let mut longest = entries
        .iter()
        .map(|e| e.0.chars().count())
        .max()
        .unwrap_or(0);
    if layout.max_line.saturating_sub(longest) < layout.min_description {
        longest = layout.max_line - layout.min_description;
    }

    for (fragment, description) in &entries {
        let width = fragment.chars().count();
        let padded = format!("{}{}", fragment, " ".repeat(longest.saturating_sub(width)));
        write!(out, "{}", padded)?;
        wrap_block(description, padded.chars().count(), longest, layout, out)?;
    }
    Ok(())
}

/// Build the left-column fragment for one option, e.g.
/// `"  -f, --file FILENAME  "`. Short-only options attach an optional
/// argument directly (`-l[LOG_FILE]`) and separate a mandatory one
/// (`-n NUMBER`); long names render them as `[=NAME]` and ` NAME`.
fn option_fragment(opt: &Opt) -> String {
    let mut s = String::from("  ");
    if let Some(c) = opt.short_name {
        s.push('-');
        s.push(c);
        if opt.long_name.is_none() {
            match &opt.arg {
                ArgSpec::Required(name) => {
                    s.push(' ');
                    s.push_str(name);
                }
                ArgSpec::Optional(name) => {
                    s.push('[');
                    s.push_str(name);
                    s.push(']');
                }
                ArgSpec::None => {}
            }
        } else {
            s.push_str(", ");
        }
    } else {
        s.push_str("    ");
    }
    if let Some(long) = &opt.long_name {
        s.push_str("--");
        s.push_str(long);
        match &opt.arg {
            ArgSpec::Required(name) => {
                s.push(' ');
                s.push_str(name);
            }
            ArgSpec::Optional(name) => {
                s.push_str("[=");
                s.push_str(name);
                s.push(']');
            }
            ArgSpec::None => {}
        }
    }
    s.push_str("  ");
    s
}

/// Write `text` as a word-wrapped block and finish with a newline.
///
/// `start_col` is the cursor's current column; wrapped lines are indented
/// to `indent` columns. Embedded newlines are preserved. After a newline
/// in the text, leading spaces (including `- ` and `* ` bullet markers)
/// establish an extra indentation that is carried onto the lines wrapped
/// from that paragraph. A word longer than a whole fresh line is split at
/// the line width. All widths count characters, not bytes.
pub fn wrap_block<W: Write>(
    text: &str,
    start_col: usize,
    indent: usize,
    layout: &HelpLayout,
    out: &mut W,
) -> io::Result<()> {
    let mut col = start_col;
    let start_col = start_col.min(indent);
    let mut rest = text;
    let mut linebreak_encountered = false;
    // Indentation width found in the text itself.
    let mut indentation = 0;

    loop {
        let word_len = next_word_len(rest);
        if word_len == 0 {
            break;
        }

        if rest.starts_with('\n') {
            writeln!(out)?;
            col = 0;
            rest = &rest[1..];
            linebreak_encountered = true;
            indentation = 0;
            continue;
        }

        if col == 0 {
            col = start_col;
            write!(out, "{}", " ".repeat(col))?;
            if indentation > 0 {
                write!(out, "{}", " ".repeat(indentation))?;
                col += indentation;
            }
            if rest.starts_with(' ') {
                if linebreak_encountered {
                    indentation = measure_indent(rest);
                } else {
                    rest = &rest[1..];
                    continue;
                }
            }
            linebreak_encountered = false;
        }

        let remaining = layout.max_line.saturating_sub(col);
        if word_len > remaining {
            if col == start_col || (indentation > 0 && col == start_col + indentation) {
                // A word too long for a whole line is split hard. Always
                // take at least one character so the loop advances.
                let (head, tail) = split_at_char(rest, remaining.max(1));
                write!(out, "{}", head)?;
                rest = tail;
            }
            writeln!(out)?;
            col = 0;
            continue;
        }

        let (head, tail) = split_at_char(rest, word_len);
        write!(out, "{}", head)?;
        rest = tail;
        col += word_len;
    }
    writeln!(out)
}

/// Length in characters of the next word, counting the spaces that lead
/// up to it. A newline is its own one-character word.
fn next_word_len(s: &str) -> usize {
    let mut ignore_spaces = false;
    let mut count = 0;
    for (i, c) in s.chars().enumerate() {
        count = i + 1;
        if c == ' ' {
            if ignore_spaces {
                return i;
            }
        } else {
            ignore_spaces = true;
        }
        if c == '\n' {
            return if i == 0 { 1 } else { i };
        }
    }
    count
}

/// Width of the leading indentation, treating `- ` and `* ` bullet
/// markers as part of it so continuation lines align under the bullet's
/// text.
fn measure_indent(s: &str) -> usize {
    let chars: Vec<char> = s.chars().collect();
    let mut indent = 0;
    let mut bullet_point = false;
    while indent < chars.len() {
        let c = chars[indent];
        if !bullet_point && (c == '-' || c == '*') {
            if indent + 1 < chars.len() && chars[indent + 1] == ' ' {
                bullet_point = true;
            }
        } else if c != ' ' {
            break;
        }
        indent += 1;
    }
    indent
}

/// Split after `n` characters, at a valid UTF-8 boundary.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

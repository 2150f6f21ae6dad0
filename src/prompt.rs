//! Console prompts: y/n confirmation and "press Enter" pauses.
//!
//! Generic over the reader/writer so tests can script the operator.

use std::io::{self, BufRead, Write};

/// Asks `question` until the answer is yes, no, or empty (→ `default`).
///
/// End of input also counts as `default`, so piping `/dev/null` into the
/// program behaves like pressing Enter.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> io::Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        write!(output, "{} {} ", question, hint)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(default);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            other => writeln!(output, "Please answer y or n (got '{}').", other)?,
        }
    }
}

/// Prints `message` and blocks until a line (or end of input) arrives.
pub fn wait_for_enter<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<()> {
    write!(output, "{}", message)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// `ask_yes_no` on the process's stdin/stdout.
pub fn confirm(question: &str, default: bool) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    ask_yes_no(&mut stdin.lock(), &mut stdout, question, default)
}

//! User interaction operations (confirm and select prompts).
//!
//! End of input (Ctrl-D, closed stdin) is reported as `None` so callers can
//! treat it as a cancellation.

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    default: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Option<bool>> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(output, "{} {} ", prompt, hint)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }

    let response = line.trim().to_lowercase();
    if response.is_empty() {
        return Ok(Some(default));
    }
    Ok(Some(response == "y" || response == "yes"))
}

/// Prints a numbered menu and reads until a valid choice or end of input.
/// Accepts either the option number or the option text.
pub(crate) fn select_with_io<R: BufRead, W: Write>(
    prompt: &str,
    options: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<Option<usize>> {
    writeln!(output, "{}", prompt)?;
    for (i, option) in options.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, option)?;
    }

    loop {
        write!(output, "Select [1-{}]: ", options.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        let answer = line.trim();
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Ok(Some(n - 1));
            }
        }
        if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(answer)) {
            return Ok(Some(i));
        }

        writeln!(
            output,
            "Please enter a number between 1 and {}.",
            options.len()
        )?;
    }
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, default, &mut stdin_lock, &mut stdout)
    }

    pub(crate) fn select_impl(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        select_with_io(prompt, options, &mut stdin_lock, &mut stdout)
    }
}

//! Line-oriented prompt helpers for the interactive session.

use std::io::{BufRead, Write};

use anyhow::Result;

/// Print a prompt and read one trimmed line. Returns `None` on end of input.
pub fn prompt_line(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt for a 1-based choice over `len` numbered entries.
///
/// Returns the zero-based index, or `None` when the input is missing,
/// malformed, or out of range. The caller decides whether that is fatal.
pub fn prompt_choice(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
    len: usize,
) -> Result<Option<usize>> {
    let Some(line) = prompt_line(input, out, prompt)? else {
        return Ok(None);
    };
    match line.parse::<usize>() {
        Ok(choice) if (1..=len).contains(&choice) => Ok(Some(choice - 1)),
        _ => Ok(None),
    }
}

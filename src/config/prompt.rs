use crate::utils::error::Result;
use std::io::{BufRead, Write};

pub const PROJECT_NAME_PROMPT: &str = "Enter project name: ";
pub const MODULE_NAME_PROMPT: &str = "Enter module name (e.g., github.com/yourname/project): ";

/// Prints `message` and reads one line, trimmed. End of input yields an empty
/// string and leaves rejection to validation.
pub fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, message: &str) -> Result<String> {
    write!(writer, "{}", message)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Uses the value given on the command line, or asks for it.
pub fn value_or_prompt<R: BufRead, W: Write>(
    value: Option<&str>,
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> Result<String> {
    match value {
        Some(v) => Ok(v.trim().to_string()),
        None => prompt(reader, writer, message),
    }
}

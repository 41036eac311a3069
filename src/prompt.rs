//! Line-based prompts for interactive runs.
//!
//! Generic over the reader and writer so the shell can be driven from tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Reads one line after printing `question`. `None` on EOF.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(output, "{question}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks for the spreadsheet path. Blank input or EOF means no file was chosen.
pub fn prompt_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<PathBuf>> {
    let answer = ask(input, output, "Spreadsheet to clean (.xlsx or .csv)")?;
    Ok(answer
        .map(|path| path.trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from))
}

/// Asks how many files the rows will be split across. Blank input or EOF
/// skips padding; anything that is not a whole number asks again.
pub fn prompt_file_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<usize>> {
    loop {
        let Some(answer) = ask(input, output, "Number of files (blank to skip)")? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(count) => return Ok(Some(count)),
            Err(_) => writeln!(output, "Please enter a whole number.")?,
        }
    }
}

/// The path given on the command line, else a prompted one when the
/// session is interactive. `None` means no file was chosen.
pub fn resolve_path<R: BufRead, W: Write>(
    given: Option<PathBuf>,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<PathBuf>> {
    match given {
        Some(path) => Ok(Some(path)),
        None if interactive => prompt_path(input, output),
        None => Ok(None),
    }
}

/// The file count given on the command line, else a prompted one when the
/// session is interactive. `None` skips padding.
pub fn resolve_file_count<R: BufRead, W: Write>(
    given: Option<usize>,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<usize>> {
    match given {
        Some(count) => Ok(Some(count)),
        None if interactive => prompt_file_count(input, output),
        None => Ok(None),
    }
}

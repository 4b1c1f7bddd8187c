use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub const PROMPT: &str = "Enter the text to synthesize: ";

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Input file '{}' not found.", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read input file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read text from prompt: {0}")]
    Prompt(#[source] io::Error),
}

/// Resolve the text to synthesize.
///
/// A file path wins over inline text, inline text wins over the prompt. The
/// prompt is only shown when neither source was given, and blocks until a
/// line (or end of input) arrives.
pub fn resolve<R, W>(
    inline_text: Option<&str>,
    file_path: Option<&Path>,
    input: &mut R,
    out: &mut W,
) -> Result<String, TextError>
where
    R: BufRead,
    W: Write,
{
    if let Some(path) = file_path {
        if !path.exists() {
            return Err(TextError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| TextError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Read {} bytes of input text from {}", text.len(), path.display());
        return Ok(text);
    }

    if let Some(text) = inline_text {
        debug!("Using inline text ({} chars)", text.chars().count());
        return Ok(text.to_string());
    }

    prompt_line(input, out)
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String, TextError> {
    write!(out, "{}", PROMPT).map_err(TextError::Prompt)?;
    out.flush().map_err(TextError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(TextError::Prompt)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

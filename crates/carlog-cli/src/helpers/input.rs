//! Confirmation prompts and input reading.

use std::io::{self, Read};

use dialoguer::Confirm;

use crate::errors::CliError;

/// Ask a yes/no question, defaulting to no.
///
/// Without a terminal there is nobody to ask, so the caller must have
/// passed `--yes`.
pub fn confirm(prompt: &str, interactive: bool) -> anyhow::Result<bool> {
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "{} requires confirmation and no TTY is available\nHint: pass --yes to skip the prompt.",
            prompt.trim_end_matches('?')
        ))
        .into());
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// Read a whole file, or stdin when `source` is `-`.
pub fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(source).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CliError::not_found(
                format!("File not found: {}", source),
                "Hint: Check the path, or pass - to read stdin.",
            )
            .into()
        } else {
            anyhow::anyhow!("Failed to read {}: {}", source, e)
        }
    })
}

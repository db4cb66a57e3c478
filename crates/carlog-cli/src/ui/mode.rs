//! Output mode selection.

use std::str::FromStr;

/// How a command writes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// A single JSON document on stdout
    Json,
    /// Tab-separated rows and `key=value` lines for scripts
    #[default]
    Plain,
    /// Tables, badges and colors for a terminal
    Pretty,
}

/// Value of `CARLOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOverride {
    Plain,
    Pretty,
}

impl FromStr for FormatOverride {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!(
                "unknown output format '{}' (use plain or pretty)",
                other
            )),
        }
    }
}

impl OutputMode {
    /// `--json` always wins. An explicit override comes next; without one,
    /// pretty output needs a TTY that is not `TERM=dumb`.
    pub fn resolve(
        json: bool,
        format: Option<FormatOverride>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        match (json, format) {
            (true, _) => Self::Json,
            (false, Some(FormatOverride::Plain)) => Self::Plain,
            (false, Some(FormatOverride::Pretty)) => Self::Pretty,
            (false, None) if is_tty && !term_is_dumb => Self::Pretty,
            (false, None) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

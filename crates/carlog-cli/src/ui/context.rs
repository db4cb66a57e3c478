//! Terminal facts and the UI settings derived from them.

use std::io::IsTerminal;

use super::mode::{FormatOverride, OutputMode};
use crate::constants::env;

const FALLBACK_WIDTH: usize = 80;

/// Raw terminal and environment state, captured once per command.
#[derive(Debug, Clone, Default)]
pub struct TerminalEnv {
    pub stdout_tty: bool,
    pub stdin_tty: bool,
    pub term_is_dumb: bool,
    /// `NO_COLOR` is set
    pub no_color: bool,
    /// Raw `CARLOG_FORMAT` value
    pub format: Option<String>,
    pub columns: Option<usize>,
}

impl TerminalEnv {
    pub fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stdin_tty: std::io::stdin().is_terminal(),
            term_is_dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            format: std::env::var(env::FORMAT).ok(),
            columns: terminal_width(),
        }
    }
}

/// Settings every renderer reads.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
    interactive: bool,
}

impl UiContext {
    pub fn from_env(json: bool, no_color: bool, ascii: bool) -> Self {
        Self::resolve(json, no_color, ascii, &TerminalEnv::detect())
    }

    pub fn resolve(json: bool, no_color: bool, ascii: bool, term: &TerminalEnv) -> Self {
        let format = term
            .format
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| match value.parse::<FormatOverride>() {
                Ok(format) => Some(format),
                Err(message) => {
                    tracing::warn!(%message, "ignoring {}", env::FORMAT);
                    None
                }
            });
        let mode = OutputMode::resolve(json, format, term.stdout_tty, term.term_is_dumb);

        // Color only reaches a real terminal, and only in pretty mode.
        let color = mode.is_pretty()
            && term.stdout_tty
            && !term.term_is_dumb
            && !term.no_color
            && !no_color;

        Self {
            color,
            unicode: !ascii,
            width: term.columns.unwrap_or(FALLBACK_WIDTH),
            mode,
            interactive: term.stdout_tty && term.stdin_tty,
        }
    }

    /// Prompts need both ends of the terminal.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn terminal_width() -> Option<usize> {
    if let Some(width) = std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse::<usize>().ok())
        .filter(|width| *width > 0)
    {
        return Some(width);
    }

    #[cfg(unix)]
    {
        let mut size = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ only writes into `size`.
        let result = unsafe {
            libc::ioctl(
                libc::STDOUT_FILENO,
                libc::TIOCGWINSZ,
                &mut size as *mut libc::winsize,
            )
        };
        if result == 0 && size.ws_col > 0 {
            return Some(usize::from(size.ws_col));
        }
    }

    None
}

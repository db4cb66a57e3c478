//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, store, vehicle, maintenance, alert).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, arguments or import payload.
    pub const INVALID_INPUT: i32 = 4;
}

/// Environment variables read by the CLI.
pub mod env {
    /// Store file override (same as `--store`).
    pub const STORE: &str = "CARLOG_STORE";

    /// Config file override.
    pub const CONFIG: &str = "CARLOG_CONFIG";

    /// Log filter directive (e.g. `debug`, `carlog_core=trace`).
    pub const LOG: &str = "CARLOG_LOG";

    /// Pin "now" to an RFC 3339 instant; alert windows become reproducible.
    pub const NOW: &str = "CARLOG_NOW";

    /// `plain` or `pretty` overrides the detected output mode.
    pub const FORMAT: &str = "CARLOG_FORMAT";
}

/// Default log filter when neither env nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

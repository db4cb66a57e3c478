//! Carlog CLI - A local-first vehicle maintenance tracker
//!
//! This is the command-line interface for Carlog. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use carlog_core::VERSION;

use crate::app::AppContext;
use crate::cli::{AlertsSubcommand, Cli, Commands, ServiceSubcommand, VehicleSubcommand};
use crate::commands::{alerts, dashboard, init, misc, services, transfer, vehicles};
use crate::constants::{env, DEFAULT_LOG_LEVEL};
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);
    init_logging(&ctx);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);

        let error_msg = format!("{}", e);
        let (message, hint) = split_error_hint(&error_msg);
        let hint = hint.or_else(|| contextual_hint(message));

        print_error(&ui_ctx, message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

/// Log to stderr, filtered by CARLOG_LOG, then the config's `[log] level`.
fn init_logging(ctx: &AppContext) {
    let directive = std::env::var(env::LOG)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            ctx.config()
                .ok()
                .flatten()
                .map(|config| config.log.level.clone())
        })
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: logging disabled: {}", e);
    }
}

/// Split "message\nHint: text" into its parts.
fn split_error_hint(error: &str) -> (&str, Option<String>) {
    for marker in ["\nHint:", "\nhint:"] {
        if let Some(idx) = error.find(marker) {
            let hint = error[idx + marker.len()..].trim();
            return (&error[..idx], Some(hint.to_string()));
        }
    }
    (error, None)
}

/// Provide hints for common error patterns that carry none.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("not found: vehicle") {
        return Some("Run `carlog vehicle list` to see registered vehicles.".to_string());
    }

    if error_lower.contains("identifier mismatch") {
        return Some(
            "The file holds another vehicle's data. Import it without --as, or ask for the right export."
                .to_string(),
        );
    }

    if error_lower.contains("invalid payload") || error_lower.contains("not valid json") {
        return Some(
            "Import files come from `carlog export` (pretty or --compact).".to_string(),
        );
    }

    if error_lower.contains("quota exceeded") {
        return Some(
            "Raise [store] capacity_bytes in the config, or remove old vehicles.".to_string(),
        );
    }

    if error_lower.contains("failed to parse config") {
        return Some("Fix the file, or run `carlog init --force` to rewrite it.".to_string());
    }

    if error_lower.contains("unknown service category") || error_lower.contains("unknown fuel type")
    {
        return Some("Values are lowercase, e.g. `--category preventive`.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Vehicle(command)) => match command {
            VehicleSubcommand::Add(args) => vehicles::handle_add(ctx, args)?,
            VehicleSubcommand::List(args) => vehicles::handle_list(ctx, args)?,
            VehicleSubcommand::Show(args) => vehicles::handle_show(ctx, args)?,
            VehicleSubcommand::Remove(args) => vehicles::handle_remove(ctx, args)?,
        },
        Some(Commands::Service(command)) => match command {
            ServiceSubcommand::Add(args) => services::handle_add(ctx, args)?,
            ServiceSubcommand::List(args) => services::handle_list(ctx, args)?,
            ServiceSubcommand::Remove(args) => services::handle_remove(ctx, args)?,
        },
        Some(Commands::Dashboard(args)) => {
            dashboard::handle_dashboard(ctx, args)?;
        }
        Some(Commands::Alerts(command)) => match command {
            AlertsSubcommand::List(args) => alerts::handle_list(ctx, args)?,
            AlertsSubcommand::Dismiss(args) => alerts::handle_dismiss(ctx, args)?,
            AlertsSubcommand::Restore(args) => alerts::handle_restore(ctx, args)?,
        },
        Some(Commands::Export(args)) => {
            transfer::handle_export(ctx, args)?;
        }
        Some(Commands::Import(args)) => {
            transfer::handle_import(ctx, args)?;
        }
        Some(Commands::Qr(args)) => {
            transfer::handle_qr(ctx, args)?;
        }
        Some(Commands::Resolve(args)) => {
            transfer::handle_resolve(ctx, args)?;
        }
        Some(Commands::Seed) => {
            misc::handle_seed(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Carlog v{}", VERSION);
            println!("\nQuickstart:");
            println!("  carlog init");
            println!("  carlog vehicle add --plate ABC1234 --brand Toyota --model Corolla --year 2020 --mileage 85000");
            println!("  carlog service add ABC1234 --mileage 85200 --name \"Oil change\" --mechanic Ana --location Porto --total 320");
            println!("  carlog dashboard ABC1234");
            println!("\nRun `carlog --help` for full usage.");
        }
    }

    Ok(())
}

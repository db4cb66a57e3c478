use carlog_core::FileStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, CarlogConfig};
use crate::errors::CliError;
use crate::helpers::parse_timezone;
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let store_path = match args.path.as_deref().or(ctx.cli().store.as_deref()) {
        Some(path) => std::path::PathBuf::from(path),
        None => default_store_path()?,
    };
    let timezone = match args.timezone.as_deref() {
        Some(value) => parse_timezone(value)?,
        None => None,
    };

    if store_path.exists() {
        // Existing data is kept; opening checks that it is a store file.
        FileStore::open(&store_path)?;
        tracing::info!(path = %store_path.display(), "reusing existing store");
    } else {
        FileStore::create(&store_path)?;
        tracing::info!(path = %store_path.display(), "created store");
    }

    let config = CarlogConfig::new(store_path.clone(), timezone);
    write_config(&config_path, &config)?;

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    let config_display = config_path.display().to_string();
    let store_display = store_path.display().to_string();
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Initialized carlog",
            &[
                ("Config", config_display.as_str()),
                ("Store", store_display.as_str()),
            ],
        ),
    );
    if ui_ctx.mode.is_pretty() {
        print(
            &ui_ctx,
            &hint(&ui_ctx, "Run `carlog vehicle add` or `carlog seed` to get started."),
        );
    }
    Ok(())
}

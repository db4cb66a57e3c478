use clap::CommandFactory;
use clap_complete::generate;

use crate::app::AppContext;
use crate::cli::{Cli, CompletionsArgs};
use crate::output::vehicle_label;
use crate::ui::{badge, hint, print, receipt, Badge};

pub fn handle_seed(ctx: &AppContext) -> anyhow::Result<()> {
    let mut garage = ctx.open_garage()?;
    let seeded = garage.seed_sample(ctx.now()?)?;

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    match seeded {
        Some(vehicle) => {
            let label = vehicle_label(&vehicle);
            print(
                &ui_ctx,
                &receipt(
                    &ui_ctx,
                    "Sample data installed",
                    &[
                        ("ID", vehicle.id.as_str()),
                        ("Plate", vehicle.plate.as_str()),
                        ("Vehicle", label.as_str()),
                    ],
                ),
            );
            if ui_ctx.mode.is_pretty() {
                print(
                    &ui_ctx,
                    &hint(&ui_ctx, &format!("carlog dashboard {}", vehicle.plate)),
                );
            }
        }
        None => {
            if ui_ctx.mode.is_pretty() {
                print(
                    &ui_ctx,
                    &badge(
                        &ui_ctx,
                        Badge::Info,
                        "Store already has vehicles; sample data not installed",
                    ),
                );
            } else {
                println!("status=skipped");
            }
        }
    }
    Ok(())
}

pub fn handle_completions(args: &CompletionsArgs) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "carlog", &mut std::io::stdout());
    Ok(())
}

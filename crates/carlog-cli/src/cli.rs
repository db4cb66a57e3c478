use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use carlog_core::VERSION;

/// Carlog - A local-first vehicle maintenance tracker
#[derive(Parser)]
#[command(name = "carlog")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(short, long, global = true, env = "CARLOG_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create an empty store
    Init(InitArgs),

    /// Manage registered vehicles
    #[command(subcommand)]
    Vehicle(VehicleSubcommand),

    /// Log and review maintenance events
    #[command(subcommand)]
    Service(ServiceSubcommand),

    /// Summary, alerts and next maintenance for a vehicle
    Dashboard(DashboardArgs),

    /// Review and dismiss alerts
    #[command(subcommand)]
    Alerts(AlertsSubcommand),

    /// Write a vehicle's full record to a JSON file
    Export(ExportArgs),

    /// Load a vehicle's full record from a JSON file
    Import(ImportArgs),

    /// Print the reference payload to encode as a QR code
    Qr(QrArgs),

    /// Resolve scanned or pasted text to a vehicle
    Resolve(ResolveArgs),

    /// Install demo data into an empty store
    Seed,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Display timezone (IANA name, e.g. America/Sao_Paulo)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum VehicleSubcommand {
    /// Register a vehicle
    Add(VehicleAddArgs),
    /// List registered vehicles
    List(JsonArgs),
    /// Show a vehicle and its maintenance timeline
    Show(VehicleShowArgs),
    /// Remove a vehicle and all of its data
    Remove(VehicleRemoveArgs),
}

/// Arguments for `vehicle add`
#[derive(Args)]
pub struct VehicleAddArgs {
    /// License plate
    #[arg(long)]
    pub plate: String,

    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub year: u16,

    /// Current odometer reading in km
    #[arg(long, value_name = "KM")]
    pub mileage: u32,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub chassis: Option<String>,

    /// gasoline, ethanol, flex, diesel, electric or hybrid
    #[arg(long)]
    pub fuel: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shared `--json` flag
#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `vehicle show`
#[derive(Args)]
pub struct VehicleShowArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `vehicle remove`
#[derive(Args)]
pub struct VehicleRemoveArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum ServiceSubcommand {
    /// Log a maintenance event
    Add(ServiceAddArgs),
    /// List maintenance events, newest first
    List(ServiceListArgs),
    /// Delete a maintenance event
    Remove(ServiceRemoveArgs),
}

/// Arguments for `service add`
#[derive(Args)]
pub struct ServiceAddArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Service date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Odometer reading at the time of service
    #[arg(long, value_name = "KM")]
    pub mileage: u32,

    /// Service name (e.g. "Oil change")
    #[arg(long)]
    pub name: String,

    /// preventive, corrective, review, inspection or other
    #[arg(long, default_value = "preventive")]
    pub category: String,

    /// Mechanic name
    #[arg(long)]
    pub mechanic: String,

    #[arg(long)]
    pub workshop: Option<String>,

    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub contact: Option<String>,

    /// Total cost
    #[arg(long)]
    pub total: f64,

    #[arg(long)]
    pub labor: Option<f64>,

    /// Parts cost
    #[arg(long)]
    pub parts_cost: Option<f64>,

    /// Other costs
    #[arg(long)]
    pub other_cost: Option<f64>,

    /// Part used, as NAME[:WARRANTY_MONTHS[:WARRANTY_KM]] (repeatable)
    #[arg(long = "part", value_name = "SPEC")]
    pub parts: Vec<String>,

    /// Free-text notes
    #[arg(long)]
    pub description: Option<String>,

    /// Next maintenance due at this odometer reading
    #[arg(long, value_name = "KM")]
    pub next_km: Option<u32>,

    /// Next maintenance due on this date (YYYY-MM-DD)
    #[arg(long)]
    pub next_date: Option<String>,

    /// Label for the next maintenance
    #[arg(long)]
    pub next_label: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `service list`
#[derive(Args)]
pub struct ServiceListArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Only events of this category
    #[arg(long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `service remove`
#[derive(Args)]
pub struct ServiceRemoveArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Maintenance ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `dashboard` command
#[derive(Args)]
pub struct DashboardArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum AlertsSubcommand {
    /// List alerts for a vehicle
    List(AlertsListArgs),
    /// Hide an alert until it is restored
    Dismiss(AlertsDismissArgs),
    /// Show dismissed alerts again
    Restore(AlertsRestoreArgs),
}

/// Arguments for `alerts list`
#[derive(Args)]
pub struct AlertsListArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Include dismissed alerts
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `alerts dismiss`
#[derive(Args)]
pub struct AlertsDismissArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Alert ID
    #[arg(value_name = "ALERT")]
    pub alert: String,
}

/// Arguments for `alerts restore`
#[derive(Args)]
pub struct AlertsRestoreArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Alert ID (omit with --all)
    #[arg(value_name = "ALERT", required_unless_present = "all")]
    pub alert: Option<String>,

    /// Restore every dismissed alert
    #[arg(long, conflicts_with = "alert")]
    pub all: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Destination file or directory ("-" for stdout)
    #[arg(long, short)]
    pub out: Option<String>,

    /// Shortened keys on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// JSON file to import ("-" for stdin)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Only accept data for this vehicle ID
    #[arg(long = "as", value_name = "VEHICLE_ID")]
    pub as_id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `qr` command
#[derive(Args)]
pub struct QrArgs {
    /// Vehicle ID or plate
    #[arg(value_name = "VEHICLE")]
    pub vehicle: String,

    /// Output the payload only, as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `resolve` command
#[derive(Args)]
pub struct ResolveArgs {
    /// Scanned text, or "-" to read stdin
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// When the vehicle is unknown, import its data from this file
    #[arg(long, value_name = "FILE")]
    pub import: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

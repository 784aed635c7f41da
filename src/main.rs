// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use umkm_map::{
    init_logging, Config, Dashboard, FilterCriteria, LogTarget, MapProjection, RenderModel,
    APP_TITLE, EMPTY_MAP_NOTICE,
};

#[derive(Parser)]
#[command(name = "umkm-map", version, about = "Peta UMKM Sulawesi Barat")]
struct Cli {
    /// Path to a TOML config file (defaults to ./umkm-map.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Print metrics, map centre and table for a filter
    Summary(FilterArgs),
    /// Print the render model for a filter as JSON
    Json(FilterArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Kabupaten to keep ("Semua" for all)
    #[arg(long)]
    regency: Option<String>,
    /// Category to keep ("Semua" for all)
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive name substring
    #[arg(long)]
    name: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selection(
            self.regency.as_deref(),
            self.category.as_deref(),
            self.name.as_deref(),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(&config),
        Command::Summary(args) => {
            let _guard = init_logging(LogTarget::Console, &config.logging.filter)
                .context("Failed to initialize logging")?;
            let dashboard = load_dashboard(&config)?;
            print_summary(&dashboard.on_filter_changed(&args.criteria()));
            Ok(())
        }
        Command::Json(args) => {
            let _guard = init_logging(LogTarget::Console, &config.logging.filter)
                .context("Failed to initialize logging")?;
            let dashboard = load_dashboard(&config)?;
            let model = dashboard.on_filter_changed(&args.criteria());
            println!("{}", serde_json::to_string_pretty(&model)?);
            Ok(())
        }
    }
}

fn load_dashboard(config: &Config) -> Result<Dashboard> {
    let store = config.record_store().context("Failed to load UMKM records")?;
    Ok(Dashboard::new(store))
}

fn print_summary(model: &RenderModel) {
    println!("🗺️  {}", APP_TITLE);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (label, value) in model.metrics.labelled() {
        println!("{:<18} {}", label, value);
    }

    println!();
    match &model.map {
        MapProjection::Ready(view) => {
            println!(
                "📍 Map centre: {:.4}, {:.4} (zoom {}) - {} markers",
                view.view_state.latitude,
                view.view_state.longitude,
                view.view_state.zoom,
                view.markers.len()
            );
        }
        MapProjection::Empty => println!("⚠️  {}", EMPTY_MAP_NOTICE),
    }

    println!();
    println!(
        "{:>3}  {:<30} {:<22} {:<16} {:<20}",
        "#", "Nama", "Kategori", "Kabupaten", "Alamat"
    );
    for (i, record) in model.table_rows.iter().enumerate() {
        println!(
            "{:>3}  {:<30} {:<22} {:<16} {:<20}",
            i, record.name, record.category, record.regency, record.address
        );
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let _guard = init_logging(LogTarget::File(&config.logging.directory), &config.logging.filter)
        .with_context(|| {
            format!("Failed to open log directory {}", config.logging.directory.display())
        })?;

    println!("🖥️  Loading {}...\n", APP_TITLE);
    let dashboard = load_dashboard(config)?;
    tracing::info!(records = dashboard.store().len(), "starting terminal dashboard");

    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin umkm-server --features server");
    std::process::exit(1);
}

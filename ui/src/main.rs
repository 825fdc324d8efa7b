use anyhow::{Context, Result, bail};
use clap::Parser;
use engine::partials::PartialsClient;
use engine::settings::SettingsStore;
use std::path::PathBuf;
use sufee::app::application::{App, AppOptions};
use sufee::app::page_loader::PageType;
use sufee::components::common::Viewport;
use sufee::components::data_table::DataTableComponent;
use sufee::config::{self, ConfigLoadResult};
use sufee::fixture::PageFixture;
use sufee::logger;

#[derive(Parser, Debug)]
#[command(name = "sufee")]
#[command(about = "Run one Sufee dashboard page view headlessly", long_about = None)]
#[command(version)]
struct Cli {
    /// Page fixture (JSON); a built-in sample page is used when omitted
    #[arg(long, value_name = "PATH")]
    page_file: Option<PathBuf>,

    /// dashboard, charts, tables, forms or default; overrides the fixture
    #[arg(long, value_name = "TYPE")]
    page_type: Option<String>,

    /// Configuration file (defaults to ./config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Viewport width in CSS pixels
    #[arg(long, value_name = "PX")]
    width: Option<f64>,
}

fn print_first_page(name: &str, table: &DataTableComponent) {
    let model = table.model();
    println!("\n{name}: {}", model.page_info());
    for row in model.page_rows(1) {
        println!("  {}", row.join(" | "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    config::init_config(cli.config.as_deref());
    let app_config = match config::get_config() {
        ConfigLoadResult::Success(config) => config.as_ref(),
        ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => bail!("{e}"),
    };
    if let Err(errors) = app_config.validate() {
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        bail!("Configuration validation failed:\n{}", messages.join("\n\n"));
    }
    logger::setup_logger(app_config.logging()).context("Failed to initialize logger")?;
    log::info!("Starting sufee");

    let page_override = cli
        .page_type
        .as_deref()
        .map(|raw| raw.parse::<PageType>().unwrap_or_default());
    let fixture = match &cli.page_file {
        Some(path) => PageFixture::load(path)?,
        None => PageFixture::sample(page_override.unwrap_or(PageType::Dashboard)),
    };

    let settings = SettingsStore::from_path_or_memory(app_config.settings().path());
    let mut options = AppOptions::from_config(app_config);
    if let Some(page) = page_override {
        options = options.with_page_type(page);
    }
    if let Some(width) = cli.width {
        options = options.with_viewport(Viewport::new(width));
    }

    let mut app = App::new(fixture.into_document(), settings, options);
    app.init();

    if let Some(base) = app_config.partials().base_url() {
        let client = PartialsClient::from_base(base).context("Invalid partials base URL")?;
        let loaded = app.load_partials(client).await;
        log::info!("Loaded {loaded} partial(s) from {base}");
    }
    app.wait_for_page_components().await;

    println!("Page: {}", app.page_type());
    println!("Components:");
    for name in app.registry().names() {
        println!("  {name}");
    }
    for name in app.registry().names() {
        if let Some(table) = app.get::<DataTableComponent>(name) {
            print_first_page(name, table);
        }
    }

    app.destroy();
    log::info!("Page view finished");
    Ok(())
}

use clap::{Parser, Subcommand, ValueEnum};
use demand_forecast_core::{
    AppConfig, ConfigLoader, ForecastEngine, ForecastOutcome, PolicyKind, ReportFormatter,
};
use demand_forecast_data::{
    categories, list_options, products_in_category, CsvSeriesPreparer, PrepareSettings,
};
use demand_forecast_model::AdditiveSeasonalModel;
use demand_forecast_strategy::policy_for;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "demand-forecast")]
#[command(about = "Retail demand forecasting and discount assistant", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "config/Config.toml")]
    config: String,

    /// Optional profile (layers Config.{profile}.toml from the config file's directory)
    #[arg(long, global = true, env = "DEMAND_FORECAST_PROFILE")]
    profile: Option<String>,

    /// Dataset CSV path (overrides config)
    #[arg(short, long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast one product and recommend a discount
    Forecast {
        /// Product identifier (e.g., "FOODS_1_001")
        #[arg(short, long)]
        product: String,
        /// Discount policy: ratio or category-table
        #[arg(long)]
        policy: Option<PolicyKind>,
        /// Number of days to forecast
        #[arg(long)]
        horizon: Option<usize>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List selectable products and categories
    Options {
        /// Only list products within this category
        #[arg(long)]
        category: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Start the web API server
    Serve {
        /// Server address (defaults to the configured host and port)
        #[arg(short, long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.profile {
        Some(profile) => ConfigLoader::load_with_profile(&cli.config, profile)?,
        None => ConfigLoader::load_from(&cli.config)?,
    };
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }

    match cli.command {
        Commands::Forecast {
            product,
            policy,
            horizon,
            format,
        } => {
            let succeeded = run_forecast(config, &product, policy, horizon, format).await?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::Options { category, format } => {
            run_options(&config, category.as_deref(), format)?;
        }
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server.addr());
            run_server(config, &addr).await?;
        }
    }

    Ok(())
}

/// Returns `false` when the pipeline produced an error result.
async fn run_forecast(
    config: AppConfig,
    product_id: &str,
    policy: Option<PolicyKind>,
    horizon: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let policy = policy.unwrap_or(config.forecast.policy);
    let horizon = horizon.unwrap_or(config.forecast.horizon_days);

    tracing::info!(
        "Forecasting {} from {} ({} policy, {} days)",
        product_id,
        config.dataset.path,
        policy,
        horizon
    );

    let engine = ForecastEngine::new(
        CsvSeriesPreparer::new(
            config.dataset.path.clone(),
            PrepareSettings::from(&config.forecast),
        ),
        Arc::new(AdditiveSeasonalModel::from(&config.model)),
        policy_for(policy),
    )
    .with_horizon(horizon)
    .with_max_horizon(config.forecast.max_horizon_days);

    let product_id = product_id.to_string();
    let run = tokio::task::spawn_blocking(move || engine.run(&product_id)).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run.outcome)?),
        OutputFormat::Text => {
            println!(
                "{}",
                ReportFormatter::format(&run.outcome, &run.diagnostics)
            );
        }
    }

    Ok(!matches!(run.outcome, ForecastOutcome::Error(_)))
}

fn run_options(
    config: &AppConfig,
    category: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let options = list_options(&config.dataset.path)?;
    tracing::info!(
        "Loaded {} product options from {}",
        options.len(),
        config.dataset.path
    );

    match (category, format) {
        (Some(cat), OutputFormat::Json) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&products_in_category(&options, cat))?
            );
        }
        (Some(cat), OutputFormat::Text) => {
            for item_id in products_in_category(&options, cat) {
                println!("{item_id}");
            }
        }
        (None, OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&options)?),
        (None, OutputFormat::Text) => {
            for cat in categories(&options) {
                let products = products_in_category(&options, &cat);
                println!("{cat} ({} products)", products.len());
                for item_id in products {
                    println!("  {item_id}");
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig, addr: &str) -> anyhow::Result<()> {
    tracing::info!("Starting web API server on {}", addr);

    let server = demand_forecast_web_api::ApiServer::new(config);
    server.serve(addr).await?;

    Ok(())
}

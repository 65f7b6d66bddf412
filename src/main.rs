use cafe_forecast::config::{Config, OutputFormat};
use cafe_forecast::fetcher::Fetcher;
use cafe_forecast::pipeline::run_forecast_with_retries;
use cafe_forecast::report;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cafe_forecast=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path =
        std::env::var("CAFE_FORECAST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::load(&config_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration from {}: {}\n\n\
             Make sure:\n\
             1. The config file exists (or set CAFE_FORECAST_CONFIG)\n\
             2. All referenced environment variables are set (check .env.example)",
            config_path,
            e
        )
    })?;
    info!("Configuration loaded for {}", config.location.name);

    let request = config.forecast_request()?;
    let fetcher = Fetcher::with_timeout(&config.forecast.base_url, config.forecast.request_timeout())?;

    let predictions =
        run_forecast_with_retries(&fetcher, &request, config.forecast.max_retries).await?;

    match config.output.format {
        OutputFormat::Table => {
            println!("Expected revenue and staffing - {}", config.location.name);
            println!("{}", report::render_forecast_table(&predictions));
            println!("Weather per day");
            print!("{}", report::render_weather_table(&predictions));
        }
        OutputFormat::Json => println!("{}", report::to_json(&predictions)?),
    }

    Ok(())
}

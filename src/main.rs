use anyhow::Result;
use tracing::info;

use brillo::app::api::app_api_loop;
use brillo::environment::Config;
use brillo::logging::configure_logging;

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let config = Config::from_env()?;
    info!(
        "Starting brillo (model: {}, news provider: {:?}, port: {})",
        config.default_model, config.news_provider, config.port
    );

    app_api_loop(config).await
}

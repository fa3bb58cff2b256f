use hairscan_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env for local development before reading configuration.
    dotenvy::dotenv().ok();

    hairscan_api::telemetry::init_tracing();

    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = hairscan_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    hairscan_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
